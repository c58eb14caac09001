//! Event loop over evaluated signal rows.
//!
//! One pass in date order. On each row a sell is resolved before a buy:
//!
//! 1. `sell_signal` with open positions: every position closes at this bar's
//!    close, in entry order, and the book is cleared.
//! 2. `buy_signal`: a new position opens at this bar's close. Positions stack
//!    without limit.
//!
//! Positions still open after the last row stay open and are returned as such.

use chrono::NaiveDate;

use super::ohlcv::OhlcvBar;
use super::portfolio::Portfolio;
use super::position::{ExitFill, Position, Trade};
use super::signal::SignalRow;

/// Day-level counts explaining what the signal stream looked like.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub total_days: usize,
    pub warmed_up_days: usize,
    pub price_below_lower_days: usize,
    pub price_above_upper_days: usize,
    pub volume_spike_days: usize,
    pub external_high_days: usize,
    pub external_low_days: usize,
    pub sentiment_fear_days: usize,
    pub sentiment_greed_days: usize,
    pub rsi_oversold_days: usize,
    pub rsi_overbought_days: usize,
    pub buy_signal_days: usize,
    pub sell_signal_days: usize,
    /// Sell signals that arrived with nothing open.
    pub ignored_sells: usize,
}

impl Diagnostics {
    fn record(&mut self, row: &SignalRow) {
        self.total_days += 1;
        if !row.warmed_up {
            return;
        }
        self.warmed_up_days += 1;

        let c = &row.conditions;
        self.price_below_lower_days += usize::from(c.price_below_lower);
        self.price_above_upper_days += usize::from(c.price_above_upper);
        self.volume_spike_days += usize::from(c.volume_spike);
        self.external_high_days += usize::from(c.external_high);
        self.external_low_days += usize::from(c.external_low);
        self.sentiment_fear_days += usize::from(c.sentiment_fear);
        self.sentiment_greed_days += usize::from(c.sentiment_greed);
        self.rsi_oversold_days += usize::from(c.rsi_oversold);
        self.rsi_overbought_days += usize::from(c.rsi_overbought);
        self.buy_signal_days += usize::from(row.buy_signal);
        self.sell_signal_days += usize::from(row.sell_signal);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub trades: Vec<Trade>,
    pub open_positions: Vec<Position>,
    pub diagnostics: Diagnostics,
    /// Date and close of the last simulated bar, used to mark open positions.
    pub last_mark: Option<(NaiveDate, f64)>,
}

impl SimulationResult {
    /// Unrealised return of each open position at the last close.
    pub fn open_position_marks(&self) -> Vec<(&Position, f64)> {
        match self.last_mark {
            Some((_, close)) => self
                .open_positions
                .iter()
                .map(|p| (p, p.unrealized_return(close)))
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Run the position state machine over `signals`.
///
/// `signals` and `bars` are paired by index; fills use the bar's date and
/// close. Rows past the shorter of the two are ignored, as are pairs whose
/// dates disagree or do not advance past the previous simulated day.
pub fn simulate(signals: &[SignalRow], bars: &[OhlcvBar]) -> SimulationResult {
    if signals.len() != bars.len() {
        tracing::warn!(
            signals = signals.len(),
            bars = bars.len(),
            "signal rows and bars differ in length, truncating"
        );
    }

    let mut portfolio = Portfolio::new();
    let mut diagnostics = Diagnostics::default();
    let mut last_mark: Option<(NaiveDate, f64)> = None;

    for (row, bar) in signals.iter().zip(bars) {
        if row.date != bar.date {
            tracing::warn!(signal = %row.date, bar = %bar.date, "signal row and bar dates differ, skipping");
            continue;
        }
        if last_mark.is_some_and(|(prev, _)| bar.date <= prev) {
            tracing::warn!(date = %bar.date, "bar out of date order, skipping");
            continue;
        }

        diagnostics.record(row);
        last_mark = Some((bar.date, bar.close));

        if row.sell_signal {
            if portfolio.has_open_positions() {
                let fill = ExitFill {
                    date: bar.date,
                    price: bar.close,
                    external: row.external,
                    volume: bar.volume,
                };
                let closed = portfolio.liquidate_all(&fill);
                tracing::debug!(date = %bar.date, price = bar.close, closed, "liquidated positions");
            } else {
                diagnostics.ignored_sells += 1;
            }
        }

        if row.buy_signal {
            if bar.close > 0.0 {
                portfolio.open_position(Position {
                    entry_date: bar.date,
                    entry_price: bar.close,
                    entry_external: row.external,
                    entry_score: row.buy_score,
                    entry_conditions: row.conditions,
                });
                tracing::debug!(
                    date = %bar.date,
                    price = bar.close,
                    open = portfolio.position_count(),
                    "opened position"
                );
            } else {
                tracing::debug!(date = %bar.date, "buy skipped on non-positive close");
            }
        }
    }

    SimulationResult {
        trades: portfolio.trades,
        open_positions: portfolio.open_positions,
        diagnostics,
        last_mark,
    }
}
