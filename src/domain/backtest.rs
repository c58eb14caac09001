//! Backtest configuration and the composed pipeline.
//!
//! bars -> aligned external -> indicators -> signals -> simulation -> stats

use chrono::{Days, NaiveDate};

use super::alignment::{align_or_default, ExternalPoint, DEFAULT_EXTERNAL_VALUE};
use super::error::PanictraderError;
use super::indicator::{IndicatorConfig, IndicatorRow};
use super::indicator_helpers::compute_indicators;
use super::metrics::{aggregate, StatsReport};
use super::ohlcv::OhlcvBar;
use super::signal::{evaluate_signals, SignalRow};
use super::simulation::{simulate, SimulationResult};
use super::strategy::SignalConfig;

pub const DEFAULT_WARMUP_DAYS: i64 = 60;
/// Upper bound on `warmup_days` (about a century).
pub const MAX_WARMUP_DAYS: i64 = 36_500;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub symbol: String,
    pub external_symbol: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Calendar days of history loaded ahead of `start_date`.
    pub warmup_days: i64,
    pub indicators: IndicatorConfig,
    pub signals: SignalConfig,
}

impl BacktestConfig {
    /// First date to request from the data source.
    pub fn fetch_start(&self) -> Result<NaiveDate, PanictraderError> {
        u64::try_from(self.warmup_days)
            .ok()
            .and_then(|days| self.start_date.checked_sub_days(Days::new(days)))
            .ok_or_else(|| PanictraderError::ConfigInvalid {
                section: "backtest".to_string(),
                key: "warmup_days".to_string(),
                reason: format!(
                    "{} days before {} is out of range",
                    self.warmup_days, self.start_date
                ),
            })
    }

    pub fn in_window(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Everything a run produced, restricted to the simulation window.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestReport {
    pub symbol: String,
    pub sentiment: Option<f64>,
    pub indicator_rows: Vec<IndicatorRow>,
    pub signals: Vec<SignalRow>,
    pub simulation: SimulationResult,
    pub stats: StatsReport,
}

/// Run the full pipeline.
///
/// `bars` may start before `config.start_date`; those rows only warm up the
/// indicators. Bars are assumed validated (see
/// [`validate_bars`](super::ohlcv::validate_bars)).
pub fn run_backtest(
    bars: &[OhlcvBar],
    external: &[ExternalPoint],
    sentiment: Option<f64>,
    config: &BacktestConfig,
) -> BacktestReport {
    let span = tracing::info_span!("backtest", symbol = %config.symbol);
    let _guard = span.enter();

    let dates: Vec<NaiveDate> = bars.iter().map(|b| b.date).collect();
    let aligned = align_or_default(&dates, external, DEFAULT_EXTERNAL_VALUE);
    let rows = compute_indicators(bars, &config.indicators);
    let signals = evaluate_signals(&rows, &aligned, sentiment, &config.signals);

    let window: Vec<usize> = (0..bars.len())
        .filter(|&i| config.in_window(bars[i].date))
        .collect();
    let history = bars.iter().take_while(|b| b.date < config.start_date).count();
    if !window.is_empty() && history < config.indicators.warmup_bars() {
        tracing::warn!(
            history,
            needed = config.indicators.warmup_bars(),
            "not enough history before start date; early rows have no signal"
        );
    }
    let window_bars: Vec<OhlcvBar> = window.iter().map(|&i| bars[i].clone()).collect();
    let window_signals: Vec<SignalRow> = window.iter().map(|&i| signals[i].clone()).collect();
    let window_rows: Vec<IndicatorRow> = window.iter().map(|&i| rows[i].clone()).collect();

    let simulation = simulate(&window_signals, &window_bars);
    let stats = aggregate(&simulation.trades, &simulation.diagnostics);

    tracing::info!(
        bars = bars.len(),
        simulated = window_bars.len(),
        trades = simulation.trades.len(),
        open = simulation.open_positions.len(),
        "backtest complete"
    );

    BacktestReport {
        symbol: config.symbol.clone(),
        sentiment,
        indicator_rows: window_rows,
        signals: window_signals,
        simulation,
        stats,
    }
}
