//! Trade ledger statistics.

use super::position::Trade;
use super::simulation::Diagnostics;

#[derive(Debug, Clone, PartialEq)]
pub struct TradeStats {
    pub total_trades: usize,
    pub win_rate: f64,
    pub average_return: f64,
    pub compounded_return: f64,
    pub wins: usize,
    pub losses: usize,
    pub breakeven: usize,
    pub best_return: f64,
    pub worst_return: f64,
    pub avg_holding_days: f64,
}

/// Outcome of aggregation. An empty ledger is an expected result and carries
/// the day-level diagnostics instead of statistics.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsReport {
    Trades(TradeStats),
    NoTrades(Diagnostics),
}

impl StatsReport {
    pub fn trade_stats(&self) -> Option<&TradeStats> {
        match self {
            StatsReport::Trades(stats) => Some(stats),
            StatsReport::NoTrades(_) => None,
        }
    }
}

/// `∏(1 + r) − 1` over the ledger. Zero for an empty ledger.
pub fn compounded_return(trades: &[Trade]) -> f64 {
    trades
        .iter()
        .fold(1.0, |acc, t| acc * (1.0 + t.return_ratio))
        - 1.0
}

pub fn aggregate(trades: &[Trade], diagnostics: &Diagnostics) -> StatsReport {
    if trades.is_empty() {
        return StatsReport::NoTrades(diagnostics.clone());
    }

    let mut wins = 0usize;
    let mut losses = 0usize;
    let mut breakeven = 0usize;
    let mut sum_returns = 0.0_f64;
    let mut best_return = f64::NEG_INFINITY;
    let mut worst_return = f64::INFINITY;
    let mut total_holding_days = 0i64;

    for trade in trades {
        let r = trade.return_ratio;
        if r > 0.0 {
            wins += 1;
        } else if r < 0.0 {
            losses += 1;
        } else {
            breakeven += 1;
        }
        sum_returns += r;
        best_return = best_return.max(r);
        worst_return = worst_return.min(r);
        total_holding_days += trade.holding_days;
    }

    let total_trades = trades.len();
    let n = total_trades as f64;

    StatsReport::Trades(TradeStats {
        total_trades,
        win_rate: wins as f64 / n,
        average_return: sum_returns / n,
        compounded_return: compounded_return(trades),
        wins,
        losses,
        breakeven,
        best_return,
        worst_return,
        avg_holding_days: total_holding_days as f64 / n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn trade(entry_day: u32, exit_day: u32, entry: f64, exit: f64) -> Trade {
        let entry_date = NaiveDate::from_ymd_opt(2024, 1, entry_day).unwrap();
        let exit_date = NaiveDate::from_ymd_opt(2024, 1, exit_day).unwrap();
        Trade {
            entry_date,
            entry_price: entry,
            exit_date,
            exit_price: exit,
            return_ratio: (exit - entry) / entry,
            holding_days: (exit_date - entry_date).num_days(),
            entry_external: 35.0,
            exit_external: 15.0,
            exit_volume: 1_000.0,
            entry_score: 3,
        }
    }

    #[test]
    fn empty_ledger_reports_diagnostics() {
        let diag = Diagnostics {
            total_days: 40,
            warmed_up_days: 21,
            ..Diagnostics::default()
        };
        let report = aggregate(&[], &diag);
        assert_eq!(report, StatsReport::NoTrades(diag));
        assert!(report.trade_stats().is_none());
    }

    #[test]
    fn mixed_ledger() {
        let trades = vec![
            trade(1, 5, 100.0, 110.0), // +10%
            trade(2, 5, 100.0, 95.0),  // -5%
            trade(6, 10, 50.0, 50.0),  // 0
            trade(7, 10, 80.0, 100.0), // +25%
        ];
        let report = aggregate(&trades, &Diagnostics::default());
        let stats = report.trade_stats().unwrap();

        assert_eq!(stats.total_trades, 4);
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.breakeven, 1);
        assert_relative_eq!(stats.win_rate, 0.5);
        assert_relative_eq!(stats.average_return, (0.10 - 0.05 + 0.0 + 0.25) / 4.0, epsilon = 1e-12);
        assert_relative_eq!(stats.compounded_return, 1.10 * 0.95 * 1.0 * 1.25 - 1.0, epsilon = 1e-12);
        assert_relative_eq!(stats.best_return, 0.25, epsilon = 1e-12);
        assert_relative_eq!(stats.worst_return, -0.05, epsilon = 1e-12);
        assert_relative_eq!(stats.avg_holding_days, (4.0 + 3.0 + 4.0 + 3.0) / 4.0);
    }

    #[test]
    fn single_losing_trade() {
        let trades = vec![trade(1, 3, 100.0, 80.0)];
        let stats = aggregate(&trades, &Diagnostics::default())
            .trade_stats()
            .cloned()
            .unwrap();
        assert_eq!(stats.win_rate, 0.0);
        assert_relative_eq!(stats.compounded_return, -0.2, epsilon = 1e-12);
        assert_eq!(stats.best_return, stats.worst_return);
    }

    #[test]
    fn compounded_return_empty_is_zero() {
        assert_eq!(compounded_return(&[]), 0.0);
    }
}
