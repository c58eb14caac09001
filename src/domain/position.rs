//! Open positions and closed round-trip trades.

use chrono::NaiveDate;

use crate::domain::signal::Conditions;

/// An open long exposure opened on a buy signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub entry_external: f64,
    pub entry_score: usize,
    /// Condition values on the entry day, kept for audit.
    pub entry_conditions: Conditions,
}

impl Position {
    /// Return if the position were closed at `price`.
    pub fn unrealized_return(&self, price: f64) -> f64 {
        if self.entry_price > 0.0 {
            (price - self.entry_price) / self.entry_price
        } else {
            0.0
        }
    }
}

/// Where and when a liquidation happens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitFill {
    pub date: NaiveDate,
    pub price: f64,
    pub external: f64,
    pub volume: f64,
}

/// A closed round trip. `exit_date > entry_date` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    pub return_ratio: f64,
    pub holding_days: i64,
    pub entry_external: f64,
    pub exit_external: f64,
    pub exit_volume: f64,
    pub entry_score: usize,
}

impl Trade {
    pub fn close(position: Position, fill: &ExitFill) -> Self {
        Trade {
            entry_date: position.entry_date,
            entry_price: position.entry_price,
            exit_date: fill.date,
            exit_price: fill.price,
            return_ratio: (fill.price - position.entry_price) / position.entry_price,
            holding_days: (fill.date - position.entry_date).num_days(),
            entry_external: position.entry_external,
            exit_external: fill.external,
            exit_volume: fill.volume,
            entry_score: position.entry_score,
        }
    }

    pub fn is_win(&self) -> bool {
        self.return_ratio > 0.0
    }
}
