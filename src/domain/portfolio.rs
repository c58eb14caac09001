//! Pyramid position book: ordered open positions plus the closed-trade ledger.

use super::position::{ExitFill, Position, Trade};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Portfolio {
    pub open_positions: Vec<Position>,
    pub trades: Vec<Trade>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a position. There is no cap on concurrent positions.
    pub fn open_position(&mut self, position: Position) {
        self.open_positions.push(position);
    }

    pub fn has_open_positions(&self) -> bool {
        !self.open_positions.is_empty()
    }

    pub fn position_count(&self) -> usize {
        self.open_positions.len()
    }

    /// Close every open position at `fill`, in entry order, and clear the book.
    ///
    /// Returns the number of trades produced.
    pub fn liquidate_all(&mut self, fill: &ExitFill) -> usize {
        let closed = std::mem::take(&mut self.open_positions);
        let count = closed.len();
        self.trades
            .extend(closed.into_iter().map(|pos| Trade::close(pos, fill)));
        count
    }

    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }
}
