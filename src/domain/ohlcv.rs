//! Daily OHLCV bar and ingest validation.

use chrono::NaiveDate;

use crate::domain::error::PanictraderError;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    /// True when every price and the volume are finite and non-negative.
    pub fn is_well_formed(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Check a bar sequence before it enters the engine.
///
/// Dates must be strictly increasing (which also rules out duplicates) and
/// every field must be a finite, non-negative number.
pub fn validate_bars(bars: &[OhlcvBar]) -> Result<(), PanictraderError> {
    for (i, bar) in bars.iter().enumerate() {
        if !bar.is_well_formed() {
            return Err(PanictraderError::InvalidBar {
                date: bar.date,
                reason: "prices and volume must be finite and non-negative".into(),
            });
        }
        if i > 0 && bar.date <= bars[i - 1].date {
            return Err(PanictraderError::InvalidBar {
                date: bar.date,
                reason: format!("date not after previous bar {}", bars[i - 1].date),
            });
        }
    }
    Ok(())
}
