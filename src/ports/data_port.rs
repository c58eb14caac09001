//! Data access port traits.

use crate::domain::alignment::ExternalPoint;
use crate::domain::error::PanictraderError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for `symbol` dated within `[start_date, end_date]`, in date
    /// order. An empty result is not an error.
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, PanictraderError>;

    /// Observations of a secondary series such as a volatility index.
    fn fetch_external(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<ExternalPoint>, PanictraderError>;
}

/// Source of a single market-wide sentiment reading in `[0, 100]`.
pub trait SentimentPort {
    /// `Ok(None)` means no reading is available for this run.
    fn fetch_sentiment(&self) -> Result<Option<f64>, PanictraderError>;
}
