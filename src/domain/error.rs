//! Domain error types.
//!
//! The engine itself never fails: insufficient history, a missing external
//! series, a zero-loss RSI window and an empty trade ledger are all ordinary
//! outcomes. These errors belong to the edges (configuration, data sources,
//! report output).

use chrono::NaiveDate;

/// Top-level error type for panictrader.
#[derive(Debug, thiserror::Error)]
pub enum PanictraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("invalid bar on {date}: {reason}")]
    InvalidBar { date: NaiveDate, reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("sentiment unavailable: {reason}")]
    Sentiment { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&PanictraderError> for std::process::ExitCode {
    fn from(err: &PanictraderError) -> Self {
        let code: u8 = match err {
            PanictraderError::Io(_) | PanictraderError::Report { .. } => 1,
            PanictraderError::ConfigParse { .. }
            | PanictraderError::ConfigMissing { .. }
            | PanictraderError::ConfigInvalid { .. } => 2,
            PanictraderError::DataSource { .. } | PanictraderError::Sentiment { .. } => 3,
            PanictraderError::NoData { .. } | PanictraderError::InvalidBar { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
