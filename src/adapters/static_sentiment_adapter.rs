//! Sentiment reading supplied up front (config file or command line).

use crate::domain::error::PanictraderError;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::SentimentPort;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StaticSentimentAdapter {
    score: Option<f64>,
}

impl StaticSentimentAdapter {
    pub fn new(score: Option<f64>) -> Self {
        Self { score }
    }

    /// Reads `[sentiment] score`; an absent key means no reading.
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let score = config
            .get_string("sentiment", "score")
            .map(|_| config.get_double("sentiment", "score", f64::NAN));
        Self { score }
    }
}

impl SentimentPort for StaticSentimentAdapter {
    fn fetch_sentiment(&self) -> Result<Option<f64>, PanictraderError> {
        match self.score {
            None => Ok(None),
            Some(s) if (0.0..=100.0).contains(&s) => Ok(Some(s)),
            Some(s) => Err(PanictraderError::Sentiment {
                reason: format!("score {} outside [0, 100]", s),
            }),
        }
    }
}

/// Resolve a sentiment reading, downgrading a failure to "unavailable".
pub fn sentiment_or_none(port: &dyn SentimentPort) -> Option<f64> {
    match port.fetch_sentiment() {
        Ok(reading) => reading,
        Err(err) => {
            tracing::warn!(error = %err, "sentiment fetch failed, continuing without it");
            None
        }
    }
}
