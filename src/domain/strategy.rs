//! Panic strategy thresholds and composite selection.
//!
//! The configuration is an immutable value handed to each evaluation call;
//! nothing here is read from global state.

/// Which optional conditions join the buy/sell composites. The price-band
/// breach is always part of both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionSet {
    pub volume: bool,
    pub external: bool,
    pub sentiment: bool,
    pub rsi: bool,
}

impl Default for ConditionSet {
    fn default() -> Self {
        ConditionSet {
            volume: true,
            external: true,
            sentiment: true,
            rsi: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    pub volume_multiplier: f64,
    pub external_high: f64,
    pub external_low: f64,
    pub sentiment_fear: f64,
    pub sentiment_greed: f64,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub include: ConditionSet,
}

impl Default for SignalConfig {
    fn default() -> Self {
        SignalConfig {
            volume_multiplier: 1.5,
            external_high: 30.0,
            external_low: 20.0,
            sentiment_fear: 25.0,
            sentiment_greed: 75.0,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            include: ConditionSet::default(),
        }
    }
}

impl SignalConfig {
    /// Sentiment takes part only when enabled and a reading exists.
    pub fn sentiment_active(&self, sentiment: Option<f64>) -> bool {
        self.include.sentiment && sentiment.is_some()
    }

    /// Number of conditions in each composite for this run.
    pub fn condition_total(&self, sentiment: Option<f64>) -> usize {
        1 + usize::from(self.include.volume)
            + usize::from(self.include.external)
            + usize::from(self.sentiment_active(sentiment))
            + usize::from(self.include.rsi)
    }
}
