//! Per-day condition evaluation and composite buy/sell signals.
//!
//! # Evaluation Semantics
//!
//! - Band breaches are strict: `close < lower` / `close > upper`. A flat
//!   window collapses both bands onto the close and never breaches.
//! - A row whose bands or volume average are undefined, or whose RSI is
//!   undefined while the RSI condition is enabled, is not warmed up: every
//!   condition and both composites are `false`.
//! - `buy = below_lower ∧ volume_spike ∧ external_high [∧ fear] [∧ oversold]`
//! - `sell = above_upper ∧ volume_spike ∧ external_low [∧ greed] [∧ overbought]`
//!   where bracketed terms take part only when enabled (and, for sentiment,
//!   when a reading exists).

use chrono::NaiveDate;

use crate::domain::alignment::{AlignedValue, DEFAULT_EXTERNAL_VALUE};
use crate::domain::indicator::IndicatorRow;
use crate::domain::strategy::SignalConfig;

/// Raw condition values for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Conditions {
    pub price_below_lower: bool,
    pub price_above_upper: bool,
    pub volume_spike: bool,
    pub external_high: bool,
    pub external_low: bool,
    pub sentiment_fear: bool,
    pub sentiment_greed: bool,
    pub rsi_oversold: bool,
    pub rsi_overbought: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalRow {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: f64,
    pub external: f64,
    pub warmed_up: bool,
    pub conditions: Conditions,
    pub buy_signal: bool,
    pub sell_signal: bool,
    pub buy_score: usize,
    pub sell_score: usize,
    pub condition_total: usize,
}

/// Evaluate a single day.
pub fn evaluate_row(
    row: &IndicatorRow,
    external: f64,
    sentiment: Option<f64>,
    config: &SignalConfig,
) -> SignalRow {
    let condition_total = config.condition_total(sentiment);
    let rsi_ready = !config.include.rsi || row.rsi.is_some();

    let (upper, lower, volume_ma) = match (row.upper_band, row.lower_band, row.volume_ma) {
        (Some(u), Some(l), Some(v)) if rsi_ready => (u, l, v),
        _ => {
            return SignalRow {
                date: row.date,
                close: row.close,
                volume: row.volume,
                external,
                warmed_up: false,
                conditions: Conditions::default(),
                buy_signal: false,
                sell_signal: false,
                buy_score: 0,
                sell_score: 0,
                condition_total,
            };
        }
    };

    let conditions = Conditions {
        price_below_lower: row.close < lower,
        price_above_upper: row.close > upper,
        volume_spike: row.volume > volume_ma * config.volume_multiplier,
        external_high: external > config.external_high,
        external_low: external < config.external_low,
        sentiment_fear: sentiment.is_some_and(|s| s < config.sentiment_fear),
        sentiment_greed: sentiment.is_some_and(|s| s > config.sentiment_greed),
        rsi_oversold: row.rsi.is_some_and(|r| r < config.rsi_oversold),
        rsi_overbought: row.rsi.is_some_and(|r| r > config.rsi_overbought),
    };

    let sentiment_active = config.sentiment_active(sentiment);
    let buy_terms = [
        (true, conditions.price_below_lower),
        (config.include.volume, conditions.volume_spike),
        (config.include.external, conditions.external_high),
        (sentiment_active, conditions.sentiment_fear),
        (config.include.rsi, conditions.rsi_oversold),
    ];
    let sell_terms = [
        (true, conditions.price_above_upper),
        (config.include.volume, conditions.volume_spike),
        (config.include.external, conditions.external_low),
        (sentiment_active, conditions.sentiment_greed),
        (config.include.rsi, conditions.rsi_overbought),
    ];

    let buy_score = score(&buy_terms);
    let sell_score = score(&sell_terms);

    SignalRow {
        date: row.date,
        close: row.close,
        volume: row.volume,
        external,
        warmed_up: true,
        conditions,
        buy_signal: buy_score == condition_total,
        sell_signal: sell_score == condition_total,
        buy_score,
        sell_score,
        condition_total,
    }
}

fn score(terms: &[(bool, bool)]) -> usize {
    terms
        .iter()
        .filter(|(included, satisfied)| *included && *satisfied)
        .count()
}

/// Evaluate every row. `aligned_external` is read by position; rows past its
/// end use the default external value.
pub fn evaluate_signals(
    rows: &[IndicatorRow],
    aligned_external: &[AlignedValue],
    sentiment: Option<f64>,
    config: &SignalConfig,
) -> Vec<SignalRow> {
    if config.include.sentiment && sentiment.is_none() {
        tracing::warn!("sentiment unavailable, dropping it from the composite");
    }

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let external = aligned_external
                .get(i)
                .map(|a| a.value)
                .unwrap_or(DEFAULT_EXTERNAL_VALUE);
            evaluate_row(row, external, sentiment, config)
        })
        .collect()
}
