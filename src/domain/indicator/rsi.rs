//! RSI (Relative Strength Index) indicator implementation.
//!
//! Uses simple averages over the n most recent close-to-close changes:
//! - gain = max(delta, 0), loss = max(-delta, 0)
//! - avg_gain / avg_loss = mean over the window (no Wilder smoothing)
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100 (the ratio is infinite; this includes a flat window)
//!
//! Warmup: first n bars are invalid (need n price changes).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let rsi = if period > 0 && i >= period {
            Some(window_rsi(&bars[i - period..=i]))
        } else {
            None
        };

        values.push(IndicatorPoint {
            date: bar.date,
            valid: rsi.is_some(),
            value: IndicatorValue::Simple(rsi.unwrap_or(0.0)),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

/// RSI over a window of `period + 1` bars (`period` deltas).
fn window_rsi(window: &[OhlcvBar]) -> f64 {
    let n = (window.len() - 1) as f64;
    let (gains, losses) = window
        .windows(2)
        .map(|pair| pair[1].close - pair[0].close)
        .fold((0.0_f64, 0.0_f64), |(g, l), delta| {
            (g + delta.max(0.0), l + (-delta).max(0.0))
        });

    let avg_gain = gains / n;
    let avg_loss = losses / n;

    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
