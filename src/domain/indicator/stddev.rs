//! Standard Deviation indicator.
//!
//! Sample standard deviation over n closing prices (divides by n - 1).
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n) / (n - 1))
//! Warmup: first (n-1) bars are invalid. Periods below 2 never become valid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_stddev(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let value = window_stddev(bars, i, period);

        values.push(IndicatorPoint {
            date: bar.date,
            valid: value.is_some(),
            value: IndicatorValue::Simple(value.unwrap_or(0.0)),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Stddev(period),
        values,
    }
}

/// Sample mean and standard deviation of the closes in the window ending at
/// `index`, or `None` while the window is incomplete.
pub(crate) fn window_mean_stddev(bars: &[OhlcvBar], index: usize, period: usize) -> Option<(f64, f64)> {
    if period < 2 || index + 1 < period || index >= bars.len() {
        return None;
    }

    let window = &bars[index + 1 - period..=index];
    let mean = window.iter().map(|b| b.close).sum::<f64>() / period as f64;

    let variance = window
        .iter()
        .map(|b| {
            let diff = b.close - mean;
            diff * diff
        })
        .sum::<f64>()
        / (period - 1) as f64;

    Some((mean, variance.sqrt()))
}

fn window_stddev(bars: &[OhlcvBar], index: usize, period: usize) -> Option<f64> {
    window_mean_stddev(bars, index, period).map(|(_, sd)| sd)
}
