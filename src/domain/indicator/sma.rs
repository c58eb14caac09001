//! Simple moving averages of close and volume.
//!
//! SMA(n)[i] = sum(x[i-j] for j in 0..n) / n
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values: rolling_mean(bars, period, |b| b.close),
    }
}

pub fn calculate_volume_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    IndicatorSeries {
        indicator_type: IndicatorType::VolumeSma(period),
        values: rolling_mean(bars, period, |b| b.volume),
    }
}

fn rolling_mean(
    bars: &[OhlcvBar],
    period: usize,
    field: impl Fn(&OhlcvBar) -> f64,
) -> Vec<IndicatorPoint> {
    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let valid = period > 0 && i + 1 >= period;
        let value = if valid {
            let window = &bars[i + 1 - period..=i];
            window.iter().map(&field).sum::<f64>() / period as f64
        } else {
            0.0
        };

        values.push(IndicatorPoint {
            date: bar.date,
            valid,
            value: IndicatorValue::Simple(value),
        });
    }

    values
}
