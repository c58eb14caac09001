//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! StdDev is the sample standard deviation (divides by N-1), shared with
//! [`super::stddev`].
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) bars are invalid.

use crate::domain::indicator::stddev::window_mean_stddev;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_bollinger(
    bars: &[OhlcvBar],
    period: usize,
    mult: f64,
) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let bands = window_mean_stddev(bars, i, period).map(|(middle, stddev)| {
            (middle + mult * stddev, middle, middle - mult * stddev)
        });
        let (upper, middle, lower) = bands.unwrap_or((0.0, 0.0, 0.0));

        values.push(IndicatorPoint {
            date: bar.date,
            valid: bands.is_some(),
            value: IndicatorValue::Bollinger {
                upper,
                middle,
                lower,
            },
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger {
            period,
            stddev_mult_x100: (mult * 100.0).round().max(0.0) as u32,
        },
        values,
    }
}
