//! Assembles the per-bar indicator rows the signal evaluator reads.

use crate::domain::indicator::bollinger::calculate_bollinger;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::sma::{calculate_sma, calculate_volume_sma};
use crate::domain::indicator::stddev::calculate_stddev;
use crate::domain::indicator::{IndicatorConfig, IndicatorRow};
use crate::domain::ohlcv::OhlcvBar;

/// Compute one [`IndicatorRow`] per bar, same length and order as `bars`.
///
/// Pure function of its input. Gaps in the date axis are not checked.
pub fn compute_indicators(bars: &[OhlcvBar], config: &IndicatorConfig) -> Vec<IndicatorRow> {
    let bands = calculate_bollinger(bars, config.band_period, config.band_mult);
    let ma = calculate_sma(bars, config.band_period);
    let stddev = calculate_stddev(bars, config.band_period);
    let volume_ma = calculate_volume_sma(bars, config.volume_period);
    let rsi = calculate_rsi(bars, config.rsi_period);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let band = bands.bands_at(i);
            IndicatorRow {
                date: bar.date,
                close: bar.close,
                volume: bar.volume,
                ma: ma.simple_at(i),
                std: stddev.simple_at(i),
                upper_band: band.map(|(upper, _, _)| upper),
                lower_band: band.map(|(_, _, lower)| lower),
                volume_ma: volume_ma.simple_at(i),
                rsi: rsi.simple_at(i),
            }
        })
        .collect()
}
