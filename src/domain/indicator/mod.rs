//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorValue`: Enum for different indicator output shapes
//! - `IndicatorType`: Enum for indicator identity + parameters
//! - `IndicatorSeries`: A time series of indicator values
//! - `IndicatorRow`: The per-bar bundle the signal evaluator consumes
//!
//! Every series has the same length and order as its input bars. Rows inside
//! an indicator's warm-up window are marked invalid rather than dropped.

pub mod bollinger;
pub mod rsi;
pub mod sma;
pub mod stddev;

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone)]
pub enum IndicatorValue {
    Simple(f64),
    Bollinger { upper: f64, middle: f64, lower: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    VolumeSma(usize),
    Stddev(usize),
    Rsi(usize),
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Value at `index` for single-valued indicators, `None` during warm-up.
    pub fn simple_at(&self, index: usize) -> Option<f64> {
        match self.values.get(index) {
            Some(IndicatorPoint {
                valid: true,
                value: IndicatorValue::Simple(v),
                ..
            }) => Some(*v),
            _ => None,
        }
    }

    /// (upper, middle, lower) at `index`, `None` during warm-up.
    pub fn bands_at(&self, index: usize) -> Option<(f64, f64, f64)> {
        match self.values.get(index) {
            Some(IndicatorPoint {
                valid: true,
                value:
                    IndicatorValue::Bollinger {
                        upper,
                        middle,
                        lower,
                    },
                ..
            }) => Some((*upper, *middle, *lower)),
            _ => None,
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::VolumeSma(period) => write!(f, "VOLUME_SMA({})", period),
            IndicatorType::Stddev(period) => write!(f, "STDDEV({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
        }
    }
}

/// Window lengths for the indicator engine.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorConfig {
    pub band_period: usize,
    pub band_mult: f64,
    pub volume_period: usize,
    pub rsi_period: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        IndicatorConfig {
            band_period: 20,
            band_mult: 2.0,
            volume_period: 20,
            rsi_period: 14,
        }
    }
}

impl IndicatorConfig {
    /// Number of leading bars before every indicator is defined.
    pub fn warmup_bars(&self) -> usize {
        self.band_period
            .saturating_sub(1)
            .max(self.volume_period.saturating_sub(1))
            .max(self.rsi_period)
    }
}

/// Indicator values for one bar. `None` marks a warm-up row.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: f64,
    pub ma: Option<f64>,
    pub std: Option<f64>,
    pub upper_band: Option<f64>,
    pub lower_band: Option<f64>,
    pub volume_ma: Option<f64>,
    pub rsi: Option<f64>,
}

impl IndicatorRow {
    /// Bands and volume average are all defined.
    pub fn bands_ready(&self) -> bool {
        self.upper_band.is_some() && self.lower_band.is_some() && self.volume_ma.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(valid: bool, value: IndicatorValue) -> IndicatorPoint {
        IndicatorPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            valid,
            value,
        }
    }

    #[test]
    fn indicator_type_display() {
        assert_eq!(IndicatorType::Sma(20).to_string(), "SMA(20)");
        assert_eq!(IndicatorType::VolumeSma(20).to_string(), "VOLUME_SMA(20)");
        assert_eq!(IndicatorType::Rsi(14).to_string(), "RSI(14)");
        let boll = IndicatorType::Bollinger {
            period: 20,
            stddev_mult_x100: 200,
        };
        assert_eq!(boll.to_string(), "BOLLINGER(20,2)");
    }

    #[test]
    fn simple_at_respects_validity() {
        let series = IndicatorSeries {
            indicator_type: IndicatorType::VolumeSma(2),
            values: vec![
                point(false, IndicatorValue::Simple(0.0)),
                point(true, IndicatorValue::Simple(4.5)),
            ],
        };
        assert_eq!(series.simple_at(0), None);
        assert_eq!(series.simple_at(1), Some(4.5));
        assert_eq!(series.simple_at(2), None);
        assert_eq!(series.bands_at(1), None);
    }

    #[test]
    fn bands_at_reads_bollinger() {
        let series = IndicatorSeries {
            indicator_type: IndicatorType::Bollinger {
                period: 2,
                stddev_mult_x100: 200,
            },
            values: vec![point(
                true,
                IndicatorValue::Bollinger {
                    upper: 12.0,
                    middle: 10.0,
                    lower: 8.0,
                },
            )],
        };
        assert_eq!(series.bands_at(0), Some((12.0, 10.0, 8.0)));
        assert_eq!(series.simple_at(0), None);
    }

    #[test]
    fn default_config_warmup() {
        let config = IndicatorConfig::default();
        assert_eq!(config.warmup_bars(), 19);
    }

    #[test]
    fn warmup_follows_longest_window() {
        let config = IndicatorConfig {
            rsi_period: 30,
            ..IndicatorConfig::default()
        };
        assert_eq!(config.warmup_bars(), 30);
    }
}
