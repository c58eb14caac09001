//! Configuration validation.
//!
//! Validates all config fields before a backtest runs.

use crate::domain::backtest::{DEFAULT_WARMUP_DAYS, MAX_WARMUP_DAYS};
use crate::domain::error::PanictraderError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), PanictraderError> {
    validate_symbol(config)?;
    validate_dates(config)?;
    validate_warmup(config)?;
    Ok(())
}

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<(), PanictraderError> {
    for key in ["band_period", "volume_period", "rsi_period"] {
        validate_period(config, key)?;
    }
    let mult = config.get_double("indicators", "band_mult", 2.0);
    if mult.is_nan() || mult <= 0.0 {
        return Err(invalid("indicators", "band_mult", "band_mult must be positive"));
    }
    Ok(())
}

pub fn validate_signal_config(config: &dyn ConfigPort) -> Result<(), PanictraderError> {
    let mult = config.get_double("signals", "volume_multiplier", 1.5);
    if mult.is_nan() || mult <= 0.0 {
        return Err(invalid(
            "signals",
            "volume_multiplier",
            "volume_multiplier must be positive",
        ));
    }

    let high = config.get_double("signals", "external_high", 30.0);
    let low = config.get_double("signals", "external_low", 20.0);
    if !high.is_finite() || !low.is_finite() {
        return Err(invalid(
            "signals",
            "external_high",
            "external thresholds must be finite",
        ));
    }

    validate_score_pair(config, "sentiment_fear", 25.0, "sentiment_greed", 75.0)?;
    validate_score_pair(config, "rsi_oversold", 30.0, "rsi_overbought", 70.0)?;
    Ok(())
}

pub fn validate_sentiment_config(config: &dyn ConfigPort) -> Result<(), PanictraderError> {
    if config.get_string("sentiment", "score").is_none() {
        return Ok(());
    }
    let score = config.get_double("sentiment", "score", f64::NAN);
    if !(0.0..=100.0).contains(&score) {
        return Err(invalid(
            "sentiment",
            "score",
            "score must be a number between 0 and 100",
        ));
    }
    Ok(())
}

/// Run every validator.
pub fn validate_all(config: &dyn ConfigPort) -> Result<(), PanictraderError> {
    validate_backtest_config(config)?;
    validate_indicator_config(config)?;
    validate_signal_config(config)?;
    validate_sentiment_config(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> PanictraderError {
    PanictraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), PanictraderError> {
    match config.get_string("backtest", "symbol") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(PanictraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: "symbol".to_string(),
        }),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), PanictraderError> {
    let start_str = config.get_string("backtest", "start_date");
    let end_str = config.get_string("backtest", "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date > end_date {
        return Err(invalid(
            "backtest",
            "start_date",
            "start_date must not be after end_date",
        ));
    }
    Ok(())
}

pub fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, PanictraderError> {
    match value {
        None => Err(PanictraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            PanictraderError::ConfigInvalid {
                section: "backtest".to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            }
        }),
    }
}

fn validate_warmup(config: &dyn ConfigPort) -> Result<(), PanictraderError> {
    let days = config.get_int("backtest", "warmup_days", DEFAULT_WARMUP_DAYS);
    if !(0..=MAX_WARMUP_DAYS).contains(&days) {
        return Err(invalid(
            "backtest",
            "warmup_days",
            &format!("warmup_days must be between 0 and {}", MAX_WARMUP_DAYS),
        ));
    }
    Ok(())
}

fn validate_period(config: &dyn ConfigPort, key: &str) -> Result<(), PanictraderError> {
    let default = if key == "rsi_period" { 14 } else { 20 };
    if config.get_int("indicators", key, default) < 2 {
        return Err(invalid(
            "indicators",
            key,
            &format!("{} must be at least 2", key),
        ));
    }
    Ok(())
}

fn validate_score_pair(
    config: &dyn ConfigPort,
    low_key: &str,
    low_default: f64,
    high_key: &str,
    high_default: f64,
) -> Result<(), PanictraderError> {
    let low = config.get_double("signals", low_key, low_default);
    let high = config.get_double("signals", high_key, high_default);
    for (key, value) in [(low_key, low), (high_key, high)] {
        if !(0.0..=100.0).contains(&value) {
            return Err(invalid(
                "signals",
                key,
                &format!("{} must be between 0 and 100", key),
            ));
        }
    }
    if low > high {
        return Err(invalid(
            "signals",
            low_key,
            &format!("{} must not exceed {}", low_key, high_key),
        ));
    }
    Ok(())
}
