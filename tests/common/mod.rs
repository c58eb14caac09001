#![allow(dead_code)]

use chrono::NaiveDate;
use panictrader::domain::alignment::ExternalPoint;
use panictrader::domain::backtest::{BacktestConfig, DEFAULT_WARMUP_DAYS};
use panictrader::domain::error::PanictraderError;
use panictrader::domain::indicator::IndicatorConfig;
pub use panictrader::domain::ohlcv::OhlcvBar;
use panictrader::domain::strategy::SignalConfig;
use panictrader::ports::data_port::DataPort;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockDataPort {
    pub bars: HashMap<String, Vec<OhlcvBar>>,
    pub external: HashMap<String, Vec<ExternalPoint>>,
    pub errors: HashMap<String, String>,
    /// (symbol, start, end) of every request, in call order.
    pub requests: RefCell<Vec<(String, NaiveDate, NaiveDate)>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            bars: HashMap::new(),
            external: HashMap::new(),
            errors: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.bars.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_external(mut self, symbol: &str, points: Vec<ExternalPoint>) -> Self {
        self.external.insert(symbol.to_string(), points);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    fn check(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<(), PanictraderError> {
        self.requests
            .borrow_mut()
            .push((symbol.to_string(), start, end));
        match self.errors.get(symbol) {
            Some(reason) => Err(PanictraderError::DataSource {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, PanictraderError> {
        self.check(symbol, start_date, end_date)?;
        Ok(self
            .bars
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn fetch_external(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<ExternalPoint>, PanictraderError> {
        self.check(symbol, start_date, end_date)?;
        Ok(self
            .external
            .get(symbol)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.date >= start_date && p.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date: NaiveDate, close: f64, volume: f64) -> OhlcvBar {
    OhlcvBar {
        date,
        open: close,
        high: close + 1.0,
        low: (close - 1.0).max(0.0),
        close,
        volume,
    }
}

/// Consecutive calendar-day bars with the given closes and a constant volume.
pub fn bars_from_closes(start: NaiveDate, closes: &[f64], volume: f64) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(start + chrono::Duration::days(i as i64), c, volume))
        .collect()
}

pub fn flat_bars(start: NaiveDate, count: usize, close: f64) -> Vec<OhlcvBar> {
    bars_from_closes(start, &vec![close; count], 1_000.0)
}

pub fn constant_external(start: NaiveDate, count: usize, value: f64) -> Vec<ExternalPoint> {
    (0..count)
        .map(|i| ExternalPoint {
            date: start + chrono::Duration::days(i as i64),
            value,
        })
        .collect()
}

pub fn sample_config(start: NaiveDate, end: NaiveDate) -> BacktestConfig {
    BacktestConfig {
        symbol: "SPY".into(),
        external_symbol: Some("VIX".into()),
        start_date: start,
        end_date: end,
        warmup_days: DEFAULT_WARMUP_DAYS,
        indicators: IndicatorConfig::default(),
        signals: SignalConfig::default(),
    }
}

/// A calm 20-day base at 100 with volume 1000, then the given
/// (close, volume) days. With default settings the base ends exactly at the
/// band warm-up, so every scripted day is evaluated against known history.
pub fn scripted_bars(start: NaiveDate, script: &[(f64, f64)]) -> Vec<OhlcvBar> {
    let mut bars: Vec<OhlcvBar> = (0..20)
        .map(|i| {
            // alternate 99/101 so the band has width
            let close = if i % 2 == 0 { 99.0 } else { 101.0 };
            make_bar(start + chrono::Duration::days(i), close, 1_000.0)
        })
        .collect();
    for (j, &(close, volume)) in script.iter().enumerate() {
        bars.push(make_bar(
            start + chrono::Duration::days(20 + j as i64),
            close,
            volume,
        ));
    }
    bars
}
