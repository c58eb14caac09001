//! CSV file data adapter.
//!
//! Bars live in `<base>/<SYMBOL>.csv` with a header row naming `date`,
//! `open`, `high`, `low`, `close` and `volume` (any order, any case). An
//! external series lives in the same directory and needs `date` plus either a
//! `close` or a `value` column.

use crate::domain::alignment::ExternalPoint;
use crate::domain::error::PanictraderError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn data_error(reason: String) -> PanictraderError {
    PanictraderError::DataSource { reason }
}

fn column_index(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
}

fn required_column(
    headers: &csv::StringRecord,
    names: &[&str],
    file: &str,
) -> Result<usize, PanictraderError> {
    column_index(headers, names)
        .ok_or_else(|| data_error(format!("{}: missing {} column", file, names[0])))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn parse_field(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    line: u64,
) -> Result<f64, PanictraderError> {
    let raw = record
        .get(index)
        .ok_or_else(|| data_error(format!("line {}: missing {} value", line, name)))?;
    raw.trim()
        .parse()
        .map_err(|e| data_error(format!("line {}: invalid {} value {:?}: {}", line, name, raw, e)))
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, PanictraderError> {
        let path = self.csv_path(symbol);
        let file = path.display().to_string();
        let content = fs::read_to_string(&path)
            .map_err(|e| data_error(format!("failed to read {}: {}", file, e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| data_error(format!("{}: CSV header error: {}", file, e)))?
            .clone();

        let date_col = required_column(&headers, &["date"], &file)?;
        let open_col = required_column(&headers, &["open"], &file)?;
        let high_col = required_column(&headers, &["high"], &file)?;
        let low_col = required_column(&headers, &["low"], &file)?;
        let close_col = required_column(&headers, &["close"], &file)?;
        let volume_col = required_column(&headers, &["volume"], &file)?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record =
                result.map_err(|e| data_error(format!("{}: CSV parse error: {}", file, e)))?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let raw_date = record.get(date_col).unwrap_or_default();
            let date = parse_date(raw_date).ok_or_else(|| {
                data_error(format!("line {}: invalid date {:?}", line, raw_date))
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            bars.push(OhlcvBar {
                date,
                open: parse_field(&record, open_col, "open", line)?,
                high: parse_field(&record, high_col, "high", line)?,
                low: parse_field(&record, low_col, "low", line)?,
                close: parse_field(&record, close_col, "close", line)?,
                volume: parse_field(&record, volume_col, "volume", line)?,
            });
        }

        bars.sort_by_key(|b| b.date);
        tracing::debug!(symbol, bars = bars.len(), "loaded bars");
        Ok(bars)
    }

    fn fetch_external(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<ExternalPoint>, PanictraderError> {
        let path = self.csv_path(symbol);
        let file = path.display().to_string();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(symbol, path = %file, "external series file not found");
                return Ok(Vec::new());
            }
            Err(e) => return Err(data_error(format!("failed to read {}: {}", file, e))),
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| data_error(format!("{}: CSV header error: {}", file, e)))?
            .clone();
        let date_col = required_column(&headers, &["date"], &file)?;
        let value_col = required_column(&headers, &["close", "value"], &file)?;

        let mut points = Vec::new();
        let mut skipped = 0usize;
        for result in rdr.records() {
            let record =
                result.map_err(|e| data_error(format!("{}: CSV parse error: {}", file, e)))?;

            let Some(date) = record.get(date_col).and_then(parse_date) else {
                skipped += 1;
                continue;
            };
            if date < start_date || date > end_date {
                continue;
            }
            // Published index series use placeholders such as "." for holidays.
            match record.get(value_col).map(str::trim).map(str::parse::<f64>) {
                Some(Ok(value)) if value.is_finite() => points.push(ExternalPoint { date, value }),
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::debug!(symbol, skipped, "skipped unparsable external rows");
        }
        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}
