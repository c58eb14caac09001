//! CSV output: the closed-trade ledger and the per-day signal table.

use crate::domain::backtest::BacktestReport;
use crate::domain::error::PanictraderError;
use crate::domain::position::Trade;
use crate::domain::signal::SignalRow;
use crate::ports::report_port::ReportPort;
use std::fs;

fn report_error(err: impl std::fmt::Display) -> PanictraderError {
    PanictraderError::Report {
        reason: err.to_string(),
    }
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String, PanictraderError> {
    let data = wtr.into_inner().map_err(report_error)?;
    String::from_utf8(data).map_err(report_error)
}

fn flag(value: bool) -> String {
    String::from(if value { "1" } else { "0" })
}

/// Columns: entry_date, entry_price, exit_date, exit_price, return_ratio,
/// holding_days, entry_external, exit_external, exit_volume, entry_score
pub fn trades_csv(trades: &[Trade]) -> Result<String, PanictraderError> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "entry_date",
        "entry_price",
        "exit_date",
        "exit_price",
        "return_ratio",
        "holding_days",
        "entry_external",
        "exit_external",
        "exit_volume",
        "entry_score",
    ])
    .map_err(report_error)?;

    for t in trades {
        wtr.write_record([
            &t.entry_date.to_string(),
            &format!("{:.6}", t.entry_price),
            &t.exit_date.to_string(),
            &format!("{:.6}", t.exit_price),
            &format!("{:.6}", t.return_ratio),
            &t.holding_days.to_string(),
            &format!("{:.4}", t.entry_external),
            &format!("{:.4}", t.exit_external),
            &format!("{:.0}", t.exit_volume),
            &t.entry_score.to_string(),
        ])
        .map_err(report_error)?;
    }

    finish(wtr)
}

/// One row per day with the raw conditions and composite signals.
pub fn signals_csv(signals: &[SignalRow]) -> Result<String, PanictraderError> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "date",
        "close",
        "volume",
        "external",
        "warmed_up",
        "below_lower",
        "above_upper",
        "volume_spike",
        "external_high",
        "external_low",
        "sentiment_fear",
        "sentiment_greed",
        "rsi_oversold",
        "rsi_overbought",
        "buy_score",
        "sell_score",
        "condition_total",
        "buy",
        "sell",
    ])
    .map_err(report_error)?;

    for s in signals {
        let c = &s.conditions;
        let record: Vec<String> = vec![
            s.date.to_string(),
            format!("{:.4}", s.close),
            format!("{:.0}", s.volume),
            format!("{:.4}", s.external),
            flag(s.warmed_up),
            flag(c.price_below_lower),
            flag(c.price_above_upper),
            flag(c.volume_spike),
            flag(c.external_high),
            flag(c.external_low),
            flag(c.sentiment_fear),
            flag(c.sentiment_greed),
            flag(c.rsi_oversold),
            flag(c.rsi_overbought),
            s.buy_score.to_string(),
            s.sell_score.to_string(),
            s.condition_total.to_string(),
            flag(s.buy_signal),
            flag(s.sell_signal),
        ];
        wtr.write_record(&record).map_err(report_error)?;
    }

    finish(wtr)
}

/// Writes the trade ledger of a report to a CSV file.
pub struct CsvReportAdapter;

impl ReportPort for CsvReportAdapter {
    fn write(&self, report: &BacktestReport, output_path: &str) -> Result<(), PanictraderError> {
        let content = trades_csv(&report.simulation.trades)?;
        fs::write(output_path, content).map_err(|e| PanictraderError::Report {
            reason: format!("failed to write {}: {}", output_path, e),
        })?;
        tracing::info!(
            path = output_path,
            trades = report.simulation.trades.len(),
            "wrote trade ledger"
        );
        Ok(())
    }
}
