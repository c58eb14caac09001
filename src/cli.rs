//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::{signals_csv, CsvReportAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::static_sentiment_adapter::{sentiment_or_none, StaticSentimentAdapter};
use crate::domain::backtest::{run_backtest, BacktestConfig, BacktestReport, DEFAULT_WARMUP_DAYS};
use crate::domain::config_validation::{parse_date, validate_all};
use crate::domain::error::PanictraderError;
use crate::domain::indicator::IndicatorConfig;
use crate::domain::metrics::StatsReport;
use crate::domain::ohlcv::validate_bars;
use crate::domain::simulation::Diagnostics;
use crate::domain::strategy::{ConditionSet, SignalConfig};
use crate::obs::{init_tracing, logging_settings};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{DataPort, SentimentPort};
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "panictrader", about = "Market panic mean-reversion backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest and print summary statistics
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Override [backtest] symbol
        #[arg(long)]
        symbol: Option<String>,
        /// Sentiment reading in [0, 100], overrides [sentiment] score
        #[arg(long)]
        sentiment: Option<f64>,
        /// Write the closed-trade ledger as CSV
        #[arg(long)]
        trades_out: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print per-day conditions and signals as CSV
    Signals {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        sentiment: Option<f64>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            sentiment,
            trades_out,
        } => run_backtest_command(&config, symbol.as_deref(), sentiment, trades_out.as_ref()),
        Command::Validate { config } => run_validate(&config),
        Command::Signals {
            config,
            symbol,
            sentiment,
        } => run_signals(&config, symbol.as_deref(), sentiment),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn init_logging(config: &dyn ConfigPort) {
    let (level, format) = logging_settings(config);
    if let Err(e) = init_tracing(&level, &format) {
        eprintln!("warning: {e}");
    }
}

fn fail(err: PanictraderError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, PanictraderError> {
    let symbol = adapter
        .get_string("backtest", "symbol")
        .as_deref()
        .and_then(normalize_symbol)
        .ok_or_else(|| PanictraderError::ConfigMissing {
            section: "backtest".into(),
            key: "symbol".into(),
        })?;
    let external_symbol = adapter
        .get_string("backtest", "external_symbol")
        .as_deref()
        .and_then(normalize_symbol);

    let start_date = parse_date(
        adapter.get_string("backtest", "start_date").as_deref(),
        "start_date",
    )?;
    let end_date = parse_date(
        adapter.get_string("backtest", "end_date").as_deref(),
        "end_date",
    )?;

    Ok(BacktestConfig {
        symbol,
        external_symbol,
        start_date,
        end_date,
        warmup_days: adapter
            .get_int("backtest", "warmup_days", DEFAULT_WARMUP_DAYS)
            .max(0),
        indicators: build_indicator_config(adapter),
        signals: build_signal_config(adapter),
    })
}

/// Trimmed, upper-cased ticker; `None` when blank.
fn normalize_symbol(raw: &str) -> Option<String> {
    let symbol = raw.trim().to_uppercase();
    (!symbol.is_empty()).then_some(symbol)
}

pub fn build_indicator_config(adapter: &dyn ConfigPort) -> IndicatorConfig {
    let defaults = IndicatorConfig::default();
    let period = |key: &str, default: usize| -> usize {
        usize::try_from(adapter.get_int("indicators", key, default as i64)).unwrap_or(default)
    };
    IndicatorConfig {
        band_period: period("band_period", defaults.band_period),
        band_mult: adapter.get_double("indicators", "band_mult", defaults.band_mult),
        volume_period: period("volume_period", defaults.volume_period),
        rsi_period: period("rsi_period", defaults.rsi_period),
    }
}

pub fn build_signal_config(adapter: &dyn ConfigPort) -> SignalConfig {
    let d = SignalConfig::default();
    let num = |key: &str, default: f64| adapter.get_double("signals", key, default);
    let on = |key: &str, default: bool| adapter.get_bool("signals", key, default);
    SignalConfig {
        volume_multiplier: num("volume_multiplier", d.volume_multiplier),
        external_high: num("external_high", d.external_high),
        external_low: num("external_low", d.external_low),
        sentiment_fear: num("sentiment_fear", d.sentiment_fear),
        sentiment_greed: num("sentiment_greed", d.sentiment_greed),
        rsi_oversold: num("rsi_oversold", d.rsi_oversold),
        rsi_overbought: num("rsi_overbought", d.rsi_overbought),
        include: ConditionSet {
            volume: on("use_volume", d.include.volume),
            external: on("use_external", d.include.external),
            sentiment: on("use_sentiment", d.include.sentiment),
            rsi: on("use_rsi", d.include.rsi),
        },
    }
}

/// Fetch inputs through the ports and run the pipeline.
///
/// Bars are requested from the warm-up start so indicators are defined on
/// the first simulated day. An unreadable external series or sentiment
/// reading degrades to defaults; missing or malformed bars do not.
pub fn execute_backtest(
    data_port: &dyn DataPort,
    sentiment_port: &dyn SentimentPort,
    bt_config: &BacktestConfig,
) -> Result<BacktestReport, PanictraderError> {
    let fetch_start = bt_config.fetch_start()?;
    let bars = data_port.fetch_bars(&bt_config.symbol, fetch_start, bt_config.end_date)?;
    if bars.is_empty() {
        return Err(PanictraderError::NoData {
            symbol: bt_config.symbol.clone(),
        });
    }
    validate_bars(&bars)?;

    let external = match &bt_config.external_symbol {
        Some(ext) => data_port
            .fetch_external(ext, fetch_start, bt_config.end_date)
            .unwrap_or_else(|e| {
                tracing::warn!(symbol = %ext, error = %e, "external series unavailable");
                Vec::new()
            }),
        None => Vec::new(),
    };

    let sentiment = sentiment_or_none(sentiment_port);
    Ok(run_backtest(&bars, &external, sentiment, bt_config))
}

/// Shared setup for `backtest` and `signals`: load, validate, build.
fn prepare(
    config_path: &PathBuf,
    symbol_override: Option<&str>,
    sentiment_override: Option<f64>,
) -> Result<(FileConfigAdapter, BacktestConfig, StaticSentimentAdapter), ExitCode> {
    let adapter = load_config(config_path)?;
    init_logging(&adapter);

    validate_all(&adapter).map_err(fail)?;
    let mut bt_config = build_backtest_config(&adapter).map_err(fail)?;
    if let Some(raw) = symbol_override {
        bt_config.symbol = normalize_symbol(raw)
            .ok_or_else(|| PanictraderError::ConfigInvalid {
                section: "backtest".into(),
                key: "symbol".into(),
                reason: "--symbol must not be empty".into(),
            })
            .map_err(fail)?;
    }

    let sentiment = match sentiment_override {
        Some(score) => {
            let port = StaticSentimentAdapter::new(Some(score));
            port.fetch_sentiment().map_err(fail)?;
            port
        }
        None => StaticSentimentAdapter::from_config(&adapter),
    };

    Ok((adapter, bt_config, sentiment))
}

fn data_adapter(config: &dyn ConfigPort) -> CsvAdapter {
    let dir = config
        .get_string("backtest", "data_dir")
        .unwrap_or_else(|| ".".to_string());
    CsvAdapter::new(PathBuf::from(dir))
}

fn run_backtest_command(
    config_path: &PathBuf,
    symbol_override: Option<&str>,
    sentiment_override: Option<f64>,
    trades_out: Option<&PathBuf>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let (adapter, bt_config, sentiment_port) =
        match prepare(config_path, symbol_override, sentiment_override) {
            Ok(parts) => parts,
            Err(code) => return code,
        };

    eprintln!(
        "Running backtest: {} from {} to {}",
        bt_config.symbol, bt_config.start_date, bt_config.end_date
    );
    let data_port = data_adapter(&adapter);
    let report = match execute_backtest(&data_port, &sentiment_port, &bt_config) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    print_summary(&report);

    let output = trades_out
        .map(|p| p.display().to_string())
        .or_else(|| adapter.get_string("report", "trades_path"));
    if let Some(path) = output {
        if let Err(e) = CsvReportAdapter.write(&report, &path) {
            return fail(e);
        }
        eprintln!("\nTrade ledger written to: {}", path);
    }

    ExitCode::SUCCESS
}

fn run_signals(
    config_path: &PathBuf,
    symbol_override: Option<&str>,
    sentiment_override: Option<f64>,
) -> ExitCode {
    let (adapter, bt_config, sentiment_port) =
        match prepare(config_path, symbol_override, sentiment_override) {
            Ok(parts) => parts,
            Err(code) => return code,
        };

    let data_port = data_adapter(&adapter);
    let report = match execute_backtest(&data_port, &sentiment_port, &bt_config) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    match signals_csv(&report.signals) {
        Ok(csv) => {
            print!("{csv}");
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_all(&adapter) {
        return fail(e);
    }
    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    let signals = &bt_config.signals;
    eprintln!("\nBacktest:");
    eprintln!("  symbol:   {}", bt_config.symbol);
    eprintln!(
        "  external: {}",
        bt_config.external_symbol.as_deref().unwrap_or("(none)")
    );
    eprintln!(
        "  window:   {} to {} (+{} warm-up days)",
        bt_config.start_date, bt_config.end_date, bt_config.warmup_days
    );
    eprintln!("\nComposite conditions:");
    eprintln!(
        "  price band ({} bars, {} sd)",
        bt_config.indicators.band_period, bt_config.indicators.band_mult
    );
    if signals.include.volume {
        eprintln!(
            "  volume > {}x {}-bar average",
            signals.volume_multiplier, bt_config.indicators.volume_period
        );
    }
    if signals.include.external {
        eprintln!(
            "  external > {} (buy) / < {} (sell)",
            signals.external_high, signals.external_low
        );
    }
    if signals.include.sentiment {
        eprintln!(
            "  sentiment < {} (buy) / > {} (sell)",
            signals.sentiment_fear, signals.sentiment_greed
        );
    }
    if signals.include.rsi {
        eprintln!(
            "  rsi{} < {} (buy) / > {} (sell)",
            bt_config.indicators.rsi_period, signals.rsi_oversold, signals.rsi_overbought
        );
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

pub fn print_summary(report: &BacktestReport) {
    println!("=== {} ===", report.symbol);
    match report.sentiment {
        Some(s) => println!("Sentiment:        {:.1}", s),
        None => println!("Sentiment:        unavailable"),
    }

    match &report.stats {
        StatsReport::Trades(stats) => {
            println!("Total Trades:     {}", stats.total_trades);
            println!("Win Rate:         {:.1}%", stats.win_rate * 100.0);
            println!("Average Return:   {:.2}%", stats.average_return * 100.0);
            println!("Compounded:       {:.2}%", stats.compounded_return * 100.0);
            println!(
                "Wins/Losses/Flat: {}/{}/{}",
                stats.wins, stats.losses, stats.breakeven
            );
            println!(
                "Best/Worst:       {:.2}% / {:.2}%",
                stats.best_return * 100.0,
                stats.worst_return * 100.0
            );
            println!("Avg Holding:      {:.1} days", stats.avg_holding_days);
        }
        StatsReport::NoTrades(diag) => {
            println!("No trades.");
            print_diagnostics(diag);
        }
    }

    let marks = report.simulation.open_position_marks();
    if !marks.is_empty() {
        println!("\n=== Open Positions ===");
        for (pos, unrealized) in marks {
            println!(
                "  {} @ {:.2}  unrealised {:+.2}%",
                pos.entry_date,
                pos.entry_price,
                unrealized * 100.0
            );
        }
    }
}

fn print_diagnostics(diag: &Diagnostics) {
    for line in diagnostics_lines(diag) {
        println!("{line}");
    }
}

/// Labelled diagnostic counts, values in one column.
pub fn diagnostics_lines(diag: &Diagnostics) -> Vec<String> {
    let counts = [
        ("below lower", diag.price_below_lower_days.to_string()),
        ("above upper", diag.price_above_upper_days.to_string()),
        ("volume spike", diag.volume_spike_days.to_string()),
        ("external high", diag.external_high_days.to_string()),
        ("external low", diag.external_low_days.to_string()),
        ("sentiment fear", diag.sentiment_fear_days.to_string()),
        ("sentiment greed", diag.sentiment_greed_days.to_string()),
        ("rsi oversold", diag.rsi_oversold_days.to_string()),
        ("rsi overbought", diag.rsi_overbought_days.to_string()),
        ("buy signals", diag.buy_signal_days.to_string()),
        (
            "sell signals",
            format!("{} ({} ignored)", diag.sell_signal_days, diag.ignored_sells),
        ),
    ];

    let mut lines = vec![format!(
        "{:<19}{} ({} warmed up)",
        "Days:", diag.total_days, diag.warmed_up_days
    )];
    lines.extend(
        counts
            .into_iter()
            .map(|(label, value)| format!("  {:<17}{}", format!("{label}:"), value)),
    );
    lines
}
