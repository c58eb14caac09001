//! Property tests over random price paths.

mod common;

use chrono::NaiveDate;
use common::*;
use panictrader::domain::alignment::{align_forward_fill, ExternalPoint};
use panictrader::domain::backtest::run_backtest;
use panictrader::domain::indicator::IndicatorConfig;
use panictrader::domain::indicator_helpers::compute_indicators;
use panictrader::domain::metrics::{compounded_return, StatsReport};
use panictrader::domain::signal::{Conditions, SignalRow};
use panictrader::domain::simulation::simulate;
use proptest::prelude::*;

fn price_path() -> impl Strategy<Value = (Vec<f64>, Vec<f64>, Vec<f64>)> {
    (0usize..80).prop_flat_map(|n| {
        (
            prop::collection::vec(1.0f64..500.0, n),
            prop::collection::vec(0.0f64..1_000_000.0, n),
            prop::collection::vec(5.0f64..60.0, n),
        )
    })
}

/// Panic days (closes, heavy volume, high external), a few calm days, then
/// one euphoric day with low external. Every such path buys on the first
/// panic day and liquidates on the euphoric one.
fn shocked_path() -> impl Strategy<Value = (Vec<f64>, Vec<f64>, f64)> {
    (
        prop::collection::vec(60.0f64..80.0, 1..=2),
        prop::collection::vec(95.0f64..105.0, 0..5),
        150.0f64..200.0,
    )
}

fn build(closes: &[f64], volumes: &[f64], external: &[f64]) -> (Vec<OhlcvBar>, Vec<ExternalPoint>) {
    let start = date(2023, 1, 2);
    let bars: Vec<OhlcvBar> = closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&c, &v))| make_bar(start + chrono::Duration::days(i as i64), c, v))
        .collect();
    let points = external
        .iter()
        .enumerate()
        .map(|(i, &value)| ExternalPoint {
            date: start + chrono::Duration::days(i as i64),
            value,
        })
        .collect();
    (bars, points)
}

fn build_shocked(panic: &[f64], calm: &[f64], euphoria: f64) -> (Vec<OhlcvBar>, Vec<ExternalPoint>) {
    let script: Vec<(f64, f64)> = panic
        .iter()
        .map(|&c| (c, 5_000.0))
        .chain(calm.iter().map(|&c| (c, 1_000.0)))
        .chain(std::iter::once((euphoria, 5_000.0)))
        .collect();
    let bars = scripted_bars(date(2023, 1, 2), &script);
    let points = bars
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let value = if i >= 20 && i < 20 + panic.len() {
                35.0
            } else if i == bars.len() - 1 {
                15.0
            } else {
                25.0
            };
            ExternalPoint { date: b.date, value }
        })
        .collect();
    (bars, points)
}

fn flag_row(date: NaiveDate, close: f64, buy: bool, sell: bool) -> SignalRow {
    SignalRow {
        date,
        close,
        volume: 1_000.0,
        external: 25.0,
        warmed_up: true,
        conditions: Conditions::default(),
        buy_signal: buy,
        sell_signal: sell,
        buy_score: 0,
        sell_score: 0,
        condition_total: 3,
    }
}

proptest! {
    #[test]
    fn shocked_paths_trade_and_trades_are_well_formed((panic, calm, euphoria) in shocked_path()) {
        let (bars, points) = build_shocked(&panic, &calm, euphoria);
        let config = sample_config(date(2023, 1, 1), date(2023, 12, 31));

        let report = run_backtest(&bars, &points, None, &config);
        let trades = &report.simulation.trades;
        let exit_day = bars[bars.len() - 1].date;

        prop_assert!(!trades.is_empty());
        prop_assert!(trades.len() <= panic.len());
        prop_assert_eq!(trades[0].entry_date, bars[20].date);
        prop_assert!(report.simulation.open_positions.is_empty());
        for t in trades {
            prop_assert!(t.exit_date > t.entry_date);
            prop_assert_eq!(t.exit_date, exit_day);
            prop_assert_eq!(t.exit_price, euphoria);
            prop_assert_eq!(t.return_ratio, (t.exit_price - t.entry_price) / t.entry_price);
        }
    }

    #[test]
    fn compounded_return_matches_product((panic, calm, euphoria) in shocked_path()) {
        let (bars, points) = build_shocked(&panic, &calm, euphoria);
        let config = sample_config(date(2023, 1, 1), date(2023, 12, 31));

        let report = run_backtest(&bars, &points, None, &config);
        let trades = &report.simulation.trades;
        let product: f64 = trades.iter().map(|t| 1.0 + t.return_ratio).product::<f64>() - 1.0;

        prop_assert!((compounded_return(trades) - product).abs() <= 1e-9 * (1.0 + product.abs()));
        match &report.stats {
            StatsReport::Trades(stats) => {
                prop_assert_eq!(stats.total_trades, trades.len());
                prop_assert!((stats.compounded_return - product).abs() <= 1e-9 * (1.0 + product.abs()));
                prop_assert_eq!(stats.win_rate, 1.0);
            }
            StatsReport::NoTrades(_) => prop_assert!(false, "shocked path produced no trades"),
        }
    }

    #[test]
    fn random_flags_respect_ledger_laws(
        steps in prop::collection::vec((1.0f64..500.0, any::<bool>(), any::<bool>()), 0..60),
    ) {
        let start = date(2023, 1, 2);
        let bars: Vec<OhlcvBar> = steps
            .iter()
            .enumerate()
            .map(|(i, &(c, _, _))| make_bar(start + chrono::Duration::days(i as i64), c, 1_000.0))
            .collect();
        let signals: Vec<SignalRow> = steps
            .iter()
            .zip(&bars)
            .map(|(&(c, buy, sell), b)| flag_row(b.date, c, buy, sell))
            .collect();

        let result = simulate(&signals, &bars);
        let buys = steps.iter().filter(|s| s.1).count();
        prop_assert_eq!(result.trades.len() + result.open_positions.len(), buys);
        for t in &result.trades {
            prop_assert!(t.exit_date > t.entry_date);
            prop_assert_eq!(t.return_ratio, (t.exit_price - t.entry_price) / t.entry_price);
        }
        for pair in result.trades.windows(2) {
            prop_assert!(pair[0].exit_date <= pair[1].exit_date);
        }
        let product: f64 = result.trades.iter().map(|t| 1.0 + t.return_ratio).product::<f64>() - 1.0;
        prop_assert!((compounded_return(&result.trades) - product).abs() <= 1e-9 * (1.0 + product.abs()));
    }

    #[test]
    fn random_paths_report_every_day((closes, volumes, external) in price_path()) {
        let (bars, points) = build(&closes, &volumes, &external);
        let config = sample_config(date(2023, 1, 1), date(2023, 12, 31));

        let report = run_backtest(&bars, &points, None, &config);
        prop_assert_eq!(report.simulation.diagnostics.total_days, bars.len());
        prop_assert_eq!(report.signals.len(), bars.len());
        if let StatsReport::NoTrades(diag) = &report.stats {
            prop_assert!(report.simulation.trades.is_empty());
            prop_assert_eq!(diag.total_days, bars.len());
        }
    }

    #[test]
    fn short_series_never_defines_rsi(closes in prop::collection::vec(1.0f64..500.0, 0..14)) {
        let volumes = vec![1_000.0; closes.len()];
        let external = vec![40.0; closes.len()];
        let (bars, points) = build(&closes, &volumes, &external);

        let rows = compute_indicators(&bars, &IndicatorConfig::default());
        prop_assert!(rows.iter().all(|r| r.rsi.is_none()));

        let config = sample_config(date(2023, 1, 1), date(2023, 12, 31));
        let report = run_backtest(&bars, &points, Some(5.0), &config);
        prop_assert!(report.signals.iter().all(|s| !s.buy_signal && !s.sell_signal));
    }

    #[test]
    fn alignment_never_looks_ahead(
        primary_offsets in prop::collection::btree_set(0i64..120, 0..40),
        secondary in prop::collection::vec((0i64..120, -50.0f64..50.0), 1..40),
    ) {
        let base = date(2023, 1, 1);
        let primary: Vec<_> = primary_offsets
            .iter()
            .map(|&d| base + chrono::Duration::days(d))
            .collect();
        let points: Vec<ExternalPoint> = secondary
            .iter()
            .map(|&(d, value)| ExternalPoint { date: base + chrono::Duration::days(d), value })
            .collect();

        let aligned = align_forward_fill(&primary, &points, 0.0).unwrap();
        prop_assert_eq!(aligned.len(), primary.len());
        for a in &aligned {
            match a.source_date {
                Some(src) => prop_assert!(src <= a.date),
                None => {
                    prop_assert_eq!(a.value, 0.0);
                    prop_assert!(points.iter().all(|p| p.date > a.date));
                }
            }
        }
    }
}
