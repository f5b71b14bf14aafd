//! Integration test: full analysis runs over CSV inputs
//!
//! Tests the complete flow:
//! 1. Snapshot and close-price CSVs are loaded
//! 2. Each (date, symbol) unit is analysed on the batch pool
//! 3. Rows are sorted, rounded and exported

use std::fs;
use std::path::Path;

use closing_liquidity::{Percent, RemovalPolicy};
use closing_ports::AuctionError;
use closing_runner::{
    AnalysisConfig, AnalysisMode, ErrorMode, ExportFormat, Granularity, Scenario, SnapshotBook,
    UnitError,
};
use rust_decimal_macros::dec;
use tempfile::TempDir;

// NESN: quoted start book, 40 market bids at the close
// UBSG: bids rest above asks at the start of the auction
const SNAPSHOTS: &str = "\
onbook_date,symbol,price,start_close_vol_bid,start_close_vol_ask,SS_300_vol_bid,SS_300_vol_ask,SS_600_vol_bid,SS_600_vol_ask,end_close_vol_bid,end_close_vol_ask
2019-03-15,NESN,0,0,0,0,0,0,0,40,0
2019-03-15,NESN,9.9,100,0,100,0,100,0,100,0
2019-03-15,NESN,10.0,20,0,30,80,50,80,50,80
2019-03-15,NESN,10.1,0,60,0,60,0,60,0,60
2019-03-15,UBSG,12,0,10,30,5,30,5,30,5
2019-03-15,UBSG,12.5,10,0,10,20,10,20,10,20
";

const CLOSE_PRICES: &str = "\
onbook_date,symbol,price_org_ccy
2019-03-15,NESN,10.02
";

/// Scratch directory holding both input files
fn workspace() -> (TempDir, AnalysisConfig) {
    let dir = tempfile::tempdir().unwrap();
    let snapshots = dir.path().join("snapshots.csv");
    let close_prices = dir.path().join("close_prices.csv");
    fs::write(&snapshots, SNAPSHOTS).unwrap();
    fs::write(&close_prices, CLOSE_PRICES).unwrap();

    let mut config = AnalysisConfig::default();
    config.input.snapshots = snapshots;
    config.input.close_prices = Some(close_prices);
    config.export.dir = dir.path().join("Exports");
    config.batch.threads = Some(2);
    (dir, config)
}

fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

fn column<'a>(headers: &[String], row: &'a [String], name: &str) -> &'a str {
    let index = headers.iter().position(|h| h == name).unwrap();
    &row[index]
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_snapshot_file_loads() {
    let _ = env_logger::try_init();
    let (_dir, config) = workspace();

    let book = SnapshotBook::from_path(&config.input.snapshots).unwrap();

    assert_eq!(book.len(), 2);
    let nesn = book.snapshots()[0].key().clone();
    assert_eq!(nesn.symbol, "NESN");
    let snapshot = book.get(&nesn).unwrap();
    assert_eq!(snapshot.matched_lags().unwrap(), vec![0, 300, 600]);
    assert_eq!(snapshot.closing_ladder().unwrap().market().bid, dec!(40));
}

#[test]
fn test_sensitivity_run_exports_csv() {
    let _ = env_logger::try_init();
    let (_dir, mut config) = workspace();
    config.mode = AnalysisMode::Sensitivity;
    config.sensitivity.granularity = Granularity::Rough;

    let summary = closing_runner::run(&config).unwrap();

    // 3 limit scenarios x 11 percents + all_market + all_cont, for 2 units
    assert_eq!(summary.units, 2);
    assert_eq!(summary.rows, 70);
    assert!(summary.failures.is_empty());
    assert!(summary.output.ends_with("Exports/Sensitivity_rough.csv"));

    let (headers, rows) = read_csv(&summary.output);
    assert_eq!(&headers[..4], ["mode", "date", "symbol", "percent"]);
    assert_eq!(rows.len(), 70);

    // First row: bid_limit, NESN, 0% - identical to the baseline
    let first = &rows[0];
    assert_eq!(column(&headers, first, "mode"), "bid_limit");
    assert_eq!(column(&headers, first, "symbol"), "NESN");
    assert_eq!(column(&headers, first, "percent"), "0");
    assert_eq!(column(&headers, first, "close_price"), "10");
    assert_eq!(column(&headers, first, "close_vol"), "80");
    assert_eq!(column(&headers, first, "adj_vol"), "80");

    let nesn_market = rows
        .iter()
        .find(|r| column(&headers, r, "mode") == "all_market" && r[2] == "NESN")
        .unwrap();
    assert_eq!(column(&headers, nesn_market, "percent"), "1");
    assert_eq!(column(&headers, nesn_market, "adj_vol"), "50");
    assert_eq!(column(&headers, nesn_market, "adj_bids"), "150");

    // No market orders at the start of the auction: nothing to take out
    let nesn_cont = rows
        .iter()
        .find(|r| column(&headers, r, "mode") == "all_cont" && r[2] == "NESN")
        .unwrap();
    assert_eq!(column(&headers, nesn_cont, "adj_vol"), "80");
}

#[test]
fn test_sensitivity_removal_moves_price() {
    let _ = env_logger::try_init();
    let (_dir, mut config) = workspace();
    config.mode = AnalysisMode::Sensitivity;
    config.sensitivity.policy = RemovalPolicy::SeparatePassive;
    config.sensitivity.percents = Some(vec![Percent::ZERO, Percent::ONE]);
    config.sensitivity.scenarios = vec![Scenario::AskLimit];
    config.export.format = ExportFormat::Json;
    config.export.filename = Some("asks".to_string());

    let summary = closing_runner::run(&config).unwrap();
    let rows = read_json(&summary.output);

    assert_eq!(summary.output.file_name().unwrap(), "asks.json");
    assert_eq!(rows.as_array().unwrap().len(), 4);
    // NESN at 100%: every ask withdrawn, the book no longer uncrosses
    let full = &rows[1];
    assert_eq!(full["symbol"], "NESN");
    assert_eq!(full["percent"], "1");
    assert!(full["adj_price"].is_null());
    assert_eq!(full["close_price"], "10");
}

#[test]
fn test_discovery_run_fails_fast_on_crossed_book() {
    let _ = env_logger::try_init();
    let (_dir, mut config) = workspace();
    config.mode = AnalysisMode::Discovery;

    let err = closing_runner::run(&config).unwrap_err();

    match err {
        closing_runner::Error::Unit { key, source } => {
            assert_eq!(key.symbol, "UBSG");
            assert!(matches!(
                source,
                UnitError::Auction(AuctionError::SpreadInversion { .. })
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_discovery_run_skips_failed_unit() {
    let _ = env_logger::try_init();
    let (_dir, mut config) = workspace();
    config.mode = AnalysisMode::Discovery;
    config.batch.error_mode = ErrorMode::SkipUnit;
    config.export.format = ExportFormat::Json;

    let summary = closing_runner::run(&config).unwrap();

    assert_eq!(summary.units, 2);
    assert_eq!(summary.rows, 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].key.symbol, "UBSG");

    let rows = read_json(&summary.output);
    let nesn = &rows[0];
    assert_eq!(nesn["symbol"], "NESN");
    assert_eq!(nesn["pre_abs_spread"], "0.1");
    assert_eq!(nesn["pre_midquote"], "10.05");
    assert_eq!(nesn["pre_rel_spread"], "99.5025");
    assert!(nesn["start_price"].is_null());
    assert_eq!(nesn["start_bids"], "120");
    assert_eq!(nesn["close_price"], "10");
    assert_eq!(nesn["close_vol"], "80");
    assert_eq!(nesn["actual_close_price"], "10.02");
}

#[test]
fn test_interval_run() {
    let _ = env_logger::try_init();
    let (_dir, mut config) = workspace();
    config.mode = AnalysisMode::Intervals;

    let summary = closing_runner::run(&config).unwrap();

    assert_eq!(summary.rows, 6);
    let (headers, rows) = read_csv(&summary.output);
    let nesn: Vec<_> = rows.iter().filter(|r| r[1] == "NESN").collect();
    let lags: Vec<_> = nesn.iter().map(|r| column(&headers, r, "lag")).collect();
    assert_eq!(lags, ["0", "300", "600"]);

    // Reference lag 600 crosses 50 at 10.0
    assert!(nesn.iter().all(|r| column(&headers, r, "close_vol") == "50"));
    assert_eq!(column(&headers, nesn[0], "snap_vol"), "");
    assert_eq!(column(&headers, nesn[1], "snap_vol"), "30");
    assert_eq!(column(&headers, nesn[2], "snap_cum_asks"), "80");
}

#[test]
fn test_interval_run_missing_reference_lag() {
    let _ = env_logger::try_init();
    let (_dir, mut config) = workspace();
    config.mode = AnalysisMode::Intervals;
    config.intervals.reference_lag = 900;
    config.batch.error_mode = ErrorMode::SkipUnit;

    let summary = closing_runner::run(&config).unwrap();

    assert_eq!(summary.rows, 0);
    assert_eq!(summary.failures.len(), 2);
    assert!(summary
        .failures
        .iter()
        .all(|f| f.error == UnitError::MissingLag(900)));
}

#[test]
fn test_missing_input_file() {
    let _ = env_logger::try_init();
    let (dir, mut config) = workspace();
    config.input.snapshots = dir.path().join("missing.csv");

    let err = closing_runner::run(&config).unwrap_err();

    assert!(matches!(
        err,
        closing_runner::Error::Load(closing_runner::LoadError::Io { .. })
    ));
}

#[test]
fn test_config_file_round_trip() {
    let _ = env_logger::try_init();
    let (dir, config) = workspace();
    let path = dir.path().join("analysis.json");
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    let loaded = AnalysisConfig::from_file(&path).unwrap();

    assert_eq!(loaded.mode, config.mode);
    assert_eq!(loaded.input.snapshots, config.input.snapshots);
    assert_eq!(loaded.batch.threads, Some(2));
}
