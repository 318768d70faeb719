//! Integration tests for the runner: CSV fixtures on disk through a full scan.
//!
//! Builds a temporary data directory with three symbols:
//! - REV: a power-hour VWAP reclaim with bullish oscillators (full LONG)
//! - FLAT: a quiet tape with no events
//! - BAD: bars out of order (skipped by the watchlist loader)

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use scalpscore_core::domain::{Bar, Bias, SessionTag};
use scalpscore_runner::config::ScanConfig;
use scalpscore_runner::data_loader::{list_symbols, load_bundle, load_watchlist, TIMESTAMP_FORMAT};
use scalpscore_runner::export::export_csv;
use scalpscore_runner::scan::Scanner;

// ──────────────────────────────────────────────
// Fixture helpers
// ──────────────────────────────────────────────

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 5)
        .unwrap()
        .and_hms_opt(14, 40, 0)
        .unwrap()
}

fn flat_bar(i: usize) -> Bar {
    Bar {
        timestamp: start() + Duration::minutes(i as i64),
        open: 100.0,
        high: 100.5,
        low: 99.5,
        close: 100.0,
        volume: 1000.0,
    }
}

fn reversal_bars() -> Vec<Bar> {
    let mut bars: Vec<Bar> = (0..70).map(flat_bar).collect();
    for i in 70..79 {
        let open = bars[i - 1].close;
        let close = 99.0 - 0.25 * (i - 70) as f64;
        bars.push(Bar {
            timestamp: start() + Duration::minutes(i as i64),
            open,
            high: open.max(close) + 0.2,
            low: open.min(close) - 0.2,
            close,
            volume: 1000.0,
        });
    }
    bars.push(Bar {
        timestamp: start() + Duration::minutes(79),
        open: 97.0,
        high: 101.2,
        low: 96.9,
        close: 101.0,
        volume: 2500.0,
    });
    bars
}

fn bars_csv(bars: &[Bar]) -> String {
    let mut out = String::from("timestamp,open,high,low,close,volume\n");
    for b in bars {
        writeln!(
            out,
            "{},{},{},{},{},{}",
            b.timestamp.format(TIMESTAMP_FORMAT),
            b.open,
            b.high,
            b.low,
            b.close,
            b.volume
        )
        .unwrap();
    }
    out
}

/// `fill` for every bar, with `tail` overriding the last values.
fn oscillator_csv(bars: &[Bar], fill: f64, tail: &[f64]) -> String {
    let offset = bars.len() - tail.len();
    let mut out = String::from("timestamp,value\n");
    for (i, b) in bars.iter().enumerate() {
        let value = if i >= offset { tail[i - offset] } else { fill };
        writeln!(out, "{},{}", b.timestamp.format(TIMESTAMP_FORMAT), value).unwrap();
    }
    out
}

fn write_symbol(root: &Path, symbol: &str, bars: &[Bar], bullish: bool) {
    let dir = root.join(symbol);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("bars.csv"), bars_csv(bars)).unwrap();
    let (rsi_tail, macd_tail): (&[f64], &[f64]) = if bullish {
        (&[20.0, 35.0], &[-0.5, -0.3, -0.1])
    } else {
        (&[], &[])
    };
    fs::write(dir.join("rsi_fast.csv"), oscillator_csv(bars, 50.0, rsi_tail)).unwrap();
    fs::write(dir.join("rsi_slow.csv"), oscillator_csv(bars, 45.0, &[])).unwrap();
    fs::write(dir.join("macd_hist.csv"), oscillator_csv(bars, -0.5, macd_tail)).unwrap();
}

fn fixture_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_symbol(dir.path(), "REV", &reversal_bars(), true);
    let flat: Vec<Bar> = (0..80).map(flat_bar).collect();
    write_symbol(dir.path(), "FLAT", &flat, false);

    let mut shuffled = flat.clone();
    shuffled.swap(10, 11);
    write_symbol(dir.path(), "BAD", &shuffled, false);
    dir
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[test]
fn csv_round_trip_preserves_bars() {
    let dir = fixture_dir();
    let bundle = load_bundle(dir.path(), "REV").unwrap();
    assert_eq!(bundle.bars, reversal_bars());
    assert_eq!(bundle.oscillators.rsi_fast.len(), 80);
}

#[test]
fn scan_ranks_reversal_first_and_skips_bad_symbol() {
    let dir = fixture_dir();
    let symbols = list_symbols(dir.path()).unwrap();
    assert_eq!(symbols, vec!["BAD", "FLAT", "REV"]);

    let bundles = load_watchlist(dir.path(), &symbols);
    assert_eq!(bundles.len(), 2);

    let scanner = Scanner::new(&ScanConfig::default()).unwrap();
    let report = scanner.scan(&bundles);
    assert_eq!(report.len(), 2);

    let top = report.top().unwrap();
    assert_eq!(top.symbol, "REV");
    assert_eq!(top.bias, Bias::Long);
    assert_eq!(top.score, 100);
    assert_eq!(top.session, SessionTag::Power);
    assert_eq!(top.stop(), Some(99.5));

    let alerts: Vec<&str> = report.alerts().map(|r| r.symbol.as_str()).collect();
    assert_eq!(alerts, vec!["REV"]);
    assert_eq!(report.results[1].symbol, "FLAT");
    assert_eq!(report.results[1].bias, Bias::Neutral);
}

#[test]
fn scan_is_independent_of_thread_count() {
    let dir = fixture_dir();
    let symbols = list_symbols(dir.path()).unwrap();
    let bundles = load_watchlist(dir.path(), &symbols);

    let single = Scanner::new(&ScanConfig {
        max_threads: Some(1),
        ..ScanConfig::default()
    })
    .unwrap()
    .scan(&bundles);
    let many = Scanner::new(&ScanConfig {
        max_threads: Some(4),
        ..ScanConfig::default()
    })
    .unwrap()
    .scan(&bundles);

    assert_eq!(single.results, many.results);
    assert_ne!(single.config_hash, many.config_hash);
}

#[test]
fn config_file_drives_the_scan() {
    let dir = fixture_dir();
    let config_path = dir.path().join("scan.toml");
    fs::write(
        &config_path,
        r#"
preset = "Strict"

[[presets]]
name = "Strict"
min_actionable_score = 100
volume_multiplier = 3.0
require_volume = true
"#,
    )
    .unwrap();
    let config = ScanConfig::from_file(&config_path).unwrap();
    let bundles = load_watchlist(dir.path(), &["REV".to_string()]);
    let report = Scanner::new(&config).unwrap().scan(&bundles);

    // 2500 < 3.0 x median 1000, so the volume gate rejects.
    let rev = report.top().unwrap();
    assert_eq!(rev.bias, Bias::Neutral);
    assert_eq!(rev.reason, "No volume confirmation");
}

#[test]
fn exported_csv_lists_ranked_rows() {
    let dir = fixture_dir();
    let bundles = load_watchlist(dir.path(), &["FLAT".to_string(), "REV".to_string()]);
    let report = Scanner::new(&ScanConfig::default()).unwrap().scan(&bundles);
    let csv = export_csv(&report.results).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("REV,LONG,100,POWER,101.0000,101.0000,99.5000,"));
    assert!(lines[2].starts_with("FLAT,NEUTRAL,"));
}
