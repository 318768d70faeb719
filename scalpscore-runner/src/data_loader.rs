//! CSV loading for per-symbol bar and oscillator files.
//!
//! Layout under a data directory:
//!
//! ```text
//! <data_dir>/<SYMBOL>/bars.csv        timestamp,open,high,low,close,volume
//! <data_dir>/<SYMBOL>/rsi_fast.csv    timestamp,value
//! <data_dir>/<SYMBOL>/rsi_slow.csv    timestamp,value
//! <data_dir>/<SYMBOL>/macd_hist.csv   timestamp,value
//! ```
//!
//! Timestamps are exchange-local `%Y-%m-%d %H:%M:%S`. Bars must be strictly
//! ascending. A missing oscillator file loads as an empty series, which the
//! engine treats as undefined everywhere.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use scalpscore_core::domain::{Bar, OscillatorSeries, OscillatorSet};

use crate::scan::SymbolBundle;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const BARS_FILE: &str = "bars.csv";
pub const RSI_FAST_FILE: &str = "rsi_fast.csv";
pub const RSI_SLOW_FILE: &str = "rsi_slow.csv";
pub const MACD_HIST_FILE: &str = "macd_hist.csv";

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no bars file for '{symbol}' at {path}")]
    MissingBars { symbol: String, path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("bad timestamp '{value}' in {path} line {line} (expected YYYY-MM-DD HH:MM:SS)")]
    Timestamp {
        path: PathBuf,
        line: usize,
        value: String,
    },

    #[error("timestamps not strictly ascending in {path} at line {line} ({timestamp})")]
    NonMonotonic {
        path: PathBuf,
        line: usize,
        timestamp: NaiveDateTime,
    },
}

#[derive(Debug, Deserialize)]
struct BarRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

#[derive(Debug, Deserialize)]
struct OscillatorRow {
    timestamp: String,
    value: Option<f64>,
}

fn parse_timestamp(path: &Path, line: usize, value: &str) -> Result<NaiveDateTime, LoadError> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).map_err(|_| {
        LoadError::Timestamp {
            path: path.to_path_buf(),
            line,
            value: value.to_string(),
        }
    })
}

fn open_reader(path: &Path) -> Result<csv::Reader<std::fs::File>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file))
}

/// Load a bar CSV, rejecting out-of-order or duplicate timestamps.
pub fn load_bars_csv(path: &Path) -> Result<Vec<Bar>, LoadError> {
    let mut reader = open_reader(path)?;
    let mut bars: Vec<Bar> = Vec::new();

    for (i, row) in reader.deserialize::<BarRow>().enumerate() {
        // Header is line 1.
        let line = i + 2;
        let row = row.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let timestamp = parse_timestamp(path, line, &row.timestamp)?;
        if bars.last().is_some_and(|prev| prev.timestamp >= timestamp) {
            return Err(LoadError::NonMonotonic {
                path: path.to_path_buf(),
                line,
                timestamp,
            });
        }
        bars.push(Bar {
            timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }

    let insane = bars.iter().filter(|b| !b.is_sane()).count();
    if insane > 0 {
        warn!(path = %path.display(), insane, "bars failing OHLCV sanity checks");
    }
    Ok(bars)
}

/// Load a `timestamp,value` oscillator CSV. Empty values are skipped.
pub fn load_oscillator_csv(path: &Path) -> Result<OscillatorSeries, LoadError> {
    let mut reader = open_reader(path)?;
    let mut series = OscillatorSeries::new();

    for (i, row) in reader.deserialize::<OscillatorRow>().enumerate() {
        let line = i + 2;
        let row = row.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let timestamp = parse_timestamp(path, line, &row.timestamp)?;
        if let Some(value) = row.value {
            series.insert(timestamp, value);
        }
    }

    Ok(series)
}

fn load_optional_oscillator(dir: &Path, file: &str) -> Result<OscillatorSeries, LoadError> {
    let path = dir.join(file);
    if path.is_file() {
        load_oscillator_csv(&path)
    } else {
        debug!(path = %path.display(), "oscillator file missing, series left empty");
        Ok(OscillatorSeries::new())
    }
}

/// Load everything the engine needs for one symbol.
pub fn load_bundle(data_dir: &Path, symbol: &str) -> Result<SymbolBundle, LoadError> {
    let dir = data_dir.join(symbol);
    let bars_path = dir.join(BARS_FILE);
    if !bars_path.is_file() {
        return Err(LoadError::MissingBars {
            symbol: symbol.to_string(),
            path: bars_path,
        });
    }

    let bars = load_bars_csv(&bars_path)?;
    let oscillators = OscillatorSet {
        rsi_fast: load_optional_oscillator(&dir, RSI_FAST_FILE)?,
        rsi_slow: load_optional_oscillator(&dir, RSI_SLOW_FILE)?,
        macd_hist: load_optional_oscillator(&dir, MACD_HIST_FILE)?,
    };
    debug!(symbol, bars = bars.len(), "loaded symbol data");

    Ok(SymbolBundle {
        symbol: symbol.to_string(),
        bars,
        oscillators,
    })
}

/// Load bundles for a watchlist. Symbols that fail to load are logged and
/// skipped so one bad file never aborts a scan.
pub fn load_watchlist(data_dir: &Path, symbols: &[String]) -> Vec<SymbolBundle> {
    symbols
        .iter()
        .filter_map(|symbol| match load_bundle(data_dir, symbol) {
            Ok(bundle) => Some(bundle),
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "skipping symbol");
                None
            }
        })
        .collect()
}

/// Every subdirectory of `data_dir` that holds a bars file, sorted by name.
pub fn list_symbols(data_dir: &Path) -> Result<Vec<String>, LoadError> {
    let entries = std::fs::read_dir(data_dir).map_err(|source| LoadError::Io {
        path: data_dir.to_path_buf(),
        source,
    })?;

    let mut symbols = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Io {
            path: data_dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.join(BARS_FILE).is_file() {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                symbols.push(name.to_string());
            }
        }
    }
    symbols.sort();
    Ok(symbols)
}
