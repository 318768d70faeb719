//! ScalpScore Runner: configuration, data loading, watchlist scans, export.
//!
//! This crate builds on `scalpscore-core` to provide:
//! - TOML scan configuration with custom presets and session windows
//! - CSV loading of per-symbol bars and oscillator series
//! - Parallel watchlist scanning with deterministic ranking
//! - CSV and JSON export of signal results

pub mod config;
pub mod data_loader;
pub mod export;
pub mod scan;

pub use config::{ConfigError, PresetConfig, ScanConfig, SessionWindowsConfig};
pub use data_loader::{
    list_symbols, load_bars_csv, load_bundle, load_oscillator_csv, load_watchlist, LoadError,
};
pub use export::{export_csv, export_json};
pub use scan::{rank, ScanError, ScanReport, Scanner, SymbolBundle};
