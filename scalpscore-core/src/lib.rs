//! ScalpScore Core: confluence scoring of intraday bar series.
//!
//! This crate holds the pure, I/O-free part of the system:
//! - Domain types (bars, oscillator series, signal results, trade plans)
//! - Indicators (VWAP, ATR, rolling statistics, swing points)
//! - Session classification and time-of-day filtering
//! - Presets and the preset registry
//! - The signal engine: events, weighted scoring, gating, trade levels

pub mod domain;
pub mod engine;
pub mod indicators;
pub mod presets;
pub mod session;

pub use domain::{Bar, Bias, OscillatorSeries, OscillatorSet, SessionTag, SignalResult, TradePlan};
pub use engine::{compute_scalp_signal, EngineConfig, SignalEngine};
pub use presets::{Preset, PresetRegistry};
pub use session::{RegularHours, SessionFilter};
