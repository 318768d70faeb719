//! Domain types: bars, oscillator series, swing points, signal results.

pub mod bar;
pub mod oscillator;
pub mod signal;

pub use bar::Bar;
pub use oscillator::{OscillatorSeries, OscillatorSet};
pub use signal::{Bias, Factor, Rejection, SessionTag, SignalResult, SwingKind, SwingPoint, TradePlan};
