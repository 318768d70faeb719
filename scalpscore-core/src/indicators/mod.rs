//! Indicator library: pure functions from a bar window to numeric series.
//!
//! Every series has the same length as its input. Undefined values are
//! `f64::NAN`, and NaN compares false everywhere downstream, so a missing
//! value can only ever withhold points from a setup.

pub mod atr;
pub mod rolling;
pub mod swing;
pub mod vwap;

pub use atr::{atr, true_range, Atr};
pub use rolling::{trailing_max, trailing_median, trailing_min};
pub use swing::{swing_highs, swing_lows, swing_points};
pub use vwap::{vwap, Vwap};

use crate::domain::Bar;

/// Trait for bar-series indicators.
///
/// # Look-ahead contamination guard
/// No value at bar t may depend on bar t+1 or later. Swing detection is the
/// one deliberate exception and is therefore not an `Indicator`.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "vwap", "atr_14").
    fn name(&self) -> &str;

    /// Number of leading bars that are NaN on a clean series.
    fn lookback(&self) -> usize;

    /// Compute the indicator over the whole window.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Synthetic one-minute bars from closes, for tests.
///
/// open = prev close, high/low = max/min(open, close) ± 0.5, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let start = chrono::NaiveDate::from_ymd_opt(2024, 3, 5)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: start + chrono::Duration::minutes(i as i64),
                open,
                high: open.max(close) + 0.5,
                low: open.min(close) - 0.5,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
