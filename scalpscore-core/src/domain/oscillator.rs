//! Timestamp-keyed oscillator series (RSI, MACD histogram) computed upstream.
//!
//! Oscillator samples need not line up with every bar. They are aligned to a
//! bar window by exact timestamp match, then the last known value is carried
//! forward. Bars before the first matched sample stay NaN.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Bar;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OscillatorSeries {
    points: BTreeMap<NaiveDateTime, f64>,
}

impl OscillatorSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or overwrite) the sample at `timestamp`.
    pub fn insert(&mut self, timestamp: NaiveDateTime, value: f64) {
        self.points.insert(timestamp, value);
    }

    pub fn get(&self, timestamp: &NaiveDateTime) -> Option<f64> {
        self.points.get(timestamp).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Align to `bars`: exact-timestamp lookup, then forward-fill.
    ///
    /// A NaN sample counts as missing and does not overwrite the carried value.
    pub fn align_to(&self, bars: &[Bar]) -> Vec<f64> {
        let mut last = f64::NAN;
        bars.iter()
            .map(|bar| {
                if let Some(v) = self.points.get(&bar.timestamp) {
                    if !v.is_nan() {
                        last = *v;
                    }
                }
                last
            })
            .collect()
    }
}

impl FromIterator<(NaiveDateTime, f64)> for OscillatorSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDateTime, f64)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// The three oscillator inputs the engine consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OscillatorSet {
    pub rsi_fast: OscillatorSeries,
    pub rsi_slow: OscillatorSeries,
    pub macd_hist: OscillatorSeries,
}
