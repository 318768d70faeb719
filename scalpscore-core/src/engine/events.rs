//! Discrete event detectors over the last few bars of a feature frame.
//!
//! Every detector is a plain comparison chain; a NaN anywhere makes it false.

use crate::domain::Factor;
use crate::indicators::{trailing_max, trailing_median, trailing_min};

use super::features::{back, FeatureFrame};

/// Offsets (bars back from the last) checked for the prior VWAP side.
/// A disjunction over exactly these two, not a sustained condition.
pub const VWAP_PRIOR_SIDE_OFFSETS: [usize; 2] = [3, 5];
pub const RSI_SNAP_UP_LEVELS: [f64; 2] = [30.0, 25.0];
pub const RSI_DOWNSHIFT_LEVELS: [f64; 2] = [70.0, 75.0];
/// RSI-slow must be below this for the long RSI points.
pub const RSI_SLOW_LONG_CEILING: f64 = 60.0;
/// RSI-slow must be above this for the short RSI points.
pub const RSI_SLOW_SHORT_FLOOR: f64 = 40.0;
pub const VOLUME_MEDIAN_WINDOW: usize = 30;
pub const VOLUME_MEDIAN_MIN_SAMPLES: usize = 10;
pub const MICRO_STRUCTURE_WINDOW: usize = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventSet {
    pub vwap_reclaim: bool,
    pub vwap_rejection: bool,
    pub rsi_snap_up: bool,
    pub rsi_downshift: bool,
    pub rsi_slow_long_ok: bool,
    pub rsi_slow_short_ok: bool,
    pub macd_turn_up: bool,
    pub macd_turn_down: bool,
    pub volume_confirmed: bool,
    pub higher_low: bool,
    pub lower_high: bool,
}

impl EventSet {
    pub fn detect(frame: &FeatureFrame<'_>, volume_multiplier: f64) -> Self {
        let close = &frame.close;
        let vwap = &frame.vwap;

        let was_below = VWAP_PRIOR_SIDE_OFFSETS
            .iter()
            .any(|&k| back(close, k) < back(vwap, k));
        let was_above = VWAP_PRIOR_SIDE_OFFSETS
            .iter()
            .any(|&k| back(close, k) > back(vwap, k));
        let crossed_up = back(close, 0) > back(vwap, 0) && back(close, 1) <= back(vwap, 1);
        let crossed_down = back(close, 0) < back(vwap, 0) && back(close, 1) >= back(vwap, 1);

        let rsi_now = back(&frame.rsi_fast, 0);
        let rsi_prev = back(&frame.rsi_fast, 1);
        let rsi_slow = back(&frame.rsi_slow, 0);

        let h0 = back(&frame.macd_hist, 0);
        let h1 = back(&frame.macd_hist, 1);
        let h2 = back(&frame.macd_hist, 2);

        let median = trailing_median(
            &frame.volume,
            VOLUME_MEDIAN_WINDOW,
            VOLUME_MEDIAN_MIN_SAMPLES,
        );
        let volume_confirmed =
            median.is_finite() && back(&frame.volume, 0) >= volume_multiplier * median;

        Self {
            vwap_reclaim: was_below && crossed_up,
            vwap_rejection: was_above && crossed_down,
            rsi_snap_up: RSI_SNAP_UP_LEVELS
                .iter()
                .any(|&level| rsi_now >= level && rsi_prev < level),
            rsi_downshift: RSI_DOWNSHIFT_LEVELS
                .iter()
                .any(|&level| rsi_now <= level && rsi_prev > level),
            rsi_slow_long_ok: rsi_slow < RSI_SLOW_LONG_CEILING,
            rsi_slow_short_ok: rsi_slow > RSI_SLOW_SHORT_FLOOR,
            macd_turn_up: h0 > h1 && h1 > h2,
            macd_turn_down: h0 < h1 && h1 < h2,
            volume_confirmed,
            higher_low: back(&frame.low, 0) > trailing_min(&frame.low, MICRO_STRUCTURE_WINDOW),
            lower_high: back(&frame.high, 0) < trailing_max(&frame.high, MICRO_STRUCTURE_WINDOW),
        }
    }

    /// Whether the category fired in either direction (used for gating).
    pub fn fired(&self, factor: Factor) -> bool {
        match factor {
            Factor::Vwap => self.vwap_reclaim || self.vwap_rejection,
            Factor::Rsi => self.rsi_snap_up || self.rsi_downshift,
            Factor::Macd => self.macd_turn_up || self.macd_turn_down,
            Factor::Volume => self.volume_confirmed,
            Factor::MicroStructure => self.higher_low || self.lower_high,
        }
    }

    /// Long-side factor matches in scoring order.
    pub fn long_matches(&self) -> [(Factor, bool); 5] {
        [
            (Factor::Vwap, self.vwap_reclaim),
            (Factor::Rsi, self.rsi_snap_up && self.rsi_slow_long_ok),
            (Factor::Macd, self.macd_turn_up),
            (Factor::Volume, self.volume_confirmed),
            (Factor::MicroStructure, self.higher_low),
        ]
    }

    /// Short-side factor matches in scoring order.
    pub fn short_matches(&self) -> [(Factor, bool); 5] {
        [
            (Factor::Vwap, self.vwap_rejection),
            (Factor::Rsi, self.rsi_downshift && self.rsi_slow_short_ok),
            (Factor::Macd, self.macd_turn_down),
            (Factor::Volume, self.volume_confirmed),
            (Factor::MicroStructure, self.lower_high),
        ]
    }
}
