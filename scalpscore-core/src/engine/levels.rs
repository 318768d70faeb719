//! Trade plan derivation: entry at the last close, stop beyond the recent
//! swing or 0.8×ATR (whichever is farther), 1R and 2R targets.

use crate::domain::{Bias, TradePlan};
use crate::indicators::swing::{DEFAULT_SWING_LEFT, DEFAULT_SWING_RIGHT};
use crate::indicators::{swing_highs, swing_lows, trailing_max, trailing_min};

use super::features::{back, FeatureFrame};

pub const ATR_STOP_MULTIPLIER: f64 = 0.8;
/// Floor on the entry-to-stop distance.
pub const MIN_RISK: f64 = 0.01;
pub const SWING_FALLBACK_WINDOW: usize = 12;

/// Build the plan for a directional bias; `None` for NEUTRAL.
pub fn trade_plan(bias: Bias, frame: &FeatureFrame<'_>) -> Option<TradePlan> {
    let entry = back(&frame.close, 0);
    let atr = back(&frame.atr, 0);
    let buffer = if atr.is_nan() {
        f64::NAN
    } else {
        atr.max(0.0) * ATR_STOP_MULTIPLIER
    };

    match bias {
        Bias::Long => {
            let mask = swing_lows(&frame.low, DEFAULT_SWING_LEFT, DEFAULT_SWING_RIGHT);
            let swing = most_recent_swing(&frame.low, &mask)
                .unwrap_or_else(|| trailing_min(&frame.low, SWING_FALLBACK_WINDOW));
            // f64::min skips a NaN ATR leg.
            let raw_stop = swing.min(entry - buffer);
            // Only a stop at or above entry is moved; tight stops keep their level.
            let stop = if raw_stop < entry {
                raw_stop
            } else {
                entry - MIN_RISK
            };
            let risk = (entry - stop).max(MIN_RISK);
            Some(TradePlan {
                entry,
                stop,
                target_1r: entry + risk,
                target_2r: entry + 2.0 * risk,
            })
        }
        Bias::Short => {
            let mask = swing_highs(&frame.high, DEFAULT_SWING_LEFT, DEFAULT_SWING_RIGHT);
            let swing = most_recent_swing(&frame.high, &mask)
                .unwrap_or_else(|| trailing_max(&frame.high, SWING_FALLBACK_WINDOW));
            let raw_stop = swing.max(entry + buffer);
            let stop = if raw_stop > entry {
                raw_stop
            } else {
                entry + MIN_RISK
            };
            let risk = (stop - entry).max(MIN_RISK);
            Some(TradePlan {
                entry,
                stop,
                target_1r: entry - risk,
                target_2r: entry - 2.0 * risk,
            })
        }
        Bias::Neutral => None,
    }
}

fn most_recent_swing(values: &[f64], mask: &[bool]) -> Option<f64> {
    values
        .iter()
        .zip(mask)
        .rev()
        .find_map(|(&v, &flagged)| flagged.then_some(v))
}
