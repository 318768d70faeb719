//! Volume-weighted average price, cumulated from the first bar of the window.
//!
//! VWAP[t] = Σ typical_price·volume / Σ volume over bars 0..=t.
//! There is no reset at session boundaries: the anchor is whatever window the
//! caller passes in. Zero cumulative volume yields NaN.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone, Default)]
pub struct Vwap;

impl Indicator for Vwap {
    fn name(&self) -> &str {
        "vwap"
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        vwap(bars)
    }
}

pub fn vwap(bars: &[Bar]) -> Vec<f64> {
    let mut cum_pv = 0.0;
    let mut cum_vol = 0.0;
    bars.iter()
        .map(|bar| {
            cum_pv += bar.typical_price() * bar.volume;
            cum_vol += bar.volume;
            if cum_vol == 0.0 {
                f64::NAN
            } else {
                cum_pv / cum_vol
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn constant_bars_vwap_is_typical_price() {
        let bars = make_bars(&[100.0, 100.0, 100.0]);
        for v in vwap(&bars) {
            assert_approx(v, 100.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn volume_weighting() {
        let mut bars = make_bars(&[100.0, 110.0]);
        // bar 0: h=100.5 l=99.5 c=100 → tp=100; bar 1: h=110.5 l=99.5 c=110 → tp=106.666..
        bars[0].volume = 1000.0;
        bars[1].volume = 3000.0;
        let tp1 = (110.5 + 99.5 + 110.0) / 3.0;
        let v = vwap(&bars);
        assert_approx(v[0], 100.0, DEFAULT_EPSILON);
        assert_approx(v[1], (100.0 * 1000.0 + tp1 * 3000.0) / 4000.0, DEFAULT_EPSILON);
    }

    #[test]
    fn zero_cumulative_volume_is_nan() {
        let mut bars = make_bars(&[100.0, 101.0, 102.0]);
        bars[0].volume = 0.0;
        bars[1].volume = 0.0;
        let v = vwap(&bars);
        assert!(v[0].is_nan());
        assert!(v[1].is_nan());
        assert!(!v[2].is_nan());
    }

    #[test]
    fn anchored_to_window_start() {
        let bars = make_bars(&[100.0, 104.0, 108.0, 112.0]);
        let full = vwap(&bars);
        let tail = vwap(&bars[2..]);
        // Re-anchoring changes the value: the window start is the anchor.
        assert!((full[3] - tail[1]).abs() > 1.0);
    }

    #[test]
    fn no_lookahead() {
        let bars = make_bars(&[100.0, 101.0, 99.0, 103.0, 102.0]);
        let full = vwap(&bars);
        let truncated = vwap(&bars[..3]);
        for i in 0..3 {
            assert_approx(full[i], truncated[i], DEFAULT_EPSILON);
        }
    }
}
