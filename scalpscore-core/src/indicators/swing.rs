//! Swing-point detection over a symmetric neighborhood.
//!
//! Index i is a swing low (high) iff its value equals the minimum (maximum)
//! of the inclusive window [i-left, i+right]. The first `left` and last
//! `right` indices are never flagged. Ties flag every tied index.
//!
//! This looks `right` bars ahead, so a flag at i is only final once bar
//! i+right exists. O(n·(left+right)), fine for a few hundred bars.

use crate::domain::{Bar, SwingKind, SwingPoint};

pub const DEFAULT_SWING_LEFT: usize = 3;
pub const DEFAULT_SWING_RIGHT: usize = 3;

pub fn swing_lows(series: &[f64], left: usize, right: usize) -> Vec<bool> {
    extreme_mask(series, left, right, |candidate, other| candidate <= other)
}

pub fn swing_highs(series: &[f64], left: usize, right: usize) -> Vec<bool> {
    extreme_mask(series, left, right, |candidate, other| candidate >= other)
}

fn extreme_mask(
    series: &[f64],
    left: usize,
    right: usize,
    dominates: impl Fn(f64, f64) -> bool,
) -> Vec<bool> {
    let n = series.len();
    let mut mask = vec![false; n];
    if n < left + right + 1 {
        return mask;
    }
    for i in left..(n - right) {
        let value = series[i];
        if value.is_nan() {
            continue;
        }
        mask[i] = series[i - left..=i + right]
            .iter()
            .filter(|v| !v.is_nan())
            .all(|&other| dominates(value, other));
    }
    mask
}

/// Swing lows (from bar lows) and swing highs (from bar highs), in time order.
/// A bar that is both yields the low first.
pub fn swing_points(bars: &[Bar], left: usize, right: usize) -> Vec<SwingPoint> {
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let low_mask = swing_lows(&lows, left, right);
    let high_mask = swing_highs(&highs, left, right);

    let mut points = Vec::new();
    for (i, bar) in bars.iter().enumerate() {
        if low_mask[i] {
            points.push(SwingPoint {
                timestamp: bar.timestamp,
                price: bar.low,
                kind: SwingKind::Low,
            });
        }
        if high_mask[i] {
            points.push(SwingPoint {
                timestamp: bar.timestamp,
                price: bar.high,
                kind: SwingKind::High,
            });
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn v_shape_has_single_swing_low() {
        let series = [5.0, 4.0, 3.0, 2.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let mask = swing_lows(&series, 3, 3);
        let flagged: Vec<usize> = (0..series.len()).filter(|&i| mask[i]).collect();
        assert_eq!(flagged, vec![4]);
    }

    #[test]
    fn edges_are_never_flagged() {
        // Global minimum at index 0 and maximum at the last index.
        let series = [0.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 9.0];
        let lows = swing_lows(&series, 3, 3);
        let highs = swing_highs(&series, 3, 3);
        assert!(!lows[0]);
        assert!(!highs[7]);
        for i in 0..3 {
            assert!(!lows[i] && !highs[i]);
        }
        for i in 5..8 {
            assert!(!lows[i] && !highs[i]);
        }
    }

    #[test]
    fn ties_flag_every_tied_index() {
        let series = [3.0; 10];
        let mask = swing_lows(&series, 3, 3);
        assert_eq!(mask.iter().filter(|&&f| f).count(), 4); // indices 3..=6
    }

    #[test]
    fn short_series_has_no_swings() {
        assert!(swing_highs(&[1.0, 2.0, 1.0], 3, 3).iter().all(|f| !f));
    }

    #[test]
    fn inverted_v_has_single_swing_high() {
        let series = [1.0, 2.0, 3.0, 4.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        let mask = swing_highs(&series, 3, 3);
        assert!(mask[4]);
        assert_eq!(mask.iter().filter(|&&f| f).count(), 1);
    }

    #[test]
    fn swing_points_tag_kind_and_price() {
        let mut bars = make_bars(&[
            10.0, 9.0, 8.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 11.0, 10.0, 9.0, 8.0,
        ]);
        for bar in &mut bars {
            bar.low = bar.close - 0.5;
            bar.high = bar.close + 0.5;
        }
        let points = swing_points(&bars, 3, 3);
        let lows: Vec<&SwingPoint> = points.iter().filter(|p| p.kind == SwingKind::Low).collect();
        let highs: Vec<&SwingPoint> = points.iter().filter(|p| p.kind == SwingKind::High).collect();
        assert_eq!(lows.len(), 1);
        assert_eq!(lows[0].timestamp, bars[3].timestamp);
        assert_eq!(lows[0].price, bars[3].low);
        assert_eq!(highs.len(), 1);
        assert_eq!(highs[0].timestamp, bars[8].timestamp);
        assert_eq!(highs[0].price, bars[8].high);
    }
}
