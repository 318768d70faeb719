//! Feature frame: the truncated bar window plus every series the event
//! detectors read, all aligned to the same index.

use crate::domain::{Bar, OscillatorSet};
use crate::indicators::{Atr, Indicator, Vwap};

#[derive(Debug, Clone)]
pub struct FeatureFrame<'a> {
    pub bars: &'a [Bar],
    pub close: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub volume: Vec<f64>,
    pub vwap: Vec<f64>,
    pub atr: Vec<f64>,
    pub rsi_fast: Vec<f64>,
    pub rsi_slow: Vec<f64>,
    pub macd_hist: Vec<f64>,
}

impl<'a> FeatureFrame<'a> {
    /// Keep the last `lookback_bars` bars (at least one) and compute VWAP,
    /// ATR-14 and aligned oscillators over that window only.
    pub fn build(bars: &'a [Bar], oscillators: &OscillatorSet, lookback_bars: usize) -> Self {
        let keep = lookback_bars.max(1);
        let window = &bars[bars.len().saturating_sub(keep)..];
        Self {
            bars: window,
            close: window.iter().map(|b| b.close).collect(),
            high: window.iter().map(|b| b.high).collect(),
            low: window.iter().map(|b| b.low).collect(),
            volume: window.iter().map(|b| b.volume).collect(),
            vwap: Vwap.compute(window),
            atr: Atr::default().compute(window),
            rsi_fast: oscillators.rsi_fast.align_to(window),
            rsi_slow: oscillators.rsi_slow.align_to(window),
            macd_hist: oscillators.macd_hist.align_to(window),
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last_bar(&self) -> Option<&'a Bar> {
        self.bars.last()
    }
}

/// Value `k` bars before the last element; NaN when out of range.
pub fn back(series: &[f64], k: usize) -> f64 {
    series
        .len()
        .checked_sub(k + 1)
        .and_then(|i| series.get(i))
        .copied()
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn back_indexes_from_the_end() {
        let s = [1.0, 2.0, 3.0];
        assert_eq!(back(&s, 0), 3.0);
        assert_eq!(back(&s, 2), 1.0);
        assert!(back(&s, 3).is_nan());
        assert!(back(&[], 0).is_nan());
    }

    #[test]
    fn frame_truncates_to_lookback() {
        let closes: Vec<f64> = (0..200).map(|i| 100.0 + i as f64 * 0.01).collect();
        let bars = make_bars(&closes);
        let frame = FeatureFrame::build(&bars, &OscillatorSet::default(), 160);
        assert_eq!(frame.len(), 160);
        assert_eq!(frame.bars[0].timestamp, bars[40].timestamp);
        // VWAP is anchored at the window start, not the series start.
        assert_approx(frame.vwap[0], bars[40].typical_price(), DEFAULT_EPSILON);
        assert!(frame.rsi_fast.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn zero_lookback_keeps_last_bar() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        let frame = FeatureFrame::build(&bars, &OscillatorSet::default(), 0);
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.last_bar().map(|b| b.close), Some(3.0));
    }
}
