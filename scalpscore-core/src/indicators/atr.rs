//! Average True Range (ATR), simple rolling mean variant.
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|).
//! TR[0] has no previous close and falls back to high-low.
//! ATR[t] is the plain mean of TR over the last `period` bars, so the first
//! valid value sits at index period-1. Any NaN in the window yields NaN.

use super::Indicator;
use crate::domain::Bar;

/// Default ATR period used for stop placement.
pub const DEFAULT_ATR_PERIOD: usize = 14;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

impl Default for Atr {
    fn default() -> Self {
        Self::new(DEFAULT_ATR_PERIOD)
    }
}

/// Compute the True Range series from bars.
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let hl = (bar.high - bar.low).abs();
            if i == 0 {
                return hl;
            }
            let pc = bars[i - 1].close;
            if bar.high.is_nan() || bar.low.is_nan() || pc.is_nan() {
                f64::NAN
            } else {
                hl.max((bar.high - pc).abs()).max((bar.low - pc).abs())
            }
        })
        .collect()
}

pub fn atr(bars: &[Bar], period: usize) -> Vec<f64> {
    let tr = true_range(bars);
    let n = tr.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }
    for i in (period - 1)..n {
        let window = &tr[i + 1 - period..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = window.iter().sum::<f64>() / period as f64;
    }
    result
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        atr(bars, self.period)
    }
}
