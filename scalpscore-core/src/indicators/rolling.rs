//! Trailing-window statistics evaluated at the last element of a series.
//!
//! The window always includes the last element. NaN samples are skipped.

/// Median of the last `window` values, or NaN when fewer than
/// `min_samples` non-NaN values are present.
pub fn trailing_median(values: &[f64], window: usize, min_samples: usize) -> f64 {
    let start = values.len().saturating_sub(window);
    let mut samples: Vec<f64> = values[start..]
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .collect();
    if samples.is_empty() || samples.len() < min_samples {
        return f64::NAN;
    }
    samples.sort_by(f64::total_cmp);
    let mid = samples.len() / 2;
    if samples.len() % 2 == 0 {
        (samples[mid - 1] + samples[mid]) / 2.0
    } else {
        samples[mid]
    }
}

/// Minimum of the last `window` values (NaN if none are defined).
pub fn trailing_min(values: &[f64], window: usize) -> f64 {
    let start = values.len().saturating_sub(window);
    values[start..]
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .reduce(f64::min)
        .unwrap_or(f64::NAN)
}

/// Maximum of the last `window` values (NaN if none are defined).
pub fn trailing_max(values: &[f64], window: usize) -> f64 {
    let start = values.len().saturating_sub(window);
    values[start..]
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .reduce(f64::max)
        .unwrap_or(f64::NAN)
}
