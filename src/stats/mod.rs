//! Trimmed statistics over repeated measurements.
//!
//! Each function sorts a copy of its input, discards `round(n * fraction)`
//! values from the extremes, and reduces what is left. An empty input reduces
//! to `0.0`.


/// Fraction trimmed from each end when reducing per-trial values.
pub const TRIAL_TRIM_FRACTION: f64 = 0.1;

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Number of values dropped from each end for `len` values.
///
/// Clamped so that a non-empty input always keeps at least one value.
fn trim_count(len: usize, fraction: f64) -> usize {
    if len == 0 || !fraction.is_finite() || fraction <= 0.0 {
        return 0;
    }
    let raw = (len as f64 * fraction).round();
    let k = if raw >= len as f64 { len } else { raw as usize };
    k.min(len.saturating_sub(1) / 2)
}

fn trimmed(sorted: &[f64], fraction: f64) -> &[f64] {
    let k = trim_count(sorted.len(), fraction);
    let end = sorted.len().saturating_sub(k);
    sorted.get(k..end).unwrap_or(&[])
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Arithmetic mean after trimming `fraction` of the values from each end.
#[must_use]
pub fn trimmed_mean(values: &[f64], fraction: f64) -> f64 {
    let sorted = sorted(values);
    mean(trimmed(&sorted, fraction))
}

/// Population standard deviation of the trimmed values.
///
/// Deviations are measured from [`trimmed_mean`] of the full input.
#[must_use]
pub fn trimmed_std_dev(values: &[f64], fraction: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let center = trimmed_mean(values, fraction);
    let sorted = sorted(values);
    let kept = trimmed(&sorted, fraction);
    let squared: Vec<f64> = kept
        .iter()
        .map(|value| {
            let delta = value - center;
            delta * delta
        })
        .collect();
    mean(&squared).sqrt()
}

/// Value at order statistic `n - k - 1` after a one-sided trim, rounded.
///
/// Approximates the `(1 - fraction)` percentile.
#[must_use]
pub fn trimmed_max(values: &[f64], fraction: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = sorted(values);
    let len = sorted.len();
    let k = if fraction.is_finite() && fraction > 0.0 {
        (len as f64 * fraction).round().min(len as f64) as usize
    } else {
        0
    };
    let index = len.saturating_sub(k).saturating_sub(1);
    sorted.get(index).copied().unwrap_or(0.0).round()
}
