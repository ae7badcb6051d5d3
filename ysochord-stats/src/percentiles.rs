//! Percentile Computation
//!
//! Linear interpolation between nearest ranks, the same rule numpy uses by
//! default, so bootstrap bounds line up with the figures in the reports.

/// Sort a copy of `samples` ascending, NaN-safe
pub fn sorted_copy(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Compute a single percentile (0..=100) from unsorted samples
///
/// Returns NaN for empty input.
///
/// # Examples
///
/// ```
/// # use ysochord_stats::compute_percentile;
/// let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(compute_percentile(&samples, 50.0), 3.0);
/// assert_eq!(compute_percentile(&samples, 25.0), 2.0);
/// ```
pub fn compute_percentile(samples: &[f64], percentile: f64) -> f64 {
    percentile_of_sorted(&sorted_copy(samples), percentile)
}

/// Compute a percentile from samples that are already sorted ascending
pub fn percentile_of_sorted(sorted: &[f64], percentile: f64) -> f64 {
    match sorted.len() {
        0 => return f64::NAN,
        1 => return sorted[0],
        _ => {}
    }

    let n = sorted.len();
    let p = (percentile / 100.0).clamp(0.0, 1.0);

    let rank = p * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = (lower_idx + 1).min(n - 1);
    let fraction = rank - lower_idx as f64;

    sorted[lower_idx] + fraction * (sorted[upper_idx] - sorted[lower_idx])
}

/// Equal-tailed percentile interval for a confidence level in (0, 1)
///
/// For 0.95 this is the (2.5th, 97.5th) percentile pair.
pub fn percentile_interval(sorted: &[f64], confidence: f64) -> (f64, f64) {
    let alpha = (1.0 - confidence) / 2.0;
    (
        percentile_of_sorted(sorted, alpha * 100.0),
        percentile_of_sorted(sorted, (1.0 - alpha) * 100.0),
    )
}
