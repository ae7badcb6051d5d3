//! Bootstrap Resampling
//!
//! Percentile confidence intervals for Cramér's V. Each resample redraws N
//! paired observations with replacement, rebuilds the contingency table from
//! the labels that occur in it, and recomputes V. Degenerate resamples are
//! skipped.
//!
//! Every resample owns its RNG, seeded from a per-resample seed drawn up front
//! from the master seed. Results are therefore identical whether the
//! resamples run serially or on the Rayon pool.

use crate::chi_squared::chi_squared_statistic;
use crate::contingency::PairedObservations;
use crate::effect_size::CramersVEstimator;
use crate::error::{Result, StatsError};
use crate::percentiles::{percentile_interval, sorted_copy};
use crate::{
    DEFAULT_BOOTSTRAP_ITERATIONS, DEFAULT_CONFIDENCE_LEVEL, DEFAULT_SEED, MIN_VALID_RESAMPLES,
};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;

/// Bootstrap configuration
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Number of resamples to draw (default: 1,000)
    pub iterations: usize,
    /// Confidence level (default: 0.95 for 95% CI)
    pub confidence_level: f64,
    /// Master seed for the resample stream
    pub seed: u64,
    /// Fewer valid resamples than this is an error (default: 50)
    pub min_valid_resamples: usize,
    /// Whether to use parallel computation
    pub parallel: bool,
    /// Estimator applied to the original table and to every resample
    pub estimator: CramersVEstimator,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_BOOTSTRAP_ITERATIONS,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            seed: DEFAULT_SEED,
            min_valid_resamples: MIN_VALID_RESAMPLES,
            parallel: true,
            estimator: CramersVEstimator::Uncorrected,
        }
    }
}

impl BootstrapConfig {
    /// Reject settings that can never yield an interval
    pub fn validate(&self) -> Result<()> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(StatsError::InvalidConfidenceLevel(self.confidence_level));
        }
        if self.iterations == 0 {
            return Err(StatsError::InvalidParameter(
                "bootstrap iterations must be positive".to_string(),
            ));
        }
        if self.min_valid_resamples == 0 {
            return Err(StatsError::InvalidParameter(
                "min_valid_resamples must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Confidence interval bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInterval {
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
    /// Confidence level the bounds were taken at
    pub level: f64,
}

impl ConfidenceInterval {
    /// Whether `value` lies within the bounds (inclusive)
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// upper - lower
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Result of bootstrap analysis
#[derive(Debug, Clone)]
pub struct BootstrapResult {
    /// V on the original table
    pub point_estimate: f64,
    /// Percentile interval, widened to include the point estimate if needed
    pub confidence_interval: ConfidenceInterval,
    /// Lower percentile bound before any widening
    pub percentile_lower: f64,
    /// Upper percentile bound before any widening
    pub percentile_upper: f64,
    /// Standard deviation of the valid bootstrap estimates
    pub standard_error: f64,
    /// Resamples that produced an estimate
    pub valid_resamples: usize,
    /// Degenerate resamples that were skipped
    pub skipped_resamples: usize,
    /// Warning message if any
    pub warning: Option<String>,
}

/// Bootstrap a confidence interval for Cramér's V
///
/// The point estimate is taken on the table built from all observations; a
/// degenerate original table is an error, not a skipped resample.
pub fn bootstrap_cramers_v(
    observations: &PairedObservations,
    config: &BootstrapConfig,
) -> Result<BootstrapResult> {
    config.validate()?;
    if observations.is_empty() {
        return Err(StatsError::EmptyInput("no paired observations to resample"));
    }

    let point_estimate = estimate_v(observations, 0..observations.len(), config.estimator)?;

    let estimates = if config.parallel {
        bootstrap_estimates_parallel(observations, config)
    } else {
        bootstrap_estimates_serial(observations, config)
    };

    let valid_resamples = estimates.len();
    let skipped_resamples = config.iterations - valid_resamples;
    tracing::debug!(
        iterations = config.iterations,
        valid_resamples,
        skipped_resamples,
        "bootstrap resampling finished"
    );

    if valid_resamples < config.min_valid_resamples {
        return Err(StatsError::InsufficientResamples {
            valid: valid_resamples,
            requested: config.iterations,
            min: config.min_valid_resamples,
        });
    }

    let sorted = sorted_copy(&estimates);
    let (percentile_lower, percentile_upper) =
        percentile_interval(&sorted, config.confidence_level);

    let mut warning = None;
    if point_estimate < percentile_lower || point_estimate > percentile_upper {
        tracing::warn!(
            point_estimate,
            lower = percentile_lower,
            upper = percentile_upper,
            "point estimate outside bootstrap percentile interval; widening"
        );
        warning = Some(format!(
            "point estimate {:.4} fell outside the percentile interval [{:.4}, {:.4}]",
            point_estimate, percentile_lower, percentile_upper
        ));
    }
    let lower = percentile_lower.min(point_estimate);
    let upper = percentile_upper.max(point_estimate);

    // Summed in sorted order so the result does not depend on scheduling
    let bootstrap_mean = sorted.iter().sum::<f64>() / valid_resamples as f64;
    let standard_error = (sorted
        .iter()
        .map(|x| (x - bootstrap_mean).powi(2))
        .sum::<f64>()
        / valid_resamples as f64)
        .sqrt();

    Ok(BootstrapResult {
        point_estimate,
        confidence_interval: ConfidenceInterval {
            lower,
            upper,
            level: config.confidence_level,
        },
        percentile_lower,
        percentile_upper,
        standard_error,
        valid_resamples,
        skipped_resamples,
        warning,
    })
}

/// Per-resample seeds drawn from the master stream
fn resample_seeds(config: &BootstrapConfig) -> Vec<u64> {
    let mut master = StdRng::seed_from_u64(config.seed);
    (0..config.iterations).map(|_| master.next_u64()).collect()
}

/// Generate bootstrap estimates using parallel iteration (Rayon)
fn bootstrap_estimates_parallel(
    observations: &PairedObservations,
    config: &BootstrapConfig,
) -> Vec<f64> {
    resample_seeds(config)
        .into_par_iter()
        .filter_map(|seed| resample_v(observations, seed, config.estimator))
        .collect()
}

/// Generate bootstrap estimates serially
fn bootstrap_estimates_serial(
    observations: &PairedObservations,
    config: &BootstrapConfig,
) -> Vec<f64> {
    resample_seeds(config)
        .into_iter()
        .filter_map(|seed| resample_v(observations, seed, config.estimator))
        .collect()
}

/// One resample; `None` when the resampled table is degenerate
fn resample_v(
    observations: &PairedObservations,
    seed: u64,
    estimator: CramersVEstimator,
) -> Option<f64> {
    let n = observations.len();
    let mut rng = StdRng::seed_from_u64(seed);
    let indices = (0..n).map(|_| rng.gen_range(0..n));
    estimate_v(observations, indices, estimator).ok()
}

fn estimate_v(
    observations: &PairedObservations,
    indices: impl IntoIterator<Item = usize>,
    estimator: CramersVEstimator,
) -> Result<f64> {
    let table = observations
        .table_from_indices(indices)
        .without_empty_margins();
    let chi2 = chi_squared_statistic(&table)?;
    let (rows, cols) = table.shape();
    estimator.estimate(chi2, table.total(), rows, cols)
}
