#![warn(missing_docs)]
//! ysochord Statistical Engine
//!
//! Categorical association and correlation statistics for the YSO chord
//! diagrams and heatmaps:
//! - Contingency tables over paired categorical columns
//! - Chi-squared test of independence (no continuity correction)
//! - Cramér's V and the Phi coefficient
//! - Seeded, parallel bootstrap percentile intervals for Cramér's V
//! - Pairwise effect-size matrices for heatmaps, across variables or across
//!   the categories of one variable
//! - Pearson correlation matrices over standardized columns
//! - Category balance and rare-category detection

mod association;
mod balance;
mod bootstrap;
mod chi_squared;
mod contingency;
mod correlation;
mod effect_size;
mod error;
mod matrix;
mod percentiles;

pub use association::{
    AssociationCaveat, AssociationResult, BootstrapDiagnostics, compute_association,
};
pub use balance::{CategoryBalance, CategoryCount, category_balance};
pub use bootstrap::{BootstrapConfig, BootstrapResult, ConfidenceInterval, bootstrap_cramers_v};
pub use chi_squared::{ChiSquaredResult, check_table, chi_squared_statistic, chi_squared_test};
pub use contingency::{ContingencyTable, PairedObservations};
pub use correlation::{
    CorrelationMatrix, CorrelationOptions, CorrelationPair, StdDevKind, correlation_matrix,
    distribution_similarity, mean, standardize, std_dev,
};
pub use effect_size::{
    CramersVEstimator, EffectInterpretation, PhiCoefficient, cramers_v,
    cramers_v_bias_corrected, interpret_cramers_v, interpret_cramers_v_scaled, phi_coefficient,
};
pub use error::{Degeneracy, Result, StatsError};
pub use matrix::{
    EffectSizeMatrix, EffectSizeMetric, MatrixAxis, category_pair_effect_matrix, effect_size_matrix,
};
pub use percentiles::{compute_percentile, percentile_interval, percentile_of_sorted, sorted_copy};

/// Default number of bootstrap resamples
pub const DEFAULT_BOOTSTRAP_ITERATIONS: usize = 1_000;

/// Default confidence level (95%)
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Default master seed for bootstrap resampling
pub const DEFAULT_SEED: u64 = 42;

/// Fewer valid resamples than this fails the bootstrap
pub const MIN_VALID_RESAMPLES: usize = 50;
