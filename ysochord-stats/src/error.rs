//! Error types shared by the statistics engine

use thiserror::Error;

/// Why a contingency table cannot support a chi-squared test or an effect size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    /// Fewer than two row categories
    TooFewRows(usize),
    /// Fewer than two column categories
    TooFewColumns(usize),
    /// A row marginal sums to zero
    EmptyRow(usize),
    /// A column marginal sums to zero
    EmptyColumn(usize),
    /// Bias correction left no usable degrees of freedom
    NoCorrectedDimension,
}

impl std::fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Degeneracy::TooFewRows(n) => write!(f, "{} row categories, need at least 2", n),
            Degeneracy::TooFewColumns(n) => {
                write!(f, "{} column categories, need at least 2", n)
            }
            Degeneracy::EmptyRow(i) => write!(f, "row {} has a zero marginal", i),
            Degeneracy::EmptyColumn(j) => write!(f, "column {} has a zero marginal", j),
            Degeneracy::NoCorrectedDimension => {
                write!(f, "bias-corrected dimension is not positive")
            }
        }
    }
}

/// Errors raised by the statistics engine
///
/// Every error is raised at the point of detection. Nothing in this crate
/// substitutes a fallback statistic for a failed computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// Paired inputs or labels disagree in length
    #[error("Shape mismatch: expected {expected} values, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    /// Table cannot support a test or an effect size
    #[error("Degenerate contingency table: {0}")]
    DegenerateTable(Degeneracy),

    /// Column is constant, so it cannot be standardized
    #[error("Column '{column}' has zero variance")]
    ZeroVariance { column: String },

    /// Column holds an infinite value
    #[error("Column '{column}' contains a non-finite value")]
    NonFiniteValue { column: String },

    /// Too many degenerate bootstrap resamples
    #[error("Only {valid} of {requested} bootstrap resamples were valid, need at least {min}")]
    InsufficientResamples {
        valid: usize,
        requested: usize,
        min: usize,
    },

    /// Nothing to compute on
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    /// Fewer observations than the statistic needs
    #[error("Not enough observations: got {got}, need at least {min}")]
    NotEnoughObservations { got: usize, min: usize },

    /// Value outside a declared label domain
    #[error("Label '{label}' is not part of the declared domain")]
    UnknownLabel { label: String },

    /// Confidence level outside (0, 1)
    #[error("Invalid confidence level: {0} (must be between 0 and 1)")]
    InvalidConfidenceLevel(f64),

    /// Setting that can never produce a result
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result alias for the statistics engine
pub type Result<T> = std::result::Result<T, StatsError>;
