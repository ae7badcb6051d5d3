//! Errors raised by the analysis pipeline

use thiserror::Error;
use ysochord_stats::StatsError;

/// Errors from dataset handling and the statistics it feeds
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    #[error("Column '{0}' is defined more than once")]
    DuplicateColumn(String),

    #[error("Column '{column}' has {got} values, dataset has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },

    #[error("Column '{column}' is {actual}, expected {expected}")]
    WrongColumnKind {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Missing value in categorical column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("Invalid variability thresholds: low_upper {low_upper} must be below medium_upper {medium_upper}")]
    InvalidThresholds { low_upper: f64, medium_upper: f64 },
}

/// Result alias for the analysis pipeline
pub type Result<T> = std::result::Result<T, AnalysisError>;
