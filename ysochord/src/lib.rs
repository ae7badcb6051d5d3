#![warn(missing_docs)]
//! # ysochord
//!
//! Association statistics behind the YSO chord diagrams and heatmaps.
//!
//! ysochord turns a tabular catalog of young stellar objects into the
//! numbers a plotting layer needs:
//! - **Associations**: contingency table, chi-squared test, Cramér's V with a
//!   seeded bootstrap interval, and φ for each categorical variable pair
//! - **Heatmaps**: pairwise Cramér's V matrices, across variables or across
//!   the categories of one variable, and Pearson correlation matrices over
//!   z-scored numeric columns
//! - **Sample caveats**: sparse cells, rare categories, class imbalance
//! - **Reports**: serde records and JSON output
//!
//! ## Quick Start
//!
//! ```
//! use ysochord::prelude::*;
//!
//! let mut classes = Vec::new();
//! let mut variability = Vec::new();
//! for (class, level, n) in [
//!     ("ClassI", "High", 40),
//!     ("ClassI", "Low", 10),
//!     ("ClassII", "High", 12),
//!     ("ClassII", "Low", 38),
//! ] {
//!     classes.extend(std::iter::repeat_n(class, n));
//!     variability.extend(std::iter::repeat_n(level, n));
//! }
//!
//! let dataset = Dataset::builder()
//!     .categorical("YSO_CLASS", classes)
//!     .categorical("Variability", variability)
//!     .build()
//!     .unwrap();
//!
//! let config = AnalysisConfig::default();
//! let result = analyze_pair(&dataset, "YSO_CLASS", "Variability", &config).unwrap();
//! assert_eq!(result.degrees_of_freedom, 1);
//! assert!(result.cramers_v_interval.contains(result.cramers_v));
//! ```

mod config;
mod dataset;
mod error;
mod pipeline;

pub use config::{
    AnalysisConfig, BootstrapSettings, CONFIG_FILE_NAME, CorrelationSettings, EffectSizeSettings,
    QualitySettings, StdDevMode, VariabilitySettings,
};
pub use dataset::{
    Column, Dataset, DatasetBuilder, VariabilityCategory, VariabilityThresholds,
    categorize_variability,
};
pub use error::{AnalysisError, Result};
pub use pipeline::{
    ReportRequest, analyze_pair, analyze_pairs, build_report, category_balance,
    category_pair_effect_matrix, correlate, distribution_similarity, effect_size_matrix,
};

// Re-export stats
pub use ysochord_stats::{
    AssociationCaveat, AssociationResult, BootstrapConfig, CategoryBalance, ConfidenceInterval,
    ContingencyTable, CorrelationMatrix, CorrelationPair, CramersVEstimator, EffectInterpretation,
    EffectSizeMatrix, EffectSizeMetric, MatrixAxis, PairedObservations, PhiCoefficient,
    StatsError,
};

// Re-export report
pub use ysochord_report::{CorrelationKind, Report, generate_json_report};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        AnalysisConfig, AnalysisError, CorrelationKind, Dataset, EffectSizeMetric, ReportRequest,
        analyze_pair, build_report, category_pair_effect_matrix, correlate, effect_size_matrix,
        generate_json_report,
    };
}
