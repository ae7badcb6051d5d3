//! Report Data Structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ysochord_stats::{
    AssociationResult, CategoryBalance, ContingencyTable, CorrelationMatrix, EffectSizeMatrix,
    MatrixAxis,
};

/// Current report schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Complete analysis report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Versions, timestamp and settings
    pub meta: ReportMeta,
    /// One record per analyzed variable pair
    pub associations: Vec<AssociationRecord>,
    /// Variable and category-pair heatmaps
    pub effect_size_matrices: Vec<EffectSizeMatrixRecord>,
    /// Correlation and distribution-similarity heatmaps
    pub correlations: Vec<CorrelationRecord>,
    /// Category frequency summaries
    pub balance: Vec<BalanceRecord>,
}

impl Report {
    /// Empty report stamped with the current time
    pub fn new(config: ReportConfig) -> Self {
        Self {
            meta: ReportMeta {
                schema_version: SCHEMA_VERSION,
                version: env!("CARGO_PKG_VERSION").to_string(),
                timestamp: Utc::now(),
                config,
            },
            associations: Vec::new(),
            effect_size_matrices: Vec::new(),
            correlations: Vec::new(),
            balance: Vec::new(),
        }
    }
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub schema_version: u32,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub config: ReportConfig,
}

/// Settings the report was produced with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub bootstrap_iterations: usize,
    pub confidence_level: f64,
    pub seed: u64,
    pub min_valid_resamples: usize,
    /// "uncorrected" or "bias-corrected"
    pub estimator: String,
    pub standardize: bool,
    /// "sample" or "population"
    pub std_dev: String,
    pub rare_category_threshold: usize,
}

/// Observed counts of one contingency table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContingencyRecord {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    /// counts[row][col]
    pub counts: Vec<Vec<u64>>,
    pub total: u64,
}

impl From<&ContingencyTable> for ContingencyRecord {
    fn from(table: &ContingencyTable) -> Self {
        Self {
            row_labels: table.row_labels().to_vec(),
            col_labels: table.col_labels().to_vec(),
            counts: table.to_nested(),
            total: table.total(),
        }
    }
}

/// Association statistics for one variable pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssociationRecord {
    pub row_variable: String,
    pub column_variable: String,
    pub n: u64,
    pub table: ContingencyRecord,
    pub chi_squared: f64,
    pub degrees_of_freedom: usize,
    pub p_value: f64,
    pub cramers_v: f64,
    pub cramers_v_ci_lower: f64,
    pub cramers_v_ci_upper: f64,
    pub ci_level: f64,
    /// Percentile bounds before widening to contain `cramers_v`
    pub percentile_lower: f64,
    pub percentile_upper: f64,
    pub estimator: String,
    pub interpretation: String,
    pub phi: f64,
    /// False when φ may exceed 1 for this table shape
    pub phi_bounded: bool,
    pub phi_caveat: Option<String>,
    pub bootstrap_standard_error: f64,
    pub valid_resamples: usize,
    pub skipped_resamples: usize,
    pub seed: u64,
    /// Sample-size and interval caveats
    pub notes: Vec<String>,
}

impl From<&AssociationResult> for AssociationRecord {
    fn from(result: &AssociationResult) -> Self {
        Self {
            row_variable: result.row_variable.clone(),
            column_variable: result.column_variable.clone(),
            n: result.n(),
            table: ContingencyRecord::from(&result.table),
            chi_squared: result.chi_squared,
            degrees_of_freedom: result.degrees_of_freedom,
            p_value: result.p_value,
            cramers_v: result.cramers_v,
            cramers_v_ci_lower: result.cramers_v_interval.lower,
            cramers_v_ci_upper: result.cramers_v_interval.upper,
            ci_level: result.cramers_v_interval.level,
            percentile_lower: result.bootstrap.percentile_lower,
            percentile_upper: result.bootstrap.percentile_upper,
            estimator: result.estimator.to_string(),
            interpretation: result.interpretation.to_string(),
            phi: result.phi.value,
            phi_bounded: result.phi.is_bounded(),
            phi_caveat: result.phi.caveat(),
            bootstrap_standard_error: result.bootstrap.standard_error,
            valid_resamples: result.bootstrap.valid_resamples,
            skipped_resamples: result.bootstrap.skipped_resamples,
            seed: result.bootstrap.seed,
            notes: result.caveats.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Pairwise effect-size heatmap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectSizeMatrixRecord {
    pub metric: String,
    pub axis: MatrixAxisRecord,
    pub labels: Vec<String>,
    /// values[i][j], symmetric with 1.0 on the diagonal
    pub values: Vec<Vec<f64>>,
}

impl From<&EffectSizeMatrix> for EffectSizeMatrixRecord {
    fn from(matrix: &EffectSizeMatrix) -> Self {
        Self {
            metric: matrix.metric.to_string(),
            axis: MatrixAxisRecord::from(&matrix.axis),
            labels: matrix.labels.clone(),
            values: matrix.to_nested(),
        }
    }
}

/// What the labels of an effect-size matrix name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatrixAxisRecord {
    /// One variable per row and column
    Variables,
    /// Categories of `variable`, each pair compared on `against`
    CategoryPairs { variable: String, against: String },
}

impl From<&MatrixAxis> for MatrixAxisRecord {
    fn from(axis: &MatrixAxis) -> Self {
        match axis {
            MatrixAxis::Variables => MatrixAxisRecord::Variables,
            MatrixAxis::CategoryPairs { variable, against } => MatrixAxisRecord::CategoryPairs {
                variable: variable.clone(),
                against: against.clone(),
            },
        }
    }
}

/// What a correlation matrix describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationKind {
    /// Columns are measured variables
    VariableCorrelation,
    /// Columns are per-category distributions over a shared axis
    DistributionSimilarity,
}

/// Correlation matrix with its labelling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationRecord {
    pub kind: CorrelationKind,
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
    pub rows_used: usize,
    pub rows_dropped: usize,
}

impl CorrelationRecord {
    /// Record `matrix` under the given kind
    pub fn new(kind: CorrelationKind, matrix: &CorrelationMatrix) -> Self {
        Self {
            kind,
            labels: matrix.labels().to_vec(),
            values: matrix.to_nested(),
            rows_used: matrix.rows_used(),
            rows_dropped: matrix.rows_dropped(),
        }
    }
}

/// Count of one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCountRecord {
    pub label: String,
    pub count: usize,
}

/// Frequency summary of one categorical variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub variable: String,
    pub total: usize,
    pub counts: Vec<CategoryCountRecord>,
    /// Percentage held by the largest category
    pub max_share: f64,
    pub imbalance_ratio: f64,
    pub rare_threshold: usize,
    pub rare_categories: Vec<String>,
}

impl BalanceRecord {
    /// Record `balance`, listing categories below `rare_threshold`
    pub fn new(variable: &str, balance: &CategoryBalance, rare_threshold: usize) -> Self {
        Self {
            variable: variable.to_string(),
            total: balance.total,
            counts: balance
                .counts
                .iter()
                .map(|c| CategoryCountRecord {
                    label: c.label.clone(),
                    count: c.count,
                })
                .collect(),
            max_share: balance.max_share(),
            imbalance_ratio: balance.imbalance_ratio(),
            rare_threshold,
            rare_categories: balance
                .rare_categories(rare_threshold)
                .into_iter()
                .map(|c| c.label.clone())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ysochord_stats::{
        BootstrapConfig, CorrelationOptions, CramersVEstimator, EffectSizeMetric,
        PairedObservations, category_balance, category_pair_effect_matrix, compute_association,
        correlation_matrix,
    };

    #[test]
    fn test_association_record() {
        let mut rows = Vec::new();
        let mut cols = Vec::new();
        for (r, c, n) in [("a", "x", 30), ("a", "y", 10), ("b", "x", 12), ("b", "y", 28)] {
            rows.extend(std::iter::repeat_n(r, n));
            cols.extend(std::iter::repeat_n(c, n));
        }
        let obs = PairedObservations::new(&rows, &cols).unwrap();
        let config = BootstrapConfig {
            iterations: 100,
            ..Default::default()
        };
        let result = compute_association("first", "second", &obs, &config).unwrap();
        let record = AssociationRecord::from(&result);

        assert_eq!(record.n, 80);
        assert_eq!(record.table.counts, vec![vec![30, 10], vec![12, 28]]);
        assert_eq!(record.table.row_labels, ["a", "b"]);
        assert!(record.phi_bounded);
        assert!(record.phi_caveat.is_none());
        assert_eq!(record.estimator, "uncorrected");
        assert!(record.cramers_v_ci_lower <= record.cramers_v);
        assert!(record.cramers_v <= record.cramers_v_ci_upper);
        assert_eq!(record.valid_resamples + record.skipped_resamples, 100);
        assert!(record.percentile_lower <= record.percentile_upper);
        assert!(record.cramers_v_ci_lower <= record.percentile_lower);
        assert!(record.percentile_upper <= record.cramers_v_ci_upper);
    }

    #[test]
    fn test_category_pair_matrix_record() {
        let obs = PairedObservations::new(
            &["a", "a", "b", "b", "c", "c"],
            &["x", "y", "x", "x", "y", "y"],
        )
        .unwrap();
        let matrix = category_pair_effect_matrix(
            "class",
            "variability",
            &obs,
            EffectSizeMetric::CramersV,
            CramersVEstimator::Uncorrected,
        )
        .unwrap();
        let record = EffectSizeMatrixRecord::from(&matrix);

        assert_eq!(record.labels, ["a", "b", "c"]);
        assert_eq!(
            record.axis,
            MatrixAxisRecord::CategoryPairs {
                variable: "class".to_string(),
                against: "variability".to_string(),
            }
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["axis"]["kind"], "category_pairs");
        assert_eq!(json["axis"]["variable"], "class");
    }

    #[test]
    fn test_correlation_record() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.5];
        let m = correlation_matrix(&["x", "y"], &[&x[..], &y[..]], CorrelationOptions::default()).unwrap();
        let record = CorrelationRecord::new(CorrelationKind::VariableCorrelation, &m);

        assert_eq!(record.labels, ["x", "y"]);
        assert_eq!(record.values.len(), 2);
        assert_eq!(record.values[0][0], 1.0);
        assert_eq!(record.rows_used, 4);
        assert_eq!(record.rows_dropped, 0);
    }

    #[test]
    fn test_balance_record() {
        let mut labels = vec!["common"; 40];
        labels.extend(["rare"; 5]);
        let balance = category_balance(&labels).unwrap();
        let record = BalanceRecord::new("class", &balance, 30);

        assert_eq!(record.total, 45);
        assert_eq!(record.counts[0].label, "common");
        assert_eq!(record.rare_categories, ["rare"]);
        assert!((record.imbalance_ratio - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_new_report_is_empty() {
        let report = Report::new(ReportConfig {
            bootstrap_iterations: 1000,
            confidence_level: 0.95,
            seed: 42,
            min_valid_resamples: 50,
            estimator: "uncorrected".to_string(),
            standardize: true,
            std_dev: "sample".to_string(),
            rare_category_threshold: 30,
        });
        assert_eq!(report.meta.schema_version, SCHEMA_VERSION);
        assert!(report.associations.is_empty());
        assert!(report.correlations.is_empty());
    }
}
