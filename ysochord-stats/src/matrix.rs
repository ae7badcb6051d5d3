//! Pairwise Effect-Size Matrix
//!
//! Cramér's V (or φ) laid out as a symmetric K×K matrix for heatmaps, either
//! between K categorical variables or between the K categories of one
//! variable. Point estimates only; intervals come from
//! [`crate::compute_association`] on the pairs that matter.

use crate::chi_squared::chi_squared_test;
use crate::contingency::{ContingencyTable, PairedObservations};
use crate::effect_size::{CramersVEstimator, phi_coefficient};
use crate::error::{Degeneracy, Result, StatsError};
use rayon::prelude::*;

/// Statistic placed in each off-diagonal cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EffectSizeMetric {
    /// Cramér's V with the configured estimator
    #[default]
    CramersV,
    /// sqrt(χ²/N)
    Phi,
}

impl std::fmt::Display for EffectSizeMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectSizeMetric::CramersV => write!(f, "cramers_v"),
            EffectSizeMetric::Phi => write!(f, "phi"),
        }
    }
}

/// What the rows and columns of an [`EffectSizeMatrix`] stand for
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MatrixAxis {
    /// One categorical variable per row and column
    #[default]
    Variables,
    /// Categories of `variable`; cell (i, j) is the effect size of
    /// `variable` against `against` on the observations in category i or j
    CategoryPairs {
        /// Variable whose categories label the axes
        variable: String,
        /// Variable each category pair is compared on
        against: String,
    },
}

/// Symmetric matrix of pairwise effect sizes
#[derive(Debug, Clone, PartialEq)]
pub struct EffectSizeMatrix {
    /// Statistic in the off-diagonal cells
    pub metric: EffectSizeMetric,
    /// What `labels` name
    pub axis: MatrixAxis,
    /// Variable or category labels in matrix order
    pub labels: Vec<String>,
    /// Row-major K×K values, 1.0 on the diagonal
    pub values: Vec<f64>,
}

impl EffectSizeMatrix {
    /// K
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    /// Value at (i, j)
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size() + j]
    }

    /// Value between two labels, `None` if either is unknown
    pub fn get_by_label(&self, first: &str, second: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == first)?;
        let j = self.labels.iter().position(|l| l == second)?;
        Some(self.get(i, j))
    }

    /// Nested `Vec` copy, row by row
    pub fn to_nested(&self) -> Vec<Vec<f64>> {
        let k = self.size();
        (0..k).map(|i| self.values[i * k..(i + 1) * k].to_vec()).collect()
    }
}

/// Compute the effect size of every variable pair.
///
/// Each pair is tabulated with its observed labels. A pair whose table is
/// degenerate fails the whole matrix.
pub fn effect_size_matrix<L: AsRef<str>, S: AsRef<str> + Sync>(
    labels: &[L],
    columns: &[&[S]],
    metric: EffectSizeMetric,
    estimator: CramersVEstimator,
) -> Result<EffectSizeMatrix> {
    if columns.is_empty() {
        return Err(StatsError::EmptyInput("no categorical columns"));
    }
    if labels.len() != columns.len() {
        return Err(StatsError::ShapeMismatch {
            expected: columns.len(),
            got: labels.len(),
        });
    }
    let len = columns[0].len();
    if let Some(bad) = columns.iter().find(|c| c.len() != len) {
        return Err(StatsError::ShapeMismatch {
            expected: len,
            got: bad.len(),
        });
    }

    let k = columns.len();
    let values = symmetric_values(k, |i, j| {
        let table = ContingencyTable::from_columns(columns[i], columns[j])?;
        pair_effect_size(&table, metric, estimator)
    })?;

    tracing::debug!(variables = k, %metric, "effect size matrix computed");

    Ok(EffectSizeMatrix {
        metric,
        axis: MatrixAxis::Variables,
        labels: labels.iter().map(|l| l.as_ref().to_string()).collect(),
        values,
    })
}

/// Compare every pair of row categories on the column variable.
///
/// Cell (i, j) keeps the observations whose row label is i or j, drops the
/// column categories neither of them uses, and measures the association of
/// the resulting 2×C table. Row labels without observations are left out of
/// the matrix. A pair whose two categories share a single column category
/// is degenerate and fails the whole matrix.
pub fn category_pair_effect_matrix(
    row_variable: &str,
    column_variable: &str,
    observations: &PairedObservations,
    metric: EffectSizeMetric,
    estimator: CramersVEstimator,
) -> Result<EffectSizeMatrix> {
    let row_sums = observations.table().row_sums();
    let present: Vec<usize> = (0..row_sums.len()).filter(|&i| row_sums[i] > 0).collect();
    if present.len() < 2 {
        return Err(StatsError::DegenerateTable(Degeneracy::TooFewRows(
            present.len(),
        )));
    }

    let k = present.len();
    let values = symmetric_values(k, |i, j| {
        let table = observations.table_for_rows(&[present[i], present[j]]);
        pair_effect_size(&table, metric, estimator)
    })?;

    tracing::debug!(
        row_variable,
        column_variable,
        categories = k,
        %metric,
        "category pair matrix computed"
    );

    let labels = observations.row_labels();
    Ok(EffectSizeMatrix {
        metric,
        axis: MatrixAxis::CategoryPairs {
            variable: row_variable.to_string(),
            against: column_variable.to_string(),
        },
        labels: present.iter().map(|&i| labels[i].clone()).collect(),
        values,
    })
}

/// Fill a K×K matrix with a unit diagonal, computing the upper triangle on
/// the Rayon pool and mirroring it
fn symmetric_values<F>(k: usize, cell: F) -> Result<Vec<f64>>
where
    F: Fn(usize, usize) -> Result<f64> + Sync,
{
    let pairs: Vec<(usize, usize)> = (0..k)
        .flat_map(|i| (i + 1..k).map(move |j| (i, j)))
        .collect();

    let cells: Vec<(usize, usize, f64)> = pairs
        .into_par_iter()
        .map(|(i, j)| cell(i, j).map(|value| (i, j, value)))
        .collect::<Result<_>>()?;

    let mut values = vec![0.0; k * k];
    for i in 0..k {
        values[i * k + i] = 1.0;
    }
    for (i, j, value) in cells {
        values[i * k + j] = value;
        values[j * k + i] = value;
    }
    Ok(values)
}

fn pair_effect_size(
    table: &ContingencyTable,
    metric: EffectSizeMetric,
    estimator: CramersVEstimator,
) -> Result<f64> {
    let chi = chi_squared_test(table)?;
    let (rows, cols) = table.shape();
    match metric {
        EffectSizeMetric::CramersV => estimator.estimate(chi.statistic, chi.n, rows, cols),
        EffectSizeMetric::Phi => Ok(phi_coefficient(chi.statistic, chi.n, (rows, cols))?.value),
    }
}
