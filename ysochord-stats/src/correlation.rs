//! Correlation Matrices
//!
//! Pearson correlation over K numeric columns, optionally after z-score
//! standardization. Missing values are `NaN`; a row with a missing value in
//! any included column is dropped for the whole matrix, not per pair.
//!
//! The same routine serves two purposes: correlating genuine numeric
//! variables, and comparing the row profiles of a contingency table
//! ("distribution similarity"). The matrix does not record which one it is;
//! callers label it.

use crate::contingency::ContingencyTable;
use crate::error::{Result, StatsError};

/// Which standard deviation to divide by when standardizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdDevKind {
    /// Divide the sum of squares by N
    Population,
    /// Divide the sum of squares by N - 1
    #[default]
    Sample,
}

impl StdDevKind {
    /// Delta degrees of freedom
    pub fn ddof(self) -> usize {
        match self {
            StdDevKind::Population => 0,
            StdDevKind::Sample => 1,
        }
    }
}

/// Options for building a correlation matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationOptions {
    /// Z-score each column before correlating
    pub standardize: bool,
    /// Standard deviation used for every column of the matrix
    pub std_dev: StdDevKind,
}

impl Default for CorrelationOptions {
    fn default() -> Self {
        Self {
            standardize: true,
            std_dev: StdDevKind::Sample,
        }
    }
}

/// Arithmetic mean; NaN for empty input
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation of `values`
pub fn std_dev(values: &[f64], kind: StdDevKind) -> Result<f64> {
    let min = kind.ddof() + 1;
    if values.len() < min {
        return Err(StatsError::NotEnoughObservations {
            got: values.len(),
            min,
        });
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    Ok((ss / (values.len() - kind.ddof()) as f64).sqrt())
}

/// Z-score a column: subtract the mean, divide by the standard deviation.
///
/// A constant column is rejected with [`StatsError::ZeroVariance`] and an
/// infinite or NaN value with [`StatsError::NonFiniteValue`]; `column` only
/// names it in those errors.
pub fn standardize(column: &str, values: &[f64], kind: StdDevKind) -> Result<Vec<f64>> {
    if values.iter().any(|x| !x.is_finite()) {
        return Err(StatsError::NonFiniteValue {
            column: column.to_string(),
        });
    }
    let sd = std_dev(values, kind)?;
    if is_constant(values) || sd == 0.0 || !sd.is_finite() {
        return Err(StatsError::ZeroVariance {
            column: column.to_string(),
        });
    }
    let m = mean(values);
    Ok(values.iter().map(|x| (x - m) / sd).collect())
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Symmetric K×K Pearson correlation matrix
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    labels: Vec<String>,
    /// Row-major K×K coefficients
    values: Vec<f64>,
    rows_used: usize,
    rows_dropped: usize,
}

/// One off-diagonal entry of a correlation matrix
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationPair {
    /// Earlier label in matrix order
    pub first: String,
    /// Later label in matrix order
    pub second: String,
    /// Signed Pearson r
    pub coefficient: f64,
}

impl CorrelationMatrix {
    /// Variable labels in matrix order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// K
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    /// Coefficient at (i, j)
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size() + j]
    }

    /// Coefficient between two labeled variables
    pub fn get_by_label(&self, first: &str, second: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == first)?;
        let j = self.labels.iter().position(|l| l == second)?;
        Some(self.get(i, j))
    }

    /// Observations that survived missing-value removal
    pub fn rows_used(&self) -> usize {
        self.rows_used
    }

    /// Observations dropped for a missing value
    pub fn rows_dropped(&self) -> usize {
        self.rows_dropped
    }

    /// Nested `Vec` copy, row by row
    pub fn to_nested(&self) -> Vec<Vec<f64>> {
        let k = self.size();
        (0..k).map(|i| self.values[i * k..(i + 1) * k].to_vec()).collect()
    }

    /// Off-diagonal pairs with |r| above `threshold`, strongest first.
    ///
    /// Signs are preserved; chord edges are colored by them.
    pub fn strongest_pairs(&self, threshold: f64) -> Vec<CorrelationPair> {
        let k = self.size();
        let mut pairs: Vec<CorrelationPair> = (0..k)
            .flat_map(|i| ((i + 1)..k).map(move |j| (i, j)))
            .filter(|&(i, j)| self.get(i, j).abs() > threshold)
            .map(|(i, j)| CorrelationPair {
                first: self.labels[i].clone(),
                second: self.labels[j].clone(),
                coefficient: self.get(i, j),
            })
            .collect();
        pairs.sort_by(|a, b| b.coefficient.abs().total_cmp(&a.coefficient.abs()));
        pairs
    }
}

/// Build the Pearson correlation matrix of `columns`.
///
/// # Examples
///
/// ```
/// # use ysochord_stats::{CorrelationOptions, correlation_matrix};
/// let x = [1.0, 2.0, 3.0, 4.0];
/// let y = [2.0, 4.0, 6.0, 8.5];
/// let m = correlation_matrix(&["x", "y"], &[&x[..], &y[..]], CorrelationOptions::default())
///     .unwrap();
/// assert_eq!(m.get(0, 0), 1.0);
/// assert!(m.get(0, 1) > 0.99);
/// ```
pub fn correlation_matrix<S: AsRef<str>>(
    labels: &[S],
    columns: &[&[f64]],
    options: CorrelationOptions,
) -> Result<CorrelationMatrix> {
    if columns.is_empty() {
        return Err(StatsError::EmptyInput("no columns to correlate"));
    }
    if labels.len() != columns.len() {
        return Err(StatsError::ShapeMismatch {
            expected: columns.len(),
            got: labels.len(),
        });
    }
    let n = columns[0].len();
    if let Some(bad) = columns.iter().find(|c| c.len() != n) {
        return Err(StatsError::ShapeMismatch {
            expected: n,
            got: bad.len(),
        });
    }

    let complete: Vec<usize> = (0..n)
        .filter(|&row| columns.iter().all(|c| !c[row].is_nan()))
        .collect();
    let rows_used = complete.len();
    let rows_dropped = n - rows_used;
    if rows_dropped > 0 {
        tracing::debug!(rows_dropped, rows_used, "dropped rows with missing values");
    }
    if rows_used < 2 {
        return Err(StatsError::NotEnoughObservations {
            got: rows_used,
            min: 2,
        });
    }

    let subset: Vec<Vec<f64>> = columns
        .iter()
        .map(|c| complete.iter().map(|&row| c[row]).collect())
        .collect();

    // standardize() runs either way so constant columns are always rejected
    let mut centered = Vec::with_capacity(subset.len());
    for (label, values) in labels.iter().zip(&subset) {
        let z = standardize(label.as_ref(), values, options.std_dev)?;
        if options.standardize {
            centered.push(z);
        } else {
            let m = mean(values);
            centered.push(values.iter().map(|x| x - m).collect());
        }
    }

    let k = centered.len();
    let mut values = vec![0.0; k * k];
    for i in 0..k {
        values[i * k + i] = 1.0;
        for j in (i + 1)..k {
            let r = if options.standardize {
                dot(&centered[i], &centered[j]) / (rows_used - options.std_dev.ddof()) as f64
            } else {
                dot(&centered[i], &centered[j])
                    / (dot(&centered[i], &centered[i]) * dot(&centered[j], &centered[j])).sqrt()
            };
            let r = r.clamp(-1.0, 1.0);
            values[i * k + j] = r;
            values[j * k + i] = r;
        }
    }

    Ok(CorrelationMatrix {
        labels: labels.iter().map(|l| l.as_ref().to_string()).collect(),
        values,
        rows_used,
        rows_dropped,
    })
}

/// Correlate the row profiles of a contingency table.
///
/// Each row becomes a variable observed over the column categories. This is a
/// distribution-similarity measure, not a correlation between the two
/// categorical variables.
pub fn distribution_similarity(
    table: &ContingencyTable,
    options: CorrelationOptions,
) -> Result<CorrelationMatrix> {
    let profiles = table.row_profiles();
    let columns: Vec<&[f64]> = profiles.iter().map(Vec::as_slice).collect();
    correlation_matrix(table.row_labels(), &columns, options)
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
