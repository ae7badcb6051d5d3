//! Contingency Tables
//!
//! Cross-tabulates two paired categorical columns into an R×C count matrix.
//! Labels are encoded once into integer codes so that bootstrap resamples can
//! rebuild tables without touching strings.

use crate::error::{Result, StatsError};
use std::collections::{BTreeSet, HashMap};

/// Two categorical columns observed on the same N rows
#[derive(Debug, Clone)]
pub struct PairedObservations {
    row_labels: Vec<String>,
    col_labels: Vec<String>,
    row_codes: Vec<usize>,
    col_codes: Vec<usize>,
}

impl PairedObservations {
    /// Pair two columns, keeping only the labels that actually occur.
    ///
    /// Labels are ordered lexicographically on each axis.
    pub fn new<S: AsRef<str>, T: AsRef<str>>(rows: &[S], cols: &[T]) -> Result<Self> {
        check_lengths(rows.len(), cols.len())?;
        let row_labels = observed_labels(rows);
        let col_labels = observed_labels(cols);
        Self::encode(rows, cols, row_labels, col_labels)
    }

    /// Pair two columns against an explicit label domain.
    ///
    /// Domain labels that never occur become zero rows or columns, in the order
    /// given. A value outside the domain is rejected.
    pub fn with_domain<S: AsRef<str>, T: AsRef<str>, D: AsRef<str>, E: AsRef<str>>(
        rows: &[S],
        cols: &[T],
        row_domain: &[D],
        col_domain: &[E],
    ) -> Result<Self> {
        check_lengths(rows.len(), cols.len())?;
        let row_labels = dedup_domain(row_domain);
        let col_labels = dedup_domain(col_domain);
        Self::encode(rows, cols, row_labels, col_labels)
    }

    fn encode<S: AsRef<str>, T: AsRef<str>>(
        rows: &[S],
        cols: &[T],
        row_labels: Vec<String>,
        col_labels: Vec<String>,
    ) -> Result<Self> {
        let row_codes = encode_column(rows, &row_labels)?;
        let col_codes = encode_column(cols, &col_labels)?;
        Ok(Self {
            row_labels,
            col_labels,
            row_codes,
            col_codes,
        })
    }

    /// Number of paired observations (N)
    pub fn len(&self) -> usize {
        self.row_codes.len()
    }

    /// Whether there are no observations
    pub fn is_empty(&self) -> bool {
        self.row_codes.is_empty()
    }

    /// Row-axis labels in table order
    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    /// Column-axis labels in table order
    pub fn col_labels(&self) -> &[String] {
        &self.col_labels
    }

    /// Cross-tabulate every observation
    pub fn table(&self) -> ContingencyTable {
        self.table_from_indices(0..self.len())
    }

    /// Cross-tabulate only the observations whose row label is one of `rows`.
    ///
    /// Row and column categories left without observations are dropped.
    pub fn table_for_rows(&self, rows: &[usize]) -> ContingencyTable {
        let indices = (0..self.len()).filter(|&idx| rows.contains(&self.row_codes[idx]));
        self.table_from_indices(indices).without_empty_margins()
    }

    /// Cross-tabulate the observations at `indices` (repeats allowed)
    pub(crate) fn table_from_indices(&self, indices: impl IntoIterator<Item = usize>) -> ContingencyTable {
        let n_cols = self.col_labels.len();
        let mut counts = vec![0u64; self.row_labels.len() * n_cols];
        for idx in indices {
            counts[self.row_codes[idx] * n_cols + self.col_codes[idx]] += 1;
        }
        ContingencyTable {
            row_labels: self.row_labels.clone(),
            col_labels: self.col_labels.clone(),
            counts,
        }
    }
}

/// R×C matrix of non-negative counts with labeled axes
///
/// Marginals are always derived from the cells, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContingencyTable {
    row_labels: Vec<String>,
    col_labels: Vec<String>,
    /// Row-major cell counts
    counts: Vec<u64>,
}

impl ContingencyTable {
    /// Cross-tabulate two columns, keeping only observed labels.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ysochord_stats::ContingencyTable;
    /// let yso = ["ClassI", "ClassII", "ClassII", "FS"];
    /// let var = ["High", "Low", "Low", "Medium"];
    /// let table = ContingencyTable::from_columns(&yso, &var).unwrap();
    /// assert_eq!(table.shape(), (3, 3));
    /// assert_eq!(table.total(), 4);
    /// ```
    pub fn from_columns<S: AsRef<str>, T: AsRef<str>>(rows: &[S], cols: &[T]) -> Result<Self> {
        Ok(PairedObservations::new(rows, cols)?.table())
    }

    /// Build a table from an already tabulated count matrix
    pub fn from_counts<S: Into<String>, T: Into<String>>(
        row_labels: impl IntoIterator<Item = S>,
        col_labels: impl IntoIterator<Item = T>,
        counts: &[Vec<u64>],
    ) -> Result<Self> {
        let row_labels: Vec<String> = row_labels.into_iter().map(Into::into).collect();
        let col_labels: Vec<String> = col_labels.into_iter().map(Into::into).collect();

        if counts.len() != row_labels.len() {
            return Err(StatsError::ShapeMismatch {
                expected: row_labels.len(),
                got: counts.len(),
            });
        }
        let mut flat = Vec::with_capacity(row_labels.len() * col_labels.len());
        for row in counts {
            if row.len() != col_labels.len() {
                return Err(StatsError::ShapeMismatch {
                    expected: col_labels.len(),
                    got: row.len(),
                });
            }
            flat.extend_from_slice(row);
        }

        Ok(Self {
            row_labels,
            col_labels,
            counts: flat,
        })
    }

    /// Build a table from counts with generated labels `r0..`, `c0..`
    pub fn from_matrix(counts: &[Vec<u64>]) -> Result<Self> {
        let n_cols = counts.first().map_or(0, Vec::len);
        Self::from_counts(
            (0..counts.len()).map(|i| format!("r{}", i)),
            (0..n_cols).map(|j| format!("c{}", j)),
            counts,
        )
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.row_labels.len(), self.col_labels.len())
    }

    /// Number of row categories
    pub fn n_rows(&self) -> usize {
        self.row_labels.len()
    }

    /// Number of column categories
    pub fn n_cols(&self) -> usize {
        self.col_labels.len()
    }

    /// Row labels in table order
    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    /// Column labels in table order
    pub fn col_labels(&self) -> &[String] {
        &self.col_labels
    }

    /// Count at (row, column)
    pub fn get(&self, row: usize, col: usize) -> u64 {
        self.counts[row * self.n_cols() + col]
    }

    /// Counts of one row
    pub fn row(&self, row: usize) -> &[u64] {
        let n_cols = self.n_cols();
        &self.counts[row * n_cols..(row + 1) * n_cols]
    }

    /// Iterate rows as slices
    pub fn rows(&self) -> impl Iterator<Item = &[u64]> {
        (0..self.n_rows()).map(move |i| self.row(i))
    }

    /// Total count (N)
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Row marginals
    pub fn row_sums(&self) -> Vec<u64> {
        self.rows().map(|row| row.iter().sum()).collect()
    }

    /// Column marginals
    pub fn col_sums(&self) -> Vec<u64> {
        let mut sums = vec![0u64; self.n_cols()];
        for row in self.rows() {
            for (sum, &count) in sums.iter_mut().zip(row) {
                *sum += count;
            }
        }
        sums
    }

    /// Nested `Vec` copy of the counts, row by row
    pub fn to_nested(&self) -> Vec<Vec<u64>> {
        self.rows().map(<[u64]>::to_vec).collect()
    }

    /// Swap the two axes
    pub fn transpose(&self) -> Self {
        let (n_rows, n_cols) = self.shape();
        let mut counts = vec![0u64; self.counts.len()];
        for i in 0..n_rows {
            for j in 0..n_cols {
                counts[j * n_rows + i] = self.get(i, j);
            }
        }
        Self {
            row_labels: self.col_labels.clone(),
            col_labels: self.row_labels.clone(),
            counts,
        }
    }

    /// Drop rows and columns whose marginal is zero
    pub fn without_empty_margins(&self) -> Self {
        let row_sums = self.row_sums();
        let col_sums = self.col_sums();
        if row_sums.iter().all(|&s| s > 0) && col_sums.iter().all(|&s| s > 0) {
            return self.clone();
        }

        let keep_rows: Vec<usize> = (0..self.n_rows()).filter(|&i| row_sums[i] > 0).collect();
        let keep_cols: Vec<usize> = (0..self.n_cols()).filter(|&j| col_sums[j] > 0).collect();

        let mut counts = Vec::with_capacity(keep_rows.len() * keep_cols.len());
        for &i in &keep_rows {
            counts.extend(keep_cols.iter().map(|&j| self.get(i, j)));
        }
        Self {
            row_labels: keep_rows.iter().map(|&i| self.row_labels[i].clone()).collect(),
            col_labels: keep_cols.iter().map(|&j| self.col_labels[j].clone()).collect(),
            counts,
        }
    }

    /// Row profiles as floating point count vectors
    pub fn row_profiles(&self) -> Vec<Vec<f64>> {
        self.rows()
            .map(|row| row.iter().map(|&c| c as f64).collect())
            .collect()
    }
}

fn check_lengths(rows: usize, cols: usize) -> Result<()> {
    if rows != cols {
        return Err(StatsError::ShapeMismatch {
            expected: rows,
            got: cols,
        });
    }
    Ok(())
}

fn observed_labels<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.as_ref())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn dedup_domain<D: AsRef<str>>(domain: &[D]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    domain
        .iter()
        .map(|d| d.as_ref())
        .filter(|d| seen.insert(*d))
        .map(str::to_string)
        .collect()
}

fn encode_column<S: AsRef<str>>(values: &[S], labels: &[String]) -> Result<Vec<usize>> {
    let lookup: HashMap<&str, usize> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| (label.as_str(), i))
        .collect();
    values
        .iter()
        .map(|v| {
            lookup
                .get(v.as_ref())
                .copied()
                .ok_or_else(|| StatsError::UnknownLabel {
                    label: v.as_ref().to_string(),
                })
        })
        .collect()
}
