//! Chi-Squared Independence Test
//!
//! Pearson's χ² over an R×C contingency table. No continuity correction is
//! applied, including for 2×2 tables.

use crate::contingency::ContingencyTable;
use crate::error::{Degeneracy, Result, StatsError};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Result of a chi-squared test of independence
#[derive(Debug, Clone)]
pub struct ChiSquaredResult {
    /// χ² statistic
    pub statistic: f64,
    /// (R-1)(C-1)
    pub degrees_of_freedom: usize,
    /// Upper-tail probability of the statistic
    pub p_value: f64,
    /// Total count N
    pub n: u64,
    /// Expected counts under independence, row-major
    pub expected: Vec<f64>,
    /// Number of cells with expected count below 5
    pub sparse_cells: usize,
}

impl ChiSquaredResult {
    /// Whether the test rejects independence at `alpha`
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Check that a table can carry expected counts.
pub fn check_table(table: &ContingencyTable) -> Result<()> {
    let (n_rows, n_cols) = table.shape();
    if n_rows < 2 {
        return Err(StatsError::DegenerateTable(Degeneracy::TooFewRows(n_rows)));
    }
    if n_cols < 2 {
        return Err(StatsError::DegenerateTable(Degeneracy::TooFewColumns(n_cols)));
    }
    if let Some(i) = table.row_sums().iter().position(|&s| s == 0) {
        return Err(StatsError::DegenerateTable(Degeneracy::EmptyRow(i)));
    }
    if let Some(j) = table.col_sums().iter().position(|&s| s == 0) {
        return Err(StatsError::DegenerateTable(Degeneracy::EmptyColumn(j)));
    }
    Ok(())
}

/// Compute only the χ² statistic.
///
/// Used on every bootstrap resample, where the p-value is not needed.
pub fn chi_squared_statistic(table: &ContingencyTable) -> Result<f64> {
    check_table(table)?;
    let row_sums = table.row_sums();
    let col_sums = table.col_sums();
    let n = table.total() as f64;

    let mut statistic = 0.0;
    for (i, &row_sum) in row_sums.iter().enumerate() {
        for (j, &col_sum) in col_sums.iter().enumerate() {
            let expected = row_sum as f64 * col_sum as f64 / n;
            let diff = table.get(i, j) as f64 - expected;
            statistic += diff * diff / expected;
        }
    }
    Ok(statistic)
}

/// Run the chi-squared test of independence
pub fn chi_squared_test(table: &ContingencyTable) -> Result<ChiSquaredResult> {
    let statistic = chi_squared_statistic(table)?;
    let (n_rows, n_cols) = table.shape();
    let degrees_of_freedom = (n_rows - 1) * (n_cols - 1);

    let row_sums = table.row_sums();
    let col_sums = table.col_sums();
    let n = table.total();
    let expected: Vec<f64> = row_sums
        .iter()
        .flat_map(|&r| {
            col_sums
                .iter()
                .map(move |&c| r as f64 * c as f64 / n as f64)
        })
        .collect();
    let sparse_cells = expected.iter().filter(|&&e| e < 5.0).count();

    Ok(ChiSquaredResult {
        statistic,
        degrees_of_freedom,
        p_value: upper_tail(statistic, degrees_of_freedom)?,
        n,
        expected,
        sparse_cells,
    })
}

/// Survival function of the χ² distribution
fn upper_tail(statistic: f64, degrees_of_freedom: usize) -> Result<f64> {
    if statistic <= 0.0 {
        return Ok(1.0);
    }
    let dist = ChiSquared::new(degrees_of_freedom as f64)
        .map_err(|e| StatsError::InvalidParameter(e.to_string()))?;
    Ok(dist.sf(statistic).clamp(0.0, 1.0))
}
