//! Association Statistics
//!
//! Runs the full categorical pipeline for one variable pair: contingency
//! table, chi-squared test, Cramér's V with its bootstrap interval, and φ.

use crate::bootstrap::{BootstrapConfig, ConfidenceInterval, bootstrap_cramers_v};
use crate::chi_squared::chi_squared_test;
use crate::contingency::{ContingencyTable, PairedObservations};
use crate::effect_size::{
    CramersVEstimator, EffectInterpretation, PhiCoefficient, interpret_cramers_v,
    phi_coefficient,
};
use crate::error::Result;

/// Caveat attached to an association result
#[derive(Debug, Clone, PartialEq)]
pub enum AssociationCaveat {
    /// Cells whose expected count is below 5
    SparseCells { below_five: usize, cells: usize },
    /// φ is computed on a table where it can exceed 1
    PhiUnbounded { rows: usize, cols: usize },
    /// The percentile interval had to be widened to contain V
    IntervalWidened(String),
}

impl std::fmt::Display for AssociationCaveat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssociationCaveat::SparseCells { below_five, cells } => write!(
                f,
                "{} of {} cells have expected count below 5; V may be inflated",
                below_five, cells
            ),
            AssociationCaveat::PhiUnbounded { rows, cols } => write!(
                f,
                "phi on a {}x{} table is not bounded by 1; secondary metric only",
                rows, cols
            ),
            AssociationCaveat::IntervalWidened(msg) => write!(f, "{}", msg),
        }
    }
}

/// Bootstrap bookkeeping kept next to the interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootstrapDiagnostics {
    /// Resamples that produced an estimate
    pub valid_resamples: usize,
    /// Degenerate resamples that were skipped
    pub skipped_resamples: usize,
    /// Standard deviation of the valid estimates
    pub standard_error: f64,
    /// Master seed of the resample stream
    pub seed: u64,
    /// Lower percentile bound before widening
    pub percentile_lower: f64,
    /// Upper percentile bound before widening
    pub percentile_upper: f64,
}

/// Association statistics for one (row variable, column variable) pair
#[derive(Debug, Clone)]
pub struct AssociationResult {
    /// Variable on the table rows
    pub row_variable: String,
    /// Variable on the table columns
    pub column_variable: String,
    /// Table the statistics were computed from
    pub table: ContingencyTable,
    /// Pearson χ², no continuity correction
    pub chi_squared: f64,
    /// (R-1)(C-1)
    pub degrees_of_freedom: usize,
    /// Upper-tail χ² probability
    pub p_value: f64,
    /// V on the full table
    pub cramers_v: f64,
    /// Bootstrap interval, always containing `cramers_v`
    pub cramers_v_interval: ConfidenceInterval,
    /// Estimator behind `cramers_v` and the interval
    pub estimator: CramersVEstimator,
    /// Secondary metric; see [`PhiCoefficient::is_bounded`]
    pub phi: PhiCoefficient,
    /// Verbal size of `cramers_v` on the fixed cut points
    pub interpretation: EffectInterpretation,
    /// Resample counts and spread
    pub bootstrap: BootstrapDiagnostics,
    /// Empty when nothing needs flagging
    pub caveats: Vec<AssociationCaveat>,
}

impl AssociationResult {
    /// Number of paired observations
    pub fn n(&self) -> u64 {
        self.table.total()
    }
}

/// Compute every association statistic for one variable pair.
///
/// Fails if the table is degenerate or the bootstrap gathers too few valid
/// resamples; no partial result is returned.
pub fn compute_association(
    row_variable: &str,
    column_variable: &str,
    observations: &PairedObservations,
    config: &BootstrapConfig,
) -> Result<AssociationResult> {
    let table = observations.table();
    let chi = chi_squared_test(&table)?;
    let (rows, cols) = table.shape();

    let bootstrap = bootstrap_cramers_v(observations, config)?;
    let cramers_v = bootstrap.point_estimate;
    let phi = phi_coefficient(chi.statistic, chi.n, (rows, cols))?;

    let mut caveats = Vec::new();
    if chi.sparse_cells > 0 {
        caveats.push(AssociationCaveat::SparseCells {
            below_five: chi.sparse_cells,
            cells: rows * cols,
        });
    }
    if !phi.is_bounded() {
        caveats.push(AssociationCaveat::PhiUnbounded { rows, cols });
    }
    if let Some(warning) = bootstrap.warning {
        caveats.push(AssociationCaveat::IntervalWidened(warning));
    }

    Ok(AssociationResult {
        row_variable: row_variable.to_string(),
        column_variable: column_variable.to_string(),
        chi_squared: chi.statistic,
        degrees_of_freedom: chi.degrees_of_freedom,
        p_value: chi.p_value,
        cramers_v,
        cramers_v_interval: bootstrap.confidence_interval,
        estimator: config.estimator,
        phi,
        interpretation: interpret_cramers_v(cramers_v),
        bootstrap: BootstrapDiagnostics {
            valid_resamples: bootstrap.valid_resamples,
            skipped_resamples: bootstrap.skipped_resamples,
            standard_error: bootstrap.standard_error,
            seed: config.seed,
            percentile_lower: bootstrap.percentile_lower,
            percentile_upper: bootstrap.percentile_upper,
        },
        caveats,
        table,
    })
}
