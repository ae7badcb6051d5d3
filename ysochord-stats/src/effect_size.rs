//! Effect Sizes for Categorical Association
//!
//! Cramér's V (uncorrected by default, with an opt-in bias correction) and
//! the Phi coefficient, both derived from a χ² statistic and the table shape.

use crate::error::{Degeneracy, Result, StatsError};

/// Which Cramér's V estimator to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CramersVEstimator {
    /// sqrt((χ²/N) / min(R-1, C-1))
    #[default]
    Uncorrected,
    /// Bergsma (2013) bias correction
    BiasCorrected,
}

impl CramersVEstimator {
    /// Estimate V for a table with the given statistic and shape
    pub fn estimate(self, chi2: f64, n: u64, rows: usize, cols: usize) -> Result<f64> {
        match self {
            CramersVEstimator::Uncorrected => cramers_v(chi2, n, rows, cols),
            CramersVEstimator::BiasCorrected => cramers_v_bias_corrected(chi2, n, rows, cols),
        }
    }
}

impl std::fmt::Display for CramersVEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CramersVEstimator::Uncorrected => write!(f, "uncorrected"),
            CramersVEstimator::BiasCorrected => write!(f, "bias-corrected"),
        }
    }
}

/// Uncorrected Cramér's V.
///
/// Inflated for small N or large R×C; always report it together with its
/// confidence interval.
pub fn cramers_v(chi2: f64, n: u64, rows: usize, cols: usize) -> Result<f64> {
    let min_dim = min_dimension(rows, cols)?;
    if n == 0 {
        return Err(StatsError::EmptyInput("contingency table has no observations"));
    }
    let v = ((chi2 / n as f64) / min_dim as f64).sqrt();
    Ok(v.clamp(0.0, 1.0))
}

/// Bias-corrected Cramér's V (Bergsma 2013)
pub fn cramers_v_bias_corrected(chi2: f64, n: u64, rows: usize, cols: usize) -> Result<f64> {
    min_dimension(rows, cols)?;
    if n < 2 {
        return Err(StatsError::NotEnoughObservations {
            got: n as usize,
            min: 2,
        });
    }

    let n = n as f64;
    let r = rows as f64;
    let k = cols as f64;
    let phi2 = chi2 / n;
    let phi2_corr = (phi2 - (k - 1.0) * (r - 1.0) / (n - 1.0)).max(0.0);
    let r_corr = r - (r - 1.0).powi(2) / (n - 1.0);
    let k_corr = k - (k - 1.0).powi(2) / (n - 1.0);
    let denom = (r_corr - 1.0).min(k_corr - 1.0);
    if denom <= 0.0 {
        return Err(StatsError::DegenerateTable(Degeneracy::NoCorrectedDimension));
    }
    Ok((phi2_corr / denom).sqrt().clamp(0.0, 1.0))
}

fn min_dimension(rows: usize, cols: usize) -> Result<usize> {
    if rows < 2 {
        return Err(StatsError::DegenerateTable(Degeneracy::TooFewRows(rows)));
    }
    if cols < 2 {
        return Err(StatsError::DegenerateTable(Degeneracy::TooFewColumns(cols)));
    }
    Ok((rows - 1).min(cols - 1))
}

/// Phi coefficient together with the table shape it came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhiCoefficient {
    /// sqrt(χ²/N)
    pub value: f64,
    /// (rows, columns) of the source table
    pub table_shape: (usize, usize),
}

impl PhiCoefficient {
    /// φ ≤ 1 holds only when one dimension of the table is 2
    pub fn is_bounded(&self) -> bool {
        self.table_shape.0.min(self.table_shape.1) <= 2
    }

    /// Caveat to surface next to φ, if any
    pub fn caveat(&self) -> Option<String> {
        if self.is_bounded() {
            return None;
        }
        let (r, c) = self.table_shape;
        Some(format!(
            "phi on a {}x{} table is not bounded by 1; use it only to cross-check Cramér's V",
            r, c
        ))
    }
}

/// Phi coefficient: sqrt(χ²/N)
pub fn phi_coefficient(chi2: f64, n: u64, table_shape: (usize, usize)) -> Result<PhiCoefficient> {
    if n == 0 {
        return Err(StatsError::EmptyInput("contingency table has no observations"));
    }
    let value = (chi2.max(0.0) / n as f64).sqrt();
    if value > 1.0 {
        tracing::warn!(
            phi = value,
            rows = table_shape.0,
            cols = table_shape.1,
            "phi coefficient exceeds 1"
        );
    }
    Ok(PhiCoefficient { value, table_shape })
}

/// Verbal label for the size of Cramér's V
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectInterpretation {
    /// V below 0.1
    Negligible,
    /// 0.1 to 0.3
    Weak,
    /// 0.3 to 0.5
    Moderate,
    /// 0.5 and above
    Strong,
}

impl std::fmt::Display for EffectInterpretation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectInterpretation::Negligible => write!(f, "negligible"),
            EffectInterpretation::Weak => write!(f, "weak"),
            EffectInterpretation::Moderate => write!(f, "moderate"),
            EffectInterpretation::Strong => write!(f, "strong"),
        }
    }
}

/// Cut points 0.1, 0.3 and 0.5 on V, whatever the table shape
pub fn interpret_cramers_v(v: f64) -> EffectInterpretation {
    classify(v, 1.0)
}

/// Cohen's cut points divided by sqrt(min(R-1, C-1)).
///
/// Same labels as [`interpret_cramers_v`] and identical on tables with a
/// dimension of 2; the bar drops as both dimensions grow.
pub fn interpret_cramers_v_scaled(v: f64, rows: usize, cols: usize) -> EffectInterpretation {
    let df_star = rows.min(cols).saturating_sub(1).max(1) as f64;
    classify(v, df_star.sqrt())
}

fn classify(v: f64, scale: f64) -> EffectInterpretation {
    if v < 0.1 / scale {
        EffectInterpretation::Negligible
    } else if v < 0.3 / scale {
        EffectInterpretation::Weak
    } else if v < 0.5 / scale {
        EffectInterpretation::Moderate
    } else {
        EffectInterpretation::Strong
    }
}
