//! Immutable dataset handle
//!
//! A [`Dataset`] is built once through [`DatasetBuilder`] and then passed by
//! reference to every pipeline call. Columns sit behind an `Arc`, so clones
//! are cheap and derived datasets share the columns they did not change.

use crate::error::{AnalysisError, Result};
use std::collections::HashSet;
use std::sync::Arc;
use ysochord_stats::PairedObservations;

/// One named column of observations
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// One label per row, never missing
    Categorical(Arc<[String]>),
    /// One value per row, NaN marks a missing value
    Numeric(Arc<[f64]>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Categorical(values) => values.len(),
            Column::Numeric(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn kind(&self) -> &'static str {
        match self {
            Column::Categorical(_) => "categorical",
            Column::Numeric(_) => "numeric",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct NamedColumn {
    name: String,
    data: Column,
}

/// Tabular dataset of named categorical and numeric columns
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Arc<[NamedColumn]>,
    n_rows: usize,
}

impl Dataset {
    /// Start building a dataset
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::default()
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.data)
            .ok_or_else(|| AnalysisError::UnknownColumn(name.to_string()))
    }

    /// Labels of a categorical column
    pub fn categorical(&self, name: &str) -> Result<&[String]> {
        match self.column(name)? {
            Column::Categorical(values) => Ok(values),
            other => Err(AnalysisError::WrongColumnKind {
                column: name.to_string(),
                expected: "categorical",
                actual: other.kind(),
            }),
        }
    }

    /// Values of a numeric column
    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        match self.column(name)? {
            Column::Numeric(values) => Ok(values),
            other => Err(AnalysisError::WrongColumnKind {
                column: name.to_string(),
                expected: "numeric",
                actual: other.kind(),
            }),
        }
    }

    /// Pair two categorical columns row by row
    pub fn paired(&self, row_variable: &str, column_variable: &str) -> Result<PairedObservations> {
        let rows = self.categorical(row_variable)?;
        let cols = self.categorical(column_variable)?;
        Ok(PairedObservations::new(rows, cols)?)
    }

    /// New dataset with one extra categorical column derived from a numeric
    /// amplitude column. `self` is left untouched.
    pub fn with_variability_category(
        &self,
        amplitude: &str,
        target: &str,
        thresholds: &VariabilityThresholds,
    ) -> Result<Dataset> {
        thresholds.validate()?;
        if self.has_column(target) {
            return Err(AnalysisError::DuplicateColumn(target.to_string()));
        }

        let labels = self
            .numeric(amplitude)?
            .iter()
            .enumerate()
            .map(|(row, &value)| {
                categorize_variability(value, thresholds)
                    .map(|category| category.to_string())
                    .ok_or_else(|| AnalysisError::MissingValue {
                        column: amplitude.to_string(),
                        row,
                    })
            })
            .collect::<Result<Vec<String>>>()?;

        let mut columns = self.columns.to_vec();
        columns.push(NamedColumn {
            name: target.to_string(),
            data: Column::Categorical(labels.into()),
        });
        Ok(Dataset {
            columns: columns.into(),
            n_rows: self.n_rows,
        })
    }
}

/// Collects columns and checks them into a [`Dataset`]
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    columns: Vec<NamedColumn>,
}

impl DatasetBuilder {
    /// Add a categorical column
    pub fn categorical<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        self.columns.push(NamedColumn {
            name: name.to_string(),
            data: Column::Categorical(values.into()),
        });
        self
    }

    /// Add a numeric column; NaN marks missing values
    pub fn numeric<I>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let values: Vec<f64> = values.into_iter().collect();
        self.columns.push(NamedColumn {
            name: name.to_string(),
            data: Column::Numeric(values.into()),
        });
        self
    }

    /// Validate names, lengths and categorical completeness
    pub fn build(self) -> Result<Dataset> {
        let n_rows = self.columns.first().map(|c| c.data.len()).unwrap_or(0);

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(AnalysisError::DuplicateColumn(column.name.clone()));
            }
            if column.data.len() != n_rows {
                return Err(AnalysisError::LengthMismatch {
                    column: column.name.clone(),
                    expected: n_rows,
                    got: column.data.len(),
                });
            }
            if let Column::Categorical(values) = &column.data {
                if let Some(row) = values.iter().position(|v| v.trim().is_empty()) {
                    return Err(AnalysisError::MissingValue {
                        column: column.name.clone(),
                        row,
                    });
                }
            }
        }

        tracing::debug!(
            rows = n_rows,
            columns = self.columns.len(),
            "dataset built"
        );

        Ok(Dataset {
            columns: self.columns.into(),
            n_rows,
        })
    }
}

/// Amplitude thresholds separating the variability categories
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariabilityThresholds {
    /// Low below this
    pub low_upper: f64,
    /// Medium below this, High at or above
    pub medium_upper: f64,
}

impl Default for VariabilityThresholds {
    fn default() -> Self {
        Self {
            low_upper: 0.2,
            medium_upper: 0.5,
        }
    }
}

impl VariabilityThresholds {
    pub fn validate(&self) -> Result<()> {
        let ordered = self.low_upper.is_finite()
            && self.medium_upper.is_finite()
            && self.low_upper < self.medium_upper;
        if !ordered {
            return Err(AnalysisError::InvalidThresholds {
                low_upper: self.low_upper,
                medium_upper: self.medium_upper,
            });
        }
        Ok(())
    }
}

/// Variability category of a light curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VariabilityCategory {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for VariabilityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariabilityCategory::Low => write!(f, "Low"),
            VariabilityCategory::Medium => write!(f, "Medium"),
            VariabilityCategory::High => write!(f, "High"),
        }
    }
}

/// Categorize one amplitude; `None` for NaN
pub fn categorize_variability(
    amplitude: f64,
    thresholds: &VariabilityThresholds,
) -> Option<VariabilityCategory> {
    if amplitude.is_nan() {
        None
    } else if amplitude < thresholds.low_upper {
        Some(VariabilityCategory::Low)
    } else if amplitude < thresholds.medium_upper {
        Some(VariabilityCategory::Medium)
    } else {
        Some(VariabilityCategory::High)
    }
}
