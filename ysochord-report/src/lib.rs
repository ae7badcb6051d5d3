#![warn(missing_docs)]
//! ysochord Report - Serializable Analysis Results
//!
//! Turns association, effect-size, correlation and balance results into
//! plain serde records and renders them as JSON for the plotting layer.

mod json;
mod report;

pub use json::{ReportSchema, generate_json_report};
pub use report::{
    AssociationRecord, BalanceRecord, CategoryCountRecord, ContingencyRecord, CorrelationKind,
    CorrelationRecord, EffectSizeMatrixRecord, MatrixAxisRecord, Report, ReportConfig, ReportMeta,
    SCHEMA_VERSION,
};
