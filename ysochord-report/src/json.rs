//! JSON Output

use crate::report::{Report, SCHEMA_VERSION};
use serde::{Deserialize, Serialize};

/// Schema information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSchema {
    /// Schema identifier
    pub schema: String,
    /// Schema version
    pub version: String,
}

impl ReportSchema {
    /// Schema of reports produced by this crate version
    pub fn current() -> Self {
        Self {
            schema: "ysochord-report".to_string(),
            version: SCHEMA_VERSION.to_string(),
        }
    }
}

/// Generate a prettified JSON report.
///
/// Non-finite floats serialize as `null`. Nothing is written to disk; the
/// caller decides where the document goes.
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CorrelationKind, CorrelationRecord, ReportConfig};

    fn config() -> ReportConfig {
        ReportConfig {
            bootstrap_iterations: 1000,
            confidence_level: 0.95,
            seed: 42,
            min_valid_resamples: 50,
            estimator: "uncorrected".to_string(),
            standardize: true,
            std_dev: "sample".to_string(),
            rare_category_threshold: 30,
        }
    }

    #[test]
    fn test_json_layout() {
        let mut report = Report::new(config());
        report.correlations.push(CorrelationRecord {
            kind: CorrelationKind::DistributionSimilarity,
            labels: vec!["ClassI".to_string(), "ClassII".to_string()],
            values: vec![vec![1.0, 0.8], vec![0.8, 1.0]],
            rows_used: 3,
            rows_dropped: 0,
        });

        let json = generate_json_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["meta"]["schema_version"], SCHEMA_VERSION);
        assert_eq!(value["meta"]["config"]["seed"], 42);
        assert_eq!(value["correlations"][0]["kind"], "distribution_similarity");
        assert!(value["associations"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_roundtrip_keeps_meta() {
        let report = Report::new(config());
        let json = generate_json_report(&report).unwrap();
        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.meta.config, report.meta.config);
        assert_eq!(parsed.meta.timestamp, report.meta.timestamp);
    }

    #[test]
    fn test_current_schema() {
        assert_eq!(ReportSchema::current().version, "1");
    }
}
