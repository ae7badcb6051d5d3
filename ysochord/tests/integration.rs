//! Integration tests for ysochord
//!
//! These tests run the full pipeline over datasets expanded from the
//! contingency tables of the YSO catalog.

use ysochord::prelude::*;
use ysochord::{
    AssociationCaveat, EffectInterpretation, StatsError, analyze_pairs, distribution_similarity,
};

const CLASS_BY_VARIABILITY: [[u64; 3]; 5] = [
    [575, 684, 830],
    [2732, 2777, 7248],
    [382, 567, 710],
    [1209, 730, 2131],
    [9, 48, 22],
];

const CURVE_BY_VARIABILITY: [[u64; 3]; 7] = [
    [142, 13, 73],
    [209, 76, 301],
    [68, 11, 43],
    [2669, 1, 1433],
    [87, 12, 116],
    [1635, 4674, 8901],
    [97, 19, 74],
];

/// Expand a count table into one row per observation
fn expand<const R: usize, const C: usize>(
    counts: &[[u64; C]; R],
    row_name: &str,
    col_name: &str,
) -> Dataset {
    let mut rows = Vec::new();
    let mut cols = Vec::new();
    for (i, row) in counts.iter().enumerate() {
        for (j, &n) in row.iter().enumerate() {
            for _ in 0..n {
                rows.push(format!("r{}", i));
                cols.push(format!("c{}", j));
            }
        }
    }
    Dataset::builder()
        .categorical(row_name, rows)
        .categorical(col_name, cols)
        .build()
        .unwrap()
}

fn config_with(iterations: usize) -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.bootstrap.iterations = iterations;
    config
}

/// YSO class × variability reference values
#[test]
fn test_class_by_variability() {
    let dataset = expand(&CLASS_BY_VARIABILITY, "YSO_CLASS", "Variability");
    let result = analyze_pair(&dataset, "YSO_CLASS", "Variability", &config_with(200)).unwrap();

    assert_eq!(result.n(), 20654);
    assert_eq!(result.degrees_of_freedom, 8);
    assert!((result.chi_squared - 530.05).abs() < 0.01);
    assert!((result.cramers_v - 0.1133).abs() < 1e-4);
    assert!(result.p_value < 1e-10);

    let ci = result.cramers_v_interval;
    assert!(ci.lower <= result.cramers_v && result.cramers_v <= ci.upper);
    assert!(ci.lower > 0.09 && ci.upper < 0.14);
    assert_eq!(result.interpretation, EffectInterpretation::Weak);

    // Table rebuilt from the observations matches the counts
    let expected: Vec<Vec<u64>> = CLASS_BY_VARIABILITY.iter().map(|r| r.to_vec()).collect();
    assert_eq!(result.table.to_nested(), expected);
}

/// Light curve × variability reference values
#[test]
fn test_curve_by_variability() {
    let dataset = expand(&CURVE_BY_VARIABILITY, "LC_TYPE", "Variability");
    let result = analyze_pair(&dataset, "LC_TYPE", "Variability", &config_with(200)).unwrap();

    assert_eq!(result.degrees_of_freedom, 12);
    assert!((result.chi_squared - 6144.28).abs() < 0.01);
    assert!((result.cramers_v - 0.3857).abs() < 1e-4);
    assert_eq!(result.interpretation, EffectInterpretation::Moderate);

    // 7×3: φ is not bounded by 1 and is flagged
    assert!(!result.phi.is_bounded());
    assert!(
        result
            .caveats
            .iter()
            .any(|c| matches!(c, AssociationCaveat::PhiUnbounded { rows: 7, cols: 3 }))
    );
    // The 1-count cell keeps expected counts well above 5
    assert!(
        !result
            .caveats
            .iter()
            .any(|c| matches!(c, AssociationCaveat::SparseCells { .. }))
    );
}

/// Cramér's V between every two YSO classes, measured on variability
#[test]
fn test_class_pair_heatmap() {
    let dataset = expand(&CLASS_BY_VARIABILITY, "YSO_CLASS", "Variability");
    let m = category_pair_effect_matrix(
        &dataset,
        "YSO_CLASS",
        "Variability",
        EffectSizeMetric::CramersV,
        &AnalysisConfig::default(),
    )
    .unwrap();

    assert_eq!(m.labels, ["r0", "r1", "r2", "r3", "r4"]);
    for i in 0..5 {
        assert_eq!(m.get(i, i), 1.0);
        for j in 0..5 {
            assert_eq!(m.get(i, j), m.get(j, i));
        }
    }
    assert!((m.get_by_label("r0", "r1").unwrap() - 0.1215).abs() < 1e-4);
    assert!((m.get_by_label("r0", "r2").unwrap() - 0.0517).abs() < 1e-4);
    assert!((m.get_by_label("r2", "r3").unwrap() - 0.1763).abs() < 1e-4);
    assert!((m.get_by_label("r3", "r4").unwrap() - 0.1502).abs() < 1e-4);

    // Each pair matches a direct two-class analysis
    let pair = expand(&[CLASS_BY_VARIABILITY[1], CLASS_BY_VARIABILITY[4]], "a", "b");
    let direct = analyze_pair(&pair, "a", "b", &config_with(100)).unwrap();
    assert!((m.get_by_label("r1", "r4").unwrap() - direct.cramers_v).abs() < 1e-12);
}

/// Same seed and data give bit-identical intervals, serial or parallel
#[test]
fn test_bootstrap_is_reproducible() {
    let dataset = expand(&CLASS_BY_VARIABILITY, "YSO_CLASS", "Variability");

    let parallel = config_with(120);
    let mut serial = config_with(120);
    serial.bootstrap.parallel = false;

    let a = analyze_pair(&dataset, "YSO_CLASS", "Variability", &parallel).unwrap();
    let b = analyze_pair(&dataset, "YSO_CLASS", "Variability", &parallel).unwrap();
    let c = analyze_pair(&dataset, "YSO_CLASS", "Variability", &serial).unwrap();

    for other in [&b, &c] {
        assert_eq!(
            a.cramers_v_interval.lower.to_bits(),
            other.cramers_v_interval.lower.to_bits()
        );
        assert_eq!(
            a.cramers_v_interval.upper.to_bits(),
            other.cramers_v_interval.upper.to_bits()
        );
        assert_eq!(
            a.bootstrap.standard_error.to_bits(),
            other.bootstrap.standard_error.to_bits()
        );
    }
}

/// Perfectly independent table: no association, p = 1
#[test]
fn test_independent_table() {
    let dataset = expand(&[[10, 10], [10, 10]], "a", "b");
    let result = analyze_pair(&dataset, "a", "b", &config_with(200)).unwrap();

    assert_eq!(result.chi_squared, 0.0);
    assert_eq!(result.cramers_v, 0.0);
    assert_eq!(result.phi.value, 0.0);
    assert!((result.p_value - 1.0).abs() < 1e-12);
    assert_eq!(result.cramers_v_interval.lower, 0.0);
}

#[test]
fn test_degenerate_pair_is_an_error() {
    let dataset = expand(&[[5, 7, 9]], "a", "b");
    let err = analyze_pair(&dataset, "a", "b", &config_with(200)).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Stats(StatsError::DegenerateTable(_))
    ));

    let results = analyze_pairs(&dataset, &[("a", "b"), ("b", "missing")], &config_with(200));
    assert!(results.iter().all(Result::is_err));
}

#[test]
fn test_constant_numeric_column() {
    let dataset = Dataset::builder()
        .numeric("w1", [1.0, 2.0, 3.0, 4.0])
        .numeric("sdss_flag", [1.0, 1.0, 1.0, 1.0])
        .build()
        .unwrap();
    let err = correlate(&dataset, &["w1", "sdss_flag"], &AnalysisConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Stats(StatsError::ZeroVariance { ref column }) if column == "sdss_flag"
    ));
}

#[test]
fn test_missing_values_dropped_row_wise() {
    let dataset = Dataset::builder()
        .numeric("mag", [10.0, 11.0, f64::NAN, 13.0, 12.5])
        .numeric("amp", [0.1, 0.3, 0.2, f64::NAN, 0.6])
        .numeric("period", [3.0, 5.0, 4.0, 9.0, 8.0])
        .build()
        .unwrap();
    let m = correlate(&dataset, &["mag", "amp", "period"], &AnalysisConfig::default()).unwrap();

    assert_eq!(m.rows_used(), 3);
    assert_eq!(m.rows_dropped(), 2);
    for i in 0..3 {
        assert_eq!(m.get(i, i), 1.0);
    }
}

#[test]
fn test_derived_variability_feeds_association() {
    let n = 120;
    let classes: Vec<&str> = (0..n)
        .map(|i| if i % 3 == 0 { "ClassI" } else { "ClassII" })
        .collect();
    // ClassI sources vary more
    let amplitudes: Vec<f64> = (0..n)
        .map(|i| if i % 3 == 0 { 0.3 + 0.01 * (i % 40) as f64 } else { 0.02 * (i % 20) as f64 })
        .collect();

    let config = config_with(200);
    let dataset = Dataset::builder()
        .categorical("YSO_CLASS", classes)
        .numeric("amplitude", amplitudes)
        .build()
        .unwrap()
        .with_variability_category("amplitude", "Variability", &config.variability_thresholds())
        .unwrap();

    let result = analyze_pair(&dataset, "YSO_CLASS", "Variability", &config).unwrap();
    assert_eq!(result.table.row_labels(), ["ClassI", "ClassII"]);
    assert!(result.cramers_v > 0.3);
}

#[test]
fn test_json_report() {
    let dataset = expand(&CLASS_BY_VARIABILITY, "YSO_CLASS", "Variability");
    let request = ReportRequest {
        pairs: vec![("YSO_CLASS", "Variability")],
        heatmap_variables: vec!["YSO_CLASS", "Variability"],
        category_pair_heatmaps: vec![("YSO_CLASS", "Variability")],
        similarity_pairs: vec![("YSO_CLASS", "Variability")],
        balance_variables: vec!["YSO_CLASS"],
        ..Default::default()
    };
    let report = build_report(&dataset, &request, &config_with(100)).unwrap();
    let json = generate_json_report(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let association = &value["associations"][0];
    assert_eq!(association["degrees_of_freedom"], 8);
    assert_eq!(association["n"], 20654);
    assert_eq!(association["phi_bounded"], false);
    assert_eq!(value["effect_size_matrices"][0]["metric"], "cramers_v");
    assert_eq!(value["effect_size_matrices"][0]["axis"]["kind"], "variables");
    assert_eq!(value["effect_size_matrices"][1]["axis"]["kind"], "category_pairs");
    assert_eq!(value["effect_size_matrices"][1]["labels"].as_array().unwrap().len(), 5);
    assert_eq!(association["interpretation"], "weak");
    assert!(association["percentile_lower"].as_f64().unwrap() > 0.09);
    assert_eq!(value["correlations"][0]["kind"], "distribution_similarity");
    // Smallest class still has 79 sources, above the default threshold of 30
    assert_eq!(value["balance"][0]["counts"][0]["label"], "r1");
    assert!(value["balance"][0]["rare_categories"].as_array().unwrap().is_empty());
    assert_eq!(value["meta"]["config"]["bootstrap_iterations"], 100);
}

/// Row profiles of the class table correlated across the variability levels
#[test]
fn test_class_distribution_similarity() {
    let dataset = expand(&CLASS_BY_VARIABILITY, "YSO_CLASS", "Variability");
    let m = distribution_similarity(&dataset, "YSO_CLASS", "Variability", &AnalysisConfig::default())
        .unwrap();

    assert_eq!(m.labels(), ["r0", "r1", "r2", "r3", "r4"]);
    assert_eq!(m.rows_used(), 3);
    for i in 0..5 {
        assert_eq!(m.get(i, i), 1.0);
        for j in 0..5 {
            assert_eq!(m.get(i, j), m.get(j, i));
            assert!((-1.0..=1.0).contains(&m.get(i, j)));
        }
    }
}
