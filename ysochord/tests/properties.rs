use proptest::prelude::*;
use ysochord_stats::{
    BootstrapConfig, ContingencyTable, CorrelationOptions, CramersVEstimator, PairedObservations,
    StatsError, StdDevKind, bootstrap_cramers_v, chi_squared_test, correlation_matrix, cramers_v,
    mean, phi_coefficient, standardize, std_dev,
};

const ROW_LABELS: [&str; 4] = ["ClassI", "ClassII", "ClassIII", "FS"];
const COL_LABELS: [&str; 3] = ["High", "Low", "Medium"];

fn labelled(pairs: &[(usize, usize)]) -> (Vec<&'static str>, Vec<&'static str>) {
    pairs
        .iter()
        .map(|&(r, c)| (ROW_LABELS[r], COL_LABELS[c]))
        .unzip()
}

fn observations() -> impl Strategy<Value = Vec<(usize, usize)>> {
    proptest::collection::vec((0usize..4, 0usize..3), 1..300)
}

proptest! {
    /// Invariant: every observation lands in exactly one cell.
    #[test]
    fn marginals_add_up(pairs in observations()) {
        let (rows, cols) = labelled(&pairs);
        let table = ContingencyTable::from_columns(&rows, &cols).unwrap();

        let n = pairs.len() as u64;
        prop_assert_eq!(table.total(), n);
        prop_assert_eq!(table.row_sums().iter().sum::<u64>(), n);
        prop_assert_eq!(table.col_sums().iter().sum::<u64>(), n);
        prop_assert!(table.row_sums().iter().all(|&s| s > 0));
        prop_assert!(table.col_sums().iter().all(|&s| s > 0));
    }

    /// Invariant: χ² ≥ 0 and 0 ≤ V ≤ 1 on every non-degenerate table.
    #[test]
    fn statistics_stay_in_range(pairs in observations()) {
        let (rows, cols) = labelled(&pairs);
        let table = ContingencyTable::from_columns(&rows, &cols).unwrap();

        match chi_squared_test(&table) {
            Ok(chi) => {
                let (r, c) = table.shape();
                prop_assert!(chi.statistic >= 0.0);
                prop_assert_eq!(chi.degrees_of_freedom, (r - 1) * (c - 1));
                prop_assert!((0.0..=1.0).contains(&chi.p_value));

                let v = cramers_v(chi.statistic, chi.n, r, c).unwrap();
                prop_assert!((0.0..=1.0).contains(&v));

                let phi = phi_coefficient(chi.statistic, chi.n, (r, c)).unwrap();
                if phi.is_bounded() {
                    prop_assert!((phi.value - v).abs() < 1e-9);
                }
            }
            Err(err) => prop_assert!(matches!(err, StatsError::DegenerateTable(_))),
        }
    }

    /// Invariant: the order of observations does not matter.
    #[test]
    fn table_ignores_observation_order(pairs in observations()) {
        let (rows, cols) = labelled(&pairs);
        let forward = ContingencyTable::from_columns(&rows, &cols).unwrap();

        let reversed: Vec<(usize, usize)> = pairs.iter().rev().copied().collect();
        let (rows, cols) = labelled(&reversed);
        let backward = ContingencyTable::from_columns(&rows, &cols).unwrap();

        prop_assert_eq!(forward, backward);
    }

    /// Invariant: the interval always contains the point estimate and is
    /// reproducible for a fixed seed.
    #[test]
    fn bootstrap_interval_contains_estimate(
        pairs in proptest::collection::vec((0usize..3, 0usize..3), 40..120),
        seed in any::<u64>(),
    ) {
        let (rows, cols) = labelled(&pairs);
        let obs = PairedObservations::new(&rows, &cols).unwrap();
        let config = BootstrapConfig {
            iterations: 60,
            min_valid_resamples: 10,
            seed,
            estimator: CramersVEstimator::Uncorrected,
            ..Default::default()
        };

        match bootstrap_cramers_v(&obs, &config) {
            Ok(result) => {
                let ci = result.confidence_interval;
                prop_assert!(ci.lower <= result.point_estimate);
                prop_assert!(result.point_estimate <= ci.upper);
                prop_assert_eq!(result.valid_resamples + result.skipped_resamples, 60);

                let again = bootstrap_cramers_v(&obs, &config).unwrap();
                prop_assert_eq!(ci, again.confidence_interval);
            }
            Err(err) => prop_assert!(matches!(
                err,
                StatsError::DegenerateTable(_) | StatsError::InsufficientResamples { .. }
            ), "unexpected error variant"),
        }
    }

    /// Invariant: z-scores have mean 0 and unit standard deviation.
    #[test]
    fn standardized_moments(values in proptest::collection::vec(-1e3f64..1e3, 2..100)) {
        for kind in [StdDevKind::Sample, StdDevKind::Population] {
            match standardize("x", &values, kind) {
                Ok(z) => {
                    prop_assert!(mean(&z).abs() < 1e-9);
                    prop_assert!((std_dev(&z, kind).unwrap() - 1.0).abs() < 1e-9);
                }
                Err(err) => prop_assert!(matches!(err, StatsError::ZeroVariance { .. }), "unexpected error variant"),
            }
        }
    }

    /// Invariant: correlation matrices are symmetric, bounded, with a unit diagonal.
    #[test]
    fn correlation_matrix_shape(
        columns in proptest::collection::vec(proptest::collection::vec(-50.0f64..50.0, 12), 1..5),
    ) {
        let labels: Vec<String> = (0..columns.len()).map(|i| format!("v{}", i)).collect();
        let slices: Vec<&[f64]> = columns.iter().map(Vec::as_slice).collect();

        match correlation_matrix(&labels, &slices, CorrelationOptions::default()) {
            Ok(m) => {
                let k = columns.len();
                for i in 0..k {
                    prop_assert_eq!(m.get(i, i), 1.0);
                    for j in 0..k {
                        prop_assert_eq!(m.get(i, j), m.get(j, i));
                        prop_assert!((-1.0..=1.0).contains(&m.get(i, j)));
                    }
                }
            }
            Err(err) => prop_assert!(matches!(err, StatsError::ZeroVariance { .. }), "unexpected error variant"),
        }
    }
}
