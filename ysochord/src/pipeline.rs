//! Analysis pipeline
//!
//! Each entry point takes the dataset handle and the configuration
//! explicitly and returns a fresh result. Failures are returned to the caller,
//! which decides whether to skip the pair or abort.

use crate::config::AnalysisConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use ysochord_report::{
    AssociationRecord, BalanceRecord, CorrelationKind, CorrelationRecord, EffectSizeMatrixRecord,
    Report,
};
use ysochord_stats::{
    AssociationResult, CategoryBalance, CorrelationMatrix, EffectSizeMatrix, EffectSizeMetric,
};

/// Chi-squared, Cramér's V with bootstrap interval, and φ for one pair
pub fn analyze_pair(
    dataset: &Dataset,
    row_variable: &str,
    column_variable: &str,
    config: &AnalysisConfig,
) -> Result<AssociationResult> {
    tracing::info!(row_variable, column_variable, "association analysis started");

    let observations = dataset.paired(row_variable, column_variable)?;
    let result = ysochord_stats::compute_association(
        row_variable,
        column_variable,
        &observations,
        &config.bootstrap_config(),
    )?;

    tracing::info!(
        row_variable,
        column_variable,
        chi_squared = result.chi_squared,
        dof = result.degrees_of_freedom,
        cramers_v = result.cramers_v,
        ci_lower = result.cramers_v_interval.lower,
        ci_upper = result.cramers_v_interval.upper,
        "association analysis finished"
    );
    Ok(result)
}

/// Analyze several pairs; one failing pair does not stop the others
pub fn analyze_pairs(
    dataset: &Dataset,
    pairs: &[(&str, &str)],
    config: &AnalysisConfig,
) -> Vec<Result<AssociationResult>> {
    pairs
        .iter()
        .map(|&(row, col)| {
            analyze_pair(dataset, row, col, config).inspect_err(|err| {
                tracing::warn!(row_variable = row, column_variable = col, error = %err, "pair failed");
            })
        })
        .collect()
}

/// K×K Cramér's V (or φ) heatmap over categorical variables
pub fn effect_size_matrix(
    dataset: &Dataset,
    variables: &[&str],
    metric: EffectSizeMetric,
    config: &AnalysisConfig,
) -> Result<EffectSizeMatrix> {
    let columns = variables
        .iter()
        .map(|name| dataset.categorical(name))
        .collect::<Result<Vec<_>>>()?;
    Ok(ysochord_stats::effect_size_matrix(
        variables,
        &columns,
        metric,
        config.estimator(),
    )?)
}

/// Cramér's V (or φ) between every two categories of `row_variable`,
/// each pair measured against `column_variable`
pub fn category_pair_effect_matrix(
    dataset: &Dataset,
    row_variable: &str,
    column_variable: &str,
    metric: EffectSizeMetric,
    config: &AnalysisConfig,
) -> Result<EffectSizeMatrix> {
    let observations = dataset.paired(row_variable, column_variable)?;
    Ok(ysochord_stats::category_pair_effect_matrix(
        row_variable,
        column_variable,
        &observations,
        metric,
        config.estimator(),
    )?)
}

/// Pearson correlation matrix over numeric columns
pub fn correlate(
    dataset: &Dataset,
    columns: &[&str],
    config: &AnalysisConfig,
) -> Result<CorrelationMatrix> {
    let values = columns
        .iter()
        .map(|name| dataset.numeric(name))
        .collect::<Result<Vec<_>>>()?;
    let matrix = ysochord_stats::correlation_matrix(columns, &values, config.correlation_options())?;
    if matrix.rows_dropped() > 0 {
        tracing::info!(
            rows_used = matrix.rows_used(),
            rows_dropped = matrix.rows_dropped(),
            "rows with missing values excluded from correlation"
        );
    }
    Ok(matrix)
}

/// Similarity of the `row_variable` category distributions over the
/// `column_variable` categories
pub fn distribution_similarity(
    dataset: &Dataset,
    row_variable: &str,
    column_variable: &str,
    config: &AnalysisConfig,
) -> Result<CorrelationMatrix> {
    let table = dataset.paired(row_variable, column_variable)?.table();
    Ok(ysochord_stats::distribution_similarity(
        &table,
        config.correlation_options(),
    )?)
}

/// Label frequencies of a categorical column, warning on rare categories
pub fn category_balance(
    dataset: &Dataset,
    variable: &str,
    config: &AnalysisConfig,
) -> Result<CategoryBalance> {
    let balance = ysochord_stats::category_balance(dataset.categorical(variable)?)?;
    let threshold = config.quality.rare_category_threshold;
    for rare in balance.rare_categories(threshold) {
        tracing::warn!(
            variable,
            label = %rare.label,
            count = rare.count,
            threshold,
            "rare category"
        );
    }
    tracing::debug!(
        variable,
        max_share = balance.max_share(),
        imbalance_ratio = balance.imbalance_ratio(),
        "category balance"
    );
    Ok(balance)
}

/// What goes into a [`Report`]
#[derive(Debug, Clone, Default)]
pub struct ReportRequest<'a> {
    /// (row variable, column variable) pairs for full association records
    pub pairs: Vec<(&'a str, &'a str)>,
    /// Categorical variables for the Cramér's V heatmap
    pub heatmap_variables: Vec<&'a str>,
    /// (row variable, column variable) pairs for per-category Cramér's V
    /// heatmaps over the row variable's categories
    pub category_pair_heatmaps: Vec<(&'a str, &'a str)>,
    /// Numeric columns for the correlation heatmap
    pub numeric_columns: Vec<&'a str>,
    /// (row variable, column variable) pairs for distribution similarity
    pub similarity_pairs: Vec<(&'a str, &'a str)>,
    /// Categorical variables to summarize
    pub balance_variables: Vec<&'a str>,
}

/// Run every requested analysis and collect the records.
///
/// The first failure aborts the report; use the individual entry points to
/// skip failing pairs instead.
pub fn build_report(
    dataset: &Dataset,
    request: &ReportRequest<'_>,
    config: &AnalysisConfig,
) -> Result<Report> {
    config.validate()?;

    let mut report = Report::new(config.report_config());

    for &(row, col) in &request.pairs {
        let result = analyze_pair(dataset, row, col, config)?;
        report.associations.push(AssociationRecord::from(&result));
    }

    if request.heatmap_variables.len() > 1 {
        let matrix = effect_size_matrix(
            dataset,
            &request.heatmap_variables,
            EffectSizeMetric::CramersV,
            config,
        )?;
        report
            .effect_size_matrices
            .push(EffectSizeMatrixRecord::from(&matrix));
    }

    for &(row, col) in &request.category_pair_heatmaps {
        let matrix =
            category_pair_effect_matrix(dataset, row, col, EffectSizeMetric::CramersV, config)?;
        report
            .effect_size_matrices
            .push(EffectSizeMatrixRecord::from(&matrix));
    }

    if !request.numeric_columns.is_empty() {
        let matrix = correlate(dataset, &request.numeric_columns, config)?;
        report.correlations.push(CorrelationRecord::new(
            CorrelationKind::VariableCorrelation,
            &matrix,
        ));
    }

    for &(row, col) in &request.similarity_pairs {
        let matrix = distribution_similarity(dataset, row, col, config)?;
        report.correlations.push(CorrelationRecord::new(
            CorrelationKind::DistributionSimilarity,
            &matrix,
        ));
    }

    for &variable in &request.balance_variables {
        let balance = category_balance(dataset, variable, config)?;
        report.balance.push(BalanceRecord::new(
            variable,
            &balance,
            config.quality.rare_category_threshold,
        ));
    }

    tracing::info!(
        associations = report.associations.len(),
        effect_size_matrices = report.effect_size_matrices.len(),
        correlations = report.correlations.len(),
        "report assembled"
    );
    Ok(report)
}
