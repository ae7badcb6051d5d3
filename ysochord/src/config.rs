//! Configuration loading from ysochord.toml
//!
//! Analysis settings can be kept in a `ysochord.toml` file next to the
//! catalog. The file is discovered by walking up from the current directory;
//! every key is optional and falls back to the defaults below.

use crate::dataset::VariabilityThresholds;
use serde::{Deserialize, Serialize};
use std::path::Path;
use ysochord_report::ReportConfig;
use ysochord_stats::{BootstrapConfig, CorrelationOptions, CramersVEstimator, StdDevKind};

/// Config file name looked up by [`AnalysisConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "ysochord.toml";

/// ysochord analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnalysisConfig {
    /// Bootstrap interval settings
    #[serde(default)]
    pub bootstrap: BootstrapSettings,
    /// Correlation matrix settings
    #[serde(default)]
    pub correlation: CorrelationSettings,
    /// Effect-size settings
    #[serde(default)]
    pub effect_size: EffectSizeSettings,
    /// Sample-size quality checks
    #[serde(default)]
    pub quality: QualitySettings,
    /// Variability category thresholds
    #[serde(default)]
    pub variability: VariabilitySettings,
}

/// Bootstrap interval settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapSettings {
    /// Number of resamples
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Confidence level (e.g., 0.95 for 95%)
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,
    /// Master seed; identical seeds give identical intervals
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Fewer valid resamples than this is an error
    #[serde(default = "default_min_valid_resamples")]
    pub min_valid_resamples: usize,
    /// Spread resamples over the rayon pool
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            confidence_level: default_confidence_level(),
            seed: default_seed(),
            min_valid_resamples: default_min_valid_resamples(),
            parallel: true,
        }
    }
}

fn default_iterations() -> usize {
    ysochord_stats::DEFAULT_BOOTSTRAP_ITERATIONS
}
fn default_confidence_level() -> f64 {
    ysochord_stats::DEFAULT_CONFIDENCE_LEVEL
}
fn default_seed() -> u64 {
    ysochord_stats::DEFAULT_SEED
}
fn default_min_valid_resamples() -> usize {
    ysochord_stats::MIN_VALID_RESAMPLES
}
fn default_true() -> bool {
    true
}

/// Standard deviation convention for z-scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StdDevMode {
    /// n - 1 denominator
    #[default]
    Sample,
    /// n denominator
    Population,
}

impl From<StdDevMode> for StdDevKind {
    fn from(mode: StdDevMode) -> Self {
        match mode {
            StdDevMode::Sample => StdDevKind::Sample,
            StdDevMode::Population => StdDevKind::Population,
        }
    }
}

impl std::fmt::Display for StdDevMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StdDevMode::Sample => write!(f, "sample"),
            StdDevMode::Population => write!(f, "population"),
        }
    }
}

/// Correlation matrix settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationSettings {
    /// Z-score each column before correlating
    #[serde(default = "default_true")]
    pub standardize: bool,
    /// "sample" or "population"
    #[serde(default)]
    pub std_dev: StdDevMode,
}

impl Default for CorrelationSettings {
    fn default() -> Self {
        Self {
            standardize: true,
            std_dev: StdDevMode::default(),
        }
    }
}

/// Effect-size settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EffectSizeSettings {
    /// Use the bias-corrected Cramér's V
    #[serde(default)]
    pub bias_correction: bool,
}

/// Sample-size quality checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySettings {
    /// Categories with fewer observations are flagged as rare
    #[serde(default = "default_rare_threshold")]
    pub rare_category_threshold: usize,
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self {
            rare_category_threshold: default_rare_threshold(),
        }
    }
}

fn default_rare_threshold() -> usize {
    30
}

/// Amplitude thresholds for the variability category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariabilitySettings {
    /// Amplitudes below this are Low
    #[serde(default = "default_low_upper")]
    pub low_upper: f64,
    /// Amplitudes below this (and not Low) are Medium
    #[serde(default = "default_medium_upper")]
    pub medium_upper: f64,
}

impl Default for VariabilitySettings {
    fn default() -> Self {
        Self {
            low_upper: default_low_upper(),
            medium_upper: default_medium_upper(),
        }
    }
}

fn default_low_upper() -> f64 {
    0.2
}
fn default_medium_upper() -> f64 {
    0.5
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => Some(config),
                    Err(err) => {
                        tracing::warn!(
                            path = %config_path.display(),
                            error = %err,
                            "ignoring unreadable config"
                        );
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Reject settings the statistics cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        self.bootstrap_config().validate()?;
        self.variability_thresholds().validate()?;
        Ok(())
    }

    /// Bootstrap settings in the form the stats engine takes
    pub fn bootstrap_config(&self) -> BootstrapConfig {
        BootstrapConfig {
            iterations: self.bootstrap.iterations,
            confidence_level: self.bootstrap.confidence_level,
            seed: self.bootstrap.seed,
            min_valid_resamples: self.bootstrap.min_valid_resamples,
            parallel: self.bootstrap.parallel,
            estimator: self.estimator(),
        }
    }

    /// Cramér's V estimator selected by `effect_size.bias_correction`
    pub fn estimator(&self) -> CramersVEstimator {
        if self.effect_size.bias_correction {
            CramersVEstimator::BiasCorrected
        } else {
            CramersVEstimator::Uncorrected
        }
    }

    /// Correlation settings in the form the stats engine takes
    pub fn correlation_options(&self) -> CorrelationOptions {
        CorrelationOptions {
            standardize: self.correlation.standardize,
            std_dev: self.correlation.std_dev.into(),
        }
    }

    /// Amplitude thresholds for [`crate::Dataset::with_variability_category`]
    pub fn variability_thresholds(&self) -> VariabilityThresholds {
        VariabilityThresholds {
            low_upper: self.variability.low_upper,
            medium_upper: self.variability.medium_upper,
        }
    }

    /// Settings echoed into report metadata
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            bootstrap_iterations: self.bootstrap.iterations,
            confidence_level: self.bootstrap.confidence_level,
            seed: self.bootstrap.seed,
            min_valid_resamples: self.bootstrap.min_valid_resamples,
            estimator: self.estimator().to_string(),
            standardize: self.correlation.standardize,
            std_dev: self.correlation.std_dev.to_string(),
            rare_category_threshold: self.quality.rare_category_threshold,
        }
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# ysochord Configuration

[bootstrap]
# Number of bootstrap resamples for the Cramér's V interval
iterations = 1000
# Confidence level (0.0 to 1.0, exclusive)
confidence_level = 0.95
# Master seed; the same seed reproduces the same interval
seed = 42
# Fail when fewer resamples produce a usable table
min_valid_resamples = 50
# Run resamples on all cores
parallel = true

[correlation]
# Z-score columns before computing Pearson correlations
standardize = true
# Standard deviation convention: "sample" (n - 1) or "population" (n)
std_dev = "sample"

[effect_size]
# Bergsma bias-corrected Cramér's V
bias_correction = false

[quality]
# Categories with fewer observations are reported as rare
rare_category_threshold = 30

[variability]
# Low < low_upper <= Medium < medium_upper <= High
low_upper = 0.2
medium_upper = 0.5
"#
        .to_string()
    }
}
