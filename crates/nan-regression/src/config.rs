//! Configuration types for the missing-value regression experiment.
//!
//! This module provides configuration options using the builder pattern.
//! The defaults reproduce the reference run: seed 42, 100 samples, 5 features,
//! 10 missing entries and a 20% test split.

use serde::{Deserialize, Serialize};

/// Statistic used by [`crate::imputers::SimpleImputer`] to fill missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ImputationStrategy {
    /// Use the mean of non-missing training values
    #[default]
    Mean,
    /// Use the median of non-missing training values
    Median,
}

impl ImputationStrategy {
    /// Lowercase name used in logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
        }
    }
}

/// Hyperparameters of the histogram gradient boosting regressor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostingConfig {
    /// Number of boosting iterations (one tree each).
    /// Default: 100
    pub max_iter: usize,

    /// Shrinkage applied to every tree's contribution.
    /// Default: 0.1
    pub learning_rate: f64,

    /// Maximum number of leaves per tree.
    /// Default: 31
    pub max_leaf_nodes: usize,

    /// Maximum depth of a tree. `None` means unlimited.
    /// Default: None
    pub max_depth: Option<usize>,

    /// Minimum number of samples a leaf must hold.
    /// Default: 20
    pub min_samples_leaf: usize,

    /// L2 penalty on leaf values.
    /// Default: 0.0
    pub l2_regularization: f64,

    /// Maximum number of bins for non-missing values (the missing bin is extra).
    /// Default: 255
    pub max_bins: usize,
}

impl Default for GradientBoostingConfig {
    fn default() -> Self {
        Self {
            max_iter: 100,
            learning_rate: 0.1,
            max_leaf_nodes: 31,
            max_depth: None,
            min_samples_leaf: 20,
            l2_regularization: 0.0,
            max_bins: 255,
        }
    }
}

impl GradientBoostingConfig {
    /// Validate the hyperparameters.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.max_iter == 0 {
            return Err(ConfigValidationError::InvalidBoosting(
                "max_iter must be at least 1".to_string(),
            ));
        }
        if !(self.learning_rate > 0.0) {
            return Err(ConfigValidationError::InvalidBoosting(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.max_leaf_nodes < 2 {
            return Err(ConfigValidationError::InvalidBoosting(
                "max_leaf_nodes must be at least 2".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(ConfigValidationError::InvalidBoosting(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(ConfigValidationError::InvalidBoosting(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        if self.l2_regularization < 0.0 {
            return Err(ConfigValidationError::InvalidBoosting(format!(
                "l2_regularization must be non-negative, got {}",
                self.l2_regularization
            )));
        }
        if !(2..=255).contains(&self.max_bins) {
            return Err(ConfigValidationError::InvalidBoosting(format!(
                "max_bins must be between 2 and 255, got {}",
                self.max_bins
            )));
        }
        Ok(())
    }
}

/// Configuration for one experiment run.
///
/// Use [`ExperimentConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use nan_regression::config::ExperimentConfig;
///
/// let config = ExperimentConfig::builder()
///     .n_samples(200)
///     .n_missing(25)
///     .seed(7)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Number of generated rows.
    /// Default: 100
    pub n_samples: usize,

    /// Number of generated feature columns (at least 3, the target uses x0..x2).
    /// Default: 5
    pub n_features: usize,

    /// Number of distinct (row, column) entries overwritten with missing values.
    /// Default: 10
    pub n_missing: usize,

    /// Seed for data generation.
    /// Default: 42
    pub seed: u64,

    /// Standard deviation of the Gaussian noise added to the target.
    /// Default: 0.5
    pub noise_std: f64,

    /// Fraction of rows held out for testing (0.0 - 1.0, exclusive).
    /// Default: 0.2
    pub test_size: f64,

    /// Seed for the train/test shuffle.
    /// Default: 42
    pub split_seed: u64,

    /// Number of neighbors for KNN imputation.
    /// Default: 5
    pub knn_neighbors: usize,

    /// Gradient boosting hyperparameters.
    pub boosting: GradientBoostingConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            n_samples: 100,
            n_features: 5,
            n_missing: 10,
            seed: 42,
            noise_std: 0.5,
            test_size: 0.2,
            split_seed: 42,
            knn_neighbors: 5,
            boosting: GradientBoostingConfig::default(),
        }
    }
}

impl ExperimentConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ExperimentConfigBuilder {
        ExperimentConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.n_samples < 2 {
            return Err(ConfigValidationError::TooFewSamples(self.n_samples));
        }

        if self.n_features < 3 {
            return Err(ConfigValidationError::TooFewFeatures(self.n_features));
        }

        let cells = self.n_samples * self.n_features;
        if self.n_missing > cells {
            return Err(ConfigValidationError::TooManyMissing {
                requested: self.n_missing,
                cells,
            });
        }

        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(ConfigValidationError::InvalidTestSize(self.test_size));
        }

        if !(self.noise_std >= 0.0) {
            return Err(ConfigValidationError::InvalidNoise(self.noise_std));
        }

        if self.knn_neighbors == 0 {
            return Err(ConfigValidationError::InvalidKnnNeighbors(
                self.knn_neighbors,
            ));
        }

        self.boosting.validate()
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid sample count: {0} (must be at least 2)")]
    TooFewSamples(usize),

    #[error("Invalid feature count: {0} (must be at least 3)")]
    TooFewFeatures(usize),

    #[error("Cannot inject {requested} missing values into {cells} cells")]
    TooManyMissing { requested: usize, cells: usize },

    #[error("Invalid test size: {0} (must be strictly between 0.0 and 1.0)")]
    InvalidTestSize(f64),

    #[error("Invalid noise standard deviation: {0} (must be non-negative)")]
    InvalidNoise(f64),

    #[error("Invalid KNN neighbors: {0} (must be at least 1)")]
    InvalidKnnNeighbors(usize),

    #[error("Invalid gradient boosting parameters: {0}")]
    InvalidBoosting(String),
}

/// Builder for [`ExperimentConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ExperimentConfigBuilder {
    n_samples: Option<usize>,
    n_features: Option<usize>,
    n_missing: Option<usize>,
    seed: Option<u64>,
    noise_std: Option<f64>,
    test_size: Option<f64>,
    split_seed: Option<u64>,
    knn_neighbors: Option<usize>,
    boosting: Option<GradientBoostingConfig>,
}

impl ExperimentConfigBuilder {
    /// Set the number of generated rows.
    pub fn n_samples(mut self, n: usize) -> Self {
        self.n_samples = Some(n);
        self
    }

    /// Set the number of generated feature columns.
    pub fn n_features(mut self, n: usize) -> Self {
        self.n_features = Some(n);
        self
    }

    /// Set how many entries are overwritten with missing values.
    pub fn n_missing(mut self, n: usize) -> Self {
        self.n_missing = Some(n);
        self
    }

    /// Set the data generation seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the standard deviation of the target noise.
    pub fn noise_std(mut self, std: f64) -> Self {
        self.noise_std = Some(std);
        self
    }

    /// Set the held-out fraction.
    ///
    /// # Arguments
    /// * `fraction` - Value strictly between 0.0 and 1.0 (e.g., 0.2 = 20%)
    pub fn test_size(mut self, fraction: f64) -> Self {
        self.test_size = Some(fraction);
        self
    }

    /// Set the train/test shuffle seed.
    pub fn split_seed(mut self, seed: u64) -> Self {
        self.split_seed = Some(seed);
        self
    }

    /// Set the number of neighbors for KNN imputation.
    pub fn knn_neighbors(mut self, k: usize) -> Self {
        self.knn_neighbors = Some(k);
        self
    }

    /// Set the gradient boosting hyperparameters.
    pub fn boosting(mut self, boosting: GradientBoostingConfig) -> Self {
        self.boosting = Some(boosting);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ExperimentConfig` or an error if validation fails.
    pub fn build(self) -> Result<ExperimentConfig, ConfigValidationError> {
        let defaults = ExperimentConfig::default();
        let config = ExperimentConfig {
            n_samples: self.n_samples.unwrap_or(defaults.n_samples),
            n_features: self.n_features.unwrap_or(defaults.n_features),
            n_missing: self.n_missing.unwrap_or(defaults.n_missing),
            seed: self.seed.unwrap_or(defaults.seed),
            noise_std: self.noise_std.unwrap_or(defaults.noise_std),
            test_size: self.test_size.unwrap_or(defaults.test_size),
            split_seed: self.split_seed.unwrap_or(defaults.split_seed),
            knn_neighbors: self.knn_neighbors.unwrap_or(defaults.knn_neighbors),
            boosting: self.boosting.unwrap_or(defaults.boosting),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExperimentConfig::default();
        assert_eq!(config.n_samples, 100);
        assert_eq!(config.n_features, 5);
        assert_eq!(config.n_missing, 10);
        assert_eq!(config.seed, 42);
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.knn_neighbors, 5);
        assert_eq!(config.boosting.max_iter, 100);
    }

    #[test]
    fn test_builder_defaults_match_default() {
        let config = ExperimentConfig::builder().build().unwrap();
        assert_eq!(config, ExperimentConfig::default());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = ExperimentConfig::builder()
            .n_samples(250)
            .n_features(8)
            .n_missing(40)
            .seed(7)
            .test_size(0.3)
            .knn_neighbors(3)
            .build()
            .unwrap();

        assert_eq!(config.n_samples, 250);
        assert_eq!(config.n_features, 8);
        assert_eq!(config.n_missing, 40);
        assert_eq!(config.seed, 7);
        assert_eq!(config.test_size, 0.3);
        assert_eq!(config.knn_neighbors, 3);
    }

    #[test]
    fn test_validation_too_few_features() {
        let result = ExperimentConfig::builder().n_features(2).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::TooFewFeatures(2)
        ));
    }

    #[test]
    fn test_validation_too_many_missing() {
        let result = ExperimentConfig::builder()
            .n_samples(4)
            .n_features(3)
            .n_missing(13)
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::TooManyMissing {
                requested: 13,
                cells: 12
            }
        ));
    }

    #[test]
    fn test_validation_invalid_test_size() {
        for bad in [0.0, 1.0, -0.1, f64::NAN] {
            let result = ExperimentConfig::builder().test_size(bad).build();
            assert!(matches!(
                result.unwrap_err(),
                ConfigValidationError::InvalidTestSize(_)
            ));
        }
    }

    #[test]
    fn test_validation_invalid_knn_neighbors() {
        let result = ExperimentConfig::builder().knn_neighbors(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidKnnNeighbors(0)
        ));
    }

    #[test]
    fn test_validation_invalid_boosting() {
        let boosting = GradientBoostingConfig {
            max_bins: 300,
            ..Default::default()
        };
        let result = ExperimentConfig::builder().boosting(boosting).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidBoosting(_)
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = ExperimentConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: ExperimentConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_imputation_strategy_names() {
        assert_eq!(ImputationStrategy::Mean.as_str(), "mean");
        assert_eq!(ImputationStrategy::Median.as_str(), "median");
        assert_eq!(ImputationStrategy::default(), ImputationStrategy::Mean);
    }
}
