//! Regression on Data with Missing Values
//!
//! Compares four ways of fitting a regression model when some feature values
//! are missing, all built on Polars and ndarray.
//!
//! # Overview
//!
//! An experiment generates a synthetic linear dataset, blanks out a fixed
//! number of entries, splits it into train and test partitions, and scores:
//!
//! - **Row deletion**: drop incomplete rows, fit ordinary least squares
//! - **Mean / median imputation**: [`SimpleImputer`] in front of [`LinearRegression`]
//! - **Native missing values**: [`HistGradientBoostingRegressor`], which learns
//!   where missing values should go at every split
//! - **KNN imputation**: [`imputers::KnnImputer`] in front of [`LinearRegression`]
//!   (behind the `knn` feature, reported as unavailable without it)
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use nan_regression::{Experiment, ExperimentConfig, render};
//!
//! let config = ExperimentConfig::builder()
//!     .n_samples(200)
//!     .n_missing(25)
//!     .build()?;
//!
//! let summary = Experiment::new(config).run()?;
//! print!("{}", render(&summary));
//! ```
//!
//! # Custom strategies
//!
//! Anything implementing [`Strategy`] can be run against the shared split:
//!
//! ```rust,ignore
//! use nan_regression::{Experiment, ExperimentConfig, ImputationStrategy};
//! use nan_regression::strategies::{NativeMissing, StatisticalImputation};
//!
//! let config = ExperimentConfig::default();
//! let experiment = Experiment::with_strategies(
//!     config.clone(),
//!     vec![
//!         Box::new(StatisticalImputation::new(ImputationStrategy::Median)),
//!         Box::new(NativeMissing::new(config.boosting.clone())),
//!     ],
//! );
//! let summary = experiment.run()?;
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod imputers;
pub mod metrics;
pub mod models;
pub mod report;
pub mod strategies;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{
    ConfigValidationError, ExperimentConfig, ExperimentConfigBuilder, GradientBoostingConfig,
    ImputationStrategy,
};
pub use data::{Dataset, SyntheticGenerator, TrainTestSplit, train_test_split};
pub use error::{NanRegressionError, Result, ResultExt};
pub use imputers::{Imputer, SimpleImputer, knn_available};
pub use metrics::r2_score;
pub use models::{HistGradientBoostingRegressor, ImputedRegressor, LinearRegression, Regressor};
pub use report::render;
pub use strategies::{Experiment, Strategy};
pub use types::{
    ExperimentSummary, RowDeletionStats, StrategyKind, StrategyOutcome, StrategyReport,
};
