//! Missing-value strategies and the experiment runner.
//!
//! Each [`Strategy`] receives the same [`TrainTestSplit`], fits its own model
//! and reports an R² on the held-out rows. Strategies never see each other's
//! results.

mod drop_rows;
mod imputation;
mod knn;
mod native;

pub use drop_rows::{DropRows, NO_CLEAN_TEST_DATA};
pub use imputation::StatisticalImputation;
pub use knn::{KNN_UNAVAILABLE, KnnImputation};
pub use native::NativeMissing;

use crate::config::{ExperimentConfig, ImputationStrategy};
use crate::data::{SyntheticGenerator, TrainTestSplit, train_test_split};
use crate::error::{Result, ResultExt};
use crate::models::Regressor;
use crate::types::{ExperimentSummary, StrategyKind, StrategyOutcome, StrategyReport};
use tracing::{info, warn};

/// One way of dealing with missing values before scoring a model.
pub trait Strategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Fit on the training rows and score on the test rows.
    fn run(&self, split: &TrainTestSplit) -> Result<StrategyReport>;
}

static_assertions::assert_obj_safe!(Strategy);

/// Fit `model` on the training partition and return its R² on the test partition.
pub(crate) fn fit_and_score<R: Regressor>(model: &mut R, split: &TrainTestSplit) -> Result<f64> {
    model.fit(&split.x_train, &split.y_train)?;
    model.score(&split.x_test, &split.y_test)
}

/// The five strategy runs in report order.
pub fn default_strategies(config: &ExperimentConfig) -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(DropRows),
        Box::new(StatisticalImputation::new(ImputationStrategy::Mean)),
        Box::new(NativeMissing::new(config.boosting.clone())),
        Box::new(StatisticalImputation::new(ImputationStrategy::Median)),
        Box::new(KnnImputation::new(config.knn_neighbors)),
    ]
}

/// Generates the data, splits it and runs every strategy in order.
pub struct Experiment {
    config: ExperimentConfig,
    strategies: Vec<Box<dyn Strategy>>,
}

impl Experiment {
    pub fn new(config: ExperimentConfig) -> Self {
        let strategies = default_strategies(&config);
        Self { config, strategies }
    }

    /// Run a custom set of strategies instead of the default five.
    pub fn with_strategies(config: ExperimentConfig, strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self { config, strategies }
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn run(&self) -> Result<ExperimentSummary> {
        self.config.validate()?;

        let dataset = SyntheticGenerator::new(&self.config)
            .generate()
            .context("generating synthetic data")?;
        info!(
            "Generated {:?} features with {} missing entries (seed {})",
            dataset.shape(),
            dataset.missing_count(),
            self.config.seed
        );

        let split = train_test_split(&dataset, self.config.test_size, self.config.split_seed)
            .context("splitting data")?;
        self.run_on_split(&split)
    }

    /// Run every strategy against an existing split.
    pub fn run_on_split(&self, split: &TrainTestSplit) -> Result<ExperimentSummary> {
        let train_missing = crate::utils::count_missing(&split.x_train);
        info!(
            "Training on {} rows ({} missing entries), testing on {} rows",
            split.n_train(),
            train_missing,
            split.n_test()
        );

        let mut reports = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            let kind = strategy.kind();
            let report = strategy
                .run(split)
                .context(format!("running strategy {}", kind.as_str()))?;
            match &report.outcome {
                StrategyOutcome::Scored { score, detail } => {
                    info!("{}: R² = {:.4} ({})", kind.as_str(), score, detail)
                }
                StrategyOutcome::Unavailable { reason } => {
                    warn!("{}: skipped, {}", kind.as_str(), reason)
                }
            }
            reports.push(report);
        }

        Ok(ExperimentSummary {
            train_shape: split.x_train.shape(),
            train_missing,
            n_test: split.n_test(),
            reports,
        })
    }
}
