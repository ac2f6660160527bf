use super::{Strategy, fit_and_score};
use crate::config::GradientBoostingConfig;
use crate::data::TrainTestSplit;
use crate::error::Result;
use crate::models::HistGradientBoostingRegressor;
use crate::types::{StrategyKind, StrategyReport};

/// Gradient boosting fitted directly on data with missing values.
#[derive(Debug, Clone)]
pub struct NativeMissing {
    config: GradientBoostingConfig,
}

impl NativeMissing {
    pub fn new(config: GradientBoostingConfig) -> Self {
        Self { config }
    }
}

impl Strategy for NativeMissing {
    fn kind(&self) -> StrategyKind {
        StrategyKind::NativeMissing
    }

    fn run(&self, split: &TrainTestSplit) -> Result<StrategyReport> {
        let mut model = HistGradientBoostingRegressor::new(self.config.clone());
        let score = fit_and_score(&mut model, split)?;
        Ok(StrategyReport::scored(
            self.kind(),
            score,
            format!(
                "HistGradientBoostingRegressor with {} trees",
                model.trees().len()
            ),
        ))
    }
}
