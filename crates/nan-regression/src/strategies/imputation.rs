use super::{Strategy, fit_and_score};
use crate::config::ImputationStrategy;
use crate::data::TrainTestSplit;
use crate::error::Result;
use crate::imputers::SimpleImputer;
use crate::models::{ImputedRegressor, LinearRegression, Regressor};
use crate::types::{StrategyKind, StrategyReport};

/// Mean or median imputation followed by ordinary least squares.
#[derive(Debug, Clone, Copy)]
pub struct StatisticalImputation {
    strategy: ImputationStrategy,
}

impl StatisticalImputation {
    pub fn new(strategy: ImputationStrategy) -> Self {
        Self { strategy }
    }
}

impl Strategy for StatisticalImputation {
    fn kind(&self) -> StrategyKind {
        match self.strategy {
            ImputationStrategy::Mean => StrategyKind::MeanImputation,
            ImputationStrategy::Median => StrategyKind::MedianImputation,
        }
    }

    fn run(&self, split: &TrainTestSplit) -> Result<StrategyReport> {
        let mut model = ImputedRegressor::new(SimpleImputer::new(self.strategy), LinearRegression::new());
        let score = fit_and_score(&mut model, split)?;
        Ok(StrategyReport::scored(self.kind(), score, model.name()))
    }
}
