use super::Strategy;
use crate::data::TrainTestSplit;
use crate::error::Result;
use crate::types::{StrategyKind, StrategyReport};

pub const KNN_UNAVAILABLE: &str = "KNN imputation not available in this build";

/// Nearest-neighbor imputation followed by ordinary least squares.
///
/// Reports itself as unavailable when the crate is built without the `knn`
/// feature.
#[derive(Debug, Clone, Copy)]
pub struct KnnImputation {
    n_neighbors: usize,
}

impl KnnImputation {
    pub fn new(n_neighbors: usize) -> Self {
        Self { n_neighbors }
    }

    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }
}

impl Strategy for KnnImputation {
    fn kind(&self) -> StrategyKind {
        StrategyKind::KnnImputation
    }

    #[cfg(feature = "knn")]
    fn run(&self, split: &TrainTestSplit) -> Result<StrategyReport> {
        use super::fit_and_score;
        use crate::imputers::KnnImputer;
        use crate::models::{ImputedRegressor, LinearRegression, Regressor};

        let mut model = ImputedRegressor::new(KnnImputer::new(self.n_neighbors), LinearRegression::new());
        let score = fit_and_score(&mut model, split)?;
        Ok(StrategyReport::scored(
            self.kind(),
            score,
            format!("{} (k = {})", model.name(), self.n_neighbors),
        ))
    }

    #[cfg(not(feature = "knn"))]
    fn run(&self, _split: &TrainTestSplit) -> Result<StrategyReport> {
        Ok(StrategyReport::unavailable(self.kind(), KNN_UNAVAILABLE))
    }
}
