//! Histogram-based gradient boosting for least-squares regression.
//!
//! Features are binned once up front ([`BinMapper`]); missing values get their
//! own bin, and every split learns which side they should go to. The model
//! therefore trains and predicts on data with `NaN`s without any imputation
//! step.

mod binning;
mod tree;

pub use binning::BinMapper;
pub use tree::{Node, Tree};

use super::Regressor;
use crate::config::GradientBoostingConfig;
use crate::error::{NanRegressionError, Result};
use crate::utils::{count_nan, frame_to_matrix};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use tracing::debug;
use tree::TreeGrower;

/// Gradient boosted regression trees that accept missing values natively.
#[derive(Debug, Clone)]
pub struct HistGradientBoostingRegressor {
    config: GradientBoostingConfig,
    mapper: Option<BinMapper>,
    baseline: f64,
    trees: Vec<Tree>,
}

impl Default for HistGradientBoostingRegressor {
    fn default() -> Self {
        Self::new(GradientBoostingConfig::default())
    }
}

impl HistGradientBoostingRegressor {
    pub fn new(config: GradientBoostingConfig) -> Self {
        Self {
            config,
            mapper: None,
            baseline: 0.0,
            trees: Vec::new(),
        }
    }

    pub fn config(&self) -> &GradientBoostingConfig {
        &self.config
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// Initial prediction, the mean training target.
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Fit on a dense matrix; `NaN` marks a missing feature value.
    pub fn fit_matrix(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        self.config.validate()?;
        if x.nrows() == 0 {
            return Err(NanRegressionError::EmptyInput(
                "HistGradientBoostingRegressor needs at least one training row".to_string(),
            ));
        }
        if x.nrows() != y.len() {
            return Err(NanRegressionError::ShapeMismatch {
                expected: format!("{} targets", x.nrows()),
                found: format!("{} targets", y.len()),
            });
        }
        let missing_targets = y.iter().filter(|v| v.is_nan()).count();
        if missing_targets > 0 {
            return Err(NanRegressionError::MissingValuesInInput {
                model: "HistGradientBoostingRegressor (target)".to_string(),
                count: missing_targets,
            });
        }

        let mut mapper = BinMapper::new(self.config.max_bins);
        mapper.fit(x)?;
        let binned = mapper.transform(x)?;

        self.baseline = y.mean().unwrap_or(0.0);
        let mut raw = Array1::from_elem(y.len(), self.baseline);
        let mut trees = Vec::with_capacity(self.config.max_iter);

        for _ in 0..self.config.max_iter {
            let gradients: Vec<f64> = raw.iter().zip(y.iter()).map(|(p, t)| p - t).collect();
            let tree = TreeGrower::new(&binned, &gradients, &mapper, &self.config).grow();
            for (i, row) in x.rows().into_iter().enumerate() {
                raw[i] += self.config.learning_rate * tree.predict_row(row);
            }
            trees.push(tree);
        }

        debug!(
            "HistGradientBoostingRegressor fitted {} trees on {} rows ({} missing entries)",
            trees.len(),
            x.nrows(),
            count_nan(x)
        );
        self.trees = trees;
        self.mapper = Some(mapper);
        Ok(())
    }

    pub fn predict_matrix(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let mapper = self.mapper.as_ref().ok_or_else(|| {
            NanRegressionError::NotFitted("HistGradientBoostingRegressor".to_string())
        })?;
        if x.ncols() != mapper.n_features() {
            return Err(NanRegressionError::ShapeMismatch {
                expected: format!("{} features", mapper.n_features()),
                found: format!("{} features", x.ncols()),
            });
        }

        let lr = self.config.learning_rate;
        Ok(x.rows()
            .into_iter()
            .map(|row| {
                self.baseline
                    + self
                        .trees
                        .iter()
                        .map(|tree| lr * tree.predict_row(row))
                        .sum::<f64>()
            })
            .collect())
    }
}

impl Regressor for HistGradientBoostingRegressor {
    fn name(&self) -> String {
        "HistGradientBoostingRegressor".to_string()
    }

    fn fit(&mut self, x: &DataFrame, y: &Array1<f64>) -> Result<()> {
        let matrix = frame_to_matrix(x)?;
        self.fit_matrix(&matrix, y)
    }

    fn predict(&self, x: &DataFrame) -> Result<Array1<f64>> {
        let matrix = frame_to_matrix(x)?;
        self.predict_matrix(&matrix)
    }
}
