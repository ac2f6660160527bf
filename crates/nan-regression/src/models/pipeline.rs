//! Imputer followed by a regressor, fitted and applied as one model.

use super::Regressor;
use crate::error::{Result, ResultExt};
use crate::imputers::Imputer;
use ndarray::Array1;
use polars::prelude::*;
use tracing::debug;

/// Fills missing values with `I`, then hands the complete frame to `R`.
///
/// The imputer is fitted on the training frame only; prediction reuses the
/// learned fill values.
#[derive(Debug, Clone)]
pub struct ImputedRegressor<I, R> {
    imputer: I,
    regressor: R,
}

impl<I: Imputer, R: Regressor> ImputedRegressor<I, R> {
    pub fn new(imputer: I, regressor: R) -> Self {
        Self { imputer, regressor }
    }

    pub fn imputer(&self) -> &I {
        &self.imputer
    }

    pub fn regressor(&self) -> &R {
        &self.regressor
    }
}

impl<I: Imputer, R: Regressor> Regressor for ImputedRegressor<I, R> {
    fn name(&self) -> String {
        format!("{} imputation + {}", self.imputer.name(), self.regressor.name())
    }

    fn fit(&mut self, x: &DataFrame, y: &Array1<f64>) -> Result<()> {
        let filled = self
            .imputer
            .fit_transform(x)
            .context("imputing training data")?;
        debug!("{}: fitting on {} imputed rows", self.name(), filled.height());
        self.regressor.fit(&filled, y)
    }

    fn predict(&self, x: &DataFrame) -> Result<Array1<f64>> {
        let filled = self
            .imputer
            .transform(x)
            .context("imputing prediction data")?;
        self.regressor.predict(&filled)
    }
}
