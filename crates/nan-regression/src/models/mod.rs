//! Regression models.
//!
//! - [`LinearRegression`]: ordinary least squares, rejects missing values
//! - [`HistGradientBoostingRegressor`]: boosted trees that route missing values natively
//! - [`ImputedRegressor`]: an [`Imputer`](crate::imputers::Imputer) in front of any regressor

mod gradient_boosting;
mod linear;
mod pipeline;

pub use gradient_boosting::{BinMapper, HistGradientBoostingRegressor, Node, Tree};
pub use linear::LinearRegression;
pub use pipeline::ImputedRegressor;

use crate::error::Result;
use crate::metrics::r2_score;
use ndarray::Array1;
use polars::prelude::*;

/// Trait for regressors over numeric `DataFrame`s.
pub trait Regressor: Send + Sync {
    /// Display name used in logs and reports.
    fn name(&self) -> String;

    /// Fit the model on features `x` and targets `y`.
    fn fit(&mut self, x: &DataFrame, y: &Array1<f64>) -> Result<()>;

    /// Predict one value per row of `x`.
    fn predict(&self, x: &DataFrame) -> Result<Array1<f64>>;

    /// R² of the predictions on `x` against `y`.
    fn score(&self, x: &DataFrame, y: &Array1<f64>) -> Result<f64> {
        let predictions = self.predict(x)?;
        r2_score(y, &predictions)
    }
}

static_assertions::assert_obj_safe!(Regressor);
static_assertions::assert_impl_all!(LinearRegression: Regressor, Send, Sync);
static_assertions::assert_impl_all!(HistGradientBoostingRegressor: Regressor, Send, Sync);
static_assertions::assert_impl_all!(
    ImputedRegressor<crate::imputers::SimpleImputer, LinearRegression>: Regressor, Send, Sync
);
