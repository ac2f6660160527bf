//! Imputation module for handling missing values.
//!
//! This module provides the imputation strategies used before fitting a model
//! that cannot accept missing values:
//! - Statistical imputation (mean, median)
//! - KNN imputation (behind the `knn` feature)
//!
//! Every imputer learns its parameters in [`Imputer::fit`] from training data
//! only and applies them unchanged in [`Imputer::transform`], so test-set
//! statistics never leak into the fill values.

#[cfg(feature = "knn")]
mod knn;
mod statistical;

#[cfg(feature = "knn")]
pub use knn::KnnImputer;
pub use statistical::SimpleImputer;

use crate::error::Result;
use polars::prelude::*;

/// Trait for imputers that fill nulls in numeric `DataFrame`s.
pub trait Imputer: Send + Sync {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Learn the fill parameters from `x`.
    fn fit(&mut self, x: &DataFrame) -> Result<()>;

    /// Return a copy of `x` with every null replaced.
    fn transform(&self, x: &DataFrame) -> Result<DataFrame>;

    /// Fit and transform in one step.
    fn fit_transform(&mut self, x: &DataFrame) -> Result<DataFrame> {
        self.fit(x)?;
        self.transform(x)
    }
}

/// Whether the KNN imputer was compiled into this build.
pub const fn knn_available() -> bool {
    cfg!(feature = "knn")
}

static_assertions::assert_obj_safe!(Imputer);
static_assertions::assert_impl_all!(SimpleImputer: Imputer, Send, Sync);
#[cfg(feature = "knn")]
static_assertions::assert_impl_all!(KnnImputer: Imputer, Send, Sync);
