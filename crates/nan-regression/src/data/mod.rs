//! Dataset module.
//!
//! This module provides the synthetic dataset with injected missing values
//! and the deterministic train/test splitter.

mod generator;
mod split;

pub use generator::{SyntheticGenerator, TARGET_COEFFICIENTS, TARGET_INTERCEPT};
pub use split::{TrainTestSplit, train_test_split};

use crate::utils::count_missing;
use ndarray::Array1;
use polars::prelude::*;

/// Features, target, and the coordinates that were blanked out.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Feature columns `x0..x{n-1}`; missing entries are nulls.
    pub features: DataFrame,
    /// One target value per row.
    pub target: Array1<f64>,
    /// `(row, column)` of every injected missing value, sorted.
    pub missing: Vec<(usize, usize)>,
}

impl Dataset {
    /// `(rows, columns)` of the feature matrix.
    pub fn shape(&self) -> (usize, usize) {
        self.features.shape()
    }

    /// Number of missing entries currently in the features.
    pub fn missing_count(&self) -> usize {
        count_missing(&self.features)
    }
}
