//! Deterministic train/test partitioning.

use super::Dataset;
use crate::error::{NanRegressionError, Result};
use crate::utils::filter_rows;
use ndarray::{Array1, Axis};
use polars::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::debug;

/// Train and test partitions of a [`Dataset`].
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: DataFrame,
    pub x_test: DataFrame,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
    /// Rows of the source dataset that went to training, ascending.
    pub train_indices: Vec<usize>,
    /// Rows of the source dataset that went to testing, ascending.
    pub test_indices: Vec<usize>,
}

impl TrainTestSplit {
    pub fn n_train(&self) -> usize {
        self.train_indices.len()
    }

    pub fn n_test(&self) -> usize {
        self.test_indices.len()
    }
}

/// Shuffle the rows with `seed` and hold out `ceil(test_size * n)` of them.
///
/// Row order inside each partition follows the source dataset.
pub fn train_test_split(dataset: &Dataset, test_size: f64, seed: u64) -> Result<TrainTestSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(NanRegressionError::InvalidConfig(format!(
            "test_size must be strictly between 0 and 1, got {}",
            test_size
        )));
    }

    let n_samples = dataset.features.height();
    if dataset.target.len() != n_samples {
        return Err(NanRegressionError::ShapeMismatch {
            expected: format!("{} targets", n_samples),
            found: format!("{} targets", dataset.target.len()),
        });
    }

    let n_test = (test_size * n_samples as f64).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(NanRegressionError::EmptyInput(format!(
            "splitting {} samples with test_size {} leaves an empty partition",
            n_samples, test_size
        )));
    }

    let mut permutation: Vec<usize> = (0..n_samples).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    permutation.shuffle(&mut rng);

    let mut is_test = vec![false; n_samples];
    for &row in &permutation[..n_test] {
        is_test[row] = true;
    }
    let is_train: Vec<bool> = is_test.iter().map(|t| !t).collect();

    let test_indices: Vec<usize> = (0..n_samples).filter(|&i| is_test[i]).collect();
    let train_indices: Vec<usize> = (0..n_samples).filter(|&i| !is_test[i]).collect();

    debug!(
        "Split {} samples into {} train / {} test (seed {})",
        n_samples, n_train, n_test, seed
    );

    Ok(TrainTestSplit {
        x_train: filter_rows(&dataset.features, &is_train)?,
        x_test: filter_rows(&dataset.features, &is_test)?,
        y_train: dataset.target.select(Axis(0), &train_indices),
        y_test: dataset.target.select(Axis(0), &test_indices),
        train_indices,
        test_indices,
    })
}
