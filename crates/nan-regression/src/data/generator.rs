//! Synthetic regression data with injected missing values.

use super::Dataset;
use crate::config::ExperimentConfig;
use crate::error::{NanRegressionError, Result};
use crate::utils::{feature_names, matrix_to_frame};
use ndarray::{Array1, Array2};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use tracing::debug;

/// Weights of `x0`, `x1`, `x2` in the generated target.
pub const TARGET_COEFFICIENTS: [f64; 3] = [3.0, 2.0, -1.0];

/// Constant term of the generated target.
pub const TARGET_INTERCEPT: f64 = 5.0;

/// Generates `y = 3*x0 + 2*x1 - x2 + 5 + noise` over uniform features.
pub struct SyntheticGenerator {
    n_samples: usize,
    n_features: usize,
    n_missing: usize,
    noise_std: f64,
    seed: u64,
}

impl SyntheticGenerator {
    pub fn new(config: &ExperimentConfig) -> Self {
        Self {
            n_samples: config.n_samples,
            n_features: config.n_features,
            n_missing: config.n_missing,
            noise_std: config.noise_std,
            seed: config.seed,
        }
    }

    /// Generate the dataset. The same seed always yields the same data.
    pub fn generate(&self) -> Result<Dataset> {
        if self.n_features < TARGET_COEFFICIENTS.len() {
            return Err(NanRegressionError::InvalidConfig(format!(
                "need at least {} features, got {}",
                TARGET_COEFFICIENTS.len(),
                self.n_features
            )));
        }
        let cells = self.n_samples * self.n_features;
        if self.n_missing > cells {
            return Err(NanRegressionError::InvalidConfig(format!(
                "cannot blank {} of {} cells",
                self.n_missing, cells
            )));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut x = Array2::from_shape_fn((self.n_samples, self.n_features), |_| rng.r#gen::<f64>());

        let noise = Normal::new(0.0, self.noise_std)
            .map_err(|e| NanRegressionError::InvalidConfig(format!("noise: {}", e)))?;
        let target: Array1<f64> = x
            .rows()
            .into_iter()
            .map(|row| {
                let signal: f64 = TARGET_COEFFICIENTS
                    .iter()
                    .zip(row.iter())
                    .map(|(w, v)| w * v)
                    .sum();
                signal + TARGET_INTERCEPT + noise.sample(&mut rng)
            })
            .collect();

        let mut missing: Vec<(usize, usize)> = rand::seq::index::sample(&mut rng, cells, self.n_missing)
            .into_iter()
            .map(|flat| (flat / self.n_features, flat % self.n_features))
            .collect();
        missing.sort_unstable();

        for &(row, col) in &missing {
            x[[row, col]] = f64::NAN;
        }

        debug!(
            "Generated {}x{} features with {} missing entries (seed {})",
            self.n_samples,
            self.n_features,
            missing.len(),
            self.seed
        );

        let features = matrix_to_frame(&x, &feature_names(self.n_features))?;
        Ok(Dataset {
            features,
            target,
            missing,
        })
    }
}
