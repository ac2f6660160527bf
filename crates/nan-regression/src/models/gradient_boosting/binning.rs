//! Feature binning for histogram-based tree growth.
//!
//! Non-missing values of each feature are mapped to at most `max_bins` ordered
//! bins. Missing values (`NaN`) always land in a dedicated bin whose index is
//! `max_bins`, so split finding can treat them as one extra histogram entry.

use crate::error::{NanRegressionError, Result};
use ndarray::{Array2, ArrayView1};

/// Learns per-feature bin thresholds and maps raw values to bin indices.
#[derive(Debug, Clone)]
pub struct BinMapper {
    max_bins: usize,
    /// Upper edges of the non-missing bins; `thresholds[f].len() + 1` bins.
    thresholds: Vec<Vec<f64>>,
    /// Number of non-missing bins per feature (0 when a feature is all missing).
    n_bins_non_missing: Vec<usize>,
}

impl BinMapper {
    pub fn new(max_bins: usize) -> Self {
        Self {
            max_bins,
            thresholds: Vec::new(),
            n_bins_non_missing: Vec::new(),
        }
    }

    /// Index of the bin reserved for missing values.
    pub fn missing_bin(&self) -> usize {
        self.max_bins
    }

    pub fn thresholds(&self, feature: usize) -> &[f64] {
        &self.thresholds[feature]
    }

    pub fn n_bins_non_missing(&self, feature: usize) -> usize {
        self.n_bins_non_missing[feature]
    }

    pub fn n_features(&self) -> usize {
        self.thresholds.len()
    }

    /// Learn thresholds from the non-missing values of each column.
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<()> {
        if self.max_bins < 2 || self.max_bins > u8::MAX as usize {
            return Err(NanRegressionError::InvalidConfig(format!(
                "max_bins must be between 2 and 255, got {}",
                self.max_bins
            )));
        }

        self.thresholds = x
            .columns()
            .into_iter()
            .map(|column| find_thresholds(column, self.max_bins))
            .collect();
        self.n_bins_non_missing = x
            .columns()
            .into_iter()
            .zip(&self.thresholds)
            .map(|(column, thresholds)| {
                if column.iter().all(|v| v.is_nan()) {
                    0
                } else {
                    thresholds.len() + 1
                }
            })
            .collect();
        Ok(())
    }

    /// Bin of `value` for `feature`: the number of thresholds strictly below it.
    pub fn bin_value(&self, feature: usize, value: f64) -> usize {
        if value.is_nan() {
            return self.missing_bin();
        }
        self.thresholds[feature].partition_point(|t| *t < value)
    }

    /// Map every entry of `x` to its bin.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<u8>> {
        if x.ncols() != self.n_features() {
            return Err(NanRegressionError::ShapeMismatch {
                expected: format!("{} features", self.n_features()),
                found: format!("{} features", x.ncols()),
            });
        }
        Ok(Array2::from_shape_fn(x.dim(), |(i, j)| {
            self.bin_value(j, x[[i, j]]) as u8
        }))
    }
}

/// Midpoints between distinct values when they fit in `max_bins`, otherwise
/// interpolated quantiles of the observed values.
fn find_thresholds(column: ArrayView1<f64>, max_bins: usize) -> Vec<f64> {
    let mut observed: Vec<f64> = column.iter().copied().filter(|v| !v.is_nan()).collect();
    observed.sort_by(|a, b| a.total_cmp(b));

    let mut distinct = observed.clone();
    distinct.dedup();

    if distinct.len() <= max_bins {
        return distinct.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect();
    }

    let n = observed.len();
    let mut thresholds: Vec<f64> = (1..max_bins)
        .map(|k| {
            let position = k as f64 / max_bins as f64 * (n - 1) as f64;
            let lower = position.floor() as usize;
            let upper = position.ceil() as usize;
            let frac = position - lower as f64;
            observed[lower] + (observed[upper] - observed[lower]) * frac
        })
        .collect();
    thresholds.dedup();
    thresholds
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_few_distinct_values_use_midpoints() {
        let x = array![[1.0], [3.0], [3.0], [5.0]];
        let mut mapper = BinMapper::new(255);
        mapper.fit(&x).unwrap();
        assert_eq!(mapper.thresholds(0), &[2.0, 4.0]);
        assert_eq!(mapper.n_bins_non_missing(0), 3);

        let binned = mapper.transform(&x).unwrap();
        assert_eq!(binned.column(0).to_vec(), vec![0, 1, 1, 2]);
    }

    #[test]
    fn test_missing_values_use_reserved_bin() {
        let x = array![[1.0], [f64::NAN], [2.0]];
        let mut mapper = BinMapper::new(16);
        mapper.fit(&x).unwrap();
        let binned = mapper.transform(&x).unwrap();
        assert_eq!(binned[[1, 0]], 16);
        assert_eq!(mapper.missing_bin(), 16);
        assert_eq!(mapper.n_bins_non_missing(0), 2);
    }

    #[test]
    fn test_all_missing_feature_has_no_bins() {
        let x = array![[f64::NAN, 1.0], [f64::NAN, 2.0]];
        let mut mapper = BinMapper::new(8);
        mapper.fit(&x).unwrap();
        assert_eq!(mapper.n_bins_non_missing(0), 0);
        assert_eq!(mapper.n_bins_non_missing(1), 2);
    }

    #[test]
    fn test_many_distinct_values_are_capped() {
        let x = Array2::from_shape_fn((1000, 1), |(i, _)| i as f64);
        let mut mapper = BinMapper::new(10);
        mapper.fit(&x).unwrap();
        assert_eq!(mapper.thresholds(0).len(), 9);

        let binned = mapper.transform(&x).unwrap();
        assert!(binned.iter().all(|b| *b < 10));
        // bins are monotone in the raw value
        let bins = binned.column(0).to_vec();
        assert!(bins.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_bin_value_on_threshold_goes_left() {
        let x = array![[1.0], [3.0]];
        let mut mapper = BinMapper::new(4);
        mapper.fit(&x).unwrap();
        assert_eq!(mapper.bin_value(0, 2.0), 0);
        assert_eq!(mapper.bin_value(0, 2.0001), 1);
        assert_eq!(mapper.bin_value(0, -100.0), 0);
        assert_eq!(mapper.bin_value(0, 100.0), 1);
    }

    #[test]
    fn test_rejects_bad_max_bins() {
        let x = array![[1.0]];
        assert!(BinMapper::new(1).fit(&x).is_err());
        assert!(BinMapper::new(256).fit(&x).is_err());
    }

    #[test]
    fn test_transform_wrong_width() {
        let mut mapper = BinMapper::new(4);
        mapper.fit(&array![[1.0, 2.0]]).unwrap();
        let err = mapper.transform(&array![[1.0]]).unwrap_err();
        assert_eq!(err.error_code(), "SHAPE_MISMATCH");
    }
}
