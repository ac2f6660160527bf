use super::Imputer;
use crate::error::{NanRegressionError, Result};
use crate::utils::{column_names, frame_to_options, options_to_frame};
use tracing::debug;

use polars::prelude::*;

/// Distances below this are treated as exact matches.
const EXACT_MATCH: f64 = 1e-12;

/// Nearest-neighbor imputer.
///
/// Each missing entry is replaced with the inverse-distance weighted average of
/// the `n_neighbors` closest training rows that observed that column.
pub struct KnnImputer {
    n_neighbors: usize,
    /// Training rows, with `None` for missing entries.
    donors: Vec<Vec<Option<f64>>>,
    /// Training column means, used when no donor is comparable.
    fallback: Vec<f64>,
    columns: Vec<String>,
    fitted: bool,
}

impl KnnImputer {
    /// Create a new KNN imputer with specified number of neighbors
    pub fn new(n_neighbors: usize) -> Self {
        Self {
            n_neighbors: n_neighbors.max(1), // Ensure at least 1 neighbor
            donors: Vec::new(),
            fallback: Vec::new(),
            columns: Vec::new(),
            fitted: false,
        }
    }

    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    /// Impute a single missing value from the stored donors.
    fn impute_value(&self, row: &[Option<f64>], target_col: usize) -> f64 {
        let mut distances: Vec<(f64, f64)> = self
            .donors
            .iter()
            .filter_map(|donor| {
                let value = donor[target_col]?;
                let distance = nan_euclidean(row, donor);
                distance.is_finite().then_some((distance, value))
            })
            .collect();

        if distances.is_empty() {
            return self.fallback[target_col];
        }

        distances.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        let nearest = &distances[..self.n_neighbors.min(distances.len())];

        // An exact match makes the inverse weight infinite; average the matches instead.
        let exact: Vec<f64> = nearest
            .iter()
            .filter(|(d, _)| *d < EXACT_MATCH)
            .map(|(_, v)| *v)
            .collect();
        if !exact.is_empty() {
            return exact.iter().sum::<f64>() / exact.len() as f64;
        }

        let (weighted_sum, weight_sum) = nearest
            .iter()
            .fold((0.0, 0.0), |(ws, w), (d, v)| (ws + v / d, w + 1.0 / d));
        weighted_sum / weight_sum
    }
}

/// Euclidean distance over the coordinates observed in both rows, scaled up
/// by `total / observed` to account for the skipped ones.
///
/// Returns infinity when the rows share no observed coordinate.
fn nan_euclidean(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let mut sum_squared_diff = 0.0;
    let mut present = 0usize;

    for (x, y) in a.iter().zip(b) {
        if let (Some(x), Some(y)) = (x, y) {
            let diff = x - y;
            sum_squared_diff += diff * diff;
            present += 1;
        }
    }

    if present == 0 {
        return f64::INFINITY;
    }
    (sum_squared_diff * a.len() as f64 / present as f64).sqrt()
}

impl Imputer for KnnImputer {
    fn name(&self) -> &'static str {
        "knn"
    }

    fn fit(&mut self, x: &DataFrame) -> Result<()> {
        let donors = frame_to_options(x)?;
        let columns = column_names(x);

        let mut fallback = Vec::with_capacity(columns.len());
        for (col_idx, name) in columns.iter().enumerate() {
            let observed: Vec<f64> = donors.iter().filter_map(|row| row[col_idx]).collect();
            if observed.is_empty() {
                return Err(NanRegressionError::NoValidValues(name.clone()));
            }
            fallback.push(observed.iter().sum::<f64>() / observed.len() as f64);
        }

        debug!(
            "KNN imputer fitted on {} rows x {} columns (k = {})",
            donors.len(),
            columns.len(),
            self.n_neighbors
        );

        self.donors = donors;
        self.fallback = fallback;
        self.columns = columns;
        self.fitted = true;
        Ok(())
    }

    fn transform(&self, x: &DataFrame) -> Result<DataFrame> {
        if !self.fitted {
            return Err(NanRegressionError::NotFitted("KnnImputer".to_string()));
        }
        let names = column_names(x);
        if names != self.columns {
            return Err(NanRegressionError::ShapeMismatch {
                expected: format!("columns {:?}", self.columns),
                found: format!("columns {:?}", names),
            });
        }

        let rows = frame_to_options(x)?;
        let mut imputed_count = 0usize;
        let filled: Vec<Vec<Option<f64>>> = rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(col_idx, value)| match value {
                        Some(v) => Some(*v),
                        None => {
                            imputed_count += 1;
                            Some(self.impute_value(row, col_idx))
                        }
                    })
                    .collect()
            })
            .collect();

        debug!("KNN imputed {} values", imputed_count);
        options_to_frame(&filled, &names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::count_missing;

    fn value_at(df: &DataFrame, col: &str, row: usize) -> f64 {
        df.column(col).unwrap().get(row).unwrap().try_extract::<f64>().unwrap()
    }

    // ========================================================================
    // KnnImputer::new() tests
    // ========================================================================

    #[test]
    fn test_knn_imputer_new_with_valid_neighbors() {
        assert_eq!(KnnImputer::new(5).n_neighbors(), 5);
    }

    #[test]
    fn test_knn_imputer_new_with_zero_neighbors_defaults_to_one() {
        assert_eq!(KnnImputer::new(0).n_neighbors(), 1);
    }

    // ========================================================================
    // fit_transform() tests
    // ========================================================================

    #[test]
    fn test_fit_transform_basic_imputation() {
        let df = df![
            "feature1" => [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)],
            "feature2" => [Some(10.0), Some(20.0), None, Some(40.0), Some(50.0)],
        ]
        .unwrap();

        let mut imputer = KnnImputer::new(2);
        let result = imputer.fit_transform(&df).unwrap();

        assert_eq!(count_missing(&result), 0);
        // neighbors are rows 1 and 3 at equal distance
        let imputed = value_at(&result, "feature2", 2);
        assert!((imputed - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_transform_no_missing_values() {
        let df = df![
            "a" => [1.0, 2.0, 3.0],
            "b" => [10.0, 20.0, 30.0],
        ]
        .unwrap();

        let mut imputer = KnnImputer::new(3);
        let result = imputer.fit_transform(&df).unwrap();
        assert!(result.equals(&df));
    }

    #[test]
    fn test_fit_transform_n_neighbors_greater_than_rows() {
        let df = df![
            "a" => [1.0, 2.0, 3.0],
            "b" => [Some(10.0), None, Some(30.0)],
        ]
        .unwrap();

        let mut imputer = KnnImputer::new(10);
        let result = imputer.fit_transform(&df).unwrap();
        assert_eq!(count_missing(&result), 0);
        assert!((value_at(&result, "b", 1) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_transform_mixed_null_patterns() {
        let df = df![
            "a" => [Some(1.0), None, Some(3.0), Some(4.0)],
            "b" => [Some(10.0), Some(20.0), None, Some(40.0)],
        ]
        .unwrap();

        let mut imputer = KnnImputer::new(2);
        let result = imputer.fit_transform(&df).unwrap();
        assert_eq!(count_missing(&result), 0);
    }

    #[test]
    fn test_closer_neighbor_has_more_weight() {
        let df = df![
            "feature1" => [1.0, 1.1, 10.0],
            "feature2" => [Some(10.0), None, Some(100.0)],
        ]
        .unwrap();

        let mut imputer = KnnImputer::new(2);
        let result = imputer.fit_transform(&df).unwrap();
        let imputed = value_at(&result, "feature2", 1);
        assert!(imputed > 10.0 && imputed < 30.0);
    }

    #[test]
    fn test_exact_match_dominates() {
        let df = df![
            "feature1" => [5.0, 5.0, 100.0],
            "feature2" => [Some(10.0), None, Some(1000.0)],
        ]
        .unwrap();

        let mut imputer = KnnImputer::new(2);
        let result = imputer.fit_transform(&df).unwrap();
        assert_eq!(value_at(&result, "feature2", 1), 10.0);
    }

    #[test]
    fn test_row_with_nothing_comparable_uses_training_mean() {
        let df = df![
            "a" => [Some(1.0), Some(3.0), None],
            "b" => [Some(10.0), Some(30.0), None],
        ]
        .unwrap();

        let mut imputer = KnnImputer::new(2);
        let result = imputer.fit_transform(&df).unwrap();
        assert_eq!(value_at(&result, "a", 2), 2.0);
        assert_eq!(value_at(&result, "b", 2), 20.0);
    }

    #[test]
    fn test_transform_uses_training_donors_only() {
        let train = df![
            "a" => [1.0, 2.0, 3.0],
            "b" => [10.0, 20.0, 30.0],
        ]
        .unwrap();
        let test = df![
            "a" => [Some(1.0), Some(50.0)],
            "b" => [None, Some(9999.0)],
        ]
        .unwrap();

        let mut imputer = KnnImputer::new(1);
        imputer.fit(&train).unwrap();
        let result = imputer.transform(&test).unwrap();
        // nearest training row is the exact match a = 1.0
        assert_eq!(value_at(&result, "b", 0), 10.0);
        assert_eq!(value_at(&result, "b", 1), 9999.0);
    }

    #[test]
    fn test_fit_all_nulls_in_column_is_error() {
        let df = df![
            "a" => [1.0, 2.0, 3.0],
            "b" => [Option::<f64>::None, None, None],
        ]
        .unwrap();

        let mut imputer = KnnImputer::new(3);
        let err = imputer.fit(&df).unwrap_err();
        assert_eq!(err.error_code(), "NO_VALID_VALUES");
    }

    #[test]
    fn test_transform_before_fit_is_error() {
        let df = df!["a" => [1.0]].unwrap();
        let err = KnnImputer::new(1).transform(&df).unwrap_err();
        assert_eq!(err.error_code(), "NOT_FITTED");
    }

    // ========================================================================
    // nan_euclidean() tests
    // ========================================================================

    #[test]
    fn test_nan_euclidean_identical_rows() {
        let row = vec![Some(1.0), Some(2.0), Some(3.0)];
        assert_eq!(nan_euclidean(&row, &row), 0.0);
    }

    #[test]
    fn test_nan_euclidean_full_rows() {
        let a = vec![Some(0.0), Some(0.0)];
        let b = vec![Some(3.0), Some(4.0)];
        assert!((nan_euclidean(&a, &b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_nan_euclidean_scales_for_missing() {
        let a = vec![Some(0.0), None, Some(0.0)];
        let b = vec![Some(0.0), Some(3.0), Some(4.0)];
        // sqrt(3 / 2 * 16)
        let expected = (24.0_f64).sqrt();
        assert!((nan_euclidean(&a, &b) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_nan_euclidean_no_common_features() {
        let a = vec![Some(1.0), None];
        let b = vec![None, Some(2.0)];
        assert_eq!(nan_euclidean(&a, &b), f64::INFINITY);
    }
}
