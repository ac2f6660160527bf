//! Statistical imputation methods.
//!
//! Provides mean and median imputation with statistics learned on training data.

use super::Imputer;
use crate::config::ImputationStrategy;
use crate::error::{NanRegressionError, Result};
use crate::utils::{column_names, is_numeric_dtype};
use polars::prelude::*;
use tracing::debug;

/// Fills each column's nulls with a per-column statistic.
#[derive(Debug, Clone)]
pub struct SimpleImputer {
    strategy: ImputationStrategy,
    /// `(column name, fill value)` learned by `fit`, in column order.
    statistics: Option<Vec<(String, f64)>>,
}

impl SimpleImputer {
    pub fn new(strategy: ImputationStrategy) -> Self {
        Self {
            strategy,
            statistics: None,
        }
    }

    pub fn strategy(&self) -> ImputationStrategy {
        self.strategy
    }

    /// Fill values learned by `fit`, or `None` before fitting.
    pub fn statistics(&self) -> Option<&[(String, f64)]> {
        self.statistics.as_deref()
    }

    /// Compute the strategy's statistic over the non-null values of `column`.
    fn column_statistic(&self, column: &Column) -> Result<f64> {
        if !is_numeric_dtype(column.dtype()) {
            return Err(NanRegressionError::ImputationFailed {
                column: column.name().to_string(),
                reason: format!("{} imputation needs a numeric column", self.strategy.as_str()),
            });
        }
        let series = column.as_materialized_series().cast(&DataType::Float64)?;
        let value = match self.strategy {
            ImputationStrategy::Mean => series.mean(),
            ImputationStrategy::Median => series.median(),
        };
        value
            .filter(|v| v.is_finite())
            .ok_or_else(|| NanRegressionError::NoValidValues(column.name().to_string()))
    }
}

impl Imputer for SimpleImputer {
    fn name(&self) -> &'static str {
        match self.strategy {
            ImputationStrategy::Mean => "mean",
            ImputationStrategy::Median => "median",
        }
    }

    fn fit(&mut self, x: &DataFrame) -> Result<()> {
        let mut statistics = Vec::with_capacity(x.width());
        for column in x.get_columns() {
            let value = self.column_statistic(column)?;
            debug!(
                "{} of '{}' = {:.4} ({} nulls)",
                self.strategy.as_str(),
                column.name(),
                value,
                column.null_count()
            );
            statistics.push((column.name().to_string(), value));
        }
        self.statistics = Some(statistics);
        Ok(())
    }

    fn transform(&self, x: &DataFrame) -> Result<DataFrame> {
        let statistics = self
            .statistics
            .as_ref()
            .ok_or_else(|| NanRegressionError::NotFitted("SimpleImputer".to_string()))?;

        let names = column_names(x);
        let fitted: Vec<&str> = statistics.iter().map(|(name, _)| name.as_str()).collect();
        if names.len() != fitted.len() || names.iter().zip(&fitted).any(|(a, b)| a.as_str() != *b) {
            return Err(NanRegressionError::ShapeMismatch {
                expected: format!("columns {:?}", fitted),
                found: format!("columns {:?}", names),
            });
        }

        let mut result = x.clone();
        for (name, fill_value) in statistics {
            let column = x.column(name)?;
            if column.null_count() == 0 {
                continue;
            }
            let float_column = column.cast(&DataType::Float64)?;
            let filled: Vec<f64> = float_column
                .f64()?
                .into_iter()
                .map(|v| v.unwrap_or(*fill_value))
                .collect();
            result.replace(name, Series::new(name.as_str().into(), filled))?;
        }
        Ok(result)
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
    // fit() tests
    // ========================================================================

    #[test]
    fn test_fit_mean_statistics() {
        let df = df![
            "a" => [Some(1.0), None, Some(5.0)],
            "b" => [Some(2.0), Some(4.0), Some(9.0)],
        ]
        .unwrap();
        let mut imputer = SimpleImputer::new(ImputationStrategy::Mean);
        imputer.fit(&df).unwrap();

        let stats = imputer.statistics().unwrap();
        assert_eq!(stats[0], ("a".to_string(), 3.0));
        assert_eq!(stats[1], ("b".to_string(), 5.0));
    }

    #[test]
    fn test_fit_median_statistics() {
        let df = df![
            "a" => [Some(1.0), None, Some(3.0), None, Some(100.0)],
            "b" => [Some(1.0), Some(2.0), Some(3.0), Some(4.0), None],
        ]
        .unwrap();
        let mut imputer = SimpleImputer::new(ImputationStrategy::Median);
        imputer.fit(&df).unwrap();

        let stats = imputer.statistics().unwrap();
        assert_eq!(stats[0].1, 3.0);
        // even count: midpoint of 2 and 3
        assert_eq!(stats[1].1, 2.5);
    }

    #[test]
    fn test_fit_all_nulls_is_error() {
        let df = df!["a" => [Option::<f64>::None, None]].unwrap();
        let mut imputer = SimpleImputer::new(ImputationStrategy::Mean);
        let err = imputer.fit(&df).unwrap_err();
        assert_eq!(err.error_code(), "NO_VALID_VALUES");
    }

    #[test]
    fn test_fit_non_numeric_is_error() {
        let df = df!["name" => [Some("a"), None]].unwrap();
        let mut imputer = SimpleImputer::new(ImputationStrategy::Median);
        let err = imputer.fit(&df).unwrap_err();
        assert_eq!(err.error_code(), "IMPUTATION_FAILED");
    }

    // ========================================================================
    // transform() tests
    // ========================================================================

    #[test]
    fn test_transform_fills_with_training_statistics() {
        let train = df![
            "a" => [Some(10.0), None, Some(20.0)],
        ]
        .unwrap();
        let test = df![
            "a" => [None, Some(1000.0), None],
        ]
        .unwrap();

        let mut imputer = SimpleImputer::new(ImputationStrategy::Mean);
        imputer.fit(&train).unwrap();
        let filled = imputer.transform(&test).unwrap();

        // test values never influence the fill
        assert_eq!(value_at(&filled, "a", 0), 15.0);
        assert_eq!(value_at(&filled, "a", 1), 1000.0);
        assert_eq!(value_at(&filled, "a", 2), 15.0);
    }

    #[test]
    fn test_fit_transform_leaves_no_nulls() {
        let df = df![
            "a" => [Some(1.0), None, Some(3.0), None],
            "b" => [None, Some(2.0), Some(2.0), Some(8.0)],
        ]
        .unwrap();
        let mut imputer = SimpleImputer::new(ImputationStrategy::Median);
        let filled = imputer.fit_transform(&df).unwrap();

        assert_eq!(count_missing(&filled), 0);
        assert_eq!(value_at(&filled, "a", 1), 2.0);
        assert_eq!(value_at(&filled, "b", 0), 2.0);
        assert!(matches!(filled.column("a").unwrap().dtype(), DataType::Float64));
    }

    #[test]
    fn test_transform_preserves_observed_values() {
        let df = df!["a" => [Some(10.0), None, Some(20.0)]].unwrap();
        let mut imputer = SimpleImputer::new(ImputationStrategy::Mean);
        let filled = imputer.fit_transform(&df).unwrap();
        assert_eq!(value_at(&filled, "a", 0), 10.0);
        assert_eq!(value_at(&filled, "a", 2), 20.0);
    }

    #[test]
    fn test_transform_before_fit_is_error() {
        let df = df!["a" => [1.0]].unwrap();
        let imputer = SimpleImputer::new(ImputationStrategy::Mean);
        let err = imputer.transform(&df).unwrap_err();
        assert_eq!(err.error_code(), "NOT_FITTED");
    }

    #[test]
    fn test_transform_column_mismatch_is_error() {
        let train = df!["a" => [1.0, 2.0]].unwrap();
        let other = df!["b" => [Some(1.0), None]].unwrap();
        let mut imputer = SimpleImputer::new(ImputationStrategy::Mean);
        imputer.fit(&train).unwrap();
        let err = imputer.transform(&other).unwrap_err();
        assert_eq!(err.error_code(), "SHAPE_MISMATCH");
    }

    #[test]
    fn test_name() {
        assert_eq!(SimpleImputer::new(ImputationStrategy::Mean).name(), "mean");
        assert_eq!(SimpleImputer::new(ImputationStrategy::Median).name(), "median");
    }
}
