use super::Strategy;
use crate::data::TrainTestSplit;
use crate::error::{Result, ResultExt};
use crate::models::{LinearRegression, Regressor};
use crate::types::{RowDeletionStats, StrategyKind, StrategyReport};
use crate::utils::{filter_rows, rows_with_missing};
use ndarray::{Array1, Axis};
use polars::prelude::*;
use tracing::debug;

pub const NO_CLEAN_TEST_DATA: &str = "No clean test data available after dropping NaN values";

/// Drops every row holding a missing value from both partitions, then fits
/// ordinary least squares on what is left.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropRows;

/// Rows of `x` (and matching targets) without any missing value.
fn complete_rows(x: &DataFrame, y: &Array1<f64>) -> Result<(DataFrame, Array1<f64>)> {
    let keep: Vec<bool> = rows_with_missing(x).into_iter().map(|m| !m).collect();
    let kept_indices: Vec<usize> = keep
        .iter()
        .enumerate()
        .filter_map(|(i, k)| k.then_some(i))
        .collect();
    Ok((filter_rows(x, &keep)?, y.select(Axis(0), &kept_indices)))
}

impl Strategy for DropRows {
    fn kind(&self) -> StrategyKind {
        StrategyKind::DropRows
    }

    fn run(&self, split: &TrainTestSplit) -> Result<StrategyReport> {
        let (x_train, y_train) =
            complete_rows(&split.x_train, &split.y_train).context("dropping incomplete training rows")?;
        let (x_test, y_test) =
            complete_rows(&split.x_test, &split.y_test).context("dropping incomplete test rows")?;

        let stats = RowDeletionStats {
            clean_shape: x_train.shape(),
            rows_dropped: split.x_train.height() - x_train.height(),
            clean_test_rows: x_test.height(),
        };
        debug!(
            "Dropped {} training rows and {} test rows",
            stats.rows_dropped,
            split.x_test.height() - x_test.height()
        );

        let mut model = LinearRegression::new();
        model.fit(&x_train, &y_train)?;

        let report = if x_test.height() > 0 {
            let score = model.score(&x_test, &y_test)?;
            StrategyReport::scored(
                self.kind(),
                score,
                format!("LinearRegression on {} complete rows", x_train.height()),
            )
        } else {
            StrategyReport::unavailable(self.kind(), NO_CLEAN_TEST_DATA)
        };
        Ok(report.with_row_deletion(stats))
    }
}
