//! Shared utilities for moving data between polars and ndarray.
//!
//! Tabular data lives in polars `DataFrame`s where a missing entry is a null.
//! Numeric kernels work on `ndarray` matrices where a missing entry is `NaN`.
//! The helpers here are the only place the two representations meet.

use crate::error::{NanRegressionError, Result};
use ndarray::Array2;
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Column names used for generated features: `x0`, `x1`, ...
pub fn feature_names(n_features: usize) -> Vec<String> {
    (0..n_features).map(|j| format!("x{}", j)).collect()
}

/// Names of all columns in `df`, in order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// Conversions
// =============================================================================

/// Read every column of `df` as `f64`, keeping nulls as `None`.
///
/// Returns a row-major matrix. All columns must be numeric.
pub fn frame_to_options(df: &DataFrame) -> Result<Vec<Vec<Option<f64>>>> {
    let n_rows = df.height();
    let n_cols = df.width();
    let mut matrix = vec![vec![None; n_cols]; n_rows];

    for (col_idx, column) in df.get_columns().iter().enumerate() {
        if !is_numeric_dtype(column.dtype()) {
            return Err(NanRegressionError::InvalidConfig(format!(
                "column '{}' has non-numeric type {}",
                column.name(),
                column.dtype()
            )));
        }
        let float_column = column.cast(&DataType::Float64)?;
        let values = float_column.f64()?;

        for (row_idx, row) in matrix.iter_mut().enumerate() {
            row[col_idx] = values.get(row_idx).filter(|v| !v.is_nan());
        }
    }

    Ok(matrix)
}

/// Convert `df` into a dense matrix with `NaN` marking missing entries.
pub fn frame_to_matrix(df: &DataFrame) -> Result<Array2<f64>> {
    let rows = frame_to_options(df)?;
    let n_cols = df.width();
    let mut matrix = Array2::from_elem((rows.len(), n_cols), f64::NAN);
    for (i, row) in rows.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            if let Some(v) = value {
                matrix[[i, j]] = *v;
            }
        }
    }
    Ok(matrix)
}

/// Build a `DataFrame` from row-major optional values.
pub fn options_to_frame(rows: &[Vec<Option<f64>>], names: &[String]) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(names.len());
    for (col_idx, name) in names.iter().enumerate() {
        let mut values = Vec::with_capacity(rows.len());
        for row in rows {
            let value = row.get(col_idx).copied().ok_or_else(|| {
                NanRegressionError::ShapeMismatch {
                    expected: format!("{} columns", names.len()),
                    found: format!("{} columns", row.len()),
                }
            })?;
            values.push(value);
        }
        columns.push(Column::new(name.as_str().into(), values));
    }
    Ok(DataFrame::new(columns)?)
}

/// Build a `DataFrame` from a dense matrix, turning `NaN` into nulls.
pub fn matrix_to_frame(matrix: &Array2<f64>, names: &[String]) -> Result<DataFrame> {
    if matrix.ncols() != names.len() {
        return Err(NanRegressionError::ShapeMismatch {
            expected: format!("{} columns", names.len()),
            found: format!("{} columns", matrix.ncols()),
        });
    }
    let columns: Vec<Column> = names
        .iter()
        .enumerate()
        .map(|(j, name)| {
            let values: Vec<Option<f64>> = matrix
                .column(j)
                .iter()
                .map(|v| if v.is_nan() { None } else { Some(*v) })
                .collect();
            Column::new(name.as_str().into(), values)
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}

// =============================================================================
// Missing-Value Helpers
// =============================================================================

/// Total number of missing entries across all columns.
pub fn count_missing(df: &DataFrame) -> usize {
    df.get_columns().iter().map(|c| c.null_count()).sum()
}

/// Number of missing (`NaN`) entries in a dense matrix.
pub fn count_nan(matrix: &Array2<f64>) -> usize {
    matrix.iter().filter(|v| v.is_nan()).count()
}

/// `true` for every row that holds at least one missing value.
pub fn rows_with_missing(df: &DataFrame) -> Vec<bool> {
    let mut mask = vec![false; df.height()];
    for column in df.get_columns() {
        if column.null_count() == 0 {
            continue;
        }
        let nulls = column.is_null();
        for (row_idx, flag) in mask.iter_mut().enumerate() {
            if nulls.get(row_idx).unwrap_or(false) {
                *flag = true;
            }
        }
    }
    mask
}

/// Keep the rows of `df` whose entry in `keep` is `true`.
pub fn filter_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    if keep.len() != df.height() {
        return Err(NanRegressionError::ShapeMismatch {
            expected: format!("mask of length {}", df.height()),
            found: format!("mask of length {}", keep.len()),
        });
    }
    let mask = BooleanChunked::from_slice("mask".into(), keep);
    Ok(df.filter(&mask)?)
}
