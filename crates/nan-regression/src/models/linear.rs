//! Ordinary least squares with an intercept.

use super::Regressor;
use crate::error::{NanRegressionError, Result};
use crate::utils::{count_nan, frame_to_matrix};
use ndarray::{Array1, Array2, Axis};
use polars::prelude::*;
use tracing::{debug, warn};

/// Solve the symmetric positive-definite system `a * x = b` by Cholesky
/// decomposition. Returns `None` if `a` is not positive definite.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // Forward substitution: L * y = b
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * y[j];
        }
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    // Backward substitution: L^T * x = y
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (y[i] - sum) / l[[i, i]];
    }

    Some(x)
}

/// Solve the normal equations, adding a small ridge if the Gram matrix is
/// singular (collinear or constant columns, fewer rows than columns).
fn solve_normal_equations(gram: &Array2<f64>, rhs: &Array1<f64>) -> Result<Array1<f64>> {
    if let Some(solution) = cholesky_solve(gram, rhs) {
        return Ok(solution);
    }

    let n = gram.nrows();
    let mean_diag = gram.diag().iter().map(|v| v.abs()).sum::<f64>() / n.max(1) as f64;
    let ridge = (1e-8 * mean_diag).max(1e-12);
    warn!("Gram matrix is singular, retrying with ridge {:e}", ridge);

    let mut regularized = gram.clone();
    for k in 0..n {
        regularized[[k, k]] += ridge;
    }
    cholesky_solve(&regularized, rhs).ok_or_else(|| {
        NanRegressionError::SingularMatrix(format!(
            "{}x{} Gram matrix is not positive definite even with ridge {:e}",
            n, n, ridge
        ))
    })
}

/// Ordinary least squares regression.
#[derive(Debug, Clone, Default)]
pub struct LinearRegression {
    coefficients: Option<Array1<f64>>,
    intercept: f64,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fitted weights, one per feature.
    pub fn coefficients(&self) -> Option<&Array1<f64>> {
        self.coefficients.as_ref()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Fit on a dense matrix without missing values.
    pub fn fit_matrix(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        if x.nrows() == 0 {
            return Err(NanRegressionError::EmptyInput(
                "LinearRegression needs at least one training row".to_string(),
            ));
        }
        if x.nrows() != y.len() {
            return Err(NanRegressionError::ShapeMismatch {
                expected: format!("{} targets", x.nrows()),
                found: format!("{} targets", y.len()),
            });
        }
        let missing = count_nan(x) + y.iter().filter(|v| v.is_nan()).count();
        if missing > 0 {
            return Err(NanRegressionError::MissingValuesInInput {
                model: "LinearRegression".to_string(),
                count: missing,
            });
        }

        let n = x.nrows() as f64;
        let x_mean = x.sum_axis(Axis(0)) / n;
        let y_mean = y.sum() / n;
        let xc = x - &x_mean;
        let yc = y - y_mean;

        let gram = xc.t().dot(&xc);
        let rhs = xc.t().dot(&yc);
        let coefficients = solve_normal_equations(&gram, &rhs)?;

        self.intercept = y_mean - x_mean.dot(&coefficients);
        debug!(
            "LinearRegression fitted on {} rows: intercept {:.4}, coefficients {:?}",
            x.nrows(),
            self.intercept,
            coefficients.to_vec()
        );
        self.coefficients = Some(coefficients);
        Ok(())
    }

    /// Predict on a dense matrix without missing values.
    pub fn predict_matrix(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or_else(|| NanRegressionError::NotFitted("LinearRegression".to_string()))?;
        if x.ncols() != coefficients.len() {
            return Err(NanRegressionError::ShapeMismatch {
                expected: format!("{} features", coefficients.len()),
                found: format!("{} features", x.ncols()),
            });
        }
        let missing = count_nan(x);
        if missing > 0 {
            return Err(NanRegressionError::MissingValuesInInput {
                model: "LinearRegression".to_string(),
                count: missing,
            });
        }
        Ok(x.dot(coefficients) + self.intercept)
    }
}

impl Regressor for LinearRegression {
    fn name(&self) -> String {
        "LinearRegression".to_string()
    }

    fn fit(&mut self, x: &DataFrame, y: &Array1<f64>) -> Result<()> {
        let matrix = frame_to_matrix(x)?;
        self.fit_matrix(&matrix, y)
    }

    fn predict(&self, x: &DataFrame) -> Result<Array1<f64>> {
        let matrix = frame_to_matrix(x)?;
        self.predict_matrix(&matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_recovers_exact_coefficients() {
        let x = array![
            [0.0, 1.0],
            [1.0, 0.0],
            [2.0, 3.0],
            [3.0, 1.0],
            [4.0, 5.0],
        ];
        let y: Array1<f64> = x.rows().into_iter().map(|r| 2.0 * r[0] - 3.0 * r[1] + 7.0).collect();

        let mut model = LinearRegression::new();
        model.fit_matrix(&x, &y).unwrap();

        let coef = model.coefficients().unwrap();
        assert!((coef[0] - 2.0).abs() < 1e-9);
        assert!((coef[1] + 3.0).abs() < 1e-9);
        assert!((model.intercept() - 7.0).abs() < 1e-9);

        let pred = model.predict_matrix(&x).unwrap();
        for (p, t) in pred.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-9);
        }
    }

    #[test]
    fn test_fit_through_dataframe() {
        let df = df![
            "x0" => [1.0, 2.0, 3.0, 4.0],
        ]
        .unwrap();
        let y = array![3.0, 5.0, 7.0, 9.0];

        let mut model = LinearRegression::new();
        model.fit(&df, &y).unwrap();
        assert!((model.score(&df, &y).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_column_gets_zero_weight() {
        let x = array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0]];
        let y = array![2.0, 4.0, 6.0];

        let mut model = LinearRegression::new();
        model.fit_matrix(&x, &y).unwrap();
        let coef = model.coefficients().unwrap();
        assert!((coef[0] - 2.0).abs() < 1e-6);
        assert!(coef[1].abs() < 1e-6);
    }

    #[test]
    fn test_single_row_fits_its_target() {
        let x = array![[1.0, 2.0]];
        let y = array![4.0];

        let mut model = LinearRegression::new();
        model.fit_matrix(&x, &y).unwrap();
        let pred = model.predict_matrix(&x).unwrap();
        assert!((pred[0] - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_missing_values() {
        let df = df![
            "x0" => [Some(1.0), None, Some(3.0)],
        ]
        .unwrap();
        let y = array![1.0, 2.0, 3.0];

        let err = LinearRegression::new().fit(&df, &y).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_VALUES_IN_INPUT");
    }

    #[test]
    fn test_rejects_empty_input() {
        let x = Array2::<f64>::zeros((0, 2));
        let y = Array1::<f64>::zeros(0);
        let err = LinearRegression::new().fit_matrix(&x, &y).unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_INPUT");
    }

    #[test]
    fn test_predict_before_fit() {
        let err = LinearRegression::new()
            .predict_matrix(&array![[1.0]])
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_FITTED");
    }

    #[test]
    fn test_predict_wrong_width() {
        let mut model = LinearRegression::new();
        model
            .fit_matrix(&array![[1.0], [2.0]], &array![1.0, 2.0])
            .unwrap();
        let err = model.predict_matrix(&array![[1.0, 2.0]]).unwrap_err();
        assert_eq!(err.error_code(), "SHAPE_MISMATCH");
    }
}
