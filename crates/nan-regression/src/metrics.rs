//! Regression metrics.

use crate::error::{NanRegressionError, Result};
use ndarray::Array1;
use tracing::warn;

/// Coefficient of determination, `1 - SS_res / SS_tot`.
///
/// With fewer than two samples the score is undefined and `NaN` is returned.
/// When the targets are constant the score is 1.0 for a perfect prediction and
/// 0.0 otherwise.
pub fn r2_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
    if y_true.len() != y_pred.len() {
        return Err(NanRegressionError::ShapeMismatch {
            expected: format!("{} predictions", y_true.len()),
            found: format!("{} predictions", y_pred.len()),
        });
    }

    let n = y_true.len();
    if n < 2 {
        warn!("R² score is not well-defined with {} sample(s)", n);
        return Ok(f64::NAN);
    }

    let mean = y_true.sum() / n as f64;
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_perfect_prediction() {
        let y = array![1.0, 2.0, 3.0];
        assert_eq!(r2_score(&y, &y).unwrap(), 1.0);
    }

    #[test]
    fn test_mean_prediction_scores_zero() {
        let y = array![1.0, 2.0, 3.0];
        let pred = array![2.0, 2.0, 2.0];
        assert!(r2_score(&y, &pred).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_known_value() {
        let y = array![3.0, -0.5, 2.0, 7.0];
        let pred = array![2.5, 0.0, 2.0, 8.0];
        let score = r2_score(&y, &pred).unwrap();
        assert!((score - 0.948_608_137_044_967_9).abs() < 1e-12);
    }

    #[test]
    fn test_worse_than_mean_is_negative() {
        let y = array![1.0, 2.0, 3.0];
        let pred = array![3.0, 2.0, 1.0];
        assert!((r2_score(&y, &pred).unwrap() + 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_targets() {
        let y = array![4.0, 4.0, 4.0];
        assert_eq!(r2_score(&y, &y).unwrap(), 1.0);
        assert_eq!(r2_score(&y, &array![4.0, 4.0, 5.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_single_sample_is_nan() {
        assert!(r2_score(&array![1.0], &array![1.0]).unwrap().is_nan());
    }

    #[test]
    fn test_length_mismatch() {
        let err = r2_score(&array![1.0, 2.0], &array![1.0]).unwrap_err();
        assert_eq!(err.error_code(), "SHAPE_MISMATCH");
    }
}
