//! Regression evaluation metrics

/// Mean absolute error
pub fn mean_absolute_error(actual: &[f32], predicted: &[f32]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| f64::from((a - p).abs()))
        .sum();
    sum / actual.len() as f64
}

/// Root mean squared error
pub fn root_mean_squared_error(actual: &[f32], predicted: &[f32]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| f64::from(a - p).powi(2))
        .sum();
    (sum / actual.len() as f64).sqrt()
}

/// Coefficient of determination (r² score)
///
/// 1.0 for a perfect fit, 0.0 for a mean-only predictor, negative when the
/// model is worse than predicting the mean.
pub fn r2_score(actual: &[f32], predicted: &[f32]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mean: f64 = actual.iter().map(|a| f64::from(*a)).sum::<f64>() / actual.len() as f64;
    let ss_tot: f64 = actual.iter().map(|a| (f64::from(*a) - mean).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| f64::from(a - p).powi(2))
        .sum();

    if ss_tot.abs() < f64::EPSILON {
        return 0.0;
    }
    1.0 - ss_res / ss_tot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_predictions() {
        let actual = vec![100.0, 200.0, 300.0];
        assert_eq!(mean_absolute_error(&actual, &actual), 0.0);
        assert_eq!(root_mean_squared_error(&actual, &actual), 0.0);
        assert!((r2_score(&actual, &actual) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_mean_absolute_error() {
        let actual = vec![100.0, 200.0];
        let predicted = vec![110.0, 190.0];
        assert!((mean_absolute_error(&actual, &predicted) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_rmse_weights_large_errors() {
        let actual = vec![100.0, 100.0];
        let predicted = vec![100.0, 120.0];
        let rmse = root_mean_squared_error(&actual, &predicted);
        assert!((rmse - (200.0f64).sqrt()).abs() < 1e-6);
        assert!(rmse > mean_absolute_error(&actual, &predicted));
    }

    #[test]
    fn test_r2_of_mean_predictor_is_zero() {
        let actual = vec![100.0, 200.0, 300.0];
        let predicted = vec![200.0, 200.0, 200.0];
        assert!(r2_score(&actual, &predicted).abs() < 1e-9);
    }

    #[test]
    fn test_r2_constant_target_is_zero() {
        let actual = vec![200.0, 200.0];
        let predicted = vec![100.0, 300.0];
        assert_eq!(r2_score(&actual, &predicted), 0.0);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(mean_absolute_error(&[], &[]), 0.0);
        assert_eq!(root_mean_squared_error(&[], &[]), 0.0);
        assert_eq!(r2_score(&[], &[]), 0.0);
    }
}
