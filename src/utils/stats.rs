//! Statistical utility functions.

/// Calculate the mean of a slice.
///
/// Returns NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate the mean absolute value of a slice.
pub fn mean_abs(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().map(|v| v.abs()).sum::<f64>() / values.len() as f64
}

/// Root mean square of a slice (RMSE of residuals against zero).
pub fn rmse(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    (values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64).sqrt()
}

/// Round to a fixed number of decimal digits.
///
/// # Example
/// ```
/// use residual_diagnostics::utils::round_to;
///
/// assert_eq!(round_to(0.04321, 3), 0.043);
/// ```
pub fn round_to(value: f64, digits: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

/// Keep only the finite values of a slice, preserving order.
pub fn finite_values(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_calculates_correctly() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        assert_relative_eq!(mean(&[10.0]), 10.0, epsilon = 1e-10);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn mean_abs_ignores_sign() {
        assert_relative_eq!(mean_abs(&[-0.2, 0.2, -0.1, 0.1]), 0.15, epsilon = 1e-12);
        assert!(mean_abs(&[]).is_nan());
    }

    #[test]
    fn rmse_of_residuals() {
        assert_relative_eq!(rmse(&[3.0, -4.0]), (12.5_f64).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(rmse(&[0.1, -0.1, 0.1]), 0.1, epsilon = 1e-12);
        assert!(rmse(&[]).is_nan());
    }

    #[test]
    fn round_to_three_digits() {
        assert_eq!(round_to(0.04321, 3), 0.043);
        assert_eq!(round_to(0.0216, 3), 0.022);
        assert_eq!(round_to(0.9999, 3), 1.0);
        assert!(round_to(f64::NAN, 3).is_nan());
    }

    #[test]
    fn finite_values_drops_nan_and_inf() {
        let v = finite_values(&[1.0, f64::NAN, 2.0, f64::INFINITY, -3.0]);
        assert_eq!(v, vec![1.0, 2.0, -3.0]);
    }
}
