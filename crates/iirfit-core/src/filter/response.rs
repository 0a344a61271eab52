//! Model response evaluation
//!
//! Functions for evaluating a rational model on the unit circle and for
//! comparing it against a target response.

use ndarray::Array1;
use num_complex::Complex64;

use crate::math::polynomial::eval_z_inverse;

/// Evaluate `B(e^{jω}) / A(e^{jω})` at each frequency
///
/// Computes: H(ω) = Σ b_k e^{-jkω} / Σ a_k e^{-jkω}
///
/// # Arguments
/// * `b` - Numerator coefficients
/// * `a` - Denominator coefficients
/// * `omega` - Normalized angular frequencies (rad/sample)
pub fn evaluate_response(b: &[Complex64], a: &[Complex64], omega: &[f64]) -> Array1<Complex64> {
    omega
        .iter()
        .map(|&w| {
            let u = Complex64::from_polar(1.0, -w);
            eval_z_inverse(b, u) / eval_z_inverse(a, u)
        })
        .collect()
}

/// Weighted squared error `Σ w_i |model_i - target_i|²`
///
/// This is the cost the Gauss-Newton refinement minimizes.
pub fn weighted_squared_error(
    model_response: &Array1<Complex64>,
    target_response: &Array1<Complex64>,
    weights: &Array1<f64>,
) -> f64 {
    model_response
        .iter()
        .zip(target_response.iter())
        .zip(weights.iter())
        .map(|((m, t), w)| w * (m - t).norm_sqr())
        .sum()
}

/// Calculate RMS error between model and target responses
pub fn rms_error(model_response: &Array1<Complex64>, target_response: &Array1<Complex64>) -> f64 {
    if model_response.len() != target_response.len() || model_response.is_empty() {
        return f64::NAN;
    }

    let n = model_response.len() as f64;
    let error_sum: f64 = model_response
        .iter()
        .zip(target_response.iter())
        .map(|(m, t)| (m - t).norm_sqr())
        .sum();

    (error_sum / n).sqrt()
}

/// Calculate maximum absolute error between model and target responses
pub fn max_error(model_response: &Array1<Complex64>, target_response: &Array1<Complex64>) -> f64 {
    if model_response.len() != target_response.len() || model_response.is_empty() {
        return f64::NAN;
    }

    model_response
        .iter()
        .zip(target_response.iter())
        .map(|(m, t)| (m - t).norm())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_evaluate_response_constant() {
        let b = vec![Complex64::new(0.5, 0.0)];
        let a = vec![Complex64::new(1.0, 0.0)];
        let response = evaluate_response(&b, &a, &[0.0, 1.0, 2.0]);

        for h in response.iter() {
            assert_relative_eq!(h.re, 0.5, epsilon = 1e-12);
            assert_relative_eq!(h.im, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_evaluate_response_one_pole() {
        // H(z) = 1 / (1 - 0.5 z⁻¹): DC gain 2, Nyquist gain 2/3
        let b = vec![Complex64::new(1.0, 0.0)];
        let a = vec![Complex64::new(1.0, 0.0), Complex64::new(-0.5, 0.0)];
        let response = evaluate_response(&b, &a, &[0.0, PI]);

        assert_relative_eq!(response[0].re, 2.0, epsilon = 1e-12);
        assert_relative_eq!(response[1].re, 2.0 / 3.0, epsilon = 1e-12);
        assert!(response[1].im.abs() < 1e-12);
    }

    #[test]
    fn test_weighted_squared_error() {
        let model = Array1::from_vec(vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 1.0)]);
        let target = Array1::from_vec(vec![Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0)]);
        let weights = Array1::from_vec(vec![2.0, 0.5]);

        assert_relative_eq!(
            weighted_squared_error(&model, &target, &weights),
            2.5,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_rms_error() {
        let model = Array1::from_vec(vec![
            Complex64::new(1.0, 0.0),
            Complex64::new(2.0, 0.0),
            Complex64::new(3.0, 0.0),
        ]);
        let target = Array1::from_vec(vec![
            Complex64::new(1.1, 0.0),
            Complex64::new(2.1, 0.0),
            Complex64::new(3.1, 0.0),
        ]);

        let error = rms_error(&model, &target);
        assert_relative_eq!(error, 0.1, epsilon = 1e-10);
        assert_relative_eq!(max_error(&model, &target), 0.1, epsilon = 1e-10);
    }
}
