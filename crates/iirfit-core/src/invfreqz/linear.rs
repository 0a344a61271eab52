//! Weighted linear least-squares estimate
//!
//! Linearizes the rational fit `B/A ≈ H` as `A·H − B ≈ 0` (equation error)
//! and solves the resulting complex least-squares problem through its normal
//! equations.

use log::debug;
use ndarray::{s, Array1, Array2};
use num_complex::Complex64;

use crate::error::{FitError, Result};
use crate::filter::TransferFunction;
use crate::math::linalg;
use crate::samples::FrequencySamples;

/// Complex exponential basis `e^{-jkω}` with one row per frequency and
/// columns k = 0..n_cols
pub(crate) fn exp_basis(omega: &Array1<f64>, n_cols: usize) -> Array2<Complex64> {
    Array2::from_shape_fn((omega.len(), n_cols), |(i, k)| {
        Complex64::from_polar(1.0, -(k as f64) * omega[i])
    })
}

/// Initial `(B, A)` estimate from the weighted linear least-squares problem
///
/// # Arguments
/// * `samples` - Target response
/// * `nb` - Numerator order; the numerator gets `nb + 1` coefficients
/// * `na` - Denominator order
/// * `real` - Constrain the coefficients to be real
///
/// # Returns
/// A transfer function with `a[0] == 1`. The denominator may be unstable.
///
/// # Errors
/// `Numerical` if the normal equations are singular.
pub fn estimate(
    samples: &FrequencySamples,
    nb: usize,
    na: usize,
    real: bool,
) -> Result<TransferFunction> {
    let n_freqs = samples.len();
    let nb1 = nb + 1;
    let n_unknowns = na + nb1;

    let om = exp_basis(samples.omega(), nb.max(na) + 1);
    let h = samples.response();
    let wf = samples.sqrt_weight();

    // Columns: H·e^{-jkω} for k = 1..na, then −e^{-jkω} for k = 0..nb
    let mut d = Array2::<Complex64>::zeros((n_freqs, n_unknowns));
    for i in 0..n_freqs {
        for k in 0..na {
            d[[i, k]] = h[i] * om[[i, k + 1]] * wf[i];
        }
        for k in 0..nb1 {
            d[[i, na + k]] = -om[[i, k]] * wf[i];
        }
    }
    let y = Array1::from_shape_fn(n_freqs, |i| -h[i] * wf[i]);

    let (r, v) = linalg::normal_equations(&d, &y, real);
    let theta = linalg::solve_by_inverse(&r, &v, real).ok_or_else(|| {
        FitError::Numerical(format!(
            "singular normal equations in linear estimate (nb={}, na={}, {} samples)",
            nb, na, n_freqs
        ))
    })?;

    let mut a = Array1::<Complex64>::zeros(na + 1);
    a[0] = Complex64::new(1.0, 0.0);
    a.slice_mut(s![1..]).assign(&theta.slice(s![..na]));
    let b = theta.slice(s![na..]).to_owned();

    debug!(
        "linear estimate: nb={}, na={}, {} samples, real={}",
        nb, na, n_freqs, real
    );

    Ok(TransferFunction::new(b, a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_exp_basis() {
        let om = exp_basis(&Array1::from_vec(vec![0.0, PI / 2.0]), 3);
        assert_eq!(om.dim(), (2, 3));
        assert_relative_eq!(om[[0, 2]].re, 1.0, epsilon = 1e-15);
        // e^{-j·π/2} = -j
        assert_relative_eq!(om[[1, 1]].im, -1.0, epsilon = 1e-15);
        assert!(om[[1, 1]].re.abs() < 1e-15);
    }

    #[test]
    fn test_order_zero_is_weighted_mean() {
        let omega = [0.1, 0.5, 1.0];
        let h = [
            Complex64::new(1.0, 0.0),
            Complex64::new(2.0, 0.0),
            Complex64::new(4.0, 0.0),
        ];
        let wt = [1.0, 1.0, 2.0];
        let samples = FrequencySamples::new(&omega, &h, Some(&wt)).unwrap();

        let tf = estimate(&samples, 0, 0, true).unwrap();
        assert_eq!(tf.b.len(), 1);
        assert_eq!(tf.a.len(), 1);
        assert_eq!(tf.a[0], Complex64::new(1.0, 0.0));
        // (1 + 2 + 2·4) / 4
        assert_relative_eq!(tf.b[0].re, 11.0 / 4.0, epsilon = 1e-12);
        assert_eq!(tf.b[0].im, 0.0);
    }

    #[test]
    fn test_recovers_first_order_section() {
        let truth = TransferFunction::from_real(&[0.2, 0.1], &[1.0, -0.6]);
        let omega: Vec<f64> = (0..16).map(|k| PI * k as f64 / 16.0).collect();
        let h = truth.response(&omega);
        let samples = FrequencySamples::new(&omega, h.as_slice().unwrap(), None).unwrap();

        let tf = estimate(&samples, 1, 1, true).unwrap();
        assert_relative_eq!(tf.a[1].re, -0.6, epsilon = 1e-9);
        assert_relative_eq!(tf.b[0].re, 0.2, epsilon = 1e-9);
        assert_relative_eq!(tf.b[1].re, 0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_underdetermined_is_numerical_error() {
        // One real sample at DC cannot determine three unknowns
        let samples = FrequencySamples::new(&[0.0], &[Complex64::new(1.0, 0.0)], None).unwrap();
        let err = estimate(&samples, 1, 1, true).unwrap_err();
        assert!(err.is_numerical_error());
    }
}
