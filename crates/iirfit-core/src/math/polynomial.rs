//! Polynomial utilities
//!
//! Coefficients are stored highest power first, so `[1, -0.5]` is `x - 0.5`.
//! Read as a filter polynomial the same slice is `1 - 0.5 z⁻¹`, which is why
//! [`eval_z_inverse`] walks the coefficients in ascending powers of `z⁻¹`.

use log::debug;
use ndarray::Array2;
use num_complex::Complex64;

use crate::constants::{
    DURAND_KERNER_MAX_ITER, DURAND_KERNER_TOL, ROOT_RESIDUAL_TOL, SCHUR_EPS, SCHUR_MAX_ITER,
};
use crate::error::{FitError, Result};
use crate::math::linalg;

/// Number of leading coefficients that are exactly zero
pub fn leading_zeros(p: &[Complex64]) -> usize {
    p.iter().take_while(|c| c.norm() == 0.0).count()
}

/// Find all roots of a polynomial
///
/// Leading zeros are ignored, trailing zeros become roots at the origin, and
/// the remaining roots are the eigenvalues of the companion matrix. When the
/// Schur iteration stagnates (companion matrices of `x⁴ + 1` or `x⁸ − 2` are
/// scaled permutations and the shifted QR step leaves them unchanged) the
/// roots are found by Durand-Kerner iteration instead.
pub fn roots(p: &[Complex64]) -> Result<Vec<Complex64>> {
    let start = leading_zeros(p);
    if start == p.len() {
        return Ok(Vec::new());
    }
    let p = &p[start..];
    let n_trailing = p.iter().rev().take_while(|c| c.norm() == 0.0).count();
    let core = &p[..p.len() - n_trailing];

    let degree = core.len() - 1;
    let mut result = Vec::with_capacity(degree + n_trailing);

    if degree > 0 {
        let lead = core[0];
        let mut companion = Array2::<Complex64>::zeros((degree, degree));
        for j in 0..degree {
            companion[[0, j]] = -core[j + 1] / lead;
        }
        for i in 1..degree {
            companion[[i, i - 1]] = Complex64::new(1.0, 0.0);
        }

        match linalg::eigenvalues(&companion, SCHUR_EPS, SCHUR_MAX_ITER) {
            Ok(eigs) => result.extend(eigs),
            Err(e) => {
                debug!("companion eigenvalues failed ({}), using Durand-Kerner", e);
                result.extend(durand_kerner(core)?);
            }
        }
    }

    result.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(n_trailing));
    Ok(result)
}

/// Roots by simultaneous Weierstrass (Durand-Kerner) iteration
///
/// `core` must have a nonzero first and last coefficient. The start points
/// lie on a circle of the geometric-mean root radius, rotated off the real
/// axis. Every root is accepted only if its relative backward error is below
/// `ROOT_RESIDUAL_TOL`, which also admits multiple roots whose accuracy is
/// limited to roughly `ε^{1/m}`.
fn durand_kerner(core: &[Complex64]) -> Result<Vec<Complex64>> {
    let degree = core.len() - 1;
    let lead = core[0];
    let monic: Vec<Complex64> = core.iter().map(|&c| c / lead).collect();

    let radius = monic[degree].norm().powf(1.0 / degree as f64);
    let mut z: Vec<Complex64> = (0..degree)
        .map(|k| {
            let angle = 2.0 * std::f64::consts::PI * (k as f64 + 0.25) / degree as f64 + 0.4;
            Complex64::from_polar(radius, angle)
        })
        .collect();

    for _ in 0..DURAND_KERNER_MAX_ITER {
        let mut max_correction: f64 = 0.0;
        for i in 0..degree {
            let value = eval_monic(&monic, z[i]);
            let denom: Complex64 = (0..degree)
                .filter(|&j| j != i)
                .map(|j| z[i] - z[j])
                .product();
            if denom.norm() == 0.0 {
                continue;
            }
            let correction = value / denom;
            z[i] -= correction;
            max_correction = max_correction.max(correction.norm() / z[i].norm().max(1.0));
        }
        if max_correction <= DURAND_KERNER_TOL {
            break;
        }
    }

    for &r in &z {
        let scale: f64 = monic
            .iter()
            .enumerate()
            .map(|(k, c)| c.norm() * r.norm().powi((degree - k) as i32))
            .sum();
        let residual = eval_monic(&monic, r).norm();
        if !(residual.is_finite() && residual <= ROOT_RESIDUAL_TOL * scale) {
            return Err(FitError::Numerical(format!(
                "root finding failed: Durand-Kerner residual {:.3e} at {}",
                residual, r
            )));
        }
    }

    Ok(z)
}

/// Horner evaluation of a highest-power-first polynomial at `x`
#[inline]
fn eval_monic(p: &[Complex64], x: Complex64) -> Complex64 {
    p.iter().fold(Complex64::new(0.0, 0.0), |acc, &c| acc * x + c)
}

/// Monic polynomial with the given roots
pub fn poly_from_roots(roots: &[Complex64]) -> Vec<Complex64> {
    let mut p = vec![Complex64::new(1.0, 0.0)];
    for &r in roots {
        p.push(Complex64::new(0.0, 0.0));
        for k in (1..p.len()).rev() {
            let prev = p[k - 1];
            p[k] -= r * prev;
        }
    }
    p
}

/// Polynomial product (coefficient convolution)
pub fn multiply(p: &[Complex64], q: &[Complex64]) -> Vec<Complex64> {
    if p.is_empty() || q.is_empty() {
        return Vec::new();
    }
    let mut out = vec![Complex64::new(0.0, 0.0); p.len() + q.len() - 1];
    for (i, &a) in p.iter().enumerate() {
        for (j, &b) in q.iter().enumerate() {
            out[i + j] += a * b;
        }
    }
    out
}

/// Evaluate `c[0] + c[1]·u + c[2]·u² + …` with Horner's scheme
///
/// With `u = e^{-jω}` this is the frequency response of a filter polynomial.
#[inline]
pub fn eval_z_inverse(c: &[Complex64], u: Complex64) -> Complex64 {
    c.iter()
        .rev()
        .fold(Complex64::new(0.0, 0.0), |acc, &coeff| acc * u + coeff)
}

/// Promote real coefficients to complex
pub fn to_complex(p: &[f64]) -> Vec<Complex64> {
    p.iter().map(|&x| Complex64::new(x, 0.0)).collect()
}
