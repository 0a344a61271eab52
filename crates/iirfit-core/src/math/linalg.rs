//! Linear algebra operations
//!
//! This module provides a unified interface for matrix operations.
//! Uses nalgebra as the backend while callers only ever see ndarray types,
//! so all ndarray<->nalgebra conversions are contained here.

use nalgebra::DMatrix;
use ndarray::{Array1, Array2};
use num_complex::Complex64;

// ============================================================================
// Conversion helpers (internal)
// ============================================================================

/// Convert ndarray Array2<Complex64> to nalgebra DMatrix<Complex<f64>>
#[inline]
fn to_na_complex(a: &Array2<Complex64>) -> DMatrix<nalgebra::Complex<f64>> {
    let (m, n) = a.dim();
    DMatrix::from_fn(m, n, |i, j| {
        nalgebra::Complex::new(a[[i, j]].re, a[[i, j]].im)
    })
}

/// Convert nalgebra DMatrix<Complex<f64>> to ndarray Array2<Complex64>
#[inline]
fn from_na_complex(m: &DMatrix<nalgebra::Complex<f64>>) -> Array2<Complex64> {
    let rows = m.nrows();
    let cols = m.ncols();
    Array2::from_shape_fn((rows, cols), |(i, j)| {
        Complex64::new(m[(i, j)].re, m[(i, j)].im)
    })
}

/// Convert ndarray Array2<f64> to nalgebra DMatrix<f64>
#[inline]
fn to_na_real(a: &Array2<f64>) -> DMatrix<f64> {
    let (m, n) = a.dim();
    DMatrix::from_fn(m, n, |i, j| a[[i, j]])
}

/// Convert nalgebra DMatrix<f64> to ndarray Array2<f64>
#[inline]
fn from_na_real(m: &DMatrix<f64>) -> Array2<f64> {
    let rows = m.nrows();
    let cols = m.ncols();
    Array2::from_shape_fn((rows, cols), |(i, j)| m[(i, j)])
}

// ============================================================================
// Matrix inversion
// ============================================================================

/// Invert a complex matrix
///
/// Returns None if matrix is singular or non-square.
pub fn inv_complex(a: &Array2<Complex64>) -> Option<Array2<Complex64>> {
    let (m, n) = a.dim();
    if m != n || m == 0 {
        return None;
    }

    let mat = to_na_complex(a);
    mat.try_inverse().map(|inv| from_na_complex(&inv))
}

/// Invert a real matrix
///
/// Returns None if matrix is singular or non-square.
pub fn inv_real(a: &Array2<f64>) -> Option<Array2<f64>> {
    let (m, n) = a.dim();
    if m != n || m == 0 {
        return None;
    }

    let mat = to_na_real(a);
    mat.try_inverse().map(|inv| from_na_real(&inv))
}

// ============================================================================
// Normal equations
// ============================================================================

/// Conjugate transpose `Aᴴ`
pub fn adjoint(a: &Array2<Complex64>) -> Array2<Complex64> {
    a.t().mapv(|z| z.conj())
}

/// Frobenius norm of a complex matrix
pub fn frobenius_norm(a: &Array2<Complex64>) -> f64 {
    a.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
}

/// Euclidean norm of a complex vector
pub fn vector_norm(v: &Array1<Complex64>) -> f64 {
    v.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
}

/// Form the normal equations `(DᴴD, Dᴴy)` of the least-squares problem `D·x ≈ y`
///
/// With `real_only` both sides are reduced to their real parts, which yields
/// the least-squares solution constrained to real unknowns.
pub fn normal_equations(
    d: &Array2<Complex64>,
    y: &Array1<Complex64>,
    real_only: bool,
) -> (Array2<Complex64>, Array1<Complex64>) {
    let dh = adjoint(d);
    let mut gram = dh.dot(d);
    let mut rhs = dh.dot(y);

    if real_only {
        gram.mapv_inplace(|z| Complex64::new(z.re, 0.0));
        rhs.mapv_inplace(|z| Complex64::new(z.re, 0.0));
    }

    (gram, rhs)
}

/// Solve `R·x = v` by explicit inversion of `R`
///
/// In `real_only` mode `R` and `v` must already be real (imaginary parts are
/// ignored) and the real inverse is used. Returns None if `R` is singular
/// or the inverse is not finite.
pub fn solve_by_inverse(
    r: &Array2<Complex64>,
    v: &Array1<Complex64>,
    real_only: bool,
) -> Option<Array1<Complex64>> {
    let x = if real_only {
        let r_re = r.mapv(|z| z.re);
        let v_re = v.mapv(|z| z.re);
        inv_real(&r_re)?.dot(&v_re).mapv(|x| Complex64::new(x, 0.0))
    } else {
        inv_complex(r)?.dot(v)
    };

    if x.iter().all(|z| z.re.is_finite() && z.im.is_finite()) {
        Some(x)
    } else {
        None
    }
}

// ============================================================================
// Eigenvalue decomposition
// ============================================================================

/// Compute the eigenvalues of a complex square matrix
///
/// Uses a complex Schur decomposition, whose triangular factor carries the
/// eigenvalues on its diagonal. Fails if the matrix is not square or the
/// iteration does not converge within `max_niter` sweeps.
pub fn eigenvalues(
    a: &Array2<Complex64>,
    eps: f64,
    max_niter: usize,
) -> Result<Vec<Complex64>, &'static str> {
    let (m, n) = a.dim();
    if m != n {
        return Err("Matrix must be square");
    }
    if m == 0 {
        return Ok(Vec::new());
    }

    let mat = to_na_complex(a);
    let schur = mat
        .try_schur(eps, max_niter)
        .ok_or("Schur decomposition did not converge")?;
    let (_, t) = schur.unpack();

    let eigs: Vec<Complex64> = t
        .diagonal()
        .iter()
        .map(|e| Complex64::new(e.re, e.im))
        .collect();

    if eigs.iter().all(|e| e.re.is_finite() && e.im.is_finite()) {
        Ok(eigs)
    } else {
        Err("Schur decomposition produced non-finite eigenvalues")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_inv_real_identity() {
        let eye = Array2::<f64>::eye(3);
        let inv = inv_real(&eye).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                if i == j {
                    assert_relative_eq!(inv[[i, j]], 1.0, epsilon = 1e-10);
                } else {
                    assert_relative_eq!(inv[[i, j]], 0.0, epsilon = 1e-10);
                }
            }
        }
    }

    #[test]
    fn test_inv_complex() {
        let mut a = Array2::<Complex64>::zeros((2, 2));
        a[[0, 0]] = Complex64::new(1.0, 1.0);
        a[[0, 1]] = Complex64::new(2.0, 0.0);
        a[[1, 0]] = Complex64::new(3.0, 0.0);
        a[[1, 1]] = Complex64::new(4.0, -1.0);

        let inv = inv_complex(&a).unwrap();

        // A * A^(-1) should be identity
        let product = a.dot(&inv);
        assert_relative_eq!(product[[0, 0]].re, 1.0, epsilon = 1e-10);
        assert_relative_eq!(product[[1, 1]].re, 1.0, epsilon = 1e-10);
        assert!(product[[0, 1]].norm() < 1e-10);
        assert!(product[[1, 0]].norm() < 1e-10);
    }

    #[test]
    fn test_inv_singular_is_none() {
        let a = Array2::from_shape_vec((2, 2), vec![1.0, 2.0, 2.0, 4.0]).unwrap();
        assert!(inv_real(&a).is_none());
    }

    #[test]
    fn test_normal_equations_real_only() {
        // D = [1; j], y = [1; 1]  =>  DᴴD = 2, Dᴴy = 1 - j
        let d = Array2::from_shape_vec(
            (2, 1),
            vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 1.0)],
        )
        .unwrap();
        let y = Array1::from_vec(vec![Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0)]);

        let (gram, rhs) = normal_equations(&d, &y, false);
        assert_relative_eq!(gram[[0, 0]].re, 2.0, epsilon = 1e-12);
        assert_relative_eq!(rhs[0].im, -1.0, epsilon = 1e-12);

        let (_, rhs_re) = normal_equations(&d, &y, true);
        assert_eq!(rhs_re[0].im, 0.0);

        let x = solve_by_inverse(&gram, &rhs, true).unwrap();
        assert_relative_eq!(x[0].re, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_eigenvalues_triangular() {
        // Eigenvalues of an upper triangular matrix are its diagonal
        let a = Array2::from_shape_vec(
            (2, 2),
            vec![
                Complex64::new(1.0, 0.0),
                Complex64::new(2.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(3.0, 0.0),
            ],
        )
        .unwrap();
        let eigs = eigenvalues(&a, f64::EPSILON, 1000).unwrap();
        assert_eq!(eigs.len(), 2);
        let mut reals: Vec<f64> = eigs.iter().map(|e| e.re).collect();
        reals.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_relative_eq!(reals[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(reals[1], 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_eigenvalues_rotation() {
        // [[0, -1], [1, 0]] has eigenvalues ±j
        let a = Array2::from_shape_vec(
            (2, 2),
            vec![
                Complex64::new(0.0, 0.0),
                Complex64::new(-1.0, 0.0),
                Complex64::new(1.0, 0.0),
                Complex64::new(0.0, 0.0),
            ],
        )
        .unwrap();
        let eigs = eigenvalues(&a, f64::EPSILON, 1000).unwrap();
        for e in &eigs {
            assert_relative_eq!(e.norm(), 1.0, epsilon = 1e-10);
            assert!(e.re.abs() < 1e-10);
        }
    }

    #[test]
    fn test_eigenvalues_non_square() {
        let a = Array2::<Complex64>::zeros((2, 3));
        assert!(eigenvalues(&a, f64::EPSILON, 100).is_err());
    }
}
