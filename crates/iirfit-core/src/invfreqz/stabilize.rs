//! Polynomial stabilization
//!
//! Reflects every root outside the unit circle to its conjugate reciprocal.
//! Applied to a denominator this makes the filter causal and stable while
//! keeping the shape of its magnitude response (up to a gain factor).

use log::trace;
use ndarray::Array1;
use num_complex::Complex64;

use crate::constants::REAL_COEFF_TOL;
use crate::error::Result;
use crate::math::polynomial;

/// Reflect roots with `|r| > 1` to `1 / conj(r)`
///
/// Polynomials of length ≤ 1 and polynomials whose roots are already inside
/// or on the unit circle are returned unchanged. Otherwise the polynomial is
/// rebuilt from the reflected roots and scaled by the original leading
/// coefficient; leading zero coefficients are kept so the length never
/// changes. When the rebuilt coefficients have only round-off imaginary
/// parts they are made exactly real.
///
/// # Errors
/// `Numerical` if root finding does not converge.
pub fn stabilize(p: &Array1<Complex64>) -> Result<Array1<Complex64>> {
    if p.len() <= 1 {
        return Ok(p.clone());
    }

    let coeffs = p.to_vec();
    let n_lead = polynomial::leading_zeros(&coeffs);
    if n_lead == coeffs.len() {
        return Ok(p.clone());
    }
    let lead = coeffs[n_lead];

    let mut roots = polynomial::roots(&coeffs)?;
    let mut n_reflected = 0;
    for r in roots.iter_mut() {
        // Zero roots have norm 0 and are never reflected
        if r.norm() > 1.0 {
            *r = 1.0 / r.conj();
            n_reflected += 1;
        }
    }

    if n_reflected == 0 {
        return Ok(p.clone());
    }
    trace!("reflected {} of {} roots into the unit circle", n_reflected, roots.len());

    let mut out = vec![Complex64::new(0.0, 0.0); n_lead];
    out.extend(
        polynomial::poly_from_roots(&roots)
            .into_iter()
            .map(|c| c * lead),
    );

    let scale = out.iter().map(|c| c.norm()).fold(0.0, f64::max).max(1.0);
    if out.iter().all(|c| c.im.abs() <= REAL_COEFF_TOL * scale) {
        for c in out.iter_mut() {
            c.im = 0.0;
        }
    }

    Ok(Array1::from_vec(out))
}
