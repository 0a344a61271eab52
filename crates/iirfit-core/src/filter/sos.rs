//! Second-order sections
//!
//! A fitted transfer function is installed into a runtime filter chain as a
//! cascade of biquads. Each section is stored as `[b0, b1, b2, a0, a1, a2]`
//! with `a0 == 1`; the runtime direct-form-II-transposed stage takes the five
//! values `[b0, b1, b2, a1, a2]`.

use ndarray::Array1;
use num_complex::Complex64;

use super::response::evaluate_response;
use super::transfer_function::TransferFunction;
use crate::constants::{CONJUGATE_PAIR_TOL, NEAR_ZERO};
use crate::error::{FitError, Result};
use crate::math::polynomial;

/// One biquad stage
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SecondOrderSection {
    /// Numerator `[b0, b1, b2]`
    pub b: [f64; 3],
    /// Denominator `[1, a1, a2]`
    pub a: [f64; 3],
}

impl SecondOrderSection {
    /// Create from numerator and denominator triples, normalizing by `a[0]`
    pub fn new(b: [f64; 3], a: [f64; 3]) -> Result<Self> {
        if a[0].abs() < NEAR_ZERO {
            return Err(FitError::InvalidInput(
                "leading denominator coefficient of a section must be nonzero".to_string(),
            ));
        }
        let a0 = a[0];
        Ok(Self {
            b: [b[0] / a0, b[1] / a0, b[2] / a0],
            a: [1.0, a[1] / a0, a[2] / a0],
        })
    }

    /// Create from the six-value layout `[b0, b1, b2, a0, a1, a2]`
    pub fn from_coefficients(c: [f64; 6]) -> Result<Self> {
        Self::new([c[0], c[1], c[2]], [c[3], c[4], c[5]])
    }

    /// Pass-through section
    pub fn identity() -> Self {
        Self {
            b: [1.0, 0.0, 0.0],
            a: [1.0, 0.0, 0.0],
        }
    }

    /// Six-value layout `[b0, b1, b2, 1, a1, a2]`
    pub fn coefficients(&self) -> [f64; 6] {
        [self.b[0], self.b[1], self.b[2], self.a[0], self.a[1], self.a[2]]
    }

    /// Five-value layout `[b0, b1, b2, a1, a2]` consumed by the runtime cascade
    pub fn runtime_coefficients(&self) -> [f64; 5] {
        [self.b[0], self.b[1], self.b[2], self.a[1], self.a[2]]
    }

    /// Frequency response of this stage
    pub fn response(&self, omega: &[f64]) -> Array1<Complex64> {
        evaluate_response(
            &polynomial::to_complex(&self.b),
            &polynomial::to_complex(&self.a),
            omega,
        )
    }
}

/// Frequency response of a cascade
pub fn sos_response(sections: &[SecondOrderSection], omega: &[f64]) -> Array1<Complex64> {
    let mut h = Array1::from_elem(omega.len(), Complex64::new(1.0, 0.0));
    for section in sections {
        h *= &section.response(omega);
    }
    h
}

/// Multiply a cascade back out into a single transfer function
pub fn sos_to_tf(sections: &[SecondOrderSection]) -> TransferFunction {
    let mut b = vec![Complex64::new(1.0, 0.0)];
    let mut a = vec![Complex64::new(1.0, 0.0)];
    for section in sections {
        b = polynomial::multiply(&b, &polynomial::to_complex(&section.b));
        a = polynomial::multiply(&a, &polynomial::to_complex(&section.a));
    }
    TransferFunction::new(Array1::from_vec(b), Array1::from_vec(a))
}

/// Roots split into real values and upper-half-plane representatives of
/// conjugate pairs
#[derive(Debug, Default)]
struct RootSet {
    real: Vec<f64>,
    complex: Vec<Complex64>,
}

impl RootSet {
    fn from_roots(roots: &[Complex64]) -> Result<Self> {
        let mut set = RootSet::default();
        let mut n_lower = 0;
        for &r in roots {
            if r.im.abs() <= CONJUGATE_PAIR_TOL * r.norm().max(1.0) {
                set.real.push(r.re);
            } else if r.im > 0.0 {
                set.complex.push(r);
            } else {
                n_lower += 1;
            }
        }
        if n_lower != set.complex.len() {
            return Err(FitError::Numerical(
                "complex roots do not form conjugate pairs".to_string(),
            ));
        }
        Ok(set)
    }

    fn is_empty(&self) -> bool {
        self.real.is_empty() && self.complex.is_empty()
    }

    fn closest_real(&self, key: impl Fn(f64) -> f64) -> Option<usize> {
        self.real
            .iter()
            .enumerate()
            .min_by(|(_, x), (_, y)| key(**x).total_cmp(&key(**y)))
            .map(|(i, _)| i)
    }

    fn closest_complex(&self, key: impl Fn(Complex64) -> f64) -> Option<usize> {
        self.complex
            .iter()
            .enumerate()
            .min_by(|(_, x), (_, y)| key(**x).total_cmp(&key(**y)))
            .map(|(i, _)| i)
    }

    /// Remove the roots for one section, closest to the unit circle first
    fn take_poles(&mut self) -> Vec<Complex64> {
        let dist = |r: Complex64| (1.0 - r.norm()).abs();
        let real_idx = self.closest_real(|x| dist(Complex64::new(x, 0.0)));
        let cmplx_idx = self.closest_complex(dist);

        let take_complex = match (real_idx, cmplx_idx) {
            (Some(i), Some(j)) => dist(self.complex[j]) < dist(Complex64::new(self.real[i], 0.0)),
            (None, Some(_)) => true,
            _ => false,
        };

        if take_complex {
            if let Some(j) = cmplx_idx {
                let p = self.complex.remove(j);
                return vec![p, p.conj()];
            }
        }

        let mut out = Vec::with_capacity(2);
        if let Some(i) = real_idx {
            out.push(Complex64::new(self.real.remove(i), 0.0));
            if let Some(k) = self.closest_real(|x| dist(Complex64::new(x, 0.0))) {
                out.push(Complex64::new(self.real.remove(k), 0.0));
            }
        }
        out
    }

    /// Remove up to two roots nearest to `target`
    fn take_nearest(&mut self, target: Complex64) -> Vec<Complex64> {
        let dist = |r: Complex64| (r - target).norm();
        let real_idx = self.closest_real(|x| dist(Complex64::new(x, 0.0)));
        let cmplx_idx = self.closest_complex(dist);

        let take_complex = match (real_idx, cmplx_idx) {
            (Some(i), Some(j)) => dist(self.complex[j]) < dist(Complex64::new(self.real[i], 0.0)),
            (None, Some(_)) => true,
            _ => false,
        };

        if take_complex {
            if let Some(j) = cmplx_idx {
                let z = self.complex.remove(j);
                return vec![z, z.conj()];
            }
        }

        let mut out = Vec::with_capacity(2);
        if let Some(i) = real_idx {
            out.push(Complex64::new(self.real.remove(i), 0.0));
            if let Some(k) = self.closest_real(|x| dist(Complex64::new(x, 0.0))) {
                out.push(Complex64::new(self.real.remove(k), 0.0));
            }
        }
        out
    }
}

/// Decompose a real transfer function into second-order sections
///
/// Poles closest to the unit circle are paired with their nearest zeros
/// first; the resulting sections are ordered from the poles farthest from
/// the unit circle to the closest, and the overall gain goes into the first
/// section. Leading zeros of `b` (pure delay) are absorbed into sections
/// with free numerator slots.
///
/// # Errors
/// `InvalidInput` for empty coefficient vectors or `a[0] == 0`,
/// `Numerical` if root finding fails.
pub fn tf2sos(b: &[f64], a: &[f64]) -> Result<Vec<SecondOrderSection>> {
    if b.is_empty() || a.is_empty() {
        return Err(FitError::InvalidInput(
            "transfer function coefficients cannot be empty".to_string(),
        ));
    }
    if a[0].abs() < NEAR_ZERO {
        return Err(FitError::InvalidInput(
            "leading denominator coefficient must be nonzero".to_string(),
        ));
    }

    // Common length so that both sides are polynomials of the same nominal degree in z
    let n = b.len().max(a.len()) - 1;
    let mut b_pad = b.to_vec();
    b_pad.resize(n + 1, 0.0);
    let mut a_pad = a.to_vec();
    a_pad.resize(n + 1, 0.0);

    let delay = b_pad.iter().take_while(|&&x| x == 0.0).count();
    if delay == b_pad.len() {
        return Ok(vec![SecondOrderSection {
            b: [0.0; 3],
            a: [1.0, 0.0, 0.0],
        }]);
    }
    let gain = b_pad[delay] / a_pad[0];

    let mut zeros = RootSet::from_roots(&polynomial::roots(&polynomial::to_complex(&b_pad))?)?;
    let mut poles = RootSet::from_roots(&polynomial::roots(&polynomial::to_complex(&a_pad))?)?;

    let mut groups: Vec<(Vec<Complex64>, Vec<Complex64>)> = Vec::new();
    while !poles.is_empty() {
        let section_poles = poles.take_poles();
        let section_zeros = zeros.take_nearest(section_poles[0]);
        groups.push((section_zeros, section_poles));
    }
    if groups.is_empty() {
        groups.push((Vec::new(), Vec::new()));
    }

    // Zeros left over after every pole is placed go where there is room
    while !zeros.is_empty() {
        let leftover = zeros.take_nearest(Complex64::new(0.0, 0.0));
        let mut rest = leftover.into_iter();
        while let Some(z) = rest.next() {
            let pair = if z.im != 0.0 { rest.next() } else { None };
            let needed = if pair.is_some() { 2 } else { 1 };
            let slot = groups
                .iter_mut()
                .find(|(zs, _)| zs.len() + needed <= 2)
                .ok_or_else(|| {
                    FitError::Numerical("could not place all zeros into sections".to_string())
                })?;
            slot.0.push(z);
            if let Some(zc) = pair {
                slot.0.push(zc);
            }
        }
    }

    groups.reverse();

    let mut remaining_delay = delay;
    let mut sections = Vec::with_capacity(groups.len());
    for (idx, (zs, ps)) in groups.iter().enumerate() {
        let shift = remaining_delay.min(2 - zs.len());
        remaining_delay -= shift;

        let mut sb = [0.0; 3];
        for (k, c) in polynomial::poly_from_roots(zs).iter().enumerate() {
            sb[k + shift] = c.re;
        }
        if idx == 0 {
            for c in sb.iter_mut() {
                *c *= gain;
            }
        }

        let mut sa = [0.0; 3];
        for (k, c) in polynomial::poly_from_roots(ps).iter().enumerate() {
            sa[k] = c.re;
        }

        sections.push(SecondOrderSection { b: sb, a: sa });
    }

    if remaining_delay > 0 {
        return Err(FitError::Numerical(
            "numerator delay exceeds section capacity".to_string(),
        ));
    }

    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyGrid;
    use approx::assert_relative_eq;

    fn assert_same_response(sections: &[SecondOrderSection], b: &[f64], a: &[f64]) {
        let omega = FrequencyGrid::normalized(64);
        let expected = TransferFunction::from_real(b, a).response(&omega);
        let actual = sos_response(sections, &omega);
        for (x, y) in actual.iter().zip(expected.iter()) {
            assert!((x - y).norm() < 1e-8, "{} vs {}", x, y);
        }
    }

    #[test]
    fn test_layouts() {
        let s = SecondOrderSection::from_coefficients([2.0, 0.4, 0.2, 2.0, -1.0, 0.5]).unwrap();
        assert_eq!(s.coefficients(), [1.0, 0.2, 0.1, 1.0, -0.5, 0.25]);
        assert_eq!(s.runtime_coefficients(), [1.0, 0.2, 0.1, -0.5, 0.25]);
    }

    #[test]
    fn test_zero_leading_denominator_rejected() {
        assert!(SecondOrderSection::from_coefficients([1.0, 0.0, 0.0, 0.0, 1.0, 0.0]).is_err());
        assert!(tf2sos(&[1.0], &[0.0, 1.0]).is_err());
    }

    #[test]
    fn test_constant_gain() {
        let sections = tf2sos(&[0.5], &[1.0]).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].coefficients(), [0.5, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_first_order() {
        let b = [0.3, 0.3];
        let a = [1.0, -0.4];
        let sections = tf2sos(&b, &a).unwrap();
        assert_eq!(sections.len(), 1);
        assert_relative_eq!(sections[0].a[1], -0.4, epsilon = 1e-12);
        assert_relative_eq!(sections[0].a[2], 0.0, epsilon = 1e-12);
        assert_same_response(&sections, &b, &a);
    }

    #[test]
    fn test_fourth_order_cascade() {
        let s1 = SecondOrderSection::new([1.0, 2.0, 1.0], [1.0, -1.2, 0.5]).unwrap();
        let s2 = SecondOrderSection::new([1.0, -1.0, 0.0], [1.0, -0.3, 0.02]).unwrap();
        let tf = sos_to_tf(&[s1, s2]);
        let (b, a) = tf.real_coefficients().unwrap();

        let sections = tf2sos(&b, &a).unwrap();
        assert_eq!(sections.len(), 2);
        for s in &sections {
            assert_eq!(s.a[0], 1.0);
        }
        assert_same_response(&sections, &b, &a);

        // Poles closest to the unit circle end up in the last section
        let last = TransferFunction::from_real(&sections[1].b, &sections[1].a);
        let p = last.poles().unwrap();
        assert_relative_eq!(p[0].norm(), 0.5f64.sqrt(), epsilon = 1e-8);
    }

    #[test]
    fn test_odd_order_with_delay() {
        // z⁻¹ · 0.5 / ((1 - 0.5 z⁻¹)(1 + 0.25 z⁻¹)(1 - 0.9 z⁻¹))
        let a = sos_to_tf(&[
            SecondOrderSection::new([1.0, 0.0, 0.0], [1.0, -0.25, -0.125]).unwrap(),
            SecondOrderSection::new([1.0, 0.0, 0.0], [1.0, -0.9, 0.0]).unwrap(),
        ])
        .real_coefficients()
        .unwrap()
        .1;
        let b = [0.0, 0.5];

        let sections = tf2sos(&b, &a).unwrap();
        assert_eq!(sections.len(), 2);
        assert_same_response(&sections, &b, &a);
    }

    #[test]
    fn test_zero_numerator() {
        let sections = tf2sos(&[0.0, 0.0], &[1.0, -0.5]).unwrap();
        let h = sos_response(&sections, &[0.0, 1.0]);
        assert!(h.iter().all(|z| z.norm() == 0.0));
    }
}
