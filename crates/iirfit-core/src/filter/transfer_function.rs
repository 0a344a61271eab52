//! Rational transfer function `H(z) = B(z) / A(z)`

use ndarray::Array1;
use num_complex::Complex64;

use super::response;
use super::sos::{self, SecondOrderSection};
use crate::error::{FitError, Result};
use crate::math::polynomial;
use crate::samples::FrequencySamples;

/// Numerator and denominator coefficients in ascending powers of `z⁻¹`
///
/// `b = [b0, b1, …]`, `a = [a0, a1, …]` with
/// `H(z) = (b0 + b1 z⁻¹ + …) / (a0 + a1 z⁻¹ + …)`. Coefficients are complex;
/// a real filter has every imaginary part exactly zero.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    /// Numerator coefficients
    pub b: Array1<Complex64>,
    /// Denominator coefficients
    pub a: Array1<Complex64>,
}

impl TransferFunction {
    /// Create from complex coefficient arrays
    pub fn new(b: Array1<Complex64>, a: Array1<Complex64>) -> Self {
        Self { b, a }
    }

    /// Create from real coefficients
    pub fn from_real(b: &[f64], a: &[f64]) -> Self {
        Self {
            b: Array1::from_vec(polynomial::to_complex(b)),
            a: Array1::from_vec(polynomial::to_complex(a)),
        }
    }

    /// Numerator degree
    #[inline]
    pub fn nb(&self) -> usize {
        self.b.len().saturating_sub(1)
    }

    /// Denominator degree
    #[inline]
    pub fn na(&self) -> usize {
        self.a.len().saturating_sub(1)
    }

    /// True when every coefficient has a zero imaginary part
    pub fn is_real(&self) -> bool {
        self.b.iter().chain(self.a.iter()).all(|c| c.im == 0.0)
    }

    /// Real coefficient vectors `(b, a)`
    ///
    /// # Errors
    /// `ComplexCoefficients` if any coefficient has a nonzero imaginary part.
    pub fn real_coefficients(&self) -> Result<(Vec<f64>, Vec<f64>)> {
        if !self.is_real() {
            return Err(FitError::ComplexCoefficients);
        }
        Ok((
            self.b.iter().map(|c| c.re).collect(),
            self.a.iter().map(|c| c.re).collect(),
        ))
    }

    /// Frequency response at the given normalized angular frequencies
    pub fn response(&self, omega: &[f64]) -> Array1<Complex64> {
        response::evaluate_response(&self.b.to_vec(), &self.a.to_vec(), omega)
    }

    /// Zeros of `H(z)` (roots of the numerator)
    pub fn zeros(&self) -> Result<Vec<Complex64>> {
        polynomial::roots(&self.b.to_vec())
    }

    /// Poles of `H(z)` (roots of the denominator)
    pub fn poles(&self) -> Result<Vec<Complex64>> {
        polynomial::roots(&self.a.to_vec())
    }

    /// True when every pole lies strictly inside the unit circle
    pub fn is_stable(&self) -> Result<bool> {
        Ok(self.poles()?.iter().all(|p| p.norm() < 1.0))
    }

    /// Ratio of the leading numerator and denominator coefficients
    pub fn gain(&self) -> Complex64 {
        match (self.b.get(0), self.a.get(0)) {
            (Some(&b0), Some(&a0)) => b0 / a0,
            _ => Complex64::new(0.0, 0.0),
        }
    }

    /// Weighted squared error against a target
    pub fn weighted_squared_error(&self, samples: &FrequencySamples) -> f64 {
        let model = self.response(&samples.omega().to_vec());
        response::weighted_squared_error(&model, samples.response(), samples.weight())
    }

    /// Unweighted RMS error against a target
    pub fn rms_error(&self, samples: &FrequencySamples) -> f64 {
        let model = self.response(&samples.omega().to_vec());
        response::rms_error(&model, samples.response())
    }

    /// Largest absolute deviation from a target
    pub fn max_error(&self, samples: &FrequencySamples) -> f64 {
        let model = self.response(&samples.omega().to_vec());
        response::max_error(&model, samples.response())
    }

    /// Decompose into a cascade of second-order sections
    ///
    /// See [`sos::tf2sos`].
    pub fn to_sos(&self) -> Result<Vec<SecondOrderSection>> {
        let (b, a) = self.real_coefficients()?;
        sos::tf2sos(&b, &a)
    }
}
