//! Target frequency response samples
//!
//! A fit target is a set of (ω, H(ω), weight) triples. They are stored as
//! three positionally aligned arrays, validated once on construction and
//! immutable afterwards.

use ndarray::Array1;
use num_complex::Complex64;

use crate::error::{FitError, Result};

/// One sample of the target response
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencySample {
    /// Normalized angular frequency in rad/sample
    pub omega: f64,
    /// Target complex response
    pub response: Complex64,
    /// Non-negative weight
    pub weight: f64,
}

/// Aligned set of target response samples
#[derive(Debug, Clone)]
pub struct FrequencySamples {
    omega: Array1<f64>,
    response: Array1<Complex64>,
    weight: Array1<f64>,
}

impl FrequencySamples {
    /// Build from separate arrays
    ///
    /// # Arguments
    /// * `omega` - Normalized angular frequencies (rad/sample)
    /// * `response` - Target response at each frequency
    /// * `weight` - Optional per-sample weights; all ones when `None`
    ///
    /// # Errors
    /// `InputMismatch` if the lengths differ, `InvalidInput` for an empty set
    /// or a negative or non-finite weight.
    pub fn new(omega: &[f64], response: &[Complex64], weight: Option<&[f64]>) -> Result<Self> {
        if response.len() != omega.len() {
            return Err(FitError::InputMismatch {
                what: "frequency",
                expected: response.len(),
                actual: omega.len(),
            });
        }
        if let Some(wt) = weight {
            if wt.len() != response.len() {
                return Err(FitError::InputMismatch {
                    what: "weight",
                    expected: response.len(),
                    actual: wt.len(),
                });
            }
        }
        if response.is_empty() {
            return Err(FitError::InvalidInput(
                "at least one frequency sample is required".to_string(),
            ));
        }
        if let Some(bad) = omega.iter().find(|w| !w.is_finite()) {
            return Err(FitError::InvalidInput(format!(
                "frequency must be finite, got {}",
                bad
            )));
        }

        let weight = match weight {
            Some(wt) => {
                if let Some(bad) = wt.iter().find(|&&w| !(w.is_finite() && w >= 0.0)) {
                    return Err(FitError::InvalidInput(format!(
                        "weights must be finite and non-negative, got {}",
                        bad
                    )));
                }
                Array1::from_vec(wt.to_vec())
            }
            None => Array1::ones(response.len()),
        };

        Ok(Self {
            omega: Array1::from_vec(omega.to_vec()),
            response: Array1::from_vec(response.to_vec()),
            weight,
        })
    }

    /// Build from individual samples
    pub fn from_samples(samples: &[FrequencySample]) -> Result<Self> {
        let omega: Vec<f64> = samples.iter().map(|s| s.omega).collect();
        let response: Vec<Complex64> = samples.iter().map(|s| s.response).collect();
        let weight: Vec<f64> = samples.iter().map(|s| s.weight).collect();
        Self::new(&omega, &response, Some(&weight))
    }

    /// Number of samples
    #[inline]
    pub fn len(&self) -> usize {
        self.omega.len()
    }

    /// Always false for a constructed set; present for API completeness
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.omega.is_empty()
    }

    #[inline]
    pub fn omega(&self) -> &Array1<f64> {
        &self.omega
    }

    #[inline]
    pub fn response(&self) -> &Array1<Complex64> {
        &self.response
    }

    #[inline]
    pub fn weight(&self) -> &Array1<f64> {
        &self.weight
    }

    /// Row scaling applied to every least-squares row: `sqrt(weight)`
    pub fn sqrt_weight(&self) -> Array1<f64> {
        self.weight.mapv(f64::sqrt)
    }

    /// Sample `i` as a triple
    pub fn get(&self, i: usize) -> Option<FrequencySample> {
        if i >= self.len() {
            return None;
        }
        Some(FrequencySample {
            omega: self.omega[i],
            response: self.response[i],
            weight: self.weight[i],
        })
    }

    /// Iterate over the samples
    pub fn iter(&self) -> impl Iterator<Item = FrequencySample> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ones(n: usize) -> Vec<Complex64> {
        vec![Complex64::new(1.0, 0.0); n]
    }

    #[test]
    fn test_length_mismatch() {
        let err = FrequencySamples::new(&[0.0, 0.1, 0.2, 0.3], &ones(5), None).unwrap_err();
        assert_eq!(
            err,
            FitError::InputMismatch {
                what: "frequency",
                expected: 5,
                actual: 4
            }
        );
    }

    #[test]
    fn test_weight_length_mismatch() {
        let err = FrequencySamples::new(&[0.0, 0.1], &ones(2), Some(&[1.0])).unwrap_err();
        assert!(matches!(err, FitError::InputMismatch { what: "weight", .. }));
    }

    #[test]
    fn test_default_weights_are_one() {
        let s = FrequencySamples::new(&[0.0, 0.5, 1.0], &ones(3), None).unwrap();
        assert_eq!(s.len(), 3);
        assert!(s.weight().iter().all(|&w| w == 1.0));
    }

    #[test]
    fn test_rejects_negative_weight() {
        let err = FrequencySamples::new(&[0.0, 0.5], &ones(2), Some(&[1.0, -0.1])).unwrap_err();
        assert!(matches!(err, FitError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_empty() {
        let err = FrequencySamples::new(&[], &[], None).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_from_samples_round_trip() {
        let triples = vec![
            FrequencySample {
                omega: 0.1,
                response: Complex64::new(1.0, -1.0),
                weight: 2.0,
            },
            FrequencySample {
                omega: 0.2,
                response: Complex64::new(0.5, 0.0),
                weight: 0.0,
            },
        ];
        let s = FrequencySamples::from_samples(&triples).unwrap();
        let back: Vec<FrequencySample> = s.iter().collect();
        assert_eq!(back, triples);
        assert!(s.get(2).is_none());
    }
}
