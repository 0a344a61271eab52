//! Frequency grids
//!
//! Measurements usually come in Hz at a known sample rate, while the fitting
//! routines work on normalized angular frequency `ω = 2π·f/fs` in rad/sample.
//! [`FrequencyGrid`] keeps the points in Hz and does the conversion.

use std::f64::consts::PI;

use crate::error::{FitError, Result};

/// Frequency unit enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrequencyUnit {
    #[default]
    Hz,
    KHz,
}

impl FrequencyUnit {
    /// Get the multiplier to convert to Hz
    pub fn multiplier(&self) -> f64 {
        match self {
            FrequencyUnit::Hz => 1.0,
            FrequencyUnit::KHz => 1e3,
        }
    }

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hz" => Some(FrequencyUnit::Hz),
            "khz" => Some(FrequencyUnit::KHz),
            _ => None,
        }
    }
}

/// Sweep type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepType {
    #[default]
    Linear,
    Log,
}

/// Frequency points at a given sample rate
#[derive(Debug, Clone)]
pub struct FrequencyGrid {
    /// Frequency vector in Hz
    f: Vec<f64>,
    /// Sample rate in Hz
    sample_rate: f64,
}

impl FrequencyGrid {
    /// Create a sweep of `npoints` frequencies between `start` and `stop`
    ///
    /// # Arguments
    /// * `start` - Start frequency in the specified unit
    /// * `stop` - Stop frequency in the specified unit
    /// * `npoints` - Number of frequency points
    /// * `unit` - Frequency unit
    /// * `sweep_type` - Linear or logarithmic sweep
    /// * `sample_rate` - Sample rate in Hz
    ///
    /// # Example
    /// ```
    /// use iirfit_core::frequency::{FrequencyGrid, FrequencyUnit, SweepType};
    /// let grid = FrequencyGrid::new(20.0, 20e3, 64, FrequencyUnit::Hz, SweepType::Log, 48e3).unwrap();
    /// assert_eq!(grid.npoints(), 64);
    /// ```
    pub fn new(
        start: f64,
        stop: f64,
        npoints: usize,
        unit: FrequencyUnit,
        sweep_type: SweepType,
        sample_rate: f64,
    ) -> Result<Self> {
        let mult = unit.multiplier();
        let start_hz = start * mult;
        let stop_hz = stop * mult;

        if sweep_type == SweepType::Log && (start_hz <= 0.0 || stop_hz <= 0.0) {
            return Err(FitError::InvalidInput(
                "logarithmic sweep needs positive frequencies".to_string(),
            ));
        }

        let f = match sweep_type {
            SweepType::Linear => {
                if npoints == 1 {
                    vec![start_hz]
                } else {
                    let step = (stop_hz - start_hz) / (npoints - 1) as f64;
                    (0..npoints).map(|i| start_hz + i as f64 * step).collect()
                }
            }
            SweepType::Log => {
                if npoints == 1 {
                    vec![start_hz]
                } else {
                    let log_start = start_hz.ln();
                    let log_stop = stop_hz.ln();
                    let log_step = (log_stop - log_start) / (npoints - 1) as f64;
                    (0..npoints)
                        .map(|i| (log_start + i as f64 * log_step).exp())
                        .collect()
                }
            }
        };

        Self::from_f(f, FrequencyUnit::Hz, sample_rate)
    }

    /// Create from a frequency vector
    ///
    /// Every point must lie in `[0, fs/2]`.
    pub fn from_f(f: Vec<f64>, unit: FrequencyUnit, sample_rate: f64) -> Result<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(FitError::InvalidInput(format!(
                "sample rate must be positive, got {}",
                sample_rate
            )));
        }

        let mult = unit.multiplier();
        let nyquist = sample_rate / 2.0;
        let f_hz: Vec<f64> = f.iter().map(|&x| x * mult).collect();

        if let Some(bad) = f_hz.iter().find(|&&x| !(0.0..=nyquist).contains(&x)) {
            return Err(FitError::InvalidInput(format!(
                "frequency {} Hz is outside [0, {}] Hz",
                bad, nyquist
            )));
        }

        Ok(Self {
            f: f_hz,
            sample_rate,
        })
    }

    /// Normalized angular frequencies `π·k/n` for k = 0..n
    ///
    /// The same grid `freqz` uses by default: n points on `[0, π)`.
    pub fn normalized(n: usize) -> Vec<f64> {
        (0..n).map(|k| PI * k as f64 / n as f64).collect()
    }

    /// Get frequency vector in Hz
    #[inline]
    pub fn f(&self) -> &[f64] {
        &self.f
    }

    /// Normalized angular frequencies in rad/sample
    pub fn omega(&self) -> Vec<f64> {
        self.f
            .iter()
            .map(|&f| 2.0 * PI * f / self.sample_rate)
            .collect()
    }

    /// Get the number of frequency points
    #[inline]
    pub fn npoints(&self) -> usize {
        self.f.len()
    }

    /// Sample rate in Hz
    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Nyquist frequency in Hz
    #[inline]
    pub fn nyquist(&self) -> f64 {
        self.sample_rate / 2.0
    }
}
