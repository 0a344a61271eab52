//! Core InvFreqz struct and main fitting routine

use log::debug;
use num_complex::Complex64;
use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::constants::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use super::gauss_newton::{self, RefineOutcome, Termination};
use super::linear;
use super::stabilize::stabilize;
use crate::error::Result;
use crate::filter::TransferFunction;
use crate::samples::FrequencySamples;

/// Fit configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InvFreqz {
    /// Refine the linear estimate by Gauss-Newton iteration
    pub gauss: bool,

    /// Constrain the coefficients to be real
    pub real: bool,

    /// Maximum Gauss-Newton iterations
    pub max_iterations: usize,

    /// Step-norm threshold for convergence
    pub tolerance: f64,
}

impl Default for InvFreqz {
    fn default() -> Self {
        Self {
            gauss: false,
            real: true,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Fitted transfer function with diagnostics
#[derive(Debug, Clone)]
pub struct FitReport {
    /// Fitted filter
    pub transfer_function: TransferFunction,

    /// Why refinement stopped; `None` for a linear-only fit
    pub termination: Option<Termination>,

    /// Gauss-Newton iterations started
    pub iterations: usize,

    /// Cost of the stabilized seed followed by the cost after each iteration
    pub cost_history: Vec<f64>,

    /// Weighted squared error of the fitted filter
    pub cost: f64,

    /// Wall-clock time of the fit (in seconds)
    pub wall_clock_time: f64,
}

impl InvFreqz {
    /// Create a new InvFreqz instance with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Linear fit only
    pub fn linear() -> Self {
        Self::default()
    }

    /// Linear fit followed by Gauss-Newton refinement
    pub fn refined() -> Self {
        Self {
            gauss: true,
            ..Self::default()
        }
    }

    /// Fit `B/A` of orders `nb`/`na` to the samples
    pub fn fit(&self, samples: &FrequencySamples, nb: usize, na: usize) -> Result<TransferFunction> {
        fit_transfer_function(
            samples,
            nb,
            na,
            self.gauss,
            self.real,
            self.max_iterations,
            self.tolerance,
        )
    }

    /// Fit and return the estimate together with refinement diagnostics
    ///
    /// # Arguments
    /// * `samples` - Target response
    /// * `nb` - Numerator order
    /// * `na` - Denominator order
    ///
    /// # Returns
    /// A `FitReport`. For a linear-only fit `termination` is `None`, the
    /// iteration count is zero and the cost history holds the single final
    /// cost.
    pub fn fit_with_report(
        &self,
        samples: &FrequencySamples,
        nb: usize,
        na: usize,
    ) -> Result<FitReport> {
        let timer_start = Instant::now();

        let (transfer_function, outcome) = run(
            samples,
            nb,
            na,
            self.gauss,
            self.real,
            self.max_iterations,
            self.tolerance,
        )?;
        let (termination, iterations, cost_history, cost) = match outcome {
            Some(outcome) => {
                let cost = outcome.final_cost();
                (
                    Some(outcome.termination),
                    outcome.iterations,
                    outcome.cost_history,
                    cost,
                )
            }
            None => {
                let cost = transfer_function.weighted_squared_error(samples);
                (None, 0, vec![cost], cost)
            }
        };

        let wall_clock_time = timer_start.elapsed().as_secs_f64();
        debug!(
            "invfreqz fit nb={}, na={}: cost {:.6e} in {:.3} ms",
            nb,
            na,
            cost,
            wall_clock_time * 1e3
        );

        Ok(FitReport {
            transfer_function,
            termination,
            iterations,
            cost_history,
            cost,
            wall_clock_time,
        })
    }
}

/// Fit a transfer function to frequency samples
///
/// Computes the weighted linear estimate. Without refinement it is returned
/// as is and its denominator may be unstable. With refinement the
/// denominator is stabilized and the estimate is passed to Gauss-Newton.
pub fn fit_transfer_function(
    samples: &FrequencySamples,
    nb: usize,
    na: usize,
    use_refinement: bool,
    real: bool,
    max_iterations: usize,
    tolerance: f64,
) -> Result<TransferFunction> {
    let (transfer_function, _) = run(
        samples,
        nb,
        na,
        use_refinement,
        real,
        max_iterations,
        tolerance,
    )?;
    Ok(transfer_function)
}

/// Linear estimate, optionally stabilized and refined; the refinement
/// outcome is `None` for a linear-only fit
fn run(
    samples: &FrequencySamples,
    nb: usize,
    na: usize,
    use_refinement: bool,
    real: bool,
    max_iterations: usize,
    tolerance: f64,
) -> Result<(TransferFunction, Option<RefineOutcome>)> {
    let initial = linear::estimate(samples, nb, na, real)?;
    if !use_refinement {
        return Ok((initial, None));
    }

    let seeded = TransferFunction::new(initial.b, stabilize(&initial.a)?);
    let outcome =
        gauss_newton::refine(samples, &seeded, nb, na, real, max_iterations, tolerance)?;
    Ok((outcome.estimate.clone(), Some(outcome)))
}

/// Fit `B/A` to a sampled frequency response
///
/// # Arguments
/// * `h` - Complex response at each frequency
/// * `w` - Normalized angular frequencies in rad/sample
/// * `nb` - Numerator order
/// * `na` - Denominator order
/// * `wt` - Optional non-negative weights, one per frequency
/// * `options` - Fit configuration
///
/// # Example
/// ```
/// use iirfit_core::invfreqz::{invfreqz, InvFreqz};
/// use iirfit_core::TransferFunction;
///
/// let truth = TransferFunction::from_real(&[0.2, 0.1], &[1.0, -0.6]);
/// let w: Vec<f64> = (0..32).map(|k| std::f64::consts::PI * k as f64 / 32.0).collect();
/// let h = truth.response(&w).to_vec();
///
/// let fitted = invfreqz(&h, &w, 1, 1, None, &InvFreqz::default()).unwrap();
/// assert!((fitted.a[1].re + 0.6).abs() < 1e-9);
/// ```
pub fn invfreqz(
    h: &[Complex64],
    w: &[f64],
    nb: usize,
    na: usize,
    wt: Option<&[f64]>,
    options: &InvFreqz,
) -> Result<TransferFunction> {
    let samples = FrequencySamples::new(w, h, wt)?;
    options.fit(&samples, nb, na)
}
