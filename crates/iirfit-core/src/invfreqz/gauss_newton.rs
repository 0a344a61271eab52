//! Gauss-Newton refinement of a rational fit
//!
//! Minimizes the output error `Σ w_i |B(ω_i)/A(ω_i) − H(ω_i)|²` starting from
//! the linear estimate. Each iteration linearizes the model around the
//! current coefficients, solves the weighted normal equations for a step and
//! backtracks along it. Every candidate denominator is stabilized before its
//! cost is evaluated, so the result is always stable.

use log::{debug, warn};
use ndarray::{s, Array1, Array2};
use num_complex::Complex64;

use super::constants::{LINE_SEARCH_TRIALS, STEEPEST_DESCENT_TRIAL};
use super::linear::exp_basis;
use super::stabilize::stabilize;
use crate::error::{FitError, Result};
use crate::filter::response::weighted_squared_error;
use crate::filter::TransferFunction;
use crate::math::linalg;
use crate::samples::FrequencySamples;

/// Why the refinement loop stopped
///
/// None of these are errors; the best estimate is returned in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The Gauss-Newton step fell below the tolerance
    Converged,
    /// A full line search found no improving step
    Stalled,
    /// The iteration limit was reached
    MaxIterations,
}

/// Result of a refinement run
#[derive(Debug, Clone)]
pub struct RefineOutcome {
    /// Refined transfer function with a stable, monic denominator
    pub estimate: TransferFunction,
    /// Termination state
    pub termination: Termination,
    /// Number of Gauss-Newton iterations started
    pub iterations: usize,
    /// Cost of the seed followed by the cost after each completed iteration
    pub cost_history: Vec<f64>,
}

impl RefineOutcome {
    /// Weighted squared error of the returned estimate
    pub fn final_cost(&self) -> f64 {
        self.cost_history.last().copied().unwrap_or(f64::NAN)
    }
}

/// Current estimate together with everything derived from it
#[derive(Debug, Clone)]
struct FitState {
    /// Unknowns `[a_1..a_na, b_0..b_nb]`
    theta: Array1<Complex64>,
    a: Array1<Complex64>,
    b: Array1<Complex64>,
    /// `A(ω_i)` at every sample
    den: Array1<Complex64>,
    /// `B(ω_i) / A(ω_i)` at every sample
    model: Array1<Complex64>,
    cost: f64,
}

/// Fixed inputs shared by every evaluation
struct Problem<'a> {
    samples: &'a FrequencySamples,
    om: Array2<Complex64>,
    wf: Array1<f64>,
    nb1: usize,
    na: usize,
    real: bool,
}

impl Problem<'_> {
    /// Stabilize the denominator of a candidate and evaluate its cost
    fn evaluate(&self, a_tail: &[Complex64], b: &[Complex64]) -> Result<FitState> {
        let mut a_full = Array1::<Complex64>::zeros(self.na + 1);
        a_full[0] = Complex64::new(1.0, 0.0);
        for (k, &c) in a_tail.iter().enumerate() {
            a_full[k + 1] = c;
        }
        let a = stabilize(&a_full)?;
        let b = Array1::from_vec(b.to_vec());

        let n_freqs = self.samples.len();
        let den = Array1::from_shape_fn(n_freqs, |i| {
            (0..a.len()).map(|k| a[k] * self.om[[i, k]]).sum::<Complex64>()
        });
        let model = Array1::from_shape_fn(n_freqs, |i| {
            let num: Complex64 = (0..b.len()).map(|k| b[k] * self.om[[i, k]]).sum();
            num / den[i]
        });
        let cost = weighted_squared_error(&model, self.samples.response(), self.samples.weight());

        let mut theta = Array1::<Complex64>::zeros(self.na + self.nb1);
        theta.slice_mut(s![..self.na]).assign(&a.slice(s![1..]));
        theta.slice_mut(s![self.na..]).assign(&b);

        Ok(FitState {
            theta,
            a,
            b,
            den,
            model,
            cost,
        })
    }

    fn evaluate_theta(&self, theta: &Array1<Complex64>) -> Result<FitState> {
        let v = theta.to_vec();
        self.evaluate(&v[..self.na], &v[self.na..])
    }

    /// Weighted sensitivity of the model to each unknown
    ///
    /// `∂G/∂a_k = −G·e^{-jkω}/A` and `∂G/∂b_k = e^{-jkω}/A`.
    fn jacobian(&self, state: &FitState) -> Array2<Complex64> {
        let n_freqs = self.samples.len();
        let mut j = Array2::<Complex64>::zeros((n_freqs, self.na + self.nb1));
        for i in 0..n_freqs {
            let g = state.model[i];
            let den = state.den[i];
            let w = self.wf[i];
            for k in 0..self.na {
                j[[i, k]] = -g * self.om[[i, k + 1]] / den * w;
            }
            for k in 0..self.nb1 {
                j[[i, self.na + k]] = self.om[[i, k]] / den * w;
            }
        }
        j
    }

    /// Weighted residual `(G − H)·sqrt(w)`
    fn residual(&self, state: &FitState) -> Array1<Complex64> {
        let h = self.samples.response();
        Array1::from_shape_fn(self.samples.len(), |i| (state.model[i] - h[i]) * self.wf[i])
    }
}

/// Backtracking search along `direction`
///
/// Returns the accepted state, the number of trials used and whether the
/// search stalled.
fn line_search(
    problem: &Problem<'_>,
    state: &FitState,
    mut direction: Array1<Complex64>,
    gram: &Array2<Complex64>,
    gradient: &Array1<Complex64>,
) -> Result<(FitState, usize, bool)> {
    let mut k = 1.0;

    for trial in 1..LINE_SEARCH_TRIALS {
        let candidate_theta = &state.theta - &direction.mapv(|d| d * k);
        let candidate = problem.evaluate_theta(&candidate_theta)?;
        if candidate.cost <= state.cost {
            return Ok((candidate, trial, false));
        }

        k /= 2.0;
        if trial == STEEPEST_DESCENT_TRIAL {
            let scale = gram.nrows() as f64 / linalg::frobenius_norm(gram);
            direction = gradient.mapv(|g| g * scale);
            k = 1.0;
        }
    }

    // The last trial is the current estimate itself
    Ok((state.clone(), LINE_SEARCH_TRIALS, true))
}

/// Refine a transfer function estimate by damped Gauss-Newton iteration
///
/// # Arguments
/// * `samples` - Target response
/// * `initial` - Starting estimate with `nb + 1` numerator and `na + 1`
///   denominator coefficients; its denominator is stabilized first
/// * `nb` - Numerator order
/// * `na` - Denominator order
/// * `real` - Constrain the coefficients to be real
/// * `max_iterations` - Iteration limit
/// * `tolerance` - Step-norm threshold for convergence
///
/// # Errors
/// `InputMismatch` if `initial` does not have the given orders, `Numerical`
/// for singular normal equations or a root-finding failure.
pub fn refine(
    samples: &FrequencySamples,
    initial: &TransferFunction,
    nb: usize,
    na: usize,
    real: bool,
    max_iterations: usize,
    tolerance: f64,
) -> Result<RefineOutcome> {
    if initial.b.len() != nb + 1 {
        return Err(FitError::InputMismatch {
            what: "numerator",
            expected: nb + 1,
            actual: initial.b.len(),
        });
    }
    if initial.a.len() != na + 1 {
        return Err(FitError::InputMismatch {
            what: "denominator",
            expected: na + 1,
            actual: initial.a.len(),
        });
    }

    let problem = Problem {
        samples,
        om: exp_basis(samples.omega(), nb.max(na) + 1),
        wf: samples.sqrt_weight(),
        nb1: nb + 1,
        na,
        real,
    };

    let a0 = initial.a[0];
    let a_tail: Vec<Complex64> = initial.a.iter().skip(1).map(|&c| c / a0).collect();
    let b: Vec<Complex64> = initial.b.iter().map(|&c| c / a0).collect();
    let mut state = problem.evaluate(&a_tail, &b)?;

    let mut cost_history = vec![state.cost];
    let mut iterations = 0;

    let termination = loop {
        if iterations >= max_iterations {
            break Termination::MaxIterations;
        }
        iterations += 1;

        let jac = problem.jacobian(&state);
        let residual = problem.residual(&state);
        let (gram, gradient) = linalg::normal_equations(&jac, &residual, problem.real);
        let direction = linalg::solve_by_inverse(&gram, &gradient, problem.real).ok_or_else(|| {
            FitError::Numerical(format!(
                "singular normal equations in Gauss-Newton iteration {}",
                iterations
            ))
        })?;

        let step_norm = linalg::vector_norm(&direction);
        if step_norm <= tolerance {
            debug!(
                "gauss-newton iteration {}: step norm {:.3e} <= {:.3e}, converged",
                iterations, step_norm, tolerance
            );
            break Termination::Converged;
        }

        let (next, trials, stalled) = line_search(&problem, &state, direction, &gram, &gradient)?;
        state = next;
        cost_history.push(state.cost);

        debug!(
            "gauss-newton iteration {}: cost {:.6e}, step norm {:.3e}, {} line search trials",
            iterations, state.cost, step_norm, trials
        );

        if stalled {
            warn!(
                "gauss-newton stalled after {} iterations at cost {:.6e}",
                iterations, state.cost
            );
            break Termination::Stalled;
        }
    };

    debug!(
        "gauss-newton finished: {:?} after {} iterations, cost {:.6e}",
        termination, iterations, state.cost
    );

    Ok(RefineOutcome {
        estimate: TransferFunction::new(state.b, state.a),
        termination,
        iterations,
        cost_history,
    })
}
