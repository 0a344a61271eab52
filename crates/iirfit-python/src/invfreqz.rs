//! Python bindings for invfreqz fitting

use iirfit_core::invfreqz::{self as fit, InvFreqz, Termination};
use iirfit_core::{FitReport, FrequencySamples, TransferFunction};
use num_complex::Complex64;
use numpy::{PyArray1, ToPyArray};
use pyo3::prelude::*;

use crate::to_py_err;

type Coefficients<'py> = (Bound<'py, PyAny>, Bound<'py, PyAny>);

/// Convert fitted coefficients to numpy arrays, real when possible
fn coefficients_to_py<'py>(
    py: Python<'py>,
    tf: &TransferFunction,
    real: bool,
) -> PyResult<Coefficients<'py>> {
    if real {
        let (b, a) = tf.real_coefficients().map_err(to_py_err)?;
        Ok((
            b.to_pyarray(py).into_any(),
            a.to_pyarray(py).into_any(),
        ))
    } else {
        Ok((
            tf.b.to_pyarray(py).into_any(),
            tf.a.to_pyarray(py).into_any(),
        ))
    }
}

fn termination_name(termination: Option<Termination>) -> &'static str {
    match termination {
        None => "linear",
        Some(Termination::Converged) => "converged",
        Some(Termination::Stalled) => "stalled",
        Some(Termination::MaxIterations) => "max_iterations",
    }
}

/// Fit B/A to a sampled frequency response
///
/// Args:
///     h: Complex frequency response
///     w: Normalized angular frequencies (rad/sample)
///     nb: Numerator order
///     na: Denominator order
///     wt: Optional non-negative weights (default: all ones)
///     gauss: Refine with Gauss-Newton iteration (default: False)
///     real: Constrain coefficients to be real (default: True)
///     maxiter: Maximum Gauss-Newton iterations (default: 30)
///     tol: Step-norm convergence threshold (default: 0.01)
///
/// Returns:
///     Tuple (b, a) of numpy arrays
#[pyfunction]
#[pyo3(signature = (h, w, nb, na, wt=None, gauss=false, real=true, maxiter=30, tol=0.01))]
#[allow(clippy::too_many_arguments)]
pub fn invfreqz<'py>(
    py: Python<'py>,
    h: Vec<Complex64>,
    w: Vec<f64>,
    nb: usize,
    na: usize,
    wt: Option<Vec<f64>>,
    gauss: bool,
    real: bool,
    maxiter: usize,
    tol: f64,
) -> PyResult<Coefficients<'py>> {
    let options = InvFreqz {
        gauss,
        real,
        max_iterations: maxiter,
        tolerance: tol,
    };
    let tf = fit::invfreqz(&h, &w, nb, na, wt.as_deref(), &options).map_err(to_py_err)?;
    coefficients_to_py(py, &tf, real)
}

/// Python wrapper for InvFreqz
#[pyclass(name = "InvFreqz")]
#[derive(Default)]
pub struct PyInvFreqz {
    inner: InvFreqz,
    report: Option<FitReport>,
}

#[pymethods]
impl PyInvFreqz {
    /// Create a new InvFreqz instance
    ///
    /// Args:
    ///     gauss: Refine with Gauss-Newton iteration (default: False)
    ///     real: Constrain coefficients to be real (default: True)
    ///     maxiter: Maximum Gauss-Newton iterations (default: 30)
    ///     tol: Step-norm convergence threshold (default: 0.01)
    #[new]
    #[pyo3(signature = (gauss=false, real=true, maxiter=30, tol=0.01))]
    pub fn new(gauss: bool, real: bool, maxiter: usize, tol: f64) -> Self {
        Self {
            inner: InvFreqz {
                gauss,
                real,
                max_iterations: maxiter,
                tolerance: tol,
            },
            report: None,
        }
    }

    /// Fit B/A to a sampled frequency response
    ///
    /// Args:
    ///     h: Complex frequency response
    ///     w: Normalized angular frequencies (rad/sample)
    ///     nb: Numerator order
    ///     na: Denominator order
    ///     wt: Optional non-negative weights
    #[pyo3(signature = (h, w, nb, na, wt=None))]
    pub fn fit(
        &mut self,
        h: Vec<Complex64>,
        w: Vec<f64>,
        nb: usize,
        na: usize,
        wt: Option<Vec<f64>>,
    ) -> PyResult<()> {
        let samples = FrequencySamples::new(&w, &h, wt.as_deref()).map_err(to_py_err)?;
        let report = self
            .inner
            .fit_with_report(&samples, nb, na)
            .map_err(to_py_err)?;
        self.report = Some(report);
        Ok(())
    }

    /// Fitted numerator coefficients
    #[getter]
    pub fn b<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
        let tf = self.fitted()?;
        coefficients_to_py(py, tf, self.inner.real).map(|(b, _)| b)
    }

    /// Fitted denominator coefficients
    #[getter]
    pub fn a<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
        let tf = self.fitted()?;
        coefficients_to_py(py, tf, self.inner.real).map(|(_, a)| a)
    }

    /// Response of the fitted filter at normalized angular frequencies
    pub fn response<'py>(
        &self,
        py: Python<'py>,
        w: Vec<f64>,
    ) -> PyResult<Bound<'py, PyArray1<Complex64>>> {
        Ok(self.fitted()?.response(&w).to_pyarray(py))
    }

    /// Weighted squared error of the fitted filter
    #[getter]
    pub fn cost(&self) -> PyResult<f64> {
        Ok(self.report()?.cost)
    }

    /// Cost of the seed followed by the cost after each iteration
    #[getter]
    pub fn cost_history<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray1<f64>>> {
        Ok(self.report()?.cost_history.to_pyarray(py))
    }

    /// Gauss-Newton iterations used
    #[getter]
    pub fn iterations(&self) -> PyResult<usize> {
        Ok(self.report()?.iterations)
    }

    /// Termination state: 'linear', 'converged', 'stalled' or 'max_iterations'
    #[getter]
    pub fn termination(&self) -> PyResult<&'static str> {
        Ok(termination_name(self.report()?.termination))
    }

    /// Wall-clock time of last fit (in seconds)
    #[getter]
    pub fn wall_clock_time(&self) -> PyResult<f64> {
        Ok(self.report()?.wall_clock_time)
    }

    /// Refine with Gauss-Newton iteration
    #[getter]
    pub fn gauss(&self) -> bool {
        self.inner.gauss
    }

    #[setter]
    pub fn set_gauss(&mut self, value: bool) {
        self.inner.gauss = value;
    }

    /// Constrain coefficients to be real
    #[getter]
    pub fn real(&self) -> bool {
        self.inner.real
    }

    #[setter]
    pub fn set_real(&mut self, value: bool) {
        self.inner.real = value;
    }

    /// Maximum Gauss-Newton iterations
    #[getter]
    pub fn maxiter(&self) -> usize {
        self.inner.max_iterations
    }

    #[setter]
    pub fn set_maxiter(&mut self, value: usize) {
        self.inner.max_iterations = value;
    }

    /// Step-norm convergence threshold
    #[getter]
    pub fn tol(&self) -> f64 {
        self.inner.tolerance
    }

    #[setter]
    pub fn set_tol(&mut self, value: f64) {
        self.inner.tolerance = value;
    }

    fn __repr__(&self) -> String {
        match &self.report {
            Some(report) => format!(
                "InvFreqz(nb={}, na={}, cost={:.3e}, {})",
                report.transfer_function.nb(),
                report.transfer_function.na(),
                report.cost,
                termination_name(report.termination)
            ),
            None => "InvFreqz(not fitted)".to_string(),
        }
    }
}

impl PyInvFreqz {
    fn report(&self) -> PyResult<&FitReport> {
        self.report
            .as_ref()
            .ok_or_else(|| pyo3::exceptions::PyRuntimeError::new_err("Model not fitted yet"))
    }

    fn fitted(&self) -> PyResult<&TransferFunction> {
        self.report().map(|r| &r.transfer_function)
    }
}
