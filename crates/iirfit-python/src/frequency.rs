//! Python bindings for FrequencyGrid class

use iirfit_core::frequency::{FrequencyGrid, FrequencyUnit, SweepType};
use numpy::{PyArray1, ToPyArray};
use pyo3::prelude::*;

use crate::to_py_err;

/// Python wrapper for FrequencyGrid
#[pyclass(name = "FrequencyGrid")]
#[derive(Clone)]
pub struct PyFrequencyGrid {
    inner: FrequencyGrid,
}

fn parse_unit(unit: &str) -> PyResult<FrequencyUnit> {
    FrequencyUnit::from_str(unit).ok_or_else(|| {
        pyo3::exceptions::PyValueError::new_err(format!(
            "Invalid frequency unit: {}. Use 'Hz' or 'kHz'",
            unit
        ))
    })
}

#[pymethods]
impl PyFrequencyGrid {
    /// Create a frequency sweep
    ///
    /// Args:
    ///     start: Start frequency
    ///     stop: Stop frequency
    ///     npoints: Number of frequency points
    ///     fs: Sample rate in Hz
    ///     unit: Frequency unit ('Hz' or 'kHz')
    ///     sweep_type: Sweep type ('linear' or 'log')
    #[new]
    #[pyo3(signature = (start, stop, npoints, fs, unit="Hz", sweep_type="linear"))]
    pub fn new(
        start: f64,
        stop: f64,
        npoints: usize,
        fs: f64,
        unit: &str,
        sweep_type: &str,
    ) -> PyResult<Self> {
        let freq_unit = parse_unit(unit)?;

        let sweep = match sweep_type.to_lowercase().as_str() {
            "linear" | "lin" => SweepType::Linear,
            "log" | "logarithmic" => SweepType::Log,
            _ => {
                return Err(pyo3::exceptions::PyValueError::new_err(format!(
                    "Invalid sweep type: {}. Use 'linear' or 'log'",
                    sweep_type
                )))
            }
        };

        FrequencyGrid::new(start, stop, npoints, freq_unit, sweep, fs)
            .map(|inner| Self { inner })
            .map_err(to_py_err)
    }

    /// Create from explicit frequency points
    ///
    /// Args:
    ///     f: Frequencies in the given unit, each within [0, fs/2]
    ///     fs: Sample rate in Hz
    ///     unit: Frequency unit ('Hz' or 'kHz')
    #[staticmethod]
    #[pyo3(signature = (f, fs, unit="Hz"))]
    pub fn from_f(f: Vec<f64>, fs: f64, unit: &str) -> PyResult<Self> {
        FrequencyGrid::from_f(f, parse_unit(unit)?, fs)
            .map(|inner| Self { inner })
            .map_err(to_py_err)
    }

    /// The default freqz grid: n points evenly spaced on [0, pi)
    #[staticmethod]
    pub fn normalized<'py>(py: Python<'py>, n: usize) -> Bound<'py, PyArray1<f64>> {
        FrequencyGrid::normalized(n).to_pyarray(py)
    }

    /// Get frequency array in Hz as numpy array
    #[getter]
    pub fn f<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.f().to_pyarray(py)
    }

    /// Normalized angular frequencies in rad/sample
    #[getter]
    pub fn w<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.omega().to_pyarray(py)
    }

    /// Number of frequency points
    #[getter]
    pub fn npoints(&self) -> usize {
        self.inner.npoints()
    }

    /// Sample rate in Hz
    #[getter]
    pub fn fs(&self) -> f64 {
        self.inner.sample_rate()
    }

    /// Nyquist frequency in Hz
    #[getter]
    pub fn nyquist(&self) -> f64 {
        self.inner.nyquist()
    }

    fn __repr__(&self) -> String {
        format!(
            "FrequencyGrid({} points, fs={} Hz)",
            self.inner.npoints(),
            self.inner.sample_rate()
        )
    }

    fn __len__(&self) -> usize {
        self.npoints()
    }
}
