//! Python bindings for filter evaluation and SOS conversion

use iirfit_core::filter::{tf2sos as core_tf2sos, TransferFunction};
use iirfit_core::invfreqz::stabilize;
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use numpy::{PyArray1, PyArray2, ToPyArray};
use pyo3::prelude::*;

use crate::to_py_err;

/// Frequency response of B/A at normalized angular frequencies
///
/// Args:
///     b: Numerator coefficients
///     a: Denominator coefficients
///     w: Frequencies in rad/sample
///
/// Returns:
///     Complex response as numpy array
#[pyfunction]
pub fn freqz<'py>(
    py: Python<'py>,
    b: Vec<Complex64>,
    a: Vec<Complex64>,
    w: Vec<f64>,
) -> Bound<'py, PyArray1<Complex64>> {
    TransferFunction::new(Array1::from_vec(b), Array1::from_vec(a))
        .response(&w)
        .to_pyarray(py)
}

/// Reflect polynomial roots outside the unit circle to 1/conj(r)
///
/// Args:
///     a: Polynomial coefficients, highest power first
///
/// Returns:
///     Stabilized coefficients as a complex numpy array
#[pyfunction]
pub fn polystab<'py>(
    py: Python<'py>,
    a: Vec<Complex64>,
) -> PyResult<Bound<'py, PyArray1<Complex64>>> {
    stabilize(&Array1::from_vec(a))
        .map(|p| p.to_pyarray(py))
        .map_err(to_py_err)
}

/// Decompose a real transfer function into second-order sections
///
/// Args:
///     b: Numerator coefficients
///     a: Denominator coefficients
///
/// Returns:
///     Array of shape (n_sections, 6), rows [b0, b1, b2, 1, a1, a2]
#[pyfunction]
pub fn tf2sos<'py>(
    py: Python<'py>,
    b: Vec<f64>,
    a: Vec<f64>,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let sections = core_tf2sos(&b, &a).map_err(to_py_err)?;
    let mut sos = Array2::<f64>::zeros((sections.len(), 6));
    for (i, section) in sections.iter().enumerate() {
        for (j, &c) in section.coefficients().iter().enumerate() {
            sos[[i, j]] = c;
        }
    }
    Ok(sos.to_pyarray(py))
}
