//! Python bindings for iirfit-core
//!
//! This module exposes iirfit-core functionality to Python via PyO3.
//!
//! ## Functions
//!
//! - `invfreqz` - Fit B/A to a sampled frequency response
//! - `polystab` - Reflect polynomial roots into the unit circle
//! - `freqz` - Evaluate B/A at normalized frequencies
//! - `tf2sos` - Second-order section decomposition
//!
//! ## Classes
//!
//! - `InvFreqz` - Configurable fitter with diagnostics
//! - `FrequencyGrid` - Frequency points at a sample rate

use iirfit_core::FitError;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

mod filter;
mod frequency;
mod invfreqz;

pub use frequency::PyFrequencyGrid;
pub use invfreqz::PyInvFreqz;

/// Map a fitting error to a Python exception
///
/// Input problems raise `ValueError`, numerical failures `RuntimeError`.
pub(crate) fn to_py_err(err: FitError) -> PyErr {
    if err.is_input_error() {
        PyValueError::new_err(err.to_string())
    } else {
        PyRuntimeError::new_err(err.to_string())
    }
}

/// iirfit - IIR filter design from frequency response data
///
/// Example:
///     >>> import numpy as np
///     >>> import iirfit
///     >>> w = iirfit.FrequencyGrid.normalized(64)
///     >>> h = iirfit.freqz([0.2, 0.1], [1.0, -0.6], w)
///     >>> b, a = iirfit.invfreqz(h, w, 1, 1)
#[pymodule]
fn iirfit(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(invfreqz::invfreqz, m)?)?;
    m.add_function(wrap_pyfunction!(filter::polystab, m)?)?;
    m.add_function(wrap_pyfunction!(filter::freqz, m)?)?;
    m.add_function(wrap_pyfunction!(filter::tf2sos, m)?)?;

    m.add_class::<PyInvFreqz>()?;
    m.add_class::<PyFrequencyGrid>()?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
