//! IIR filter design from a sampled frequency response
//!
//! Fits `H(z) = B(z)/A(z)` with numerator order `nb` and denominator order
//! `na` to complex samples `H(e^{jω})` in three stages:
//!
//! 1. a weighted linear least-squares (equation error) estimate,
//! 2. stabilization of the denominator by reflecting roots into the unit
//!    circle,
//! 3. optional Gauss-Newton refinement of the output error.
//!
//! # References
//!
//! - J. O. Smith III, "Introduction to Digital Filters with Audio
//!   Applications", section on `invfreqz`
//! - L. Ljung, "System Identification: Theory for the User", 2nd ed., 1999

mod constants;
mod core;
pub mod gauss_newton;
pub mod linear;
pub mod stabilize;

pub use self::constants::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, LINE_SEARCH_TRIALS, STEEPEST_DESCENT_TRIAL,
};
pub use self::core::{fit_transfer_function, invfreqz, FitReport, InvFreqz};
pub use gauss_newton::{refine, RefineOutcome, Termination};
pub use stabilize::stabilize;
