//! Error types for filter design
//!
//! Input errors are raised before any computation starts; numerical errors
//! come from the linear solves and the polynomial root finder. Neither is
//! retried.

use thiserror::Error;

/// Errors that can occur while fitting or converting a filter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// Two arrays that must be positionally aligned have different lengths
    #[error("length mismatch: {what} has {actual} entries, expected {expected}")]
    InputMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Input values outside the accepted domain
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Singular normal equations or a non-convergent root finder
    #[error("numerical error: {0}")]
    Numerical(String),

    /// An operation that needs real coefficients got a complex filter
    #[error("transfer function has complex coefficients")]
    ComplexCoefficients,
}

/// Result type alias for filter design operations
pub type Result<T> = std::result::Result<T, FitError>;

impl FitError {
    /// Returns `true` for errors caused by the caller's input.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            FitError::InputMismatch { .. }
                | FitError::InvalidInput(_)
                | FitError::ComplexCoefficients
        )
    }

    /// Returns `true` for singular solves and root-finder failures.
    pub fn is_numerical_error(&self) -> bool {
        matches!(self, FitError::Numerical(_))
    }
}
