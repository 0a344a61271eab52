//! Constants for the invfreqz fitting routines
//!
//! Centralizes the iteration limits of the Gauss-Newton refinement. The
//! values match the classic `invfreqz` routine and are kept as-is.

// ============================================================================
// Gauss-Newton defaults
// ============================================================================

/// Default maximum number of Gauss-Newton iterations
pub const DEFAULT_MAX_ITERATIONS: usize = 30;

/// Default step-norm tolerance for Gauss-Newton convergence
pub const DEFAULT_TOLERANCE: f64 = 0.01;

// ============================================================================
// Line search parameters
// ============================================================================

/// Number of trial evaluations in one backtracking line search
pub const LINE_SEARCH_TRIALS: usize = 20;

/// Trial count after which the search direction switches to the scaled gradient
pub const STEEPEST_DESCENT_TRIAL: usize = 10;
