//! Numerical constants for filter design
//!
//! Provides standardized tolerance values used throughout the library.

/// Tolerance for detecting near-zero values in division and singularity checks.
pub const NEAR_ZERO: f64 = 1e-15;

/// Relative tolerance below which the imaginary parts of a rebuilt
/// polynomial are treated as round-off and dropped.
pub const REAL_COEFF_TOL: f64 = 1e-10;

/// Convergence threshold for the Schur decomposition used for polynomial roots.
pub const SCHUR_EPS: f64 = f64::EPSILON;

/// Iteration cap for the Schur decomposition. Exceeding it is reported as a
/// root-finding failure.
pub const SCHUR_MAX_ITER: usize = 10_000;

/// Tolerance for pairing a complex root with its conjugate.
pub const CONJUGATE_PAIR_TOL: f64 = 1e-8;

/// Iteration cap for the Durand-Kerner fallback root finder.
pub const DURAND_KERNER_MAX_ITER: usize = 1000;

/// Relative correction size at which Durand-Kerner iteration stops.
pub const DURAND_KERNER_TOL: f64 = 1e-14;

/// Largest relative backward error `|p(r)| / Σ|c_k||r|^k` accepted for a root.
pub const ROOT_RESIDUAL_TOL: f64 = 1e-8;
