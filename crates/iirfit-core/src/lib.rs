//! iirfit-core: IIR filter design from frequency response data
//!
//! Rust implementation of `invfreqz`-style rational fitting.
//!
//! ## Modules
//!
//! - `samples` - Target frequency response samples and weights
//! - `frequency` - Frequency grids and normalization
//! - `invfreqz` - Linear estimate, stabilization and Gauss-Newton refinement
//! - `filter` - Transfer functions and second-order sections
//! - `math` - Linear algebra and polynomial helpers

pub mod constants;
pub mod error;
pub mod filter;
pub mod frequency;
pub mod invfreqz;
pub mod math;
pub mod samples;

pub use error::{FitError, Result};
pub use filter::{SecondOrderSection, TransferFunction};
pub use frequency::FrequencyGrid;
pub use invfreqz::{invfreqz, FitReport, InvFreqz, Termination};
pub use samples::{FrequencySample, FrequencySamples};
