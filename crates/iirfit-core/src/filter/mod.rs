//! Filter representations
//!
//! - `TransferFunction` - numerator/denominator coefficients and their response
//! - `SecondOrderSection` - biquad stages for the runtime filter cascade

pub mod response;
pub mod sos;
mod transfer_function;

pub use sos::{sos_response, sos_to_tf, tf2sos, SecondOrderSection};
pub use transfer_function::TransferFunction;
