//! Mathematical building blocks
//!
//! Dense linear algebra and polynomial routines shared by the fitting code.

pub mod linalg;
pub mod polynomial;
