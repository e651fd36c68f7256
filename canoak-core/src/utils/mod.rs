//! Numerical utilities.

pub mod linear_algebra;
