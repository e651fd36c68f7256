//! Core types for the multilayer canopy-soil model.
//!
//! This crate holds everything the physics engines share but do not own:
//! the vertical discretisation ([`setup::Setup`]), the forcing record and the
//! meteorology derived from it ([`forcing`]), the precomputed dispersion
//! matrix ([`dispersion::DispersionMatrix`]), the per-step state entities
//! ([`state`]) and a handful of numerical helpers.

pub mod constants;
pub mod dispersion;
pub mod errors;
pub mod forcing;
pub mod setup;
pub mod state;
pub mod thermo;
pub mod utils;

/// Floating point type used throughout the model.
pub type FloatValue = f64;
