//! Physics engines for the multilayer canopy-soil model.
//!
//! # Module Organisation
//!
//! Engines are organised by domain:
//! - `radiation`: solar geometry, beam/diffuse partitioning, shortwave and
//!   longwave transfer through the canopy, absorbed radiation per leaf class
//! - `leaf`: boundary-layer conductance, photosynthesis/stomatal conductance
//!   and the sunlit/shaded leaf energy balance
//! - `soil`: soil surface energy balance, heat conduction and respiration
//! - `profile`: wind profile, scalar dispersion and the stability update
//! - `canopy`: reduction of per-layer states to canopy totals
//!
//! Every engine is a set of pure functions: inputs are borrowed, outputs are
//! returned as new state values.
//!
//! # Parameters
//!
//! Each engine has an associated parameters struct in the `parameters` module
//! with defaults for an alfalfa canopy.

pub mod canopy;
pub mod leaf;
pub mod parameters;
pub mod profile;
pub mod radiation;
pub mod soil;
