//! Multilayer canopy-soil biophysics model.
//!
//! Each forcing step is solved as a fixed-point iteration over the coupled
//! radiation, leaf, soil and air-profile engines of
//! [`canoak_components`], with the shared types of [`canoak_core`].
//!
//! # Usage
//!
//! ```no_run
//! use canoak::config::ModelParameters;
//! use canoak::model::ModelBuilder;
//! use canoak_core::forcing::ForcingRecord;
//!
//! let params = ModelParameters::from_toml_file("canoak.toml")?;
//! let forcing: Vec<ForcingRecord> = Vec::new(); // read from the site data
//! let mut model = ModelBuilder::new()
//!     .with_parameters(params)
//!     .with_forcing(forcing)
//!     .build()?;
//! model.run();
//! for output in model.outputs() {
//!     println!("{} {}", output.met.hour, output.can.nee);
//! }
//! # Ok::<(), canoak_core::errors::CanoakError>(())
//! ```
//!
//! The library logs through the `log` facade and does not install a logger.

pub mod config;
pub mod model;
pub mod solver;

pub use config::{ModelParameters, SolverParameters};
pub use model::{Model, ModelBuilder};
pub use solver::{CanopySolver, Carryover, StepOutput};
