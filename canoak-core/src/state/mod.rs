//! State entities for one forcing step.
//!
//! Every entity here is a plain value: the solver owns one copy of each per
//! iteration and replaces it with the engine's output, so nothing is shared
//! mutably between engines.
//!
//! - [`geometry`]: sun angle, leaf angle and leaf area profile (fixed for the step)
//! - [`radiation`]: shortwave bands, longwave fluxes and absorbed radiation
//! - [`leaf`]: sunlit or shaded leaf energy and carbon state
//! - [`soil`]: soil surface energy balance and soil temperature profile
//! - [`profile`]: air temperature, vapour and CO2 profiles plus source strengths
//! - [`canopy`]: canopy-integrated fluxes and the whole-ecosystem summary

pub mod canopy;
pub mod geometry;
pub mod leaf;
pub mod profile;
pub mod radiation;
pub mod soil;

pub use canopy::{CanopyFluxes, CanopySummary};
pub use geometry::{LeafAngle, LeafArea, SunAngle};
pub use leaf::LeafState;
pub use profile::Profile;
pub use radiation::{AbsorbedRadiation, Infrared, RadiationBand};
pub use soil::SoilState;
