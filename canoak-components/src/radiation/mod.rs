//! Radiation engines
//!
//! - `geometry`: solar position, leaf area profile, leaf angle distribution
//! - `partition`: beam/diffuse split of measured global radiation and PAR
//! - `shortwave`: multilayer scattering of PAR and NIR
//! - `longwave`: sky emission and infrared exchange between sky, leaves and soil
//! - `absorbed`: total radiation absorbed by sunlit and shaded leaves
//!
//! Shortwave fields are fixed for a forcing step; the longwave field depends
//! on leaf and soil temperatures and is recomputed every solver iteration.

mod absorbed;
mod geometry;
mod longwave;
mod partition;
mod shortwave;

pub use absorbed::compute_qin;
pub use geometry::{angle, leaf_angle, leaf_area};
pub use longwave::{ir_rad_tran_canopy, sky_ir};
pub use partition::{diffuse_direct_radiation, partition_incoming, BeamDiffuse};
pub use shortwave::{rad_tran_canopy, BandOptics};
