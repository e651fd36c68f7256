//! Scalar profile engine: wind inside the canopy, dispersion of heat,
//! vapour and CO2 from layer sources, and the stability feedback.

mod scalar;
mod stability;
mod wind;

pub use scalar::{conc, dispersion_stability_factor, layer_sources, update_profiles};
pub use stability::stability_parameter;
pub use wind::{psi_momentum, uz};
