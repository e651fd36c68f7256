use crate::FloatValue;
use serde::{Deserialize, Serialize};

/// Vegetation fluxes integrated over all canopy layers and both leaf classes,
/// per unit ground area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CanopyFluxes {
    /// Gross photosynthesis (umol/m^2/s)
    pub gpp: FloatValue,
    /// Leaf dark respiration (umol/m^2/s)
    pub rd: FloatValue,
    /// Net assimilation (umol/m^2/s)
    pub a_net: FloatValue,
    /// Latent heat flux (W/m^2)
    pub le: FloatValue,
    /// Sensible heat flux (W/m^2)
    pub h: FloatValue,
    /// Net radiation (W/m^2)
    pub rnet: FloatValue,
    /// Leaf-area weighted mean leaf temperature (K)
    pub t_leaf_mean: FloatValue,
}

/// Whole-ecosystem summary of a converged step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CanopySummary {
    /// Net radiation from the band fluxes at the canopy top (W/m^2)
    pub rnet_calc: FloatValue,
    /// Canopy plus soil net radiation (W/m^2)
    pub rnet: FloatValue,
    /// Canopy plus soil latent heat flux (W/m^2)
    pub le: FloatValue,
    /// Canopy plus soil sensible heat flux (W/m^2)
    pub h: FloatValue,
    /// Net ecosystem exchange, positive to the atmosphere (umol/m^2/s)
    pub nee: FloatValue,
    /// Available energy `rnet_calc - gsoil` (W/m^2)
    pub avail: FloatValue,
    /// Ground heat flux (W/m^2)
    pub gsoil: FloatValue,
    /// Shortwave albedo
    pub albedo: FloatValue,
    /// Near-infrared albedo
    pub nir_albedo: FloatValue,
    /// Near-infrared leaving the canopy top, less the upward flux at the
    /// soil surface (W/m^2)
    pub nir_refl: FloatValue,
}
