use crate::FloatValue;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Soil surface energy balance and subsurface temperatures.
///
/// Fluxes are W/m^2 positive away from the surface (into the air for `heat`
/// and `evap`, into the ground for `gsoil`); `resp` is in umol/m^2/s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilState {
    /// Soil surface temperature (K)
    pub sfc_temperature: FloatValue,
    /// Temperature of each soil layer (K), index 0 nearest the surface
    pub t_soil: Array1<FloatValue>,
    /// Sensible heat flux
    pub heat: FloatValue,
    /// Latent heat flux
    pub evap: FloatValue,
    /// Ground heat flux
    pub gsoil: FloatValue,
    /// Net radiation
    pub rnet: FloatValue,
    /// Emitted longwave
    pub lout: FloatValue,
    /// Soil respiration
    pub resp: FloatValue,
    /// Energy balance residual `rnet - heat - evap - gsoil`, reported not corrected
    pub energy_residual: FloatValue,
}

impl SoilState {
    /// Soil at rest with the given temperature profile.
    pub fn from_profile(t_soil: Array1<FloatValue>, sfc_temperature: FloatValue) -> Self {
        Self {
            sfc_temperature,
            t_soil,
            heat: 0.0,
            evap: 0.0,
            gsoil: 0.0,
            rnet: 0.0,
            lout: 0.0,
            resp: 0.0,
            energy_residual: 0.0,
        }
    }

    /// Linear profile from `t_surface` at the top to `t_deep` at the bottom layer.
    pub fn linear(n_soil_layers: usize, t_surface: FloatValue, t_deep: FloatValue) -> Self {
        let last = (n_soil_layers.max(2) - 1) as FloatValue;
        let t_soil = Array1::from_shape_fn(n_soil_layers, |k| {
            t_surface + (t_deep - t_surface) * k as FloatValue / last
        });
        Self::from_profile(t_soil, t_surface)
    }
}
