//! Soil Parameters
//!
//! Thermal, evaporative and respiration properties of the soil column.

use crate::soil::{LloydTaylor, SoilRespiration};
use canoak_core::errors::{CanoakError, CanoakResult};
use canoak_core::FloatValue;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Parameters for the soil energy balance and respiration.
///
/// # Soil evaporation
///
/// The resistance of the soil surface to evaporation falls with moisture:
///
/// $$r_{soil} = \exp(a - b\, \theta / \theta_{sat})$$
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SoilParameters {
    /// Thickness of each soil layer (m).
    /// Default: 0.03
    pub layer_thickness: FloatValue,

    /// Soil thermal conductivity (W/m/K).
    /// Default: 0.8
    pub thermal_conductivity: FloatValue,

    /// Volumetric heat capacity of the soil (J/m^3/K).
    /// Default: 2.0e6
    pub heat_capacity: FloatValue,

    /// Soil thermal emissivity (dimensionless).
    /// Default: 0.98
    pub emissivity: FloatValue,

    /// Saturated volumetric water content (m^3/m^3).
    /// Default: 0.45
    pub porosity: FloatValue,

    /// Intercept `a` of the log soil evaporation resistance (ln s/m).
    /// Default: 8.206
    pub resistance_a: FloatValue,

    /// Slope `b` of the log soil evaporation resistance (ln s/m).
    /// Default: 4.255
    pub resistance_b: FloatValue,

    /// Still-air part of the soil-air heat transfer conductance (m/s).
    /// Default: 0.004
    pub conductance_still: FloatValue,

    /// Wind-dependent part of the soil-air heat transfer conductance (dimensionless).
    /// Default: 0.012
    pub conductance_wind: FloatValue,

    /// Index of the soil layer whose temperature drives respiration.
    /// Default: 4
    pub respiration_layer: usize,

    /// Soil respiration model.
    /// Default: [`LloydTaylor`]
    pub respiration: Arc<dyn SoilRespiration>,
}

impl Default for SoilParameters {
    fn default() -> Self {
        Self {
            layer_thickness: 0.03,
            thermal_conductivity: 0.8,
            heat_capacity: 2.0e6,
            emissivity: 0.98,
            porosity: 0.45,
            resistance_a: 8.206,
            resistance_b: 4.255,
            conductance_still: 0.004,
            conductance_wind: 0.012,
            respiration_layer: 4,
            respiration: Arc::new(LloydTaylor::default()),
        }
    }
}

impl SoilParameters {
    /// Soil-air heat transfer conductance for a near-surface wind speed (m/s).
    pub fn heat_conductance(&self, wind: FloatValue) -> FloatValue {
        self.conductance_still + self.conductance_wind * wind.max(0.0)
    }

    /// Soil surface resistance to evaporation (s/m).
    pub fn evaporation_resistance(&self, soil_moisture: FloatValue) -> FloatValue {
        let relative = (soil_moisture / self.porosity).clamp(0.0, 1.0);
        (self.resistance_a - self.resistance_b * relative).exp()
    }

    /// Thermal diffusivity (m^2/s).
    pub fn diffusivity(&self) -> FloatValue {
        self.thermal_conductivity / self.heat_capacity
    }

    pub fn validate(&self, n_soil_layers: usize) -> CanoakResult<()> {
        let positive = [
            ("layer_thickness", self.layer_thickness),
            ("thermal_conductivity", self.thermal_conductivity),
            ("heat_capacity", self.heat_capacity),
            ("porosity", self.porosity),
            ("conductance_still", self.conductance_still),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(CanoakError::invalid_parameter(name, "must be positive"));
            }
        }
        if !(self.emissivity > 0.0 && self.emissivity <= 1.0) {
            return Err(CanoakError::invalid_parameter(
                "emissivity",
                "must lie within (0, 1]",
            ));
        }
        if self.respiration_layer >= n_soil_layers {
            return Err(CanoakError::invalid_parameter(
                "respiration_layer",
                format!("must be below the number of soil layers ({})", n_soil_layers),
            ));
        }
        Ok(())
    }
}
