//! Soil respiration models.
//!
//! The model is chosen in configuration by its `type` tag, e.g.
//!
//! ```toml
//! [soil.respiration]
//! type = "Q10"
//! base_rate = 2.5
//! q10 = 2.0
//! ```

use canoak_core::FloatValue;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Quantities a respiration model may depend on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RespirationDrivers {
    /// Soil temperature at the respiring depth (K)
    pub soil_temperature: FloatValue,
    /// Volumetric soil moisture (m^3/m^3)
    pub soil_moisture: FloatValue,
    /// Canopy gross photosynthesis (umol/m^2/s)
    pub canopy_gpp: FloatValue,
    /// Canopy height (m)
    pub canopy_height: FloatValue,
}

/// Soil CO2 efflux (umol/m^2/s) as a function of its drivers.
#[typetag::serde(tag = "type")]
pub trait SoilRespiration: Debug + Send + Sync {
    fn respiration(&self, drivers: &RespirationDrivers) -> FloatValue;
}

/// Moisture limitation, a saturating function of volumetric water content.
///
/// $$f(\theta) = \frac{\theta (1 + k)}{\theta + k}$$
///
/// which is 0 for dry soil and 1 at $\theta = 1$.
pub fn moisture_factor(soil_moisture: FloatValue, half_saturation: FloatValue) -> FloatValue {
    let theta = soil_moisture.max(0.0);
    theta * (1.0 + half_saturation) / (theta + half_saturation)
}

/// Lloyd and Taylor (1994) temperature response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LloydTaylor {
    /// Respiration at the reference temperature and saturated soil (umol/m^2/s).
    /// Default: 3.0
    pub base_rate: FloatValue,
    /// Activation parameter (K).
    /// Default: 308.56
    pub e0: FloatValue,
    /// Reference temperature (K).
    /// Default: 283.15
    pub t_ref: FloatValue,
    /// Temperature of zero respiration (K).
    /// Default: 227.13
    pub t0: FloatValue,
    /// Half-saturation soil moisture of the moisture factor (m^3/m^3).
    /// Default: 0.1
    pub moisture_half_saturation: FloatValue,
}

impl Default for LloydTaylor {
    fn default() -> Self {
        Self {
            base_rate: 3.0,
            e0: 308.56,
            t_ref: 283.15,
            t0: 227.13,
            moisture_half_saturation: 0.1,
        }
    }
}

impl LloydTaylor {
    fn temperature_factor(&self, t_k: FloatValue) -> FloatValue {
        if t_k <= self.t0 {
            return 0.0;
        }
        (self.e0 * (1.0 / (self.t_ref - self.t0) - 1.0 / (t_k - self.t0))).exp()
    }
}

#[typetag::serde(name = "LloydTaylor")]
impl SoilRespiration for LloydTaylor {
    fn respiration(&self, drivers: &RespirationDrivers) -> FloatValue {
        self.base_rate
            * self.temperature_factor(drivers.soil_temperature)
            * moisture_factor(drivers.soil_moisture, self.moisture_half_saturation)
    }
}

/// Exponential temperature response with a constant Q10.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Q10 {
    /// Respiration at the reference temperature and saturated soil (umol/m^2/s).
    /// Default: 3.0
    pub base_rate: FloatValue,
    /// Rate increase per 10 K.
    /// Default: 2.0
    pub q10: FloatValue,
    /// Reference temperature (K).
    /// Default: 283.15
    pub t_ref: FloatValue,
    /// Half-saturation soil moisture of the moisture factor (m^3/m^3).
    /// Default: 0.1
    pub moisture_half_saturation: FloatValue,
}

impl Default for Q10 {
    fn default() -> Self {
        Self {
            base_rate: 3.0,
            q10: 2.0,
            t_ref: 283.15,
            moisture_half_saturation: 0.1,
        }
    }
}

#[typetag::serde(name = "Q10")]
impl SoilRespiration for Q10 {
    fn respiration(&self, drivers: &RespirationDrivers) -> FloatValue {
        self.base_rate
            * self.q10.powf((drivers.soil_temperature - self.t_ref) / 10.0)
            * moisture_factor(drivers.soil_moisture, self.moisture_half_saturation)
    }
}

/// Respiration of an alfalfa field.
///
/// Heterotrophic respiration follows [`LloydTaylor`], scaled up with canopy
/// height for the larger root system, plus a root term proportional to
/// current canopy photosynthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Alfalfa {
    /// Heterotrophic part.
    pub heterotrophic: LloydTaylor,
    /// Relative increase of heterotrophic respiration per metre of canopy height (1/m).
    /// Default: 0.5
    pub height_coefficient: FloatValue,
    /// Fraction of canopy gross photosynthesis respired by roots (dimensionless).
    /// Default: 0.1
    pub gpp_fraction: FloatValue,
}

impl Default for Alfalfa {
    fn default() -> Self {
        Self {
            heterotrophic: LloydTaylor::default(),
            height_coefficient: 0.5,
            gpp_fraction: 0.1,
        }
    }
}

#[typetag::serde(name = "Alfalfa")]
impl SoilRespiration for Alfalfa {
    fn respiration(&self, drivers: &RespirationDrivers) -> FloatValue {
        let soil = self.heterotrophic.respiration(drivers)
            * (1.0 + self.height_coefficient * drivers.canopy_height.max(0.0));
        soil + self.gpp_fraction * drivers.canopy_gpp.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn drivers(t_k: FloatValue) -> RespirationDrivers {
        RespirationDrivers {
            soil_temperature: t_k,
            soil_moisture: 0.3,
            canopy_gpp: 0.0,
            canopy_height: 1.0,
        }
    }

    #[test]
    fn test_moisture_factor_bounds() {
        assert_eq!(moisture_factor(0.0, 0.1), 0.0);
        assert_relative_eq!(moisture_factor(1.0, 0.1), 1.0, epsilon = 1e-12);
        assert!(moisture_factor(0.2, 0.1) < moisture_factor(0.4, 0.1));
    }

    #[test]
    fn test_lloyd_taylor_reference_rate() {
        let model = LloydTaylor::default();
        let r = model.respiration(&RespirationDrivers {
            soil_moisture: 1.0,
            ..drivers(283.15)
        });
        assert_relative_eq!(r, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_respiration_increases_with_temperature() {
        let models: Vec<Box<dyn SoilRespiration>> = vec![
            Box::new(LloydTaylor::default()),
            Box::new(Q10::default()),
            Box::new(Alfalfa::default()),
        ];
        for model in models {
            let cold = model.respiration(&drivers(278.15));
            let warm = model.respiration(&drivers(298.15));
            assert!(cold > 0.0);
            assert!(warm > cold, "{:?}: {} !> {}", model, warm, cold);
        }
    }

    #[test]
    fn test_q10_doubles_over_ten_kelvin() {
        let model = Q10::default();
        let r1 = model.respiration(&drivers(288.15));
        let r2 = model.respiration(&drivers(298.15));
        assert_relative_eq!(r2 / r1, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_alfalfa_adds_root_term_only_with_photosynthesis() {
        let model = Alfalfa::default();
        let dark = model.respiration(&drivers(293.15));
        let light = model.respiration(&RespirationDrivers {
            canopy_gpp: 20.0,
            ..drivers(293.15)
        });
        assert_relative_eq!(light - dark, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tagged_deserialization() {
        let json = r#"{"type": "Q10", "q10": 3.0}"#;
        let model: Box<dyn SoilRespiration> =
            serde_json::from_str(json).expect("Deserialization failed");
        let r1 = model.respiration(&drivers(283.15));
        let r2 = model.respiration(&drivers(293.15));
        assert_relative_eq!(r2 / r1, 3.0, epsilon = 1e-12);
    }
}
