//! Forcing record and the meteorological state derived from it.

use crate::constants::{R_DRY_AIR, R_UNIVERSAL, T_FREEZE};
use crate::thermo::{latent_heat, saturation_vapour_pressure, vapour_density};
use crate::FloatValue;
use serde::{Deserialize, Serialize};

/// Friction velocity floor (m/s).
///
/// The stability update divides by the cube of the friction velocity.
pub const MIN_USTAR: FloatValue = 0.05;

/// One row of meteorological forcing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForcingRecord {
    /// Day of year (1-366)
    pub day: FloatValue,
    /// Local standard time (decimal hours)
    pub hour: FloatValue,
    /// Global shortwave radiation (W/m^2)
    pub rglobal: FloatValue,
    /// Incoming PAR (umol/m^2/s)
    pub parin: FloatValue,
    /// Air pressure (kPa)
    pub pressure_kpa: FloatValue,
    /// Leaf area index (m^2/m^2)
    pub lai: FloatValue,
    /// Air temperature at the reference height (C)
    pub t_air_c: FloatValue,
    /// Wind speed at the reference height (m/s)
    pub wind_speed: FloatValue,
    /// Friction velocity (m/s)
    pub ustar: FloatValue,
    /// CO2 mixing ratio (ppm)
    pub co2: FloatValue,
    /// Vapour pressure (kPa)
    pub ea_kpa: FloatValue,
    /// Volumetric soil moisture (m^3/m^3)
    pub soil_moisture: FloatValue,
    /// Deep soil temperature (C)
    pub soil_t_c: FloatValue,
}

/// Meteorological state for one forcing step.
///
/// Built once from a [`ForcingRecord`]; only `zl` changes afterwards, once per
/// solver iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Met {
    pub day: FloatValue,
    pub hour: FloatValue,
    /// Stability parameter z/L at the reference height
    pub zl: FloatValue,
    pub t_air_k: FloatValue,
    /// Vapour density at the reference height (kg/m^3)
    pub rhova_kg: FloatValue,
    /// Vapour pressure (Pa)
    pub ea_pa: FloatValue,
    /// Vapour pressure deficit (Pa)
    pub vpd_pa: FloatValue,
    /// Relative humidity (0-1)
    pub rh: FloatValue,
    pub pressure_pa: FloatValue,
    /// Dry air density (kg/m^3)
    pub air_density: FloatValue,
    /// Molar air density (mol/m^3)
    pub air_density_mole: FloatValue,
    /// Latent heat of vaporisation (J/kg)
    pub latent: FloatValue,
    pub ustar: FloatValue,
    pub wind_speed: FloatValue,
    pub co2: FloatValue,
    pub rglobal: FloatValue,
    pub parin: FloatValue,
    pub lai: FloatValue,
    pub soil_moisture: FloatValue,
    pub soil_t_k: FloatValue,
}

impl Met {
    /// Derive the meteorological state from a forcing record.
    ///
    /// Non-physical inputs are clamped here: negative radiation and wind to
    /// zero, friction velocity to [`MIN_USTAR`], humidity to saturation.
    pub fn from_forcing(forcing: &ForcingRecord) -> Self {
        let t_air_k = forcing.t_air_c + T_FREEZE;
        let pressure_pa = forcing.pressure_kpa * 1000.0;
        let es_pa = saturation_vapour_pressure(t_air_k);
        let ea_pa = (forcing.ea_kpa * 1000.0).clamp(0.0, es_pa);

        Self {
            day: forcing.day,
            hour: forcing.hour,
            zl: 0.0,
            t_air_k,
            rhova_kg: vapour_density(ea_pa, t_air_k),
            ea_pa,
            vpd_pa: es_pa - ea_pa,
            rh: ea_pa / es_pa,
            pressure_pa,
            air_density: pressure_pa / (R_DRY_AIR * t_air_k),
            air_density_mole: pressure_pa / (R_UNIVERSAL * t_air_k),
            latent: latent_heat(t_air_k),
            ustar: forcing.ustar.max(MIN_USTAR),
            wind_speed: forcing.wind_speed.max(0.0),
            co2: forcing.co2,
            rglobal: forcing.rglobal.max(0.0),
            parin: forcing.parin.max(0.0),
            lai: forcing.lai.max(0.0),
            soil_moisture: forcing.soil_moisture,
            soil_t_k: forcing.soil_t_c + T_FREEZE,
        }
    }

    /// Pressure in kPa.
    pub fn pressure_kpa(&self) -> FloatValue {
        self.pressure_pa / 1000.0
    }
}
