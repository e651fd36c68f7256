//! Optical Parameters
//!
//! Leaf and soil scattering properties for the two shortwave bands.

use crate::radiation::BandOptics;
use canoak_core::errors::{CanoakError, CanoakResult};
use canoak_core::FloatValue;
use serde::{Deserialize, Serialize};

/// Leaf reflectance/transmittance and soil reflectance per band.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpticalParameters {
    /// Leaf PAR reflectance.
    /// Default: 0.0377
    pub par_reflect: FloatValue,

    /// Leaf PAR transmittance.
    /// Default: 0.072
    pub par_trans: FloatValue,

    /// Soil PAR reflectance.
    /// Default: 0.1
    pub par_soil_refl: FloatValue,

    /// Leaf NIR reflectance.
    /// Default: 0.6
    pub nir_reflect: FloatValue,

    /// Leaf NIR transmittance.
    /// Default: 0.26
    pub nir_trans: FloatValue,

    /// Soil NIR reflectance.
    /// Default: 0.2
    pub nir_soil_refl: FloatValue,
}

impl Default for OpticalParameters {
    fn default() -> Self {
        Self {
            par_reflect: 0.0377,
            par_trans: 0.072,
            par_soil_refl: 0.1,
            nir_reflect: 0.6,
            nir_trans: 0.26,
            nir_soil_refl: 0.2,
        }
    }
}

impl OpticalParameters {
    /// Leaf PAR absorptance.
    pub fn par_absorbed(&self) -> FloatValue {
        1.0 - self.par_reflect - self.par_trans
    }

    /// Leaf NIR absorptance.
    pub fn nir_absorbed(&self) -> FloatValue {
        1.0 - self.nir_reflect - self.nir_trans
    }

    pub fn par(&self) -> BandOptics {
        BandOptics {
            reflect: self.par_reflect,
            trans: self.par_trans,
            soil_refl: self.par_soil_refl,
        }
    }

    pub fn nir(&self) -> BandOptics {
        BandOptics {
            reflect: self.nir_reflect,
            trans: self.nir_trans,
            soil_refl: self.nir_soil_refl,
        }
    }

    pub fn validate(&self) -> CanoakResult<()> {
        let fractions = [
            ("par_reflect", self.par_reflect),
            ("par_trans", self.par_trans),
            ("par_soil_refl", self.par_soil_refl),
            ("nir_reflect", self.nir_reflect),
            ("nir_trans", self.nir_trans),
            ("nir_soil_refl", self.nir_soil_refl),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(CanoakError::invalid_parameter(name, "must lie within [0, 1]"));
            }
        }
        if !(self.par_absorbed() > 0.0) {
            return Err(CanoakError::invalid_parameter(
                "par_reflect",
                "leaf PAR reflectance plus transmittance must be below 1",
            ));
        }
        if !(self.nir_absorbed() > 0.0) {
            return Err(CanoakError::invalid_parameter(
                "nir_reflect",
                "leaf NIR reflectance plus transmittance must be below 1",
            ));
        }
        Ok(())
    }
}
