//! Beam/diffuse partitioning of measured shortwave radiation.
//!
//! Potential visible and near-infrared irradiance on a clear day follow
//! Weiss and Norman (1985). The ratio of measured to potential global
//! radiation then sets the beam fraction of each band.

use canoak_core::constants::{
    NIGHT_PARTITION_SINE_BETA, NIGHT_PAR_SINE_BETA, PAR_UMOL_PER_JOULE,
};
use canoak_core::forcing::Met;
use canoak_core::state::SunAngle;
use canoak_core::FloatValue;
use log::warn;
use serde::{Deserialize, Serialize};

const RATIO_MIN: FloatValue = 0.22;
const RATIO_MAX: FloatValue = 0.89;

/// Beam and diffuse components of the two shortwave bands (W/m^2).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BeamDiffuse {
    /// Ratio of measured to potential global radiation, a cloudiness index
    pub ratrad: FloatValue,
    pub par_beam: FloatValue,
    pub par_diffuse: FloatValue,
    pub nir_beam: FloatValue,
    pub nir_diffuse: FloatValue,
}

/// Split measured global radiation and PAR into beam and diffuse parts.
///
/// `parin` is in umol/m^2/s; the returned components are all in W/m^2.
/// The NIR band is whatever part of `rglobal` is not PAR.
///
/// With the sun too low for the potential irradiance fit the split is not
/// attempted and `ratrad` is undefined; callers should handle that case via
/// [`partition_incoming`].
pub fn diffuse_direct_radiation(
    sin_beta: FloatValue,
    rglobal: FloatValue,
    parin: FloatValue,
    pressure_kpa: FloatValue,
) -> BeamDiffuse {
    let airmass = (pressure_kpa / 101.3) / sin_beta;

    // Potential visible beam and diffuse
    let rdvis = 600.0 * (-0.185 * airmass).exp() * sin_beta;
    let rsdif = (0.4 * (600.0 * sin_beta - rdvis)).max(0.0);

    // Water absorption in the near infrared
    let water = 1320.0 * 0.077 * (2.0 * airmass).powf(0.3);

    // Potential near-infrared beam and diffuse
    let rdir = ((720.0 * (-0.06 * airmass).exp() - water) * sin_beta).max(0.0);
    let rdif = (0.6 * (720.0 * sin_beta - rdir - water * sin_beta)).max(0.0);

    let rvt = rdvis + rsdif;
    let rnt = rdir + rdif;
    let ratrad = (rglobal / (rvt + rnt)).clamp(RATIO_MIN, RATIO_MAX);

    let fvb = (rdvis / rvt * (1.0 - ((0.9 - ratrad).max(0.0) / 0.7).powf(2.0 / 3.0))).clamp(0.0, 1.0);
    let fnb = if rnt > 0.0 {
        (rdir / rnt * (1.0 - ((0.88 - ratrad).max(0.0) / 0.68).powf(2.0 / 3.0))).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let par_w = parin.max(0.0) / PAR_UMOL_PER_JOULE;
    let nir_w = (rglobal - par_w).max(0.0);

    BeamDiffuse {
        ratrad,
        par_beam: fvb * par_w,
        par_diffuse: (1.0 - fvb) * par_w,
        nir_beam: fnb * nir_w,
        nir_diffuse: (1.0 - fnb) * nir_w,
    }
}

/// Incoming radiation as seen by the canopy for one forcing step.
///
/// Returns the PAR actually used (umol/m^2/s) and its beam/diffuse split.
///
/// - Below the night threshold PAR is forced to zero.
/// - Below the partition threshold nothing is split: every component is zero
///   and `ratrad` carries over the last value taken around solar noon.
pub fn partition_incoming(
    sun: &SunAngle,
    met: &Met,
    ratrad_noon: FloatValue,
) -> (FloatValue, BeamDiffuse) {
    let parin = if sun.sin_beta <= NIGHT_PAR_SINE_BETA {
        if met.parin > 0.0 {
            warn!(
                "Sun below horizon on day {} hour {} but PAR = {}; using zero",
                met.day, met.hour, met.parin
            );
        }
        0.0
    } else {
        met.parin
    };

    if sun.sin_beta > NIGHT_PARTITION_SINE_BETA {
        let split = diffuse_direct_radiation(sun.sin_beta, met.rglobal, parin, met.pressure_kpa());
        (parin, split)
    } else {
        (
            parin,
            BeamDiffuse {
                ratrad: ratrad_noon,
                ..BeamDiffuse::default()
            },
        )
    }
}
