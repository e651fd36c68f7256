//! Scalar profiles from layer sources and the dispersion matrix.
//!
//! The concentration at domain layer $i$ is
//!
//! $$c_i = c_{ref} + \frac{1}{u_*\, f(z/L)\, F} \left( \sum_j D_{ji} S_j + D_{0i} S_{soil}
//!   \right) - (\ldots)_{ref}$$
//!
//! where $S_j$ is the source in canopy layer $j$, $S_{soil}$ the soil flux
//! (released into the lowest layer), $F$ the factor converting flux into
//! concentration units and $f$ a stability correction of the dispersion
//! matrix. Re-referencing pins the reference layer to the measured value.

use canoak_core::constants::CP_AIR;
use canoak_core::dispersion::DispersionMatrix;
use canoak_core::forcing::Met;
use canoak_core::state::{LeafAngle, LeafArea, LeafState, Profile, SoilState};
use canoak_core::FloatValue;
use ndarray::{Array1, Zip};

/// Smallest vapour density kept in the profile (kg/m^3).
const MIN_VAPOUR_DENSITY: FloatValue = 1.0e-6;

/// Stability correction of the neutral dispersion matrix.
pub fn dispersion_stability_factor(zl: FloatValue) -> FloatValue {
    if zl < 0.0 {
        0.97 * -0.7182 / (zl - 0.7182)
    } else {
        1.0 - 0.31 * zl
    }
}

/// Concentration profile over every domain layer for one scalar.
///
/// `sources` has one entry per canopy layer, `scale` converts flux units
/// into concentration units (e.g. `rho * cp` for heat) and `reference_index`
/// is the domain layer pinned to `reference`.
#[allow(clippy::too_many_arguments)]
pub fn conc(
    dispersion: &DispersionMatrix,
    sources: &Array1<FloatValue>,
    soil_flux: FloatValue,
    reference: FloatValue,
    reference_index: usize,
    ustar: FloatValue,
    zl: FloatValue,
    scale: FloatValue,
) -> Array1<FloatValue> {
    let dij = dispersion.as_array();
    let (_, n_domain) = dispersion.shape();
    let factor = dispersion_stability_factor(zl) / (ustar * scale);

    let mut cc = Array1::<FloatValue>::zeros(n_domain);
    for i in 0..n_domain {
        let column = dij.column(i);
        let sum: FloatValue = column.dot(sources) + column[0] * soil_flux;
        cc[i] = sum * factor;
    }

    let shift = reference - cc[reference_index];
    cc.mapv_into(|c| c + shift)
}

/// Heat, vapour and CO2 released by each canopy layer per unit ground area.
///
/// Leaf fluxes are weighted by the sunlit and shaded leaf area of the
/// layer. CO2 is released, so it is the negative of net assimilation.
pub fn layer_sources(
    sun: &LeafState,
    shade: &LeafState,
    leaf_angle: &LeafAngle,
    leaf_area: &LeafArea,
) -> (Array1<FloatValue>, Array1<FloatValue>, Array1<FloatValue>) {
    let n = leaf_area.dff.len();
    let weigh = |sun_flux: &Array1<FloatValue>, shade_flux: &Array1<FloatValue>| {
        let mut out = Array1::<FloatValue>::zeros(n);
        Zip::from(&mut out)
            .and(sun_flux)
            .and(shade_flux)
            .and(&leaf_angle.prob_beam)
            .and(&leaf_angle.prob_shade)
            .and(&leaf_area.dff)
            .for_each(|o, &s, &sh, &pb, &ps, &dff| *o = dff * (pb * s + ps * sh));
        out
    };

    let h = weigh(&sun.h, &shade.h);
    let le = weigh(&sun.le, &shade.le);
    let co2 = -weigh(&sun.a_net, &shade.a_net);
    (h, le, co2)
}

/// New air temperature, vapour and CO2 profiles.
///
/// The computed profiles are blended with `previous` by `relaxation`
/// (1 replaces them outright) to damp the feedback between leaf fluxes and
/// the air around them.
#[allow(clippy::too_many_arguments)]
pub fn update_profiles(
    previous: &Profile,
    dispersion: &DispersionMatrix,
    met: &Met,
    soil: &SoilState,
    sources: (Array1<FloatValue>, Array1<FloatValue>, Array1<FloatValue>),
    reference_index: usize,
    relaxation: FloatValue,
) -> Profile {
    let (h_source, le_source, co2_source) = sources;
    let scalar = |src: &Array1<FloatValue>, soil_flux, reference, scale| {
        conc(
            dispersion,
            src,
            soil_flux,
            reference,
            reference_index,
            met.ustar,
            met.zl,
            scale,
        )
    };

    let t_air = scalar(&h_source, soil.heat, met.t_air_k, met.air_density * CP_AIR);
    let rhov = scalar(&le_source, soil.evap, met.rhova_kg, met.latent);
    let co2 = scalar(&co2_source, soil.resp, met.co2, met.air_density_mole);

    let blend = |new: Array1<FloatValue>, old: &Array1<FloatValue>| {
        let mut out = new;
        Zip::from(&mut out)
            .and(old)
            .for_each(|n, &o| *n = relaxation * *n + (1.0 - relaxation) * o);
        out
    };

    Profile {
        t_air: blend(t_air, &previous.t_air),
        rhov: blend(rhov, &previous.rhov).mapv_into(|v| v.max(MIN_VAPOUR_DENSITY)),
        co2: blend(co2, &previous.co2).mapv_into(|v| v.max(0.0)),
        wind: previous.wind.clone(),
        h_source,
        le_source,
        co2_source,
    }
}
