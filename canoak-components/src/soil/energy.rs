//! Soil surface energy balance and heat conduction.
//!
//! The surface temperature $T_s$ balances absorbed radiation against emitted
//! longwave, sensible and latent heat, and conduction into the top soil
//! layer:
//!
//! $$f(T_s) = R_{abs} - \epsilon\sigma T_s^4 - \rho c_p g_h (T_s - T_a)
//!   - \lambda g_v (\rho_{vs}(T_s) - \rho_v) - \frac{2k}{\Delta z}(T_s - T_1) = 0$$
//!
//! One Newton step about the previous surface temperature is taken per call;
//! the outer solver loop brings it to convergence. Whatever imbalance is left
//! is reported in [`SoilState::energy_residual`].
//!
//! The subsurface profile then follows an implicit conduction step over the
//! forcing interval, split into `mtime` sub-steps, with $T_s$ on top and the
//! deep soil temperature below.

use crate::parameters::SoilParameters;
use canoak_core::constants::{CP_AIR, SIGMA};
use canoak_core::forcing::Met;
use canoak_core::state::{Profile, SoilState};
use canoak_core::thermo::{saturation_vapour_density, saturation_vapour_density_slope};
use canoak_core::utils::linear_algebra::Tridiagonal;
use canoak_core::FloatValue;
use ndarray::Array1;

/// Radiation reaching the soil surface (W/m^2).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SoilRadiation {
    /// Absorbed shortwave, PAR plus NIR
    pub shortwave: FloatValue,
    /// Downward longwave at the surface
    pub ir_down: FloatValue,
}

/// Implicit conduction over `dt_seconds` in `mtime` sub-steps.
///
/// Layer centres sit at depths `(k + 1/2) dz`; the surface and deep boundary
/// temperatures are held fixed for the whole interval.
pub fn soil_conduction(
    params: &SoilParameters,
    t_start: &Array1<FloatValue>,
    t_surface: FloatValue,
    t_deep: FloatValue,
    dt_seconds: FloatValue,
    mtime: usize,
) -> Array1<FloatValue> {
    let n = t_start.len();
    let mtime = mtime.max(1);
    let dz = params.layer_thickness;
    let a = params.diffusivity() * (dt_seconds / mtime as FloatValue) / (dz * dz);

    let mut system = Tridiagonal::zeros(n);
    for k in 0..n {
        let above = if k == 0 { 2.0 * a } else { a };
        let below = if k == n - 1 { 2.0 * a } else { a };
        system.lower[k] = -above;
        system.diag[k] = 1.0 + above + below;
        system.upper[k] = -below;
    }

    let mut t = t_start.clone();
    for _ in 0..mtime {
        let mut rhs = t.clone();
        rhs[0] += 2.0 * a * t_surface;
        rhs[n - 1] += 2.0 * a * t_deep;
        t = system.solve(&rhs);
    }
    t
}

/// Solve the soil surface energy balance for one solver iteration.
///
/// `t_soil_start` is the soil profile at the start of the forcing step; the
/// conduction step always restarts from it so repeated iterations do not
/// accumulate heat.
#[allow(clippy::too_many_arguments)]
pub fn soil_energy_balance(
    params: &SoilParameters,
    met: &Met,
    profile: &Profile,
    radiation: SoilRadiation,
    t_soil_start: &Array1<FloatValue>,
    previous: &SoilState,
    dt_seconds: FloatValue,
    mtime: usize,
) -> SoilState {
    let eps = params.emissivity;
    let rho_cp = met.air_density * CP_AIR;
    let t_air = profile.t_air[0];
    let rhov_air = profile.rhov[0];

    let g_heat = params.heat_conductance(profile.wind[0]);
    let g_vapour = 1.0 / (1.0 / g_heat + params.evaporation_resistance(met.soil_moisture));
    let g_ground = 2.0 * params.thermal_conductivity / params.layer_thickness;
    let t_top = t_soil_start[0];
    let rabs = radiation.shortwave + eps * radiation.ir_down;

    let balance = |ts: FloatValue| {
        rabs - eps * SIGMA * ts.powi(4)
            - rho_cp * g_heat * (ts - t_air)
            - met.latent * g_vapour * (saturation_vapour_density(ts) - rhov_air)
            - g_ground * (ts - t_top)
    };
    let slope = |ts: FloatValue| {
        -4.0 * eps * SIGMA * ts.powi(3)
            - rho_cp * g_heat
            - met.latent * g_vapour * saturation_vapour_density_slope(ts)
            - g_ground
    };

    let ts0 = previous.sfc_temperature;
    let ts = ts0 - balance(ts0) / slope(ts0);

    let lout = eps * SIGMA * ts.powi(4);
    let rnet = rabs - lout;
    let heat = rho_cp * g_heat * (ts - t_air);
    let evap = met.latent * g_vapour * (saturation_vapour_density(ts) - rhov_air);
    let gsoil = g_ground * (ts - t_top);

    let t_soil = soil_conduction(params, t_soil_start, ts, met.soil_t_k, dt_seconds, mtime);

    SoilState {
        sfc_temperature: ts,
        t_soil,
        heat,
        evap,
        gsoil,
        rnet,
        lout,
        resp: previous.resp,
        energy_residual: rnet - heat - evap - gsoil,
    }
}
