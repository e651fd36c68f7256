//! Leaf energy balance
//!
//! # What This Component Does
//!
//! For each canopy layer and each leaf class (sunlit or shaded) it solves
//! the leaf temperature that balances absorbed radiation against emitted
//! longwave, sensible and latent heat, and evaluates the carbon balance at
//! that state.
//!
//! # Boundary layer
//!
//! Forced convection over a flat plate and free convection from the
//! leaf-air temperature difference of the previous iteration:
//!
//! $$Nu_{forced} = 0.66\, Pr^{0.33} Re^{0.5} \qquad Nu_{free} = 0.54\, (Gr\, Pr)^{0.25}$$
//!
//! The larger of the two applies; vapour and CO2 use the Schmidt number in
//! place of $Pr$.
//!
//! # Energy balance
//!
//! Emitted longwave and saturation vapour density are linearised about air
//! temperature, giving
//!
//! $$\Delta T = \frac{R_{abs} - 2\epsilon\sigma T_a^4 - \lambda g_v (\rho_{vs}(T_a) - \rho_v)}
//!   {2 \rho c_p g_{bh} + 8 \epsilon \sigma T_a^3 + \lambda g_v s}$$
//!
//! so net radiation equals $H + LE$ exactly.
//!
//! # Coupling
//!
//! Boundary-layer conductance depends on $\Delta T$, stomatal conductance on
//! the leaf-surface humidity, which depends on $LE$. Both take the leaf state
//! of the previous iteration, so the outer solver loop resolves the coupling.

use crate::leaf::photosynthesis::{photosynthesis, PhotosynthesisInput};
use crate::parameters::LeafParameters;
use canoak_core::constants::{CP_AIR, DIFF_CO2, DIFF_HEAT, DIFF_VAPOUR, GRAVITY, NU_AIR, SIGMA};
use canoak_core::forcing::Met;
use canoak_core::state::{LeafState, Profile};
use canoak_core::thermo::{saturation_vapour_density, saturation_vapour_density_slope};
use canoak_core::FloatValue;
use ndarray::Array1;

/// Lowest wind speed used for forced convection (m/s).
const MIN_LEAF_WIND: FloatValue = 0.01;

/// Boundary-layer conductances of one leaf side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryLayer {
    /// Heat (m/s)
    pub heat: FloatValue,
    /// Water vapour (m/s)
    pub vapour: FloatValue,
    /// CO2 (mol/m^2/s)
    pub co2: FloatValue,
}

/// Boundary-layer conductances for a leaf of dimension `leaf_dimension`.
///
/// Always positive: wind is floored at a small value.
pub fn boundary_layer(
    leaf_dimension: FloatValue,
    wind: FloatValue,
    t_air_k: FloatValue,
    delta_t: FloatValue,
    air_density_mole: FloatValue,
) -> BoundaryLayer {
    let re = wind.max(MIN_LEAF_WIND) * leaf_dimension / NU_AIR;
    let gr = GRAVITY * leaf_dimension.powi(3) * delta_t.abs() / (t_air_k * NU_AIR * NU_AIR);

    let nusselt = |diffusivity: FloatValue| {
        let number = NU_AIR / diffusivity;
        let forced = 0.66 * number.powf(0.33) * re.sqrt();
        let free = 0.54 * (gr * number).powf(0.25);
        forced.max(free) * diffusivity / leaf_dimension
    };

    BoundaryLayer {
        heat: nusselt(DIFF_HEAT),
        vapour: nusselt(DIFF_VAPOUR),
        co2: nusselt(DIFF_CO2) * air_density_mole,
    }
}

/// Leaf temperature and heat fluxes per unit leaf area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafEnergy {
    pub t_leaf: FloatValue,
    pub h: FloatValue,
    pub le: FloatValue,
    pub rnet: FloatValue,
}

/// Solve the linearised energy balance of a leaf.
///
/// `g_heat` is the two-sided heat conductance and `g_vapour` the total
/// vapour conductance of the leaf (both m/s).
pub fn leaf_energy_balance(
    met: &Met,
    t_air_k: FloatValue,
    rhov_air: FloatValue,
    rabs: FloatValue,
    g_heat: FloatValue,
    g_vapour: FloatValue,
    emissivity: FloatValue,
) -> LeafEnergy {
    let rho_cp = met.air_density * CP_AIR;
    let emit = 2.0 * emissivity * SIGMA * t_air_k.powi(4);
    let emit_slope = 8.0 * emissivity * SIGMA * t_air_k.powi(3);
    let deficit = saturation_vapour_density(t_air_k) - rhov_air;
    let slope = saturation_vapour_density_slope(t_air_k);
    let lambda_gv = met.latent * g_vapour;

    let delta_t = (rabs - emit - lambda_gv * deficit) / (rho_cp * g_heat + emit_slope + lambda_gv * slope);

    let h = rho_cp * g_heat * delta_t;
    let le = lambda_gv * (deficit + slope * delta_t);
    LeafEnergy {
        t_leaf: t_air_k + delta_t,
        h,
        le,
        rnet: rabs - emit - emit_slope * delta_t,
    }
}

/// Energy and carbon balance of one leaf class in every canopy layer.
///
/// `qin` is total absorbed radiation (W/m^2) and `par_abs` absorbed PAR
/// (umol/m^2/s), both per unit leaf area of this class. `previous` is the
/// state from the last iteration.
#[allow(clippy::too_many_arguments)]
pub fn leaf_fluxes(
    params: &LeafParameters,
    emissivity: FloatValue,
    met: &Met,
    profile: &Profile,
    qin: &Array1<FloatValue>,
    par_abs: &Array1<FloatValue>,
    previous: &LeafState,
) -> LeafState {
    let n = qin.len();
    let sides = params.stomata.sides();
    let mut leaf = LeafState::isothermal(n, met.t_air_k);

    for j in 0..n {
        let t_air = profile.t_air[j];
        let rhov_air = profile.rhov[j];
        let t_prev = previous.tleaf[j];

        let gb = boundary_layer(
            params.leaf_dimension,
            profile.wind[j],
            t_air,
            t_prev - t_air,
            met.air_density_mole,
        );

        // Humidity at the leaf surface from last iteration's transpiration
        let rhov_surface = rhov_air + previous.le[j].max(0.0) / (sides * met.latent * gb.vapour);
        let hs = rhov_surface / saturation_vapour_density(t_prev);

        let carbon = photosynthesis(
            params,
            &PhotosynthesisInput {
                par_abs: par_abs[j],
                t_leaf: t_prev,
                ca: profile.co2[j],
                hs,
                gb_co2: gb.co2,
            },
        );

        let gs = carbon.gs / met.air_density_mole;
        let g_vapour = sides * gs * gb.vapour / (gs + gb.vapour);
        let energy = leaf_energy_balance(met, t_air, rhov_air, qin[j], 2.0 * gb.heat, g_vapour, emissivity);

        leaf.tleaf[j] = energy.t_leaf;
        leaf.h[j] = energy.h;
        leaf.le[j] = energy.le;
        leaf.rnet[j] = energy.rnet;
        leaf.gs[j] = carbon.gs;
        leaf.gb_h[j] = gb.heat;
        leaf.ci[j] = carbon.ci;
        leaf.gpp[j] = carbon.gpp;
        leaf.resp[j] = carbon.rd;
        leaf.a_net[j] = carbon.a_net;
    }
    leaf
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use canoak_core::forcing::ForcingRecord;
    use canoak_core::setup::Setup;

    fn met() -> Met {
        Met::from_forcing(&ForcingRecord {
            day: 182.0,
            hour: 12.0,
            rglobal: 800.0,
            parin: 1600.0,
            pressure_kpa: 101.3,
            lai: 3.0,
            t_air_c: 25.0,
            wind_speed: 2.0,
            ustar: 0.3,
            co2: 400.0,
            ea_kpa: 1.5,
            soil_moisture: 0.3,
            soil_t_c: 20.0,
        })
    }

    fn profile(met: &Met, n: usize) -> Profile {
        let setup = Setup {
            n_can_layers: n,
            n_domain_layers: 2 * n,
            ..Setup::default()
        };
        let mut profile = Profile::initialize(met, &setup);
        profile.wind.fill(1.0);
        profile
    }

    #[test]
    fn test_boundary_layer_grows_with_wind() {
        let calm = boundary_layer(0.05, 0.1, 298.0, 0.0, 41.0);
        let windy = boundary_layer(0.05, 4.0, 298.0, 0.0, 41.0);
        assert!(windy.heat > calm.heat);
        assert!(calm.heat > 0.0 && calm.vapour > 0.0 && calm.co2 > 0.0);
    }

    #[test]
    fn test_free_convection_in_still_air() {
        let still = boundary_layer(0.05, 0.0, 298.0, 0.0, 41.0);
        let buoyant = boundary_layer(0.05, 0.0, 298.0, 10.0, 41.0);
        assert!(buoyant.heat > still.heat);
    }

    #[test]
    fn test_net_radiation_equals_turbulent_fluxes() {
        let met = met();
        let e = leaf_energy_balance(&met, met.t_air_k, met.rhova_kg, 1100.0, 0.05, 0.005, 0.98);
        assert_relative_eq!(e.rnet, e.h + e.le, max_relative = 1e-10);
        assert!(e.t_leaf > met.t_air_k);
    }

    #[test]
    fn test_sunlit_leaves_are_warmer_than_shaded() {
        let met = met();
        let n = 3;
        let profile = profile(&met, n);
        let params = LeafParameters::default();
        let previous = LeafState::isothermal(n, met.t_air_k);

        let sun = leaf_fluxes(
            &params,
            0.98,
            &met,
            &profile,
            &Array1::from_elem(n, 950.0),
            &Array1::from_elem(n, 1200.0),
            &previous,
        );
        let shade = leaf_fluxes(
            &params,
            0.98,
            &met,
            &profile,
            &Array1::from_elem(n, 780.0),
            &Array1::from_elem(n, 150.0),
            &previous,
        );

        for j in 0..n {
            assert!(sun.tleaf[j] > shade.tleaf[j]);
            assert!(sun.gpp[j] > shade.gpp[j]);
            assert!(sun.gs[j] > 0.0 && shade.gs[j] > 0.0);
            assert_relative_eq!(sun.rnet[j], sun.h[j] + sun.le[j], max_relative = 1e-10);
        }
    }

    #[test]
    fn test_dark_leaves_only_respire() {
        let met = met();
        let n = 2;
        let profile = profile(&met, n);
        let params = LeafParameters::default();
        let previous = LeafState::isothermal(n, met.t_air_k);
        let leaf = leaf_fluxes(
            &params,
            0.98,
            &met,
            &profile,
            &Array1::from_elem(n, 400.0),
            &Array1::zeros(n),
            &previous,
        );

        for j in 0..n {
            assert_eq!(leaf.gpp[j], 0.0);
            assert!(leaf.resp[j] > 0.0);
            assert_eq!(leaf.a_net[j], -leaf.resp[j]);
            assert_eq!(leaf.gs[j], params.g0);
        }
    }

    /// Respiration and net assimilation come from the same carbon balance
    /// that set the stomatal conductance, at last iteration's leaf temperature.
    #[test]
    fn test_carbon_state_matches_conductance() {
        let met = met();
        let n = 2;
        let profile = profile(&met, n);
        let params = LeafParameters::default();
        let previous = LeafState::isothermal(n, met.t_air_k + 5.0);
        let leaf = leaf_fluxes(
            &params,
            0.98,
            &met,
            &profile,
            &Array1::from_elem(n, 900.0),
            &Array1::from_elem(n, 1200.0),
            &previous,
        );

        for j in 0..n {
            assert_eq!(leaf.resp[j], params.rd(previous.tleaf[j]));
            assert!(leaf.resp[j] != params.rd(leaf.tleaf[j]));
            assert_eq!(leaf.a_net[j], leaf.gpp[j] - leaf.resp[j]);
            assert!(leaf.gs[j] > params.g0);
        }
    }
}
