//! Per-step fixed-point solve of the coupled canopy-soil system.
//!
//! Radiation geometry and the shortwave fields are fixed for a forcing step.
//! Everything that depends on leaf, air or soil temperature is then iterated
//! a fixed number of times, in this order:
//!
//! 1. wind profile from the friction velocity and current z/L
//! 2. longwave field from the current leaf and soil surface temperatures
//! 3. total absorbed radiation of sunlit and shaded leaves
//! 4. sunlit and shaded leaf energy and carbon balance
//! 5. soil surface energy balance and heat conduction
//! 6. soil respiration
//! 7. air temperature, vapour and CO2 profiles from the layer sources
//! 8. z/L from the canopy sensible heat flux, clipped to its stable range
//! 9. canopy totals and the ecosystem summary
//!
//! Each stage reads the outputs of the stages before it in the same
//! iteration. There is no convergence test: the result after
//! [`SolverParameters::niter`](crate::config::SolverParameters) iterations
//! is the step's output.

use crate::config::ModelParameters;
use canoak_components::canopy::{calculate_veg, summarize};
use canoak_components::leaf::leaf_fluxes;
use canoak_components::profile::{layer_sources, stability_parameter, update_profiles, uz};
use canoak_components::radiation::{
    angle, compute_qin, ir_rad_tran_canopy, leaf_angle, leaf_area, partition_incoming,
    rad_tran_canopy, sky_ir, BeamDiffuse,
};
use canoak_components::soil::{
    soil_energy_balance, RespirationDrivers, SoilRadiation, SoilRespiration,
};
use canoak_core::constants::{NIGHT_PARTITION_SINE_BETA, PAR_UMOL_PER_JOULE, T_FREEZE};
use canoak_core::dispersion::DispersionMatrix;
use canoak_core::errors::CanoakResult;
use canoak_core::forcing::{ForcingRecord, Met};
use canoak_core::setup::Setup;
use canoak_core::state::{
    AbsorbedRadiation, CanopyFluxes, CanopySummary, Infrared, LeafAngle, LeafArea, LeafState,
    Profile, RadiationBand, SoilState, SunAngle,
};
use canoak_core::FloatValue;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// State handed from one forcing step to the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Carryover {
    /// Soil temperature profile at the end of the previous step (K)
    pub t_soil: Array1<FloatValue>,
    /// Soil surface temperature at the end of the previous step (K)
    pub sfc_temperature: FloatValue,
    /// Cloudiness ratio last seen around solar noon
    pub ratrad_noon: FloatValue,
}

impl Carryover {
    /// Starting state for the first step of a run.
    ///
    /// The soil profile is interpolated linearly between air temperature at
    /// the surface and the forcing soil temperature at depth.
    pub fn initial(setup: &Setup, first: &ForcingRecord) -> Self {
        let soil = SoilState::linear(
            setup.n_soil_layers,
            first.t_air_c + T_FREEZE,
            first.soil_t_c + T_FREEZE,
        );
        Self {
            t_soil: soil.t_soil,
            sfc_temperature: soil.sfc_temperature,
            ratrad_noon: 0.0,
        }
    }
}

/// Converged state of one forcing step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutput {
    pub met: Met,
    pub sun: SunAngle,
    pub leaf_angle: LeafAngle,
    pub leaf_area: LeafArea,
    /// Beam/diffuse split of the incoming shortwave
    pub incoming: BeamDiffuse,
    pub profile: Profile,
    pub par: RadiationBand,
    pub nir: RadiationBand,
    pub ir: Infrared,
    pub qin: AbsorbedRadiation,
    pub sunlit: LeafState,
    pub shaded: LeafState,
    pub soil: SoilState,
    pub veg: CanopyFluxes,
    pub can: CanopySummary,
    /// Cloudiness ratio to carry into the next step
    pub ratrad_noon: FloatValue,
}

impl StepOutput {
    /// State to start the next forcing step from.
    pub fn carryover(&self) -> Carryover {
        Carryover {
            t_soil: self.soil.t_soil.clone(),
            sfc_temperature: self.soil.sfc_temperature,
            ratrad_noon: self.ratrad_noon,
        }
    }
}

/// Fixed-point solver for a single forcing step.
///
/// Holds the validated parameters and the dispersion matrix shared by every
/// profile update of the run. Construction is the only fallible operation.
#[derive(Debug, Clone)]
pub struct CanopySolver {
    params: ModelParameters,
    dispersion: Arc<DispersionMatrix>,
}

impl CanopySolver {
    /// Validate `params` and check the dispersion matrix against the
    /// configured layer counts.
    pub fn new(params: ModelParameters, dispersion: Arc<DispersionMatrix>) -> CanoakResult<Self> {
        params.validate()?;
        dispersion.check_shape(params.setup.dispersion_shape())?;
        Ok(Self { params, dispersion })
    }

    pub fn params(&self) -> &ModelParameters {
        &self.params
    }

    pub fn dispersion(&self) -> &DispersionMatrix {
        &self.dispersion
    }

    /// Solve one forcing step starting from `carry`.
    ///
    /// Pure: the same forcing and carryover always give the same output.
    pub fn step(&self, forcing: &ForcingRecord, carry: &Carryover) -> StepOutput {
        let params = &self.params;
        let setup = &params.setup;
        let solver = &params.solver;
        let n = setup.n_can_layers;
        let reference_index = setup.reference_index();

        let mut met = Met::from_forcing(forcing);

        // Fixed for the step
        let sun = angle(setup, met.day, met.hour);
        let (parin, incoming) = partition_incoming(&sun, &met, carry.ratrad_noon);
        met.parin = parin;
        let ratrad_noon = if met.hour > 12.0
            && met.hour < 13.0
            && sun.sin_beta > NIGHT_PARTITION_SINE_BETA
        {
            incoming.ratrad
        } else {
            carry.ratrad_noon
        };

        let area = leaf_area(met.lai, &params.canopy, n);
        let angles = leaf_angle(&sun, &area, &params.canopy);
        let par = rad_tran_canopy(
            incoming.par_beam * PAR_UMOL_PER_JOULE,
            incoming.par_diffuse * PAR_UMOL_PER_JOULE,
            &angles,
            &area,
            params.optical.par(),
            solver.par_iterations,
        );
        let nir = rad_tran_canopy(
            incoming.nir_beam,
            incoming.nir_diffuse,
            &angles,
            &area,
            params.optical.nir(),
            solver.nir_iterations,
        );
        let ir_in = sky_ir(met.t_air_k, incoming.ratrad);
        let soil_shortwave = (par.dn_flux[0] + par.beam_flux[0] - par.up_flux[0]) / PAR_UMOL_PER_JOULE
            + nir.dn_flux[0]
            + nir.beam_flux[0]
            - nir.up_flux[0];

        // Initial guesses
        let mut profile = Profile::initialize(&met, setup);
        let mut ir = Infrared::uniform(n, ir_in);
        let mut qin = AbsorbedRadiation::zeros(n);
        let mut sunlit = LeafState::isothermal(n, met.t_air_k);
        let mut shaded = LeafState::isothermal(n, met.t_air_k);
        let mut soil = SoilState::from_profile(carry.t_soil.clone(), carry.sfc_temperature);
        let mut veg = CanopyFluxes::default();
        let mut can = CanopySummary::default();

        for _ in 0..solver.niter {
            profile.wind = uz(setup, met.ustar, met.zl);

            ir = ir_rad_tran_canopy(
                ir_in,
                &angles,
                &sunlit.tleaf,
                &shaded.tleaf,
                soil.sfc_temperature,
                params.canopy.leaf_emissivity,
                params.soil.emissivity,
                solver.ir_sweeps,
            );

            qin = compute_qin(&par, &nir, &ir);

            let emissivity = params.canopy.leaf_emissivity;
            let new_sunlit = leaf_fluxes(
                &params.leaf,
                emissivity,
                &met,
                &profile,
                &qin.sun,
                &par.sun_abs,
                &sunlit,
            );
            let new_shaded = leaf_fluxes(
                &params.leaf,
                emissivity,
                &met,
                &profile,
                &qin.shade,
                &par.sh_abs,
                &shaded,
            );
            sunlit = new_sunlit;
            shaded = new_shaded;

            soil = soil_energy_balance(
                &params.soil,
                &met,
                &profile,
                SoilRadiation {
                    shortwave: soil_shortwave,
                    ir_down: ir.ir_dn[0],
                },
                &carry.t_soil,
                &soil,
                setup.dt_seconds,
                solver.soil_mtime,
            );

            soil.resp = params.soil.respiration.respiration(&RespirationDrivers {
                soil_temperature: soil.t_soil[params.soil.respiration_layer],
                soil_moisture: met.soil_moisture,
                canopy_gpp: veg.gpp,
                canopy_height: setup.canopy_height,
            });

            let sources = layer_sources(&sunlit, &shaded, &angles, &area);
            profile = update_profiles(
                &profile,
                &self.dispersion,
                &met,
                &soil,
                sources,
                reference_index,
                solver.profile_relaxation,
            );

            // Soil heat is left out of the stability flux
            met.zl = stability_parameter(
                profile.h_source.sum(),
                met.ustar,
                met.t_air_k,
                met.air_density,
                setup.meas_ht,
            );

            veg = calculate_veg(&sunlit, &shaded, &angles, &area);
            can = summarize(&par, &nir, &ir, &veg, &soil);
        }

        StepOutput {
            met,
            sun,
            leaf_angle: angles,
            leaf_area: area,
            incoming,
            profile,
            par,
            nir,
            ir,
            qin,
            sunlit,
            shaded,
            soil,
            veg,
            can,
            ratrad_noon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canoak_core::errors::CanoakError;
    use is_close::is_close;

    fn small_params() -> ModelParameters {
        let mut params = ModelParameters::default();
        params.setup.n_can_layers = 5;
        params.setup.n_domain_layers = 20;
        params
    }

    fn noon() -> ForcingRecord {
        ForcingRecord {
            day: 182.0,
            hour: 12.5,
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
        }
    }

    fn solver(params: ModelParameters) -> CanopySolver {
        let dispersion = Arc::new(DispersionMatrix::gradient_diffusion(&params.setup));
        CanopySolver::new(params, dispersion).unwrap()
    }

    #[test]
    fn test_rejects_mismatched_dispersion() {
        let params = small_params();
        let other = Setup {
            n_domain_layers: 25,
            ..params.setup.clone()
        };
        let dispersion = Arc::new(DispersionMatrix::gradient_diffusion(&other));

        match CanopySolver::new(params, dispersion) {
            Err(CanoakError::DispersionShape { expected, found }) => {
                assert_eq!(expected, (5, 20));
                assert_eq!(found, (5, 25));
            }
            other => panic!("Expected a dispersion shape error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let mut params = small_params();
        params.solver.profile_relaxation = 0.0;
        let dispersion = Arc::new(DispersionMatrix::gradient_diffusion(&params.setup));
        assert!(CanopySolver::new(params, dispersion).is_err());
    }

    #[test]
    fn test_midday_step() {
        let params = small_params();
        let solver = solver(params.clone());
        let carry = Carryover::initial(&params.setup, &noon());
        let out = solver.step(&noon(), &carry);

        assert!(out.veg.gpp > 0.0);
        assert!(out.can.nee < 0.0);
        assert!(out.can.albedo > 0.0 && out.can.albedo < 1.0);
        assert!(out.met.zl >= -3.0 && out.met.zl <= 0.25);
        assert!(out.incoming.ratrad > 0.0);
        // Noon forcing refreshes the midday cloudiness ratio
        assert!(is_close!(out.ratrad_noon, out.incoming.ratrad));
        assert_eq!(out.soil.t_soil.len(), params.setup.n_soil_layers);
        assert_eq!(out.profile.t_air.len(), params.setup.n_domain_layers);
        assert!(is_close!(out.can.rnet, out.veg.rnet + out.soil.rnet));
    }

    #[test]
    fn test_carryover_from_output() {
        let params = small_params();
        let solver = solver(params.clone());
        let out = solver.step(&noon(), &Carryover::initial(&params.setup, &noon()));
        let next = out.carryover();

        assert_eq!(next.t_soil, out.soil.t_soil);
        assert_eq!(next.sfc_temperature, out.soil.sfc_temperature);
        assert_eq!(next.ratrad_noon, out.ratrad_noon);
    }

    #[test]
    fn test_evening_keeps_noon_ratio() {
        let params = small_params();
        let solver = solver(params.clone());
        let forcing = ForcingRecord {
            hour: 16.0,
            ..noon()
        };
        let carry = Carryover {
            ratrad_noon: 0.6,
            ..Carryover::initial(&params.setup, &forcing)
        };
        let out = solver.step(&forcing, &carry);
        assert_eq!(out.ratrad_noon, 0.6);
    }

    /// Sparse canopy in light wind, where the soil and canopy sensible heat
    /// fluxes can differ in sign.
    #[test]
    fn test_stability_driven_by_canopy_heat() {
        let params = small_params();
        let solver = solver(params.clone());
        let forcing = ForcingRecord {
            lai: 1.0,
            ustar: 0.15,
            ..noon()
        };
        let out = solver.step(&forcing, &Carryover::initial(&params.setup, &forcing));

        let canopy_only = stability_parameter(
            out.profile.h_source.sum(),
            out.met.ustar,
            out.met.t_air_k,
            out.met.air_density,
            params.setup.meas_ht,
        );
        assert_eq!(out.met.zl, canopy_only);

        assert!(out.soil.heat.abs() > 1.0);
        let with_soil = stability_parameter(
            out.profile.h_source.sum() + out.soil.heat,
            out.met.ustar,
            out.met.t_air_k,
            out.met.air_density,
            params.setup.meas_ht,
        );
        assert!(out.met.zl != with_soil);
    }
}
