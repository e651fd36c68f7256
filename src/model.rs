/// A model run steps a [`CanopySolver`] through a series of forcing records.
///
/// Steps are strictly sequential: the soil temperature profile and the
/// midday cloudiness ratio of one step are the starting point of the next.
/// The converged state of every step is kept as the run's output.
use crate::config::ModelParameters;
use crate::solver::{CanopySolver, Carryover, StepOutput};
use canoak_core::dispersion::DispersionMatrix;
use canoak_core::errors::{CanoakError, CanoakResult};
use canoak_core::forcing::ForcingRecord;
use log::{debug, info, warn};
use std::sync::Arc;

/// Build a [`Model`] from parameters, forcing and a dispersion matrix.
///
/// All configuration errors surface from [`ModelBuilder::build`], before any
/// step is solved. Without an explicit dispersion matrix a gradient-diffusion
/// matrix for the configured layers is used.
#[derive(Default)]
pub struct ModelBuilder {
    params: ModelParameters,
    dispersion: Option<Arc<DispersionMatrix>>,
    forcing: Vec<ForcingRecord>,
    initial: Option<Carryover>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameters(&mut self, params: ModelParameters) -> &mut Self {
        self.params = params;
        self
    }

    pub fn with_dispersion(&mut self, dispersion: Arc<DispersionMatrix>) -> &mut Self {
        self.dispersion = Some(dispersion);
        self
    }

    pub fn with_forcing(&mut self, forcing: Vec<ForcingRecord>) -> &mut Self {
        self.forcing = forcing;
        self
    }

    /// Start from a given soil state instead of one derived from the first
    /// forcing record.
    pub fn with_initial_state(&mut self, initial: Carryover) -> &mut Self {
        self.initial = Some(initial);
        self
    }

    pub fn build(&self) -> CanoakResult<Model> {
        let first = self
            .forcing
            .first()
            .ok_or_else(|| CanoakError::Error("No forcing records were provided".to_string()))?;

        let dispersion = match &self.dispersion {
            Some(d) => d.clone(),
            None => Arc::new(DispersionMatrix::gradient_diffusion(&self.params.setup)),
        };
        let solver = CanopySolver::new(self.params.clone(), dispersion)?;

        let carry = match &self.initial {
            Some(initial) => {
                if initial.t_soil.len() != self.params.setup.n_soil_layers {
                    return Err(CanoakError::InvalidLayerCount(format!(
                        "initial soil profile has {} layers but n_soil_layers is {}",
                        initial.t_soil.len(),
                        self.params.setup.n_soil_layers
                    )));
                }
                initial.clone()
            }
            None => Carryover::initial(&self.params.setup, first),
        };

        Ok(Model {
            solver,
            forcing: self.forcing.clone(),
            carry,
            outputs: Vec::with_capacity(self.forcing.len()),
        })
    }
}

/// A canopy-soil run over a fixed series of forcing records.
#[derive(Debug)]
pub struct Model {
    solver: CanopySolver,
    forcing: Vec<ForcingRecord>,
    /// Starting state of the next step
    carry: Carryover,
    outputs: Vec<StepOutput>,
}

impl Model {
    /// Index of the next forcing record to solve.
    pub fn time_index(&self) -> usize {
        self.outputs.len()
    }

    /// Returns true once every forcing record has been solved
    pub fn finished(&self) -> bool {
        self.time_index() == self.forcing.len()
    }

    /// Solve the next forcing record.
    pub fn step(&mut self) {
        assert!(!self.finished());
        let index = self.time_index();
        let forcing = &self.forcing[index];
        let output = self.solver.step(forcing, &self.carry);

        debug!(
            "Step {} (day {}, hour {}): z/L = {:.3}, NEE = {:.3}, H = {:.1}, LE = {:.1}",
            index,
            forcing.day,
            forcing.hour,
            output.met.zl,
            output.can.nee,
            output.can.h,
            output.can.le
        );
        let tolerance = self.solver.params().solver.residual_tolerance;
        if output.soil.energy_residual.abs() > tolerance {
            warn!(
                "Soil energy balance residual of {:.1} W/m^2 on day {} hour {} exceeds {}",
                output.soil.energy_residual, forcing.day, forcing.hour, tolerance
            );
        }

        self.carry = output.carryover();
        self.outputs.push(output);
    }

    /// Solve every remaining forcing record.
    pub fn run(&mut self) {
        info!(
            "Running {} forcing steps with {} canopy layers",
            self.forcing.len() - self.time_index(),
            self.solver.params().setup.n_can_layers
        );
        while !self.finished() {
            self.step();
        }
        info!("Finished {} forcing steps", self.outputs.len());
    }

    pub fn outputs(&self) -> &[StepOutput] {
        &self.outputs
    }

    pub fn solver(&self) -> &CanopySolver {
        &self.solver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    fn params() -> ModelParameters {
        let mut params = ModelParameters::default();
        params.setup.n_can_layers = 4;
        params.setup.n_domain_layers = 12;
        params.solver.niter = 8;
        params
    }

    fn record(hour: f64, rglobal: f64) -> ForcingRecord {
        ForcingRecord {
            day: 182.0,
            hour,
            rglobal,
            parin: 2.0 * rglobal,
            pressure_kpa: 101.3,
            lai: 2.5,
            t_air_c: 22.0,
            wind_speed: 2.0,
            ustar: 0.3,
            co2: 410.0,
            ea_kpa: 1.4,
            soil_moisture: 0.3,
            soil_t_c: 18.0,
        }
    }

    #[test]
    fn test_requires_forcing() {
        let result = ModelBuilder::new().with_parameters(params()).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_step_and_run() {
        let forcing = vec![record(11.0, 700.0), record(12.5, 800.0), record(14.0, 650.0)];
        let mut model = ModelBuilder::new()
            .with_parameters(params())
            .with_forcing(forcing)
            .build()
            .unwrap();

        assert_eq!(model.time_index(), 0);
        model.step();
        assert_eq!(model.time_index(), 1);
        assert!(!model.finished());

        model.run();
        assert!(model.finished());
        assert_eq!(model.outputs().len(), 3);

        // The noon ratio is picked up at 12:30 and carried into the afternoon
        let outputs = model.outputs();
        assert!(is_close!(outputs[1].ratrad_noon, outputs[1].incoming.ratrad));
        assert!(is_close!(outputs[2].ratrad_noon, outputs[1].ratrad_noon));
    }

    #[test]
    fn test_soil_profile_is_carried() {
        let forcing = vec![record(12.5, 800.0), record(13.5, 800.0)];
        let mut model = ModelBuilder::new()
            .with_parameters(params())
            .with_forcing(forcing.clone())
            .build()
            .unwrap();
        model.run();

        // Solving the second record from the first step's carryover
        // reproduces the run
        let solver = model.solver();
        let second = solver.step(&forcing[1], &model.outputs()[0].carryover());
        assert_eq!(second, model.outputs()[1]);
    }

    #[test]
    fn test_rejects_initial_state_of_wrong_depth() {
        let params = params();
        let initial = Carryover {
            t_soil: ndarray::Array1::from_elem(3, 290.0),
            sfc_temperature: 290.0,
            ratrad_noon: 0.0,
        };
        let result = ModelBuilder::new()
            .with_parameters(params)
            .with_forcing(vec![record(12.0, 800.0)])
            .with_initial_state(initial)
            .build();
        assert!(matches!(result, Err(CanoakError::InvalidLayerCount(_))));
    }
}
