//! Parameter bundle for a model run.
//!
//! Everything a run needs apart from the forcing and the dispersion matrix
//! is read from a single TOML document. Every table is optional and missing
//! fields take their documented defaults:
//!
//! ```toml
//! [setup]
//! n_can_layers = 10
//! n_domain_layers = 50
//!
//! [solver]
//! niter = 20
//!
//! [soil.respiration]
//! type = "Q10"
//! q10 = 2.2
//! ```

use canoak_components::parameters::{
    CanopyParameters, LeafParameters, OpticalParameters, SoilParameters,
};
use canoak_core::errors::{CanoakError, CanoakResult};
use canoak_core::setup::Setup;
use canoak_core::FloatValue;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Iteration counts and numerical controls of the per-step solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverParameters {
    /// Outer iterations per forcing step. No convergence test is made.
    /// Default: 15
    pub niter: usize,

    /// Down/up sweeps of the PAR scattering solve.
    /// Default: 5
    pub par_iterations: usize,

    /// Down/up sweeps of the NIR scattering solve.
    /// Default: 25
    pub nir_iterations: usize,

    /// Down/up sweeps of the longwave solve in each outer iteration.
    /// Default: 3
    pub ir_sweeps: usize,

    /// Sub-steps of the soil heat conduction solve per forcing interval.
    /// Default: 10
    pub soil_mtime: usize,

    /// Weight of the newly computed scalar profiles against the previous
    /// iteration's (1 replaces them outright).
    /// Default: 0.75
    pub profile_relaxation: FloatValue,

    /// Soil energy balance residual above which a warning is logged (W/m^2).
    /// Default: 50
    pub residual_tolerance: FloatValue,
}

impl Default for SolverParameters {
    fn default() -> Self {
        Self {
            niter: 15,
            par_iterations: 5,
            nir_iterations: 25,
            ir_sweeps: 3,
            soil_mtime: 10,
            profile_relaxation: 0.75,
            residual_tolerance: 50.0,
        }
    }
}

impl SolverParameters {
    pub fn validate(&self) -> CanoakResult<()> {
        let counts = [
            ("niter", self.niter),
            ("par_iterations", self.par_iterations),
            ("nir_iterations", self.nir_iterations),
            ("ir_sweeps", self.ir_sweeps),
            ("soil_mtime", self.soil_mtime),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(CanoakError::invalid_parameter(name, "must be at least 1"));
            }
        }
        if !(self.profile_relaxation > 0.0 && self.profile_relaxation <= 1.0) {
            return Err(CanoakError::invalid_parameter(
                "profile_relaxation",
                "must lie within (0, 1]",
            ));
        }
        if !(self.residual_tolerance >= 0.0) {
            return Err(CanoakError::invalid_parameter(
                "residual_tolerance",
                "must not be negative",
            ));
        }
        Ok(())
    }
}

/// All static parameters of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    pub setup: Setup,
    pub canopy: CanopyParameters,
    pub optical: OpticalParameters,
    pub leaf: LeafParameters,
    pub soil: SoilParameters,
    pub solver: SolverParameters,
}

impl ModelParameters {
    /// Parse and validate a TOML parameter document.
    pub fn from_toml_str(document: &str) -> CanoakResult<Self> {
        let params: Self = toml::from_str(document)?;
        params.validate()?;
        Ok(params)
    }

    /// Read, parse and validate a TOML parameter file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> CanoakResult<Self> {
        let document = std::fs::read_to_string(path)?;
        Self::from_toml_str(&document)
    }

    /// Check every parameter group against the configured discretisation.
    pub fn validate(&self) -> CanoakResult<()> {
        self.setup.validate()?;
        self.canopy.validate(self.setup.n_can_layers)?;
        self.optical.validate()?;
        self.leaf.validate()?;
        self.soil.validate(self.setup.n_soil_layers)?;
        self.solver.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canoak_components::soil::{RespirationDrivers, SoilRespiration};
    use is_close::is_close;

    #[test]
    fn test_defaults_are_valid() {
        let params = ModelParameters::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.solver.niter, 15);
        assert_eq!(params.solver.par_iterations, 5);
        assert_eq!(params.solver.nir_iterations, 25);
    }

    #[test]
    fn test_partial_document() {
        let params = ModelParameters::from_toml_str(
            r#"
            [setup]
            n_can_layers = 10
            n_domain_layers = 40

            [solver]
            niter = 20
            "#,
        )
        .unwrap();

        assert_eq!(params.setup.n_can_layers, 10);
        assert_eq!(params.setup.n_domain_layers, 40);
        assert_eq!(params.setup.n_soil_layers, 10);
        assert_eq!(params.solver.niter, 20);
        assert_eq!(params.solver.soil_mtime, 10);
        assert!(is_close!(params.optical.nir_reflect, 0.6));
    }

    #[test]
    fn test_respiration_model_from_type_tag() {
        let params = ModelParameters::from_toml_str(
            r#"
            [soil.respiration]
            type = "Q10"
            base_rate = 2.0
            q10 = 2.0
            "#,
        )
        .unwrap();

        let drivers = RespirationDrivers {
            soil_temperature: 293.15,
            soil_moisture: 1.0,
            canopy_gpp: 0.0,
            canopy_height: 1.0,
        };
        // One Q10 step above the 283.15 K reference
        assert!(is_close!(params.soil.respiration.respiration(&drivers), 4.0));
    }

    #[test]
    fn test_round_trip() {
        let params = ModelParameters::default();
        let document = toml::to_string(&params).unwrap();
        let restored = ModelParameters::from_toml_str(&document).unwrap();
        assert_eq!(restored.setup.n_domain_layers, params.setup.n_domain_layers);
        assert!(is_close!(
            restored.solver.profile_relaxation,
            params.solver.profile_relaxation
        ));
    }

    #[test]
    fn test_rejects_zero_iterations() {
        let result = ModelParameters::from_toml_str("[solver]\nniter = 0\n");
        assert!(matches!(
            result,
            Err(CanoakError::InvalidParameter { ref name, .. }) if name == "niter"
        ));
    }

    #[test]
    fn test_rejects_domain_smaller_than_canopy() {
        let result = ModelParameters::from_toml_str(
            "[setup]\nn_can_layers = 20\nn_domain_layers = 10\n",
        );
        assert!(matches!(result, Err(CanoakError::InvalidLayerCount(_))));
    }

    #[test]
    fn test_malformed_document() {
        let result = ModelParameters::from_toml_str("[solver\nniter = ");
        assert!(matches!(result, Err(CanoakError::ConfigParse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = ModelParameters::from_toml_file("/nonexistent/canoak.toml");
        assert!(matches!(result, Err(CanoakError::Io(_))));
    }
}
