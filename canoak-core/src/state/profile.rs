use crate::forcing::Met;
use crate::setup::Setup;
use crate::FloatValue;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Vertical profiles of scalars in the air and their canopy source strengths.
///
/// Scalar arrays span all `n_domain_layers`; wind and sources span the
/// `n_can_layers` canopy layers, which are the lowest domain layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Air temperature (K)
    pub t_air: Array1<FloatValue>,
    /// Vapour density (kg/m^3)
    pub rhov: Array1<FloatValue>,
    /// CO2 mixing ratio (ppm)
    pub co2: Array1<FloatValue>,
    /// Wind speed (m/s)
    pub wind: Array1<FloatValue>,
    /// Sensible heat released by each canopy layer (W/m^2 ground)
    pub h_source: Array1<FloatValue>,
    /// Latent heat released by each canopy layer (W/m^2 ground)
    pub le_source: Array1<FloatValue>,
    /// CO2 released by each canopy layer (umol/m^2 ground/s)
    pub co2_source: Array1<FloatValue>,
}

impl Profile {
    /// Well-mixed profiles equal to the reference-height meteorology.
    pub fn initialize(met: &Met, setup: &Setup) -> Self {
        let n_domain = setup.n_domain_layers;
        let n_can = setup.n_can_layers;
        Self {
            t_air: Array1::from_elem(n_domain, met.t_air_k),
            rhov: Array1::from_elem(n_domain, met.rhova_kg),
            co2: Array1::from_elem(n_domain, met.co2),
            wind: Array1::zeros(n_can),
            h_source: Array1::zeros(n_can),
            le_source: Array1::zeros(n_can),
            co2_source: Array1::zeros(n_can),
        }
    }
}
