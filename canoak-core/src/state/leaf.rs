use crate::FloatValue;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Energy and carbon state of one leaf class (sunlit or shaded), per layer.
///
/// Fluxes are per unit leaf area: energy in W/m^2, carbon in umol/m^2/s,
/// conductances in mol/m^2/s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafState {
    /// Leaf temperature (K)
    pub tleaf: Array1<FloatValue>,
    /// Sensible heat flux
    pub h: Array1<FloatValue>,
    /// Latent heat flux
    pub le: Array1<FloatValue>,
    /// Net radiation
    pub rnet: Array1<FloatValue>,
    /// Stomatal conductance to water vapour
    pub gs: Array1<FloatValue>,
    /// Boundary-layer conductance to heat (m/s)
    pub gb_h: Array1<FloatValue>,
    /// Intercellular CO2 (ppm)
    pub ci: Array1<FloatValue>,
    /// Gross assimilation, never negative
    pub gpp: Array1<FloatValue>,
    /// Dark respiration
    pub resp: Array1<FloatValue>,
    /// Net assimilation, `gpp - resp`
    pub a_net: Array1<FloatValue>,
}

impl LeafState {
    /// Leaves in equilibrium with the air: leaf temperature equal to air
    /// temperature and no fluxes.
    pub fn isothermal(n_can_layers: usize, t_air_k: FloatValue) -> Self {
        let zeros = Array1::<FloatValue>::zeros(n_can_layers);
        Self {
            tleaf: Array1::from_elem(n_can_layers, t_air_k),
            h: zeros.clone(),
            le: zeros.clone(),
            rnet: zeros.clone(),
            gs: zeros.clone(),
            gb_h: zeros.clone(),
            ci: zeros.clone(),
            gpp: zeros.clone(),
            resp: zeros.clone(),
            a_net: zeros,
        }
    }
}
