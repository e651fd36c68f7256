use crate::FloatValue;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Shortwave flux field for one band (PAR or NIR).
///
/// Interface arrays have `n_can_layers + 1` entries (index 0 at the soil
/// surface), layer arrays have `n_can_layers`. PAR is carried in umol/m^2/s,
/// NIR in W/m^2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadiationBand {
    /// Incoming beam above the canopy
    pub inbeam: FloatValue,
    /// Incoming diffuse above the canopy
    pub indiffuse: FloatValue,
    /// Total incoming flux above the canopy
    pub incoming: FloatValue,
    /// Beam flux on a horizontal plane at each interface
    pub beam_flux: Array1<FloatValue>,
    /// Downward diffuse flux at each interface
    pub dn_flux: Array1<FloatValue>,
    /// Upward diffuse flux at each interface
    pub up_flux: Array1<FloatValue>,
    /// Flux absorbed per unit sunlit leaf area in each layer
    pub sun_abs: Array1<FloatValue>,
    /// Flux absorbed per unit shaded leaf area in each layer
    pub sh_abs: Array1<FloatValue>,
}

impl RadiationBand {
    /// A band with no incoming radiation.
    pub fn zeros(n_can_layers: usize) -> Self {
        Self {
            inbeam: 0.0,
            indiffuse: 0.0,
            incoming: 0.0,
            beam_flux: Array1::zeros(n_can_layers + 1),
            dn_flux: Array1::zeros(n_can_layers + 1),
            up_flux: Array1::zeros(n_can_layers + 1),
            sun_abs: Array1::zeros(n_can_layers),
            sh_abs: Array1::zeros(n_can_layers),
        }
    }

    /// Index of the canopy-top interface.
    pub fn top(&self) -> usize {
        self.beam_flux.len() - 1
    }
}

/// Longwave flux field (W/m^2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Infrared {
    /// Sky longwave above the canopy
    pub ir_in: FloatValue,
    /// Downward longwave at each interface
    pub ir_dn: Array1<FloatValue>,
    /// Upward longwave at each interface
    pub ir_up: Array1<FloatValue>,
    /// Longwave absorbed per unit leaf area (both sides) in each layer
    pub ir_abs: Array1<FloatValue>,
}

impl Infrared {
    /// Isothermal initial field: every flux equals the sky emission.
    pub fn uniform(n_can_layers: usize, ir_in: FloatValue) -> Self {
        Self {
            ir_in,
            ir_dn: Array1::from_elem(n_can_layers + 1, ir_in),
            ir_up: Array1::from_elem(n_can_layers + 1, ir_in),
            ir_abs: Array1::zeros(n_can_layers),
        }
    }
}

/// Total radiation absorbed per unit leaf area (W/m^2), shortwave plus longwave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsorbedRadiation {
    pub sun: Array1<FloatValue>,
    pub shade: Array1<FloatValue>,
}

impl AbsorbedRadiation {
    pub fn zeros(n_can_layers: usize) -> Self {
        Self {
            sun: Array1::zeros(n_can_layers),
            shade: Array1::zeros(n_can_layers),
        }
    }
}
