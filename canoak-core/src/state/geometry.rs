use crate::FloatValue;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Solar position for one forcing step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunAngle {
    /// Solar elevation (rad)
    pub beta_rad: FloatValue,
    /// Sine of the solar elevation
    pub sin_beta: FloatValue,
    /// Solar elevation (degrees)
    pub beta_deg: FloatValue,
    /// Solar zenith angle (rad)
    pub theta_rad: FloatValue,
}

/// Vertical distribution of leaf area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafArea {
    /// Total leaf area index
    pub lai: FloatValue,
    /// Leaf area index of each canopy layer, index 0 at the bottom
    pub dff: Array1<FloatValue>,
    /// Leaf area index above each layer interface, `n_can_layers + 1` entries.
    /// The last entry (canopy top) is zero and the first equals `lai`.
    pub cum_above: Array1<FloatValue>,
    /// Leaf area index above the mid-point of each layer
    pub sumlai: Array1<FloatValue>,
}

/// Leaf orientation relative to the sun and the resulting penetration
/// probabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafAngle {
    /// Mean projection of unit leaf area onto a plane normal to the beam
    pub g_func: FloatValue,
    /// Beam extinction coefficient, zero at night
    pub k_beam: FloatValue,
    /// Diffuse extinction coefficient
    pub k_diffuse: FloatValue,
    /// Clumping index applied to both extinction coefficients
    pub clumping: FloatValue,
    /// Probability of beam penetration (sunlit fraction) in each layer
    pub prob_beam: Array1<FloatValue>,
    /// Shaded fraction of each layer, `1 - prob_beam`
    pub prob_shade: Array1<FloatValue>,
    /// Diffuse transmissivity of each layer
    pub tau_diffuse: Array1<FloatValue>,
}
