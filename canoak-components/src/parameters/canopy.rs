//! Canopy Structure Parameters

use canoak_core::errors::{CanoakError, CanoakResult};
use canoak_core::FloatValue;
use serde::{Deserialize, Serialize};

/// Parameters describing how leaf area is arranged in the canopy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanopyParameters {
    /// Ellipsoidal leaf angle distribution parameter (dimensionless).
    /// Ratio of horizontal to vertical semi-axes: 1 is spherical, larger
    /// values are more planophile.
    /// Default: 1.0
    pub leaf_angle_x: FloatValue,

    /// Clumping index applied to the extinction coefficients (dimensionless).
    /// Default: 0.95
    pub clumping: FloatValue,

    /// Relative leaf area in each canopy layer, bottom first.
    /// Normalised internally. Empty means uniform.
    /// Default: empty
    pub lai_profile: Vec<FloatValue>,

    /// Leaf thermal emissivity (dimensionless).
    /// Default: 0.98
    pub leaf_emissivity: FloatValue,
}

impl Default for CanopyParameters {
    fn default() -> Self {
        Self {
            leaf_angle_x: 1.0,
            clumping: 0.95,
            lai_profile: Vec::new(),
            leaf_emissivity: 0.98,
        }
    }
}

impl CanopyParameters {
    pub fn validate(&self, n_can_layers: usize) -> CanoakResult<()> {
        if !(self.leaf_angle_x > 0.0) {
            return Err(CanoakError::invalid_parameter(
                "leaf_angle_x",
                "must be positive",
            ));
        }
        if !(self.clumping > 0.0 && self.clumping <= 1.0) {
            return Err(CanoakError::invalid_parameter(
                "clumping",
                "must lie within (0, 1]",
            ));
        }
        if !(self.leaf_emissivity > 0.0 && self.leaf_emissivity <= 1.0) {
            return Err(CanoakError::invalid_parameter(
                "leaf_emissivity",
                "must lie within (0, 1]",
            ));
        }
        if !self.lai_profile.is_empty() {
            if self.lai_profile.len() != n_can_layers {
                return Err(CanoakError::InvalidLayerCount(format!(
                    "lai_profile has {} entries but there are {} canopy layers",
                    self.lai_profile.len(),
                    n_can_layers
                )));
            }
            let total: FloatValue = self.lai_profile.iter().sum();
            if self.lai_profile.iter().any(|&f| f < 0.0) || !(total > 0.0) {
                return Err(CanoakError::invalid_parameter(
                    "lai_profile",
                    "must be non-negative with a positive sum",
                ));
            }
        }
        Ok(())
    }

    /// Fraction of total leaf area in each layer, summing to one.
    pub fn layer_fractions(&self, n_can_layers: usize) -> Vec<FloatValue> {
        if self.lai_profile.is_empty() {
            return vec![1.0 / n_can_layers as FloatValue; n_can_layers];
        }
        let total: FloatValue = self.lai_profile.iter().sum();
        self.lai_profile.iter().map(|f| f / total).collect()
    }
}
