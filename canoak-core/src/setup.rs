//! Site geometry and vertical discretisation.

use crate::errors::{CanoakError, CanoakResult};
use crate::FloatValue;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Site location and the layer structure shared by every engine.
///
/// Canopy layers are the first `n_can_layers` of the `n_domain_layers` air
/// layers; both use the same thickness `canopy_height / n_can_layers`. Layer
/// index 0 is the lowest layer, next to the soil surface. Flux arrays defined
/// on layer interfaces have `n_can_layers + 1` entries with index
/// `n_can_layers` at the canopy top.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Setup {
    /// Latitude (degrees north).
    /// Default: 38.1
    pub lat_deg: FloatValue,

    /// Longitude (degrees east).
    /// Default: -121.65
    pub long_deg: FloatValue,

    /// Time zone offset from UTC (hours).
    /// Default: -8
    pub time_zone: FloatValue,

    /// Canopy height (m).
    /// Default: 1.0
    pub canopy_height: FloatValue,

    /// Height of the reference measurements (m).
    /// Default: 5.0
    pub meas_ht: FloatValue,

    /// Number of canopy (source) layers.
    /// Default: 30
    pub n_can_layers: usize,

    /// Number of air layers in the dispersion domain.
    /// Default: 150
    pub n_domain_layers: usize,

    /// Number of soil layers in the conduction scheme.
    /// Default: 10
    pub n_soil_layers: usize,

    /// Length of one forcing interval (s).
    /// Default: 1800
    pub dt_seconds: FloatValue,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            lat_deg: 38.1,
            long_deg: -121.65,
            time_zone: -8.0,
            canopy_height: 1.0,
            meas_ht: 5.0,
            n_can_layers: 30,
            n_domain_layers: 150,
            n_soil_layers: 10,
            dt_seconds: 1800.0,
        }
    }
}

impl Setup {
    /// Check that the discretisation is usable.
    pub fn validate(&self) -> CanoakResult<()> {
        if self.n_can_layers == 0 {
            return Err(CanoakError::InvalidLayerCount(
                "n_can_layers must be positive".to_string(),
            ));
        }
        if self.n_domain_layers < self.n_can_layers {
            return Err(CanoakError::InvalidLayerCount(format!(
                "n_domain_layers ({}) must be at least n_can_layers ({})",
                self.n_domain_layers, self.n_can_layers
            )));
        }
        if self.n_soil_layers < 2 {
            return Err(CanoakError::InvalidLayerCount(
                "n_soil_layers must be at least 2".to_string(),
            ));
        }
        if !(self.canopy_height > 0.0) {
            return Err(CanoakError::invalid_parameter(
                "canopy_height",
                "must be positive",
            ));
        }
        if !(self.meas_ht > 0.6 * self.canopy_height) {
            return Err(CanoakError::invalid_parameter(
                "meas_ht",
                "must lie above the zero-plane displacement (0.6 * canopy_height)",
            ));
        }
        if !(self.dt_seconds > 0.0) {
            return Err(CanoakError::invalid_parameter("dt_seconds", "must be positive"));
        }
        if !(-90.0..=90.0).contains(&self.lat_deg) {
            return Err(CanoakError::invalid_parameter(
                "lat_deg",
                "must lie within [-90, 90]",
            ));
        }
        Ok(())
    }

    /// Thickness of one air layer (m).
    pub fn delz(&self) -> FloatValue {
        self.canopy_height / self.n_can_layers as FloatValue
    }

    /// Mid-point height of each canopy layer (m).
    pub fn layer_heights(&self) -> Array1<FloatValue> {
        let delz = self.delz();
        Array1::from_shape_fn(self.n_can_layers, |j| (j as FloatValue + 0.5) * delz)
    }

    /// Expected dispersion matrix shape: (source layers, domain layers).
    pub fn dispersion_shape(&self) -> (usize, usize) {
        (self.n_can_layers, self.n_domain_layers)
    }

    /// Index of the domain layer used as the concentration reference.
    pub fn reference_index(&self) -> usize {
        self.n_domain_layers - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn test_default_setup_is_valid() {
        let setup = Setup::default();
        assert!(setup.validate().is_ok());
        assert_eq!(setup.dispersion_shape(), (30, 150));
        assert_eq!(setup.reference_index(), 149);
    }

    #[test]
    fn test_layer_heights() {
        let setup = Setup {
            canopy_height: 2.0,
            n_can_layers: 4,
            n_domain_layers: 8,
            ..Setup::default()
        };
        let z = setup.layer_heights();
        assert_eq!(z.len(), 4);
        assert!(is_close!(z[0], 0.25));
        assert!(is_close!(z[3], 1.75));
    }

    #[test]
    fn test_rejects_zero_canopy_layers() {
        let setup = Setup {
            n_can_layers: 0,
            ..Setup::default()
        };
        assert!(matches!(
            setup.validate(),
            Err(CanoakError::InvalidLayerCount(_))
        ));
    }

    #[test]
    fn test_rejects_domain_smaller_than_canopy() {
        let setup = Setup {
            n_can_layers: 10,
            n_domain_layers: 5,
            ..Setup::default()
        };
        assert!(matches!(
            setup.validate(),
            Err(CanoakError::InvalidLayerCount(_))
        ));
    }

    #[test]
    fn test_partial_deserialization() {
        let json = r#"{"n_can_layers": 5, "n_domain_layers": 15}"#;
        let setup: Setup = serde_json::from_str(json).expect("Partial deserialization failed");

        assert_eq!(setup.n_can_layers, 5);
        assert_eq!(setup.n_domain_layers, 15);
        assert_eq!(setup.n_soil_layers, 10);
        assert!(is_close!(setup.lat_deg, 38.1));
    }
}
