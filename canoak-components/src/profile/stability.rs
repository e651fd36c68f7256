//! Atmospheric stability at the reference height.

use canoak_core::constants::{CP_AIR, GRAVITY, VON_KARMAN, ZL_MAX, ZL_MIN};
use canoak_core::FloatValue;

/// Stability parameter z/L from the total sensible heat flux `hh` (W/m^2).
///
/// $$\frac{z}{L} = -\frac{\kappa g H z}{\rho c_p T u_*^3}$$
///
/// The result is clipped to `[ZL_MIN, ZL_MAX]`; without the clip the
/// wind/stability feedback can run away within a step.
pub fn stability_parameter(
    hh: FloatValue,
    ustar: FloatValue,
    t_air_k: FloatValue,
    air_density: FloatValue,
    meas_ht: FloatValue,
) -> FloatValue {
    let zl = -(VON_KARMAN * GRAVITY * hh * meas_ht) / (air_density * CP_AIR * t_air_k * ustar.powi(3));
    zl.clamp(ZL_MIN, ZL_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_follows_heat_flux() {
        assert!(stability_parameter(100.0, 0.4, 298.0, 1.18, 5.0) < 0.0);
        assert!(stability_parameter(-20.0, 0.4, 288.0, 1.2, 5.0) > 0.0);
        assert_eq!(stability_parameter(0.0, 0.4, 288.0, 1.2, 5.0), 0.0);
    }

    #[test]
    fn test_clipped_to_stable_range() {
        // Strong heating under light wind
        assert_eq!(stability_parameter(500.0, 0.05, 300.0, 1.15, 5.0), ZL_MIN);
        // Strong cooling under light wind
        assert_eq!(stability_parameter(-100.0, 0.05, 280.0, 1.25, 5.0), ZL_MAX);
    }
}
