//! Psychrometric helpers.
//!
//! Temperatures are in Kelvin, vapour pressures in Pa and vapour densities in
//! kg/m^3 unless stated otherwise.

use crate::constants::{R_VAPOUR, T_FREEZE};
use crate::FloatValue;

const ES_A: FloatValue = 611.2;
const ES_B: FloatValue = 17.502;
const ES_C: FloatValue = 240.97;

/// Saturation vapour pressure over water (Pa).
///
/// $$e_s = 611.2 \exp\left(\frac{17.502 T_c}{T_c + 240.97}\right)$$
pub fn saturation_vapour_pressure(t_k: FloatValue) -> FloatValue {
    let tc = t_k - T_FREEZE;
    ES_A * (ES_B * tc / (tc + ES_C)).exp()
}

/// Slope of the saturation vapour pressure curve (Pa/K).
pub fn saturation_vapour_pressure_slope(t_k: FloatValue) -> FloatValue {
    let tc = t_k - T_FREEZE;
    saturation_vapour_pressure(t_k) * ES_B * ES_C / (tc + ES_C).powi(2)
}

/// Vapour density (kg/m^3) from vapour pressure (Pa).
pub fn vapour_density(e_pa: FloatValue, t_k: FloatValue) -> FloatValue {
    e_pa / (R_VAPOUR * t_k)
}

/// Vapour pressure (Pa) from vapour density (kg/m^3).
pub fn vapour_pressure(rhov: FloatValue, t_k: FloatValue) -> FloatValue {
    rhov * R_VAPOUR * t_k
}

/// Saturation vapour density (kg/m^3).
pub fn saturation_vapour_density(t_k: FloatValue) -> FloatValue {
    vapour_density(saturation_vapour_pressure(t_k), t_k)
}

/// Slope of the saturation vapour density curve (kg/m^3/K).
pub fn saturation_vapour_density_slope(t_k: FloatValue) -> FloatValue {
    let es = saturation_vapour_pressure(t_k);
    saturation_vapour_pressure_slope(t_k) / (R_VAPOUR * t_k) - es / (R_VAPOUR * t_k * t_k)
}

/// Latent heat of vaporisation (J/kg).
pub fn latent_heat(t_k: FloatValue) -> FloatValue {
    (2501.0 - 2.37 * (t_k - T_FREEZE)) * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_saturation_at_freezing() {
        assert_relative_eq!(saturation_vapour_pressure(T_FREEZE), 611.2, epsilon = 1e-9);
    }

    #[test]
    fn test_saturation_at_twenty_degrees() {
        // ~2.34 kPa at 20 C
        let es = saturation_vapour_pressure(293.15);
        assert!((es - 2339.0).abs() < 10.0, "es = {}", es);
    }

    #[test]
    fn test_slopes_match_finite_difference() {
        let t = 298.15;
        let h = 1e-3;
        let fd = (saturation_vapour_pressure(t + h) - saturation_vapour_pressure(t - h)) / (2.0 * h);
        assert_relative_eq!(saturation_vapour_pressure_slope(t), fd, max_relative = 1e-6);

        let fd_rho =
            (saturation_vapour_density(t + h) - saturation_vapour_density(t - h)) / (2.0 * h);
        assert_relative_eq!(saturation_vapour_density_slope(t), fd_rho, max_relative = 1e-6);
    }

    #[test]
    fn test_vapour_density_inverse() {
        let t = 290.0;
        let rhov = vapour_density(1500.0, t);
        assert_relative_eq!(vapour_pressure(rhov, t), 1500.0, max_relative = 1e-12);
    }

    #[test]
    fn test_latent_heat() {
        assert_relative_eq!(latent_heat(T_FREEZE), 2.501e6, max_relative = 1e-12);
        assert!(latent_heat(303.15) < latent_heat(T_FREEZE));
    }
}
