//! Longwave exchange between sky, leaves and soil.
//!
//! Leaves in layer $j$ emit
//!
//! $$E_j = \epsilon \sigma (p_{b,j} T_{sun,j}^4 + p_{s,j} T_{shade,j}^4)$$
//!
//! into both streams through the non-transmitting fraction $1-\tau_j$ of the
//! layer, and reflect $1-\epsilon$ of what they intercept. The soil emits
//! $\epsilon_s \sigma T_s^4$ and reflects the rest of the downward flux.

use canoak_core::constants::SIGMA;
use canoak_core::state::{Infrared, LeafAngle};
use canoak_core::FloatValue;
use ndarray::{Array1, Zip};

/// Incoming longwave from the sky (W/m^2).
///
/// Clear-sky emissivity follows Idso and Jackson (1969); cloud cover, taken
/// as `1 - ratrad`, raises the emissivity towards one.
pub fn sky_ir(t_air_k: FloatValue, ratrad: FloatValue) -> FloatValue {
    let clear = 1.0 - 0.261 * (-7.77e-4 * (273.16 - t_air_k).powi(2)).exp();
    SIGMA * t_air_k.powi(4) * (clear * ratrad + 1.0 - ratrad)
}

/// Solve the longwave field for the current leaf and soil temperatures.
#[allow(clippy::too_many_arguments)]
pub fn ir_rad_tran_canopy(
    ir_in: FloatValue,
    leaf_angle: &LeafAngle,
    sun_tleaf: &Array1<FloatValue>,
    shade_tleaf: &Array1<FloatValue>,
    soil_sfc_temperature: FloatValue,
    leaf_emissivity: FloatValue,
    soil_emissivity: FloatValue,
    sweeps: usize,
) -> Infrared {
    let n = sun_tleaf.len();
    let tau = &leaf_angle.tau_diffuse;
    let mut ir = Infrared::uniform(n, ir_in);

    let mut emitted = Array1::<FloatValue>::zeros(n);
    Zip::from(&mut emitted)
        .and(&leaf_angle.prob_beam)
        .and(&leaf_angle.prob_shade)
        .and(sun_tleaf)
        .and(shade_tleaf)
        .for_each(|e, &pb, &ps, &tsun, &tsh| {
            *e = leaf_emissivity * SIGMA * (pb * tsun.powi(4) + ps * tsh.powi(4));
        });
    let soil_emission = soil_emissivity * SIGMA * soil_sfc_temperature.powi(4);
    let leaf_reflect = 1.0 - leaf_emissivity;

    for _ in 0..sweeps.max(1) {
        for j in (0..n).rev() {
            ir.ir_dn[j] = tau[j] * ir.ir_dn[j + 1]
                + (1.0 - tau[j]) * (emitted[j] + leaf_reflect * ir.ir_up[j]);
        }
        ir.ir_up[0] = soil_emission + (1.0 - soil_emissivity) * ir.ir_dn[0];
        for j in 0..n {
            ir.ir_up[j + 1] = tau[j] * ir.ir_up[j]
                + (1.0 - tau[j]) * (emitted[j] + leaf_reflect * ir.ir_dn[j + 1]);
        }
    }

    for j in 0..n {
        ir.ir_abs[j] = leaf_emissivity * (ir.ir_dn[j + 1] + ir.ir_up[j]);
    }
    ir
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::CanopyParameters;
    use crate::radiation::{angle, leaf_angle, leaf_area};
    use approx::assert_relative_eq;
    use canoak_core::setup::Setup;

    fn night_angle() -> LeafAngle {
        let canopy = CanopyParameters::default();
        let area = leaf_area(3.0, &canopy, 10);
        let sun = angle(&Setup::default(), 182.0, 0.0);
        leaf_angle(&sun, &area, &canopy)
    }

    #[test]
    fn test_overcast_sky_is_black_body() {
        let t = 290.0;
        assert_relative_eq!(sky_ir(t, 0.0), SIGMA * t.powi(4), epsilon = 1e-9);
        assert!(sky_ir(t, 0.89) < sky_ir(t, 0.22));
    }

    #[test]
    fn test_isothermal_black_enclosure() {
        // Sky, leaves and soil at one temperature with unit emissivity:
        // every flux equals sigma T^4.
        let t: f64 = 295.0;
        let black = SIGMA * t.powi(4);
        let angle = night_angle();
        let tleaf = Array1::from_elem(10, t);
        let ir = ir_rad_tran_canopy(black, &angle, &tleaf, &tleaf, t, 1.0, 1.0, 3);

        for j in 0..=10 {
            assert_relative_eq!(ir.ir_dn[j], black, max_relative = 1e-12);
            assert_relative_eq!(ir.ir_up[j], black, max_relative = 1e-12);
        }
        for j in 0..10 {
            assert_relative_eq!(ir.ir_abs[j], 2.0 * black, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_cold_sky_cools_canopy_top() {
        let t = 295.0;
        let angle = night_angle();
        let tleaf = Array1::from_elem(10, t);
        let ir = ir_rad_tran_canopy(300.0, &angle, &tleaf, &tleaf, t, 0.98, 0.98, 3);

        // Less longwave arrives at the top leaves than at the bottom ones
        assert!(ir.ir_abs[9] < ir.ir_abs[0]);
        assert!(ir.ir_up[10] > ir.ir_dn[10]);
    }
}
