//! Canopy aggregation.
//!
//! Per-layer leaf fluxes are per unit leaf area of each class; canopy totals
//! weight them by the layer leaf area and the sunlit/shaded probabilities:
//!
//! $$F = \sum_j \Delta L_j \left(p_{b,j} F_{sun,j} + p_{s,j} F_{shade,j}\right)$$

use canoak_core::constants::PAR_UMOL_PER_JOULE;
use canoak_core::state::{
    CanopyFluxes, CanopySummary, Infrared, LeafAngle, LeafArea, LeafState, RadiationBand,
    SoilState,
};
use canoak_core::FloatValue;
use ndarray::Array1;

/// Leaf-area weighted sum of a sunlit and a shaded per-layer quantity.
fn weighted_sum(
    sun: &Array1<FloatValue>,
    shade: &Array1<FloatValue>,
    leaf_angle: &LeafAngle,
    leaf_area: &LeafArea,
) -> FloatValue {
    (0..leaf_area.dff.len())
        .map(|j| {
            leaf_area.dff[j]
                * (leaf_angle.prob_beam[j] * sun[j] + leaf_angle.prob_shade[j] * shade[j])
        })
        .sum()
}

/// Vegetation fluxes per unit ground area.
pub fn calculate_veg(
    sun: &LeafState,
    shade: &LeafState,
    leaf_angle: &LeafAngle,
    leaf_area: &LeafArea,
) -> CanopyFluxes {
    let sum = |s: &Array1<FloatValue>, sh: &Array1<FloatValue>| weighted_sum(s, sh, leaf_angle, leaf_area);

    let lai: FloatValue = leaf_area.dff.sum();
    let t_leaf_mean = if lai > 0.0 {
        sum(&sun.tleaf, &shade.tleaf) / lai
    } else {
        let n = leaf_area.dff.len() as FloatValue;
        (0..leaf_area.dff.len())
            .map(|j| leaf_angle.prob_beam[j] * sun.tleaf[j] + leaf_angle.prob_shade[j] * shade.tleaf[j])
            .sum::<FloatValue>()
            / n
    };

    CanopyFluxes {
        gpp: sum(&sun.gpp, &shade.gpp),
        rd: sum(&sun.resp, &shade.resp),
        a_net: sum(&sun.a_net, &shade.a_net),
        le: sum(&sun.le, &shade.le),
        h: sum(&sun.h, &shade.h),
        rnet: sum(&sun.rnet, &shade.rnet),
        t_leaf_mean,
    }
}

/// Whole-ecosystem summary from the radiation fields, vegetation and soil.
///
/// NEE is positive when the ecosystem releases CO2. Albedos are zero when
/// no shortwave arrives.
pub fn summarize(
    par: &RadiationBand,
    nir: &RadiationBand,
    ir: &Infrared,
    veg: &CanopyFluxes,
    soil: &SoilState,
) -> CanopySummary {
    let top = par.top();
    let par_net = (par.beam_flux[top] + par.dn_flux[top] - par.up_flux[top]) / PAR_UMOL_PER_JOULE;
    let nir_net = nir.beam_flux[top] + nir.dn_flux[top] - nir.up_flux[top];
    let ir_net = ir.ir_dn[top] - ir.ir_up[top];
    let rnet_calc = par_net + nir_net + ir_net;

    let shortwave_in = par.incoming / PAR_UMOL_PER_JOULE + nir.incoming;
    let shortwave_out = par.up_flux[top] / PAR_UMOL_PER_JOULE + nir.up_flux[top];
    let albedo = if shortwave_in > 0.0 {
        shortwave_out / shortwave_in
    } else {
        0.0
    };
    let nir_albedo = if nir.incoming > 0.0 {
        nir.up_flux[top] / nir.incoming
    } else {
        0.0
    };

    CanopySummary {
        rnet_calc,
        rnet: veg.rnet + soil.rnet,
        le: veg.le + soil.evap,
        h: veg.h + soil.heat,
        nee: soil.resp + veg.rd - veg.gpp,
        avail: rnet_calc - soil.gsoil,
        gsoil: soil.gsoil,
        albedo,
        nir_albedo,
        nir_refl: nir.up_flux[top] - nir.up_flux[0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn geometry() -> (LeafAngle, LeafArea) {
        let angle = LeafAngle {
            g_func: 0.5,
            k_beam: 0.5,
            k_diffuse: 0.7,
            clumping: 1.0,
            prob_beam: array![0.25, 0.75],
            prob_shade: array![0.75, 0.25],
            tau_diffuse: array![0.6, 0.6],
        };
        let area = LeafArea {
            lai: 2.0,
            dff: array![1.0, 1.0],
            cum_above: array![2.0, 1.0, 0.0],
            sumlai: array![1.5, 0.5],
        };
        (angle, area)
    }

    fn leaf(value: FloatValue, t: FloatValue) -> LeafState {
        let mut leaf = LeafState::isothermal(2, t);
        leaf.gpp.fill(value);
        leaf.resp.fill(1.0);
        leaf.a_net.fill(value - 1.0);
        leaf.h.fill(value);
        leaf.le.fill(2.0 * value);
        leaf.rnet.fill(3.0 * value);
        leaf
    }

    #[test]
    fn test_weighted_totals() {
        let (angle, area) = geometry();
        let veg = calculate_veg(&leaf(20.0, 300.0), &leaf(4.0, 296.0), &angle, &area);

        // layer 0: 0.25*20 + 0.75*4 = 8, layer 1: 0.75*20 + 0.25*4 = 16
        assert_relative_eq!(veg.gpp, 24.0, epsilon = 1e-12);
        assert_relative_eq!(veg.rd, 2.0, epsilon = 1e-12);
        assert_relative_eq!(veg.a_net, veg.gpp - veg.rd, epsilon = 1e-12);
        assert_relative_eq!(veg.le, 48.0, epsilon = 1e-12);
        assert_relative_eq!(veg.rnet, 72.0, epsilon = 1e-12);
        assert_relative_eq!(veg.t_leaf_mean, 298.0, epsilon = 1e-12);
    }

    #[test]
    fn test_summary_energy_and_carbon() {
        let (angle, area) = geometry();
        let veg = calculate_veg(&leaf(20.0, 300.0), &leaf(4.0, 296.0), &angle, &area);
        let mut soil = SoilState::linear(4, 300.0, 295.0);
        soil.rnet = 50.0;
        soil.heat = 10.0;
        soil.evap = 15.0;
        soil.gsoil = 25.0;
        soil.resp = 3.0;

        let par = RadiationBand::zeros(2);
        let nir = RadiationBand::zeros(2);
        let ir = Infrared::uniform(2, 350.0);
        let can = summarize(&par, &nir, &ir, &veg, &soil);

        assert_relative_eq!(can.rnet, veg.rnet + 50.0, epsilon = 1e-12);
        assert_relative_eq!(can.h, veg.h + 10.0, epsilon = 1e-12);
        assert_relative_eq!(can.nee, 3.0 + 2.0 - 24.0, epsilon = 1e-12);
        assert_eq!(can.albedo, 0.0);
        assert_eq!(can.nir_albedo, 0.0);
        assert_eq!(can.rnet_calc, 0.0);
        assert_eq!(can.avail, -25.0);
    }

    #[test]
    fn test_albedo_from_reflected_shortwave() {
        let mut par = RadiationBand::zeros(2);
        par.incoming = 460.0;
        par.up_flux[2] = 46.0;
        let mut nir = RadiationBand::zeros(2);
        nir.incoming = 300.0;
        nir.up_flux[2] = 120.0;
        nir.up_flux[0] = 30.0;
        let can = summarize(
            &par,
            &nir,
            &Infrared::uniform(2, 350.0),
            &CanopyFluxes::default(),
            &SoilState::linear(2, 290.0, 290.0),
        );

        // (10 + 120) / (100 + 300)
        assert_relative_eq!(can.albedo, 130.0 / 400.0, epsilon = 1e-12);
        assert_relative_eq!(can.nir_albedo, 0.4, epsilon = 1e-12);
        // Upward NIR at the soil surface is not counted as canopy reflection
        assert_relative_eq!(can.nir_refl, 90.0, epsilon = 1e-12);
    }
}
