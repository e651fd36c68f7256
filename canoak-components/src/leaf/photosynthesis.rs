//! Leaf photosynthesis and stomatal conductance.
//!
//! Gross assimilation is the lesser of the Rubisco-limited and the
//! electron-transport-limited rates (Farquhar, von Caemmerer and Berry 1980):
//!
//! $$W_c = \frac{V_{cmax} (c_i - \Gamma^*)}{c_i + K_m} \qquad
//!   W_j = \frac{J (c_i - \Gamma^*)}{4 c_i + 8 \Gamma^*}$$
//!
//! Stomatal conductance follows Ball, Woodrow and Berry (1987):
//!
//! $$g_s = g_0 + m \frac{A_n h_s}{c_s}$$
//!
//! The coupling through $c_i$ is closed in one step: the Ball-Berry relation
//! at steady state fixes $c_i / c_s = 1 - 1.6 / (m h_s)$, and the surface
//! concentration is corrected once for the boundary-layer drawdown.

use crate::parameters::LeafParameters;
use canoak_core::constants::O2_MMOL_PER_MOL;
use canoak_core::FloatValue;

/// Drivers of the leaf carbon balance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotosynthesisInput {
    /// Absorbed PAR (umol/m^2/s)
    pub par_abs: FloatValue,
    /// Leaf temperature (K)
    pub t_leaf: FloatValue,
    /// CO2 in the air around the leaf (ppm)
    pub ca: FloatValue,
    /// Relative humidity at the leaf surface (0-1)
    pub hs: FloatValue,
    /// Boundary-layer conductance to CO2 (mol/m^2/s)
    pub gb_co2: FloatValue,
}

/// Leaf carbon balance and stomatal state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Photosynthesis {
    /// Gross assimilation (umol/m^2/s), never negative
    pub gpp: FloatValue,
    /// Dark respiration (umol/m^2/s)
    pub rd: FloatValue,
    /// Net assimilation `gpp - rd` (umol/m^2/s)
    pub a_net: FloatValue,
    /// Stomatal conductance to water vapour (mol/m^2/s), at least `g0`
    pub gs: FloatValue,
    /// Intercellular CO2 (ppm)
    pub ci: FloatValue,
}

/// Electron transport rate from the non-rectangular hyperbola.
fn electron_transport(params: &LeafParameters, par_abs: FloatValue, jmax: FloatValue) -> FloatValue {
    let i2 = params.electron_yield * par_abs.max(0.0);
    if i2 <= 0.0 {
        return 0.0;
    }
    let sum = i2 + jmax;
    (sum - (sum * sum - 4.0 * params.theta_j * i2 * jmax).max(0.0).sqrt()) / (2.0 * params.theta_j)
}

pub fn photosynthesis(params: &LeafParameters, input: &PhotosynthesisInput) -> Photosynthesis {
    let t = input.t_leaf;
    let vcmax = params.vcmax(t);
    let j = electron_transport(params, input.par_abs, params.jmax(t));
    let rd = params.rd(t);
    let km = params.km(t, O2_MMOL_PER_MOL);
    let gamma_star = params.gamma_star(t);

    let hs = input.hs.clamp(0.05, 1.0);
    let ci_ratio = (1.0 - 1.6 / (params.kball * hs)).clamp(0.1, 1.0);

    let gross = |cs: FloatValue| {
        let ci = cs * ci_ratio;
        let wc = vcmax * (ci - gamma_star) / (ci + km);
        let wj = j * (ci - gamma_star) / (4.0 * ci + 8.0 * gamma_star);
        (wc.min(wj).max(0.0), ci)
    };

    let (first, _) = gross(input.ca);
    let cs = if input.gb_co2 > 0.0 {
        (input.ca - 1.37 * (first - rd) / input.gb_co2).max(0.1 * input.ca)
    } else {
        input.ca
    };
    let (gpp, ci) = gross(cs);
    let a_net = gpp - rd;
    let gs = params.g0 + params.kball * a_net.max(0.0) * hs / cs.max(1.0);

    Photosynthesis {
        gpp,
        rd,
        a_net,
        gs,
        ci,
    }
}
