//! Shortwave transfer through the canopy.
//!
//! Beam radiation is attenuated exponentially and never scattered back into
//! the beam. Intercepted beam and diffuse radiation is reflected and
//! transmitted by leaves into the diffuse streams, which are resolved by
//! repeated down/up sweeps.
//!
//! For layer $j$ with diffuse transmissivity $\tau_j$, leaf reflectance
//! $\rho$ and transmittance $t$:
//!
//! $$D_j = \tau_j D_{j+1} + (1-\tau_j)(t D_{j+1} + \rho U_j) + t (B_{j+1} - B_j)$$
//! $$U_{j+1} = \tau_j U_j + (1-\tau_j)(\rho D_{j+1} + t U_j) + \rho (B_{j+1} - B_j)$$
//!
//! with the soil reflecting $U_0 = \rho_s (D_0 + B_0)$.

use canoak_core::state::{LeafAngle, LeafArea, RadiationBand};
use canoak_core::FloatValue;
use ndarray::Array1;

/// Leaf optical properties of one band.
#[derive(Debug, Clone, Copy)]
pub struct BandOptics {
    pub reflect: FloatValue,
    pub trans: FloatValue,
    pub soil_refl: FloatValue,
}

impl BandOptics {
    fn absorbed(&self) -> FloatValue {
        1.0 - self.reflect - self.trans
    }
}

/// Solve the shortwave field of one band.
///
/// `inbeam` and `indiffuse` are the incoming beam and diffuse flux above the
/// canopy; the field converges over `sweeps` down/up passes. Absorbed fluxes
/// are per unit leaf area, sunlit leaves adding the direct beam to what
/// shaded leaves receive.
pub fn rad_tran_canopy(
    inbeam: FloatValue,
    indiffuse: FloatValue,
    leaf_angle: &LeafAngle,
    leaf_area: &LeafArea,
    optics: BandOptics,
    sweeps: usize,
) -> RadiationBand {
    let n = leaf_area.dff.len();
    let mut band = RadiationBand::zeros(n);
    band.inbeam = inbeam;
    band.indiffuse = indiffuse;
    band.incoming = inbeam + indiffuse;

    let extinction = leaf_angle.k_beam * leaf_angle.clumping;
    band.beam_flux = leaf_area
        .cum_above
        .mapv(|above| inbeam * (-extinction * above).exp());
    band.dn_flux[n] = indiffuse;

    let reflect = optics.reflect;
    let trans = optics.trans;
    let tau = &leaf_angle.tau_diffuse;
    let intercepted = Array1::from_shape_fn(n, |j| band.beam_flux[j + 1] - band.beam_flux[j]);

    for _ in 0..sweeps.max(1) {
        for j in (0..n).rev() {
            band.dn_flux[j] = tau[j] * band.dn_flux[j + 1]
                + (1.0 - tau[j]) * (trans * band.dn_flux[j + 1] + reflect * band.up_flux[j])
                + trans * intercepted[j];
        }
        band.up_flux[0] = optics.soil_refl * (band.dn_flux[0] + band.beam_flux[0]);
        for j in 0..n {
            band.up_flux[j + 1] = tau[j] * band.up_flux[j]
                + (1.0 - tau[j]) * (reflect * band.dn_flux[j + 1] + trans * band.up_flux[j])
                + reflect * intercepted[j];
        }
    }

    let absorbed = optics.absorbed();
    let direct = absorbed * leaf_angle.k_beam * inbeam;
    for j in 0..n {
        let dff = leaf_area.dff[j];
        if dff <= 0.0 {
            continue;
        }
        let diffuse = (band.dn_flux[j + 1] + band.up_flux[j]) * (1.0 - tau[j]) * absorbed / dff;
        band.sh_abs[j] = diffuse;
        band.sun_abs[j] = diffuse + direct;
    }

    band
}
