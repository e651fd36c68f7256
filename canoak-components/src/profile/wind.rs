//! Wind speed inside the canopy.

use canoak_core::constants::VON_KARMAN;
use canoak_core::setup::Setup;
use canoak_core::FloatValue;
use ndarray::Array1;
use std::f64::consts::FRAC_PI_2;

/// Attenuation coefficient of the exponential in-canopy wind profile.
const WIND_ATTENUATION: FloatValue = 2.5;

/// Businger-Dyer stability correction for momentum at `zeta = z/L`.
pub fn psi_momentum(zeta: FloatValue) -> FloatValue {
    if zeta >= 0.0 {
        -5.0 * zeta
    } else {
        let x = (1.0 - 16.0 * zeta).powf(0.25);
        2.0 * ((1.0 + x) / 2.0).ln() + ((1.0 + x * x) / 2.0).ln() - 2.0 * x.atan() + FRAC_PI_2
    }
}

/// Wind speed at each canopy layer mid-point (m/s).
///
/// The canopy-top speed follows the diabatic log profile above a
/// displacement height of `0.6 h` and roughness length `0.1 h`, using the
/// stability parameter `zl` referenced to the measurement height:
///
/// $$u_h = \frac{u_*}{\kappa}\left[\ln\frac{h - d}{z_0} - \psi_m\left(\frac{h - d}{L}\right)\right]$$
///
/// Below the top it decays exponentially, $u(z) = u_h e^{2.5 (z/h - 1)}$.
pub fn uz(setup: &Setup, ustar: FloatValue, zl: FloatValue) -> Array1<FloatValue> {
    let h = setup.canopy_height;
    let d = 0.6 * h;
    let z0 = 0.1 * h;
    let zeta = zl * (h - d) / setup.meas_ht;

    let u_top = (ustar / VON_KARMAN * (((h - d) / z0).ln() - psi_momentum(zeta)))
        .max(0.1 * ustar / VON_KARMAN);

    setup
        .layer_heights()
        .mapv(|z| u_top * (WIND_ATTENUATION * (z / h - 1.0)).exp())
}
