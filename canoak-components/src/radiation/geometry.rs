//! Solar and leaf geometry.

use crate::parameters::CanopyParameters;
use canoak_core::constants::NIGHT_PAR_SINE_BETA;
use canoak_core::setup::Setup;
use canoak_core::state::{LeafAngle, LeafArea, SunAngle};
use canoak_core::FloatValue;
use ndarray::Array1;
use std::f64::consts::{FRAC_PI_2, PI};

/// Number of sky zenith bands used to integrate diffuse extinction.
const SKY_BANDS: usize = 9;

/// Solar elevation for a day of year and local standard time.
///
/// Declination follows a cosine fit, the equation of time a harmonic fit, and
/// solar noon is shifted by the offset between the site longitude and its
/// time-zone meridian.
pub fn angle(setup: &Setup, day: FloatValue, hour: FloatValue) -> SunAngle {
    let rad = PI / 180.0;
    let lat = setup.lat_deg * rad;

    let declination = -23.45 * rad * (2.0 * PI * (day + 10.0) / 365.0).cos();

    let f = (279.575 + 0.9856 * day) * rad;
    let equation_of_time = (-104.7 * f.sin() + 596.2 * (2.0 * f).sin() + 4.3 * (3.0 * f).sin()
        - 12.7 * (4.0 * f).sin()
        - 429.3 * f.cos()
        - 2.0 * (2.0 * f).cos()
        + 19.3 * (3.0 * f).cos())
        / 3600.0;
    let longitude_correction = (setup.long_deg - 15.0 * setup.time_zone) / 15.0;
    let solar_noon = 12.0 - longitude_correction - equation_of_time;
    let hour_angle = 15.0 * (hour - solar_noon) * rad;

    let sin_beta = (lat.sin() * declination.sin()
        + lat.cos() * declination.cos() * hour_angle.cos())
    .clamp(-1.0, 1.0);
    let beta_rad = sin_beta.asin();

    SunAngle {
        beta_rad,
        sin_beta,
        beta_deg: beta_rad / rad,
        theta_rad: FRAC_PI_2 - beta_rad,
    }
}

/// Distribute `lai` over the canopy layers.
pub fn leaf_area(lai: FloatValue, canopy: &CanopyParameters, n_can_layers: usize) -> LeafArea {
    let fractions = canopy.layer_fractions(n_can_layers);
    let dff = Array1::from_iter(fractions.iter().map(|f| f * lai));

    let mut cum_above = Array1::<FloatValue>::zeros(n_can_layers + 1);
    for i in (0..n_can_layers).rev() {
        cum_above[i] = cum_above[i + 1] + dff[i];
    }
    let sumlai = Array1::from_shape_fn(n_can_layers, |j| cum_above[j + 1] + 0.5 * dff[j]);

    LeafArea {
        lai,
        dff,
        cum_above,
        sumlai,
    }
}

/// Extinction coefficient of an ellipsoidal leaf angle distribution
/// (Campbell 1986) for a beam at zenith angle `theta`.
///
/// $$K(\theta) = \frac{\sqrt{x^2 + \tan^2\theta}}{x + 1.774 (x + 1.182)^{-0.733}}$$
fn ellipsoidal_k(x: FloatValue, theta: FloatValue) -> FloatValue {
    (x * x + theta.tan().powi(2)).sqrt() / (x + 1.774 * (x + 1.182).powf(-0.733))
}

/// Zenith angles and normalised hemispheric weights of the sky bands.
fn sky_bands() -> [(FloatValue, FloatValue); SKY_BANDS] {
    let width = FRAC_PI_2 / SKY_BANDS as FloatValue;
    let mut bands = [(0.0, 0.0); SKY_BANDS];
    let mut total = 0.0;
    for (k, band) in bands.iter_mut().enumerate() {
        let theta = (k as FloatValue + 0.5) * width;
        let weight = (2.0 * theta).sin() * width;
        *band = (theta, weight);
        total += weight;
    }
    for band in bands.iter_mut() {
        band.1 /= total;
    }
    bands
}

/// Leaf orientation relative to the sun and penetration probabilities.
///
/// With the sun at or below the night threshold the beam extinction and the
/// sunlit fraction are zero in every layer.
pub fn leaf_angle(sun: &SunAngle, leaf_area: &LeafArea, canopy: &CanopyParameters) -> LeafAngle {
    let x = canopy.leaf_angle_x;
    let omega = canopy.clumping;
    let n = leaf_area.dff.len();
    let bands = sky_bands();

    let k_diffuse: FloatValue = bands
        .iter()
        .map(|&(theta, w)| w * ellipsoidal_k(x, theta))
        .sum();

    let tau_diffuse = leaf_area.dff.mapv(|dff| {
        bands
            .iter()
            .map(|&(theta, w)| w * (-ellipsoidal_k(x, theta) * omega * dff).exp())
            .sum::<FloatValue>()
    });

    let (k_beam, prob_beam) = if sun.sin_beta > NIGHT_PAR_SINE_BETA {
        let k_beam = ellipsoidal_k(x, sun.theta_rad);
        let prob = leaf_area.sumlai.mapv(|l| (-k_beam * omega * l).exp());
        (k_beam, prob)
    } else {
        (0.0, Array1::zeros(n))
    };
    let prob_shade = prob_beam.mapv(|p| 1.0 - p);

    LeafAngle {
        g_func: k_beam * sun.sin_beta.max(0.0),
        k_beam,
        k_diffuse,
        clumping: omega,
        prob_beam,
        prob_shade,
        tau_diffuse,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_summer_noon_is_high() {
        let setup = Setup::default();
        let sun = angle(&setup, 182.0, 12.0);
        // 90 - 38.1 + 23.1 ~= 75 degrees
        assert!(sun.beta_deg > 70.0 && sun.beta_deg < 76.0, "beta = {}", sun.beta_deg);
        assert_relative_eq!(sun.theta_rad + sun.beta_rad, FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_midnight_is_below_horizon() {
        let setup = Setup::default();
        let sun = angle(&setup, 182.0, 0.0);
        assert!(sun.sin_beta < 0.0);
    }

    #[test]
    fn test_leaf_area_cumulative() {
        let canopy = CanopyParameters::default();
        let lai = leaf_area(3.0, &canopy, 3);

        assert_relative_eq!(lai.dff.sum(), 3.0, epsilon = 1e-12);
        assert_eq!(lai.cum_above[3], 0.0);
        assert_relative_eq!(lai.cum_above[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(lai.sumlai[2], 0.5, epsilon = 1e-12);
        assert_relative_eq!(lai.sumlai[0], 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_spherical_distribution() {
        // x = 1 gives K = 0.5 / cos(theta)
        let k = ellipsoidal_k(1.0, 0.0);
        assert!((k - 0.5).abs() < 1e-3, "K = {}", k);
        let k60 = ellipsoidal_k(1.0, PI / 3.0);
        assert!((k60 - 1.0).abs() < 2e-3, "K = {}", k60);
    }

    #[test]
    fn test_sky_weights_sum_to_one() {
        let total: FloatValue = sky_bands().iter().map(|b| b.1).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sunlit_fraction_decreases_downwards() {
        let setup = Setup::default();
        let canopy = CanopyParameters::default();
        let lai = leaf_area(4.0, &canopy, 10);
        let sun = angle(&setup, 182.0, 12.0);
        let la = leaf_angle(&sun, &lai, &canopy);

        for j in 1..10 {
            assert!(la.prob_beam[j - 1] < la.prob_beam[j]);
        }
        for j in 0..10 {
            assert_relative_eq!(la.prob_beam[j] + la.prob_shade[j], 1.0, epsilon = 1e-12);
            assert!(la.tau_diffuse[j] > 0.0 && la.tau_diffuse[j] < 1.0);
        }
    }

    #[test]
    fn test_night_has_no_sunlit_leaves() {
        let setup = Setup::default();
        let canopy = CanopyParameters::default();
        let lai = leaf_area(2.0, &canopy, 5);
        let sun = angle(&setup, 182.0, 0.0);
        let la = leaf_angle(&sun, &lai, &canopy);

        assert_eq!(la.k_beam, 0.0);
        assert!(la.prob_beam.iter().all(|&p| p == 0.0));
        assert!(la.prob_shade.iter().all(|&p| p == 1.0));
    }
}
