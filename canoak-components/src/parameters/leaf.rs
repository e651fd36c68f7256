//! Leaf Parameters
//!
//! Leaf geometry, stomatal model and Farquhar photosynthesis coefficients.
//! Kinetic constants and activation energies follow Bernacchi et al. (2001).

use canoak_core::constants::R_UNIVERSAL;
use canoak_core::errors::{CanoakError, CanoakResult};
use canoak_core::FloatValue;
use serde::{Deserialize, Serialize};

const T_REF: FloatValue = 298.15;

/// Which leaf sides carry stomata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StomataType {
    /// Stomata on both sides of the leaf
    Amphistomatous,
    /// Stomata on the lower side only
    Hypostomatous,
}

impl StomataType {
    /// Number of leaf sides that transpire.
    pub fn sides(&self) -> FloatValue {
        match self {
            StomataType::Amphistomatous => 2.0,
            StomataType::Hypostomatous => 1.0,
        }
    }
}

/// Parameters for the sunlit/shaded leaf energy and carbon balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeafParameters {
    /// Characteristic leaf dimension (m).
    /// Default: 0.05
    pub leaf_dimension: FloatValue,

    /// Stomatal arrangement.
    /// Default: Amphistomatous
    pub stomata: StomataType,

    /// Ball-Berry slope (dimensionless).
    /// Default: 8.0
    pub kball: FloatValue,

    /// Ball-Berry intercept, also the cuticular conductance (mol/m^2/s).
    /// Default: 0.01
    pub g0: FloatValue,

    /// Maximum carboxylation rate at 25 C (umol/m^2/s).
    /// Default: 100.0
    pub vcmax25: FloatValue,

    /// Maximum electron transport rate at 25 C (umol/m^2/s).
    /// Default: 190.0
    pub jmax25: FloatValue,

    /// Dark respiration at 25 C (umol/m^2/s).
    /// Default: 1.0
    pub rd25: FloatValue,

    /// Curvature of the light response of electron transport (dimensionless).
    /// Default: 0.9
    pub theta_j: FloatValue,

    /// Electrons available to photosystem II per absorbed photon.
    /// Default: 0.425
    pub electron_yield: FloatValue,

    /// Michaelis constant for CO2 at 25 C (umol/mol).
    /// Default: 404.9
    pub kc25: FloatValue,

    /// Michaelis constant for O2 at 25 C (mmol/mol).
    /// Default: 278.4
    pub ko25: FloatValue,

    /// CO2 compensation point without dark respiration at 25 C (umol/mol).
    /// Default: 42.75
    pub gamma_star25: FloatValue,

    /// Activation energy of Vcmax (J/mol).
    /// Default: 65330
    pub ea_vcmax: FloatValue,

    /// Activation energy of Jmax (J/mol).
    /// Default: 43540
    pub ea_jmax: FloatValue,

    /// Activation energy of dark respiration (J/mol).
    /// Default: 46390
    pub ea_rd: FloatValue,

    /// Activation energy of Kc (J/mol).
    /// Default: 79430
    pub ea_kc: FloatValue,

    /// Activation energy of Ko (J/mol).
    /// Default: 36380
    pub ea_ko: FloatValue,

    /// Activation energy of the compensation point (J/mol).
    /// Default: 37830
    pub ea_gamma_star: FloatValue,

    /// Deactivation energy of Vcmax and Jmax (J/mol).
    /// Default: 200000
    pub hd: FloatValue,

    /// Entropy term of Vcmax and Jmax deactivation (J/mol/K).
    /// Default: 650
    pub entropy: FloatValue,
}

impl Default for LeafParameters {
    fn default() -> Self {
        Self {
            leaf_dimension: 0.05,
            stomata: StomataType::Amphistomatous,
            kball: 8.0,
            g0: 0.01,
            vcmax25: 100.0,
            jmax25: 190.0,
            rd25: 1.0,
            theta_j: 0.9,
            electron_yield: 0.425,
            kc25: 404.9,
            ko25: 278.4,
            gamma_star25: 42.75,
            ea_vcmax: 65330.0,
            ea_jmax: 43540.0,
            ea_rd: 46390.0,
            ea_kc: 79430.0,
            ea_ko: 36380.0,
            ea_gamma_star: 37830.0,
            hd: 200_000.0,
            entropy: 650.0,
        }
    }
}

/// Arrhenius scaling of a rate defined at 25 C.
///
/// $$k(T) = k_{25} \exp\left(\frac{E_a (T - 298.15)}{298.15 R T}\right)$$
pub fn arrhenius(k25: FloatValue, ea: FloatValue, t_k: FloatValue) -> FloatValue {
    k25 * (ea * (t_k - T_REF) / (T_REF * R_UNIVERSAL * t_k)).exp()
}

impl LeafParameters {
    /// Arrhenius scaling with high-temperature deactivation.
    fn peaked(&self, k25: FloatValue, ea: FloatValue, t_k: FloatValue) -> FloatValue {
        let num = 1.0 + ((T_REF * self.entropy - self.hd) / (T_REF * R_UNIVERSAL)).exp();
        let den = 1.0 + ((t_k * self.entropy - self.hd) / (t_k * R_UNIVERSAL)).exp();
        arrhenius(k25, ea, t_k) * num / den
    }

    /// Maximum carboxylation rate at leaf temperature (umol/m^2/s).
    pub fn vcmax(&self, t_k: FloatValue) -> FloatValue {
        self.peaked(self.vcmax25, self.ea_vcmax, t_k)
    }

    /// Maximum electron transport rate at leaf temperature (umol/m^2/s).
    pub fn jmax(&self, t_k: FloatValue) -> FloatValue {
        self.peaked(self.jmax25, self.ea_jmax, t_k)
    }

    /// Dark respiration at leaf temperature (umol/m^2/s).
    pub fn rd(&self, t_k: FloatValue) -> FloatValue {
        arrhenius(self.rd25, self.ea_rd, t_k)
    }

    /// Effective Michaelis constant for carboxylation, `Kc (1 + O/Ko)` (umol/mol).
    pub fn km(&self, t_k: FloatValue, o2: FloatValue) -> FloatValue {
        let kc = arrhenius(self.kc25, self.ea_kc, t_k);
        let ko = arrhenius(self.ko25, self.ea_ko, t_k);
        kc * (1.0 + o2 / ko)
    }

    /// CO2 compensation point without dark respiration (umol/mol).
    pub fn gamma_star(&self, t_k: FloatValue) -> FloatValue {
        arrhenius(self.gamma_star25, self.ea_gamma_star, t_k)
    }

    pub fn validate(&self) -> CanoakResult<()> {
        let positive = [
            ("leaf_dimension", self.leaf_dimension),
            ("kball", self.kball),
            ("g0", self.g0),
            ("vcmax25", self.vcmax25),
            ("jmax25", self.jmax25),
            ("electron_yield", self.electron_yield),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(CanoakError::invalid_parameter(name, "must be positive"));
            }
        }
        if !(self.theta_j > 0.0 && self.theta_j <= 1.0) {
            return Err(CanoakError::invalid_parameter(
                "theta_j",
                "must lie within (0, 1]",
            ));
        }
        if self.rd25 < 0.0 {
            return Err(CanoakError::invalid_parameter("rd25", "must not be negative"));
        }
        Ok(())
    }
}
