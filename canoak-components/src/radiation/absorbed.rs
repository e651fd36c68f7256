use canoak_core::constants::PAR_UMOL_PER_JOULE;
use canoak_core::state::{AbsorbedRadiation, Infrared, RadiationBand};
use ndarray::Zip;

/// Total radiation absorbed per unit sunlit and shaded leaf area (W/m^2).
///
/// PAR is converted from umol/m^2/s; NIR and longwave are already in W/m^2.
pub fn compute_qin(par: &RadiationBand, nir: &RadiationBand, ir: &Infrared) -> AbsorbedRadiation {
    let mut qin = AbsorbedRadiation::zeros(ir.ir_abs.len());

    Zip::from(&mut qin.sun)
        .and(&par.sun_abs)
        .and(&nir.sun_abs)
        .and(&ir.ir_abs)
        .for_each(|q, &p, &n, &i| *q = p / PAR_UMOL_PER_JOULE + n + i);
    Zip::from(&mut qin.shade)
        .and(&par.sh_abs)
        .and(&nir.sh_abs)
        .and(&ir.ir_abs)
        .for_each(|q, &p, &n, &i| *q = p / PAR_UMOL_PER_JOULE + n + i);

    qin
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_sum_of_bands() {
        let mut par = RadiationBand::zeros(2);
        par.sun_abs = array![460.0, 230.0];
        par.sh_abs = array![46.0, 23.0];
        let mut nir = RadiationBand::zeros(2);
        nir.sun_abs = array![50.0, 40.0];
        nir.sh_abs = array![5.0, 4.0];
        let ir = Infrared {
            ir_in: 300.0,
            ir_dn: array![0.0, 0.0, 0.0],
            ir_up: array![0.0, 0.0, 0.0],
            ir_abs: array![700.0, 690.0],
        };

        let qin = compute_qin(&par, &nir, &ir);
        assert!((qin.sun[0] - 850.0).abs() < 1e-9);
        assert!((qin.sun[1] - 780.0).abs() < 1e-9);
        assert!((qin.shade[0] - 715.0).abs() < 1e-9);
        assert!((qin.shade[1] - 699.0).abs() < 1e-9);
    }
}
