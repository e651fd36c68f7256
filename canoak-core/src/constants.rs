//! Physical constants shared by the engines.

use crate::FloatValue;

/// Von Karman constant
pub const VON_KARMAN: FloatValue = 0.4;
/// Acceleration due to gravity (m/s^2)
pub const GRAVITY: FloatValue = 9.8;
/// Specific heat capacity of dry air at constant pressure (J/kg/K)
pub const CP_AIR: FloatValue = 1005.0;
/// Stefan-Boltzmann constant (W/m^2/K^4)
pub const SIGMA: FloatValue = 5.670_367e-8;
/// Freezing point of water (K)
pub const T_FREEZE: FloatValue = 273.15;
/// Universal gas constant (J/mol/K)
pub const R_UNIVERSAL: FloatValue = 8.314;
/// Gas constant for dry air (J/kg/K)
pub const R_DRY_AIR: FloatValue = 287.04;
/// Gas constant for water vapour (J/kg/K)
pub const R_VAPOUR: FloatValue = 461.5;
/// Conversion from PAR photon flux to energy flux (umol/J)
pub const PAR_UMOL_PER_JOULE: FloatValue = 4.6;
/// Atmospheric oxygen partial pressure used by the carboxylation kinetics (mmol/mol)
pub const O2_MMOL_PER_MOL: FloatValue = 210.0;

/// Kinematic viscosity of air (m^2/s)
pub const NU_AIR: FloatValue = 1.51e-5;
/// Molecular diffusivity of heat in air (m^2/s)
pub const DIFF_HEAT: FloatValue = 2.15e-5;
/// Molecular diffusivity of water vapour in air (m^2/s)
pub const DIFF_VAPOUR: FloatValue = 2.42e-5;
/// Molecular diffusivity of CO2 in air (m^2/s)
pub const DIFF_CO2: FloatValue = 1.47e-5;

/// Lower bound of the stability parameter z/L after each update
pub const ZL_MIN: FloatValue = -3.0;
/// Upper bound of the stability parameter z/L after each update
pub const ZL_MAX: FloatValue = 0.25;

/// Solar elevation sine at or below which incoming PAR is forced to zero
pub const NIGHT_PAR_SINE_BETA: FloatValue = 0.01;
/// Solar elevation sine at or below which beam/diffuse partitioning is skipped
pub const NIGHT_PARTITION_SINE_BETA: FloatValue = 0.05;
