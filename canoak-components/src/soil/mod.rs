//! Soil engines: surface energy balance with subsurface conduction, and
//! respiration.

mod energy;
mod respiration;

pub use energy::{soil_conduction, soil_energy_balance, SoilRadiation};
pub use respiration::{
    moisture_factor, Alfalfa, LloydTaylor, RespirationDrivers, SoilRespiration, Q10,
};
