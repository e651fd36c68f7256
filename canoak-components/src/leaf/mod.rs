//! Leaf flux engine: boundary layer, energy balance and carbon balance of
//! sunlit and shaded leaves.

mod energy;
mod photosynthesis;

pub use energy::{boundary_layer, leaf_energy_balance, leaf_fluxes, BoundaryLayer, LeafEnergy};
pub use photosynthesis::{photosynthesis, Photosynthesis, PhotosynthesisInput};
