//! Engine parameters
//!
//! Each parameter struct deserialises from partial documents: missing fields
//! take the documented defaults.

mod canopy;
mod leaf;
mod optical;
mod soil;

pub use canopy::CanopyParameters;
pub use leaf::{LeafParameters, StomataType};
pub use optical::OpticalParameters;
pub use soil::SoilParameters;
