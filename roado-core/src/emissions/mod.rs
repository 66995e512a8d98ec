//! Emission factors and the two CO2e methodologies.

mod factors;
mod tailpipe;
mod weight_based;

pub use factors::*;
pub use tailpipe::*;
pub use weight_based::*;
