//! Emission estimation core for truck trip logs.
//!
//! Given a trip table and a vehicle registry, `roado-core` resolves each
//! vehicle to a goods-vehicle class, looks up emission factors for that
//! class and produces per-trip CO2/CH4/N2O masses and CO2e, plus per-vehicle
//! and fleet rollups for the dashboards.
//!
//! Two methodologies coexist and are kept apart on purpose:
//! - [emissions::TailpipeModel]: uplifted per-km tailpipe factors for each
//!   gas, aggregated with AR5 global warming potentials.
//! - [emissions::WeightBasedModel]: WRI gCO2e per tonne-km factors applied to
//!   unladen weight plus a keyword-estimated consignment weight.
//!
//! Bad rows never abort a run; they degrade to empty values in the output.

#[macro_use]
pub mod macros;

pub mod aggregate;
pub mod calculator;
pub mod config;
pub mod consignment;
pub mod emissions;
pub mod error;
pub(crate) mod imports;
pub mod prelude;
#[cfg(feature = "pyo3")]
pub mod python;
pub mod si;
pub mod tabular;
pub mod traits;
pub mod trip;
pub mod uc;
pub mod utils;
pub mod vehicle;
