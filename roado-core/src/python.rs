//! Python-only entry points.  Classes get their methods next to their
//! definitions; this module holds the free functions and the pyo3 imports
//! used crate-wide behind the `pyo3` feature.

pub mod pyo3_prelude {
    pub use pyo3::exceptions::PyValueError;
    pub use pyo3::prelude::*;
}

use crate::calculator::{EmissionCalculator, TripEmissionResult};
use crate::config::CalculatorConfig;
use crate::emissions;
use crate::imports::*;

#[pyfunction(name = "uplift")]
pub fn uplift_py(base: f64) -> f64 {
    emissions::uplift(base)
}

/// Consignment weight in kg from a free-text description, using the
/// keyword table of `config` (reference table when omitted).
#[pyfunction(name = "estimate_consignment_weight")]
#[pyo3(signature = (description, config=None))]
pub fn estimate_consignment_weight_py(
    description: Option<&str>,
    config: Option<CalculatorConfig>,
) -> u64 {
    config
        .unwrap_or_default()
        .consignment
        .estimate_kg(description)
}

/// Reads the trip and vehicle tables, computes tailpipe results and writes
/// them to `output` when given.
#[pyfunction(name = "run_emission_report")]
#[pyo3(signature = (trips, vehicles, output=None, config=None))]
pub fn run_emission_report_py(
    trips: PathBuf,
    vehicles: PathBuf,
    output: Option<PathBuf>,
    config: Option<CalculatorConfig>,
) -> anyhow::Result<Vec<TripEmissionResult>> {
    let calculator = config
        .as_ref()
        .map(EmissionCalculator::from)
        .unwrap_or_default();
    crate::tabular::run_report(&calculator, trips, vehicles, output)
}
