//! Crate that wraps `roado-core` and enables the `pyo3` feature to
//! expose the calculator, its inputs and its result tables to Python.
//!
//! ## Features
#![doc = document_features::document_features!()]

use roado_core::prelude::*;
pub use pyo3::prelude::*;
pub use pyo3_polars::PyDataFrame;

#[pyfunction]
fn trip_results_dataframe(results: Vec<TripEmissionResult>) -> PyResult<PyDataFrame> {
    Ok(PyDataFrame(trip_results_frame(&results)?))
}

#[pyfunction]
fn consignment_results_dataframe(results: Vec<ConsignmentTripResult>) -> PyResult<PyDataFrame> {
    Ok(PyDataFrame(consignment_results_frame(&results)?))
}

#[pyfunction]
fn vehicle_summaries_dataframe(summaries: Vec<VehicleSummary>) -> PyResult<PyDataFrame> {
    Ok(PyDataFrame(vehicle_summaries_frame(&summaries)?))
}

/// Writes tailpipe results to `filepath` as CSV with the report headers.
#[pyfunction]
fn write_trip_results(results: Vec<TripEmissionResult>, filepath: std::path::PathBuf) -> PyResult<()> {
    Ok(to_csv_file(filepath, &results)?)
}

/// Writes weight-based results to `filepath` as CSV.
#[pyfunction]
fn write_consignment_results(
    results: Vec<ConsignmentTripResult>,
    filepath: std::path::PathBuf,
) -> PyResult<()> {
    Ok(to_csv_file(filepath, &results)?)
}

#[pymodule]
fn roado_pyo3(_py: Python, m: &PyModule) -> PyResult<()> {
    #[cfg(feature = "logging")]
    pyo3_log::init();

    m.add_class::<CalculatorConfig>()?;
    m.add_class::<VehicleClass>()?;
    m.add_class::<VehicleRegistry>()?;
    m.add_class::<Classification>()?;
    m.add_class::<ClassSource>()?;
    m.add_class::<TripRecord>()?;

    m.add_class::<EmissionCalculator>()?;
    m.add_class::<TripEmissionResult>()?;
    m.add_class::<ConsignmentTripResult>()?;

    m.add_class::<TripAggregator>()?;
    m.add_class::<VehicleSummary>()?;
    m.add_class::<FleetSummary>()?;
    m.add_class::<ConsignorSummary>()?;

    m.add_function(wrap_pyfunction!(import_trips_py, m)?)?;
    m.add_function(wrap_pyfunction!(consignors_py, m)?)?;
    m.add_function(wrap_pyfunction!(uplift_py, m)?)?;
    m.add_function(wrap_pyfunction!(estimate_consignment_weight_py, m)?)?;
    m.add_function(wrap_pyfunction!(run_emission_report_py, m)?)?;

    m.add_function(wrap_pyfunction!(trip_results_dataframe, m)?)?;
    m.add_function(wrap_pyfunction!(consignment_results_dataframe, m)?)?;
    m.add_function(wrap_pyfunction!(vehicle_summaries_dataframe, m)?)?;
    m.add_function(wrap_pyfunction!(write_trip_results, m)?)?;
    m.add_function(wrap_pyfunction!(write_consignment_results, m)?)?;

    Ok(())
}
