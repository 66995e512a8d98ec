pub use crate::aggregate::{ConsignorSummary, FleetSummary, TripAggregator, VehicleSummary};
pub use crate::calculator::{ConsignmentTripResult, EmissionCalculator, TripEmissionResult};
pub use crate::config::{CalculatorConfig, RegistrationAliases};
pub use crate::consignment::{
    parse_quantity, ConsignmentWeightEstimate, KeywordWeight, WeightEstimator,
    DEFAULT_CONSIGNMENT_WEIGHT_KG,
};
pub use crate::emissions::{
    route_efficiency, uplift, BenchmarkTable, EmissionFactorTable, GasEmissions, GasFactors,
    TailpipeEmission, TailpipeModel, TonneKmFactorTable, WeightBasedEmission, WeightBasedModel,
    WriCategory, GWP_CH4, GWP_N2O, UPLIFT,
};
#[cfg(feature = "pyo3")]
pub use crate::python::{
    estimate_consignment_weight_py, run_emission_report_py, uplift_py,
};
pub use crate::tabular::{
    consignment_results_frame, read_trip_results, run_report, to_csv_file, trip_results_frame,
    vehicle_summaries_frame, write_csv,
};
pub use crate::traits::{KeyedRecord, SerdeAPI};
#[cfg(feature = "pyo3")]
pub use crate::trip::{consignors_py, import_trips_py};
pub use crate::trip::{consignors, dedup_first, import_trips, read_trips, TripRecord, TripRow};
pub use crate::vehicle::{
    import_vehicle_registry, read_vehicle_registry, ClassSource, Classification, OverrideTable,
    VehicleClass, VehicleClassifier, VehicleOverride, VehicleRecord, VehicleRegistry,
};
