//! Per-trip emission results for both methodologies.

use rayon::prelude::*;

use crate::config::CalculatorConfig;
use crate::consignment::WeightEstimator;
use crate::emissions::*;
use crate::imports::*;
use crate::trip::{dedup_first, TripRecord};
use crate::vehicle::{Classification, VehicleClass, VehicleClassifier, VehicleRegistry};

/// One row of the tailpipe result table.  Empty (`None`) values mean
/// "unavailable", which is distinct from zero.
#[cfg_attr(feature = "pyo3", pyclass(get_all))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripEmissionResult {
    #[serde(rename = "Trip ID")]
    pub trip_id: String,
    #[serde(rename = "Vehicle No.")]
    pub registration: String,
    #[serde(rename = "Vehicle Type")]
    pub vehicle_type: String,
    #[serde(rename = "Fuel Type")]
    pub fuel_type: String,
    #[serde(rename = "Running Distance (km)")]
    pub running_distance_km: Option<f64>,
    #[serde(rename = "Total Distance (km)")]
    pub total_distance_km: Option<f64>,
    #[serde(rename = "Route Efficiency (Running/Total)")]
    pub route_efficiency: Option<f64>,
    #[serde(rename = "EF_CO2 (kg/km)")]
    pub ef_co2_kg_per_km: Option<f64>,
    #[serde(rename = "EF_CH4 (kg/km)")]
    pub ef_ch4_kg_per_km: Option<f64>,
    #[serde(rename = "EF_N2O (kg/km)")]
    pub ef_n2o_kg_per_km: Option<f64>,
    #[serde(rename = "CO2 (kg)")]
    pub co2_kg: Option<f64>,
    #[serde(rename = "CH4 (kg)")]
    pub ch4_kg: Option<f64>,
    #[serde(rename = "N2O (kg)")]
    pub n2o_kg: Option<f64>,
    #[serde(rename = "CO2e (kg)")]
    pub co2e_kg: Option<f64>,
    /// Resolved class; not part of the exported table
    #[serde(skip)]
    pub class: Option<VehicleClass>,
}

impl KeyedRecord for TripEmissionResult {
    fn key(&self) -> &str {
        &self.trip_id
    }
}

impl TripEmissionResult {
    fn new(trip: &TripRecord, vehicle: &Classification, emission: Option<TailpipeEmission>) -> Self {
        let factors = emission.map(|e| e.factors);
        let masses = emission.map(|e| e.masses);
        Self {
            trip_id: trip.trip_id.clone(),
            registration: trip.registration.clone(),
            vehicle_type: vehicle.vehicle_type.clone(),
            fuel_type: vehicle.fuel.clone(),
            running_distance_km: trip.running_distance.map(|d| d.get::<si::kilometer>()),
            total_distance_km: trip.total_distance.map(|d| d.get::<si::kilometer>()),
            route_efficiency: route_efficiency(trip.running_distance, trip.total_distance),
            ef_co2_kg_per_km: factors.map(|f| f.co2),
            ef_ch4_kg_per_km: factors.map(|f| f.ch4),
            ef_n2o_kg_per_km: factors.map(|f| f.n2o),
            co2_kg: masses.map(|m| m.co2_kg),
            ch4_kg: masses.map(|m| m.ch4_kg),
            n2o_kg: masses.map(|m| m.n2o_kg),
            co2e_kg: masses.map(|m| m.co2e_kg),
            class: vehicle.class,
        }
    }
}

/// One row of the weight-based (consignment) result table.  Missing inputs
/// count as zero in this methodology.
#[cfg_attr(feature = "pyo3", pyclass(get_all))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsignmentTripResult {
    #[serde(rename = "Trip ID")]
    pub trip_id: String,
    #[serde(rename = "Vehicle No.")]
    pub registration: String,
    #[serde(rename = "Consignor")]
    pub consignor: Option<String>,
    #[serde(rename = "Consignment")]
    pub consignment: Option<String>,
    #[serde(rename = "Distance Covered (km)")]
    pub distance_km: f64,
    #[serde(rename = "Estimated Consignment Weight (kg)")]
    pub consignment_weight_kg: u64,
    #[serde(rename = "Unladen Weight (kg)")]
    pub unladen_weight_kg: f64,
    #[serde(rename = "Total Weight (tonnes)")]
    pub total_weight_tonnes: f64,
    /// gCO2e per tonne-km, 0 when the class had no factor
    #[serde(rename = "Emission Factor (gCO2e/tonne-km)")]
    pub emission_factor: f64,
    #[serde(rename = "Carbon Emissions (kg)")]
    pub carbon_emissions_kg: f64,
    /// Tailpipe CO2e of the same trip, for comparison
    #[serde(rename = "Reference CO2e (kg)")]
    pub reference_co2e_kg: Option<f64>,
    #[serde(skip)]
    pub factor_resolved: bool,
}

impl KeyedRecord for ConsignmentTripResult {
    fn key(&self) -> &str {
        &self.trip_id
    }
}

#[cfg_attr(feature = "pyo3", pymethods)]
impl ConsignmentTripResult {
    /// Weight-based CO2e when its factor resolved, else the reference value.
    pub fn preferred_co2e(&self) -> Option<f64> {
        if self.factor_resolved {
            Some(self.carbon_emissions_kg)
        } else {
            self.reference_co2e_kg
        }
    }
}

/// Runs classification, consignment weight estimation and both emission
/// methodologies over trip records.  Holds no state between calls; every
/// call recomputes from its inputs.
#[cfg_attr(feature = "pyo3", pyclass)]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EmissionCalculator {
    pub classifier: VehicleClassifier,
    pub tailpipe: TailpipeModel,
    pub weight_based: WeightBasedModel,
    pub estimator: WeightEstimator,
}

impl From<&CalculatorConfig> for EmissionCalculator {
    fn from(config: &CalculatorConfig) -> Self {
        Self {
            classifier: VehicleClassifier::new(config.overrides.clone()),
            tailpipe: TailpipeModel::new(config.tailpipe_factors.clone()),
            weight_based: WeightBasedModel::new(config.tonne_km_factors.clone()),
            estimator: config.consignment.clone(),
        }
    }
}

impl EmissionCalculator {
    pub fn classify(&self, registration: &str, registry: &VehicleRegistry) -> Classification {
        self.classifier.classify(registration, registry)
    }

    /// Tailpipe result for a single trip
    pub fn trip_result(&self, trip: &TripRecord, registry: &VehicleRegistry) -> TripEmissionResult {
        let vehicle = self.classify(&trip.registration, registry);
        let emission = self.tailpipe.compute(vehicle.class, trip.running_distance);
        TripEmissionResult::new(trip, &vehicle, emission)
    }

    /// Tailpipe results, one per trip id (first occurrence), in source order.
    pub fn trip_results(
        &self,
        trips: &[TripRecord],
        registry: &VehicleRegistry,
    ) -> Vec<TripEmissionResult> {
        let unique = unique_trips(trips);
        unique
            .par_iter()
            .map(|trip| self.trip_result(trip, registry))
            .collect()
    }

    /// Weight-based result for a single trip, with the tailpipe CO2e of the
    /// same trip as reference.
    pub fn consignment_result(
        &self,
        trip: &TripRecord,
        registry: &VehicleRegistry,
    ) -> ConsignmentTripResult {
        let vehicle = self.classify(&trip.registration, registry);
        let estimate = self.estimator.estimate(trip.consignment.as_deref());
        let unladen = self.classifier.unladen_mass(&trip.registration, registry);
        let emission = self.weight_based.compute(
            vehicle.class,
            trip.running_distance,
            unladen,
            Some(estimate.mass()),
        );
        let reference = self
            .tailpipe
            .compute(vehicle.class, trip.running_distance)
            .map(|e| e.masses.co2e_kg);

        ConsignmentTripResult {
            trip_id: trip.trip_id.clone(),
            registration: trip.registration.clone(),
            consignor: trip.consignor.clone(),
            consignment: trip.consignment.clone(),
            distance_km: trip
                .running_distance
                .map_or(0.0, |d| d.get::<si::kilometer>()),
            consignment_weight_kg: estimate.weight_kg,
            unladen_weight_kg: unladen.map_or(0.0, |m| m.get::<si::kilogram>()),
            total_weight_tonnes: emission.total_weight_tonnes(),
            emission_factor: emission.factor.unwrap_or(0.0),
            carbon_emissions_kg: emission.co2e_kg,
            reference_co2e_kg: reference,
            factor_resolved: emission.is_available(),
        }
    }

    /// Weight-based results, one per trip id (first occurrence), in source order.
    pub fn consignment_results(
        &self,
        trips: &[TripRecord],
        registry: &VehicleRegistry,
    ) -> Vec<ConsignmentTripResult> {
        let unique = unique_trips(trips);
        unique
            .par_iter()
            .map(|trip| self.consignment_result(trip, registry))
            .collect()
    }
}

#[cfg(feature = "pyo3")]
#[pymethods]
impl EmissionCalculator {
    #[new]
    #[pyo3(signature = (config=None))]
    fn __new__(config: Option<CalculatorConfig>) -> Self {
        config.as_ref().map(Self::from).unwrap_or_default()
    }

    #[pyo3(name = "classify")]
    fn classify_py(&self, registration: &str, registry: PyRef<VehicleRegistry>) -> Classification {
        self.classify(registration, &registry)
    }

    #[pyo3(name = "trip_results")]
    fn trip_results_py(
        &self,
        trips: Vec<TripRecord>,
        registry: PyRef<VehicleRegistry>,
    ) -> Vec<TripEmissionResult> {
        self.trip_results(&trips, &registry)
    }

    #[pyo3(name = "consignment_results")]
    fn consignment_results_py(
        &self,
        trips: Vec<TripRecord>,
        registry: PyRef<VehicleRegistry>,
    ) -> Vec<ConsignmentTripResult> {
        self.consignment_results(&trips, &registry)
    }
}

fn unique_trips(trips: &[TripRecord]) -> Vec<&TripRecord> {
    let unique = dedup_first(trips.iter().map(TripRef));
    #[cfg(feature = "logging")]
    if unique.len() < trips.len() {
        log::info!(
            "Dropped {} trip rows with duplicate trip ids",
            trips.len() - unique.len()
        );
    }
    unique.into_iter().map(|t| t.0).collect()
}

struct TripRef<'a>(&'a TripRecord);

impl KeyedRecord for TripRef<'_> {
    fn key(&self) -> &str {
        &self.0.trip_id
    }
}
