//! Per-vehicle, fleet and consignor rollups of per-trip results.

use crate::calculator::{ConsignmentTripResult, TripEmissionResult};
use crate::config::{CalculatorConfig, RegistrationAliases};
use crate::emissions::BenchmarkTable;
use crate::imports::*;
use crate::trip::dedup_first;
use crate::utils::{checked_ratio, mean_present, sum_present};
use crate::vehicle::VehicleClass;

/// Rollup of one vehicle's trips.
#[cfg_attr(feature = "pyo3", pyclass(get_all))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSummary {
    #[serde(rename = "Vehicle No.")]
    pub registration: String,
    #[serde(rename = "Type")]
    pub vehicle_type: String,
    #[serde(rename = "Fuel")]
    pub fuel_type: String,
    #[serde(rename = "Trips")]
    pub trips: usize,
    /// Sum of running distances that are present
    #[serde(rename = "Total Distance (km)")]
    pub total_distance_km: f64,
    #[serde(rename = "Total CO2e (kg)")]
    pub total_co2e_kg: f64,
    #[serde(rename = "Avg CO2e/trip (kg)")]
    pub avg_co2e_per_trip_kg: Option<f64>,
    #[serde(rename = "Avg Route Efficiency")]
    pub avg_route_efficiency: Option<f64>,
    #[serde(rename = "Avg EF_CO2 (kg/km)")]
    pub avg_ef_co2_kg_per_km: Option<f64>,
    #[serde(rename = "Benchmark EF_CO2 (kg/km)")]
    pub benchmark_ef_co2_kg_per_km: Option<f64>,
    /// `100 * avg EF_CO2 / benchmark`, undefined without a non-zero benchmark
    #[serde(rename = "Performance vs Benchmark (%)")]
    pub performance_vs_benchmark_pct: Option<f64>,
    #[serde(skip)]
    pub class: Option<VehicleClass>,
}

/// Rollup of every trip in a result set.
#[cfg_attr(feature = "pyo3", pyclass(get_all))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSummary {
    pub trips: usize,
    pub total_distance_km: f64,
    pub total_co2e_kg: f64,
    /// Mean over trips with a CO2e value
    pub avg_co2e_per_trip_kg: Option<f64>,
    /// Total CO2e over total running distance
    pub avg_co2e_per_km: Option<f64>,
}

/// Weight-based CO2e of one consignor's trips, summed per (display) vehicle.
#[cfg_attr(feature = "pyo3", pyclass(get_all))]
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsignorSummary {
    pub consignor: Option<String>,
    pub trips: Vec<ConsignmentTripResult>,
    /// Display registration -> carbon emissions, kg
    pub co2e_by_vehicle_kg: BTreeMap<String, f64>,
}

/// Folds per-trip results into summaries.  Trip ids are deduplicated (first
/// occurrence kept) before anything is counted.
#[cfg_attr(feature = "pyo3", pyclass)]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TripAggregator {
    pub benchmarks: BenchmarkTable,
    pub aliases: RegistrationAliases,
}

impl From<&CalculatorConfig> for TripAggregator {
    fn from(config: &CalculatorConfig) -> Self {
        Self {
            benchmarks: config.benchmarks.clone(),
            aliases: config.registration_aliases.clone(),
        }
    }
}

impl TripAggregator {
    /// One summary per registration, sorted by registration.
    pub fn vehicle_summaries(&self, results: &[TripEmissionResult]) -> Vec<VehicleSummary> {
        let results = dedup_first(results.iter().cloned());
        let mut groups: BTreeMap<&str, Vec<&TripEmissionResult>> = BTreeMap::new();
        for r in &results {
            groups.entry(r.registration.as_str()).or_default().push(r);
        }
        groups
            .into_iter()
            .map(|(registration, rows)| self.summarize_vehicle(registration, &rows))
            .collect()
    }

    fn summarize_vehicle(&self, registration: &str, rows: &[&TripEmissionResult]) -> VehicleSummary {
        // type, fuel and class agree across a vehicle's rows; take the first
        let first = rows[0];
        let avg_ef_co2 = mean_present(rows.iter().map(|r| r.ef_co2_kg_per_km));
        let benchmark = first.class.and_then(|c| self.benchmarks.get(c));
        VehicleSummary {
            registration: registration.to_string(),
            vehicle_type: first.vehicle_type.clone(),
            fuel_type: first.fuel_type.clone(),
            trips: rows.len(),
            total_distance_km: sum_present(rows.iter().map(|r| r.running_distance_km)),
            total_co2e_kg: sum_present(rows.iter().map(|r| r.co2e_kg)),
            avg_co2e_per_trip_kg: mean_present(rows.iter().map(|r| r.co2e_kg)),
            avg_route_efficiency: mean_present(rows.iter().map(|r| r.route_efficiency)),
            avg_ef_co2_kg_per_km: avg_ef_co2,
            benchmark_ef_co2_kg_per_km: benchmark,
            performance_vs_benchmark_pct: checked_ratio(avg_ef_co2, benchmark).map(|r| 100.0 * r),
            class: first.class,
        }
    }

    /// Vehicle summaries ordered by average CO2 factor, highest first.
    /// Vehicles without a factor go last.
    pub fn ranked_by_factor(&self, results: &[TripEmissionResult]) -> Vec<VehicleSummary> {
        let mut summaries = self.vehicle_summaries(results);
        summaries.sort_by(|a, b| {
            match (a.avg_ef_co2_kg_per_km, b.avg_ef_co2_kg_per_km) {
                (Some(x), Some(y)) => y.total_cmp(&x),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
        });
        summaries
    }

    pub fn fleet_summary(&self, results: &[TripEmissionResult]) -> FleetSummary {
        let results = dedup_first(results.iter().cloned());
        let total_distance_km = sum_present(results.iter().map(|r| r.running_distance_km));
        let total_co2e_kg = sum_present(results.iter().map(|r| r.co2e_kg));
        FleetSummary {
            trips: results.len(),
            total_distance_km,
            total_co2e_kg,
            avg_co2e_per_trip_kg: mean_present(results.iter().map(|r| r.co2e_kg)),
            avg_co2e_per_km: checked_ratio(Some(total_co2e_kg), Some(total_distance_km)),
        }
    }

    /// Rows of `consignor` and their weight-based CO2e per vehicle.  An empty
    /// or unknown consignor gives an empty summary.
    pub fn consignor_summary(
        &self,
        results: &[ConsignmentTripResult],
        consignor: Option<&str>,
    ) -> ConsignorSummary {
        let Some(consignor) = consignor.filter(|c| !c.trim().is_empty()) else {
            return ConsignorSummary::default();
        };
        let trips: Vec<ConsignmentTripResult> = dedup_first(
            results
                .iter()
                .filter(|r| r.consignor.as_deref() == Some(consignor))
                .cloned(),
        );
        let mut co2e_by_vehicle_kg = BTreeMap::new();
        for r in &trips {
            *co2e_by_vehicle_kg
                .entry(self.aliases.display(&r.registration).to_string())
                .or_insert(0.0) += r.carbon_emissions_kg;
        }
        ConsignorSummary {
            consignor: Some(consignor.to_string()),
            trips,
            co2e_by_vehicle_kg,
        }
    }
}

#[cfg(feature = "pyo3")]
#[pymethods]
impl TripAggregator {
    #[new]
    #[pyo3(signature = (config=None))]
    fn __new__(config: Option<CalculatorConfig>) -> Self {
        config.as_ref().map(Self::from).unwrap_or_default()
    }

    #[pyo3(name = "vehicle_summaries")]
    fn vehicle_summaries_py(&self, results: Vec<TripEmissionResult>) -> Vec<VehicleSummary> {
        self.vehicle_summaries(&results)
    }

    #[pyo3(name = "ranked_by_factor")]
    fn ranked_by_factor_py(&self, results: Vec<TripEmissionResult>) -> Vec<VehicleSummary> {
        self.ranked_by_factor(&results)
    }

    #[pyo3(name = "fleet_summary")]
    fn fleet_summary_py(&self, results: Vec<TripEmissionResult>) -> FleetSummary {
        self.fleet_summary(&results)
    }

    #[pyo3(name = "consignor_summary", signature = (results, consignor=None))]
    fn consignor_summary_py(
        &self,
        results: Vec<ConsignmentTripResult>,
        consignor: Option<&str>,
    ) -> ConsignorSummary {
        self.consignor_summary(&results, consignor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(trip_id: &str, reg: &str, class: Option<VehicleClass>, km: Option<f64>) -> TripEmissionResult {
        let ef = class.map(|c| match c {
            VehicleClass::Lgv => 0.3355,
            VehicleClass::Mgv => 0.649,
            VehicleClass::Hgv => 0.803,
        });
        let co2e = ef.zip(km).map(|(ef, km)| ef * km);
        TripEmissionResult {
            trip_id: trip_id.into(),
            registration: reg.into(),
            vehicle_type: class.map(|c| c.to_string()).unwrap_or_default(),
            fuel_type: "DIESEL".into(),
            running_distance_km: km,
            total_distance_km: km.map(|k| k * 1.25),
            route_efficiency: km.map(|_| 0.8),
            ef_co2_kg_per_km: ef.filter(|_| km.is_some()),
            ef_ch4_kg_per_km: None,
            ef_n2o_kg_per_km: None,
            co2_kg: co2e,
            ch4_kg: None,
            n2o_kg: None,
            co2e_kg: co2e,
            class,
        }
    }

    fn sample() -> Vec<TripEmissionResult> {
        vec![
            result("A", "HGV-1", Some(VehicleClass::Hgv), Some(100.0)),
            result("B", "LGV-1", Some(VehicleClass::Lgv), Some(40.0)),
            result("C", "HGV-1", Some(VehicleClass::Hgv), Some(50.0)),
            result("D", "LGV-1", Some(VehicleClass::Lgv), None),
            result("E", "UNK-1", None, Some(30.0)),
            // duplicate id, dropped
            result("A", "HGV-1", Some(VehicleClass::Hgv), Some(1_000.0)),
        ]
    }

    #[test]
    fn test_vehicle_summaries() {
        let summaries = TripAggregator::default().vehicle_summaries(&sample());
        let regs: Vec<&str> = summaries.iter().map(|s| s.registration.as_str()).collect();
        assert_eq!(regs, vec!["HGV-1", "LGV-1", "UNK-1"]);

        let hgv = &summaries[0];
        assert_eq!(hgv.trips, 2);
        assert!(almost_eq(hgv.total_distance_km, 150.0, None));
        assert!(almost_eq(hgv.total_co2e_kg, 120.45, None));
        assert!(almost_eq(hgv.avg_co2e_per_trip_kg.unwrap(), 60.225, None));
        assert_eq!(hgv.benchmark_ef_co2_kg_per_km, Some(0.81));
        assert!(almost_eq(
            hgv.performance_vs_benchmark_pct.unwrap(),
            100.0 * 0.803 / 0.81,
            None
        ));

        let lgv = &summaries[1];
        assert_eq!(lgv.trips, 2);
        assert!(almost_eq(lgv.total_distance_km, 40.0, None));
        // trip D has no CO2e and is skipped by the mean
        assert!(almost_eq(lgv.avg_co2e_per_trip_kg.unwrap(), 13.42, None));

        let unknown = &summaries[2];
        assert_eq!(unknown.total_co2e_kg, 0.0);
        assert_eq!(unknown.avg_co2e_per_trip_kg, None);
        assert_eq!(unknown.benchmark_ef_co2_kg_per_km, None);
        assert_eq!(unknown.performance_vs_benchmark_pct, None);
    }

    #[test]
    fn test_zero_benchmark_leaves_ratio_undefined() {
        let mut agg = TripAggregator::default();
        agg.benchmarks.0.insert(VehicleClass::Hgv, 0.0);
        let summaries = agg.vehicle_summaries(&sample());
        assert_eq!(summaries[0].performance_vs_benchmark_pct, None);
    }

    #[test]
    fn test_ranked_by_factor() {
        let ranked = TripAggregator::default().ranked_by_factor(&sample());
        let regs: Vec<&str> = ranked.iter().map(|s| s.registration.as_str()).collect();
        assert_eq!(regs, vec!["HGV-1", "LGV-1", "UNK-1"]);
    }

    #[test]
    fn test_fleet_summary() {
        let fleet = TripAggregator::default().fleet_summary(&sample());
        assert_eq!(fleet.trips, 5);
        assert!(almost_eq(fleet.total_distance_km, 220.0, None));
        assert!(almost_eq(fleet.total_co2e_kg, 133.87, None));
        assert!(almost_eq(fleet.avg_co2e_per_trip_kg.unwrap(), 133.87 / 3.0, None));
        assert!(almost_eq(fleet.avg_co2e_per_km.unwrap(), 133.87 / 220.0, None));

        let empty = TripAggregator::default().fleet_summary(&[]);
        assert_eq!(empty.trips, 0);
        assert_eq!(empty.avg_co2e_per_trip_kg, None);
        assert_eq!(empty.avg_co2e_per_km, None);
    }

    fn consignment(trip_id: &str, reg: &str, consignor: Option<&str>, co2e: f64) -> ConsignmentTripResult {
        ConsignmentTripResult {
            trip_id: trip_id.into(),
            registration: reg.into(),
            consignor: consignor.map(Into::into),
            consignment: None,
            distance_km: 0.0,
            consignment_weight_kg: 0,
            unladen_weight_kg: 0.0,
            total_weight_tonnes: 0.0,
            emission_factor: 133.53,
            carbon_emissions_kg: co2e,
            reference_co2e_kg: None,
            factor_resolved: true,
        }
    }

    #[test]
    fn test_consignor_summary_applies_aliases() {
        let rows = vec![
            consignment("1", "RJ06FC0709", Some("GREENKO"), 10.0),
            consignment("2", "RJ06GC0709", Some("GREENKO"), 5.0),
            consignment("3", "KA01AB1234", Some("GREENKO"), 2.5),
            consignment("4", "KA01AB1234", Some("PRL"), 100.0),
            consignment("5", "KA01AB1234", None, 100.0),
        ];
        let agg = TripAggregator::default();
        let summary = agg.consignor_summary(&rows, Some("GREENKO"));
        assert_eq!(summary.trips.len(), 3);
        assert_eq!(
            summary.co2e_by_vehicle_kg,
            BTreeMap::from([
                ("KA01AB1234".to_string(), 2.5),
                ("RJ06FC0709".to_string(), 15.0),
            ])
        );

        assert_eq!(agg.consignor_summary(&rows, None), ConsignorSummary::default());
        assert_eq!(agg.consignor_summary(&rows, Some("")), ConsignorSummary::default());
        let unknown = agg.consignor_summary(&rows, Some("NOBODY"));
        assert!(unknown.trips.is_empty());
        assert!(unknown.co2e_by_vehicle_kg.is_empty());
    }
}
