//! Flat-table export of results: CSV files with the reference column
//! headers, and polars frames for the dashboards.

use polars::prelude::*;

use crate::aggregate::VehicleSummary;
use crate::calculator::{ConsignmentTripResult, EmissionCalculator, TripEmissionResult};
use crate::imports::*;
use crate::trip::import_trips;
use crate::vehicle::{import_vehicle_registry, VehicleClass};

/// Writes `rows` as CSV with a header row taken from their serde names.
/// Unavailable values become empty cells.
pub fn write_csv<T: Serialize, W: std::io::Write>(wtr: W, rows: &[T]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(wtr);
    for row in rows {
        writer.serialize(row).with_context(|| format_dbg!())?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_csv_file<T: Serialize, P: AsRef<Path>>(filepath: P, rows: &[T]) -> anyhow::Result<()> {
    let file = File::create(filepath.as_ref())
        .with_context(|| format!("Could not create {:?}", filepath.as_ref()))?;
    write_csv(file, rows)
}

/// Reads a previously exported tailpipe result table.  The class column is
/// not exported, so it is re-derived from the vehicle type.
pub fn read_trip_results<R: std::io::Read>(rdr: R) -> anyhow::Result<Vec<TripEmissionResult>> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut results = Vec::new();
    for (idx, row) in reader.deserialize().enumerate() {
        let mut result: TripEmissionResult =
            row.map_err(|err| Error::ImportError(format!("result row {}: {err}", idx + 1)))?;
        result.class = VehicleClass::from_category(&result.vehicle_type);
        results.push(result);
    }
    Ok(results)
}

/// Loads both input tables, computes the tailpipe result table and, when
/// `output` is given, writes it there as CSV.
pub fn run_report<P: AsRef<Path>>(
    calculator: &EmissionCalculator,
    trips: P,
    vehicles: P,
    output: Option<P>,
) -> anyhow::Result<Vec<TripEmissionResult>> {
    let trips = import_trips(trips).with_context(|| format_dbg!())?;
    let registry = import_vehicle_registry(vehicles).with_context(|| format_dbg!())?;
    let results = calculator.trip_results(&trips, &registry);
    #[cfg(feature = "logging")]
    log::info!(
        "Computed {} trip results, {} without CO2e",
        results.len(),
        results.iter().filter(|r| r.co2e_kg.is_none()).count()
    );
    if let Some(output) = output {
        to_csv_file(output, &results)?;
    }
    Ok(results)
}

pub fn trip_results_frame(results: &[TripEmissionResult]) -> anyhow::Result<DataFrame> {
    let opt = |f: fn(&TripEmissionResult) -> Option<f64>| -> Vec<Option<f64>> {
        results.iter().map(f).collect()
    };
    let df = df!(
        "Trip ID" => results.iter().map(|r| r.trip_id.as_str()).collect::<Vec<_>>(),
        "Vehicle No." => results.iter().map(|r| r.registration.as_str()).collect::<Vec<_>>(),
        "Vehicle Type" => results.iter().map(|r| r.vehicle_type.as_str()).collect::<Vec<_>>(),
        "Fuel Type" => results.iter().map(|r| r.fuel_type.as_str()).collect::<Vec<_>>(),
        "Running Distance (km)" => opt(|r| r.running_distance_km),
        "Total Distance (km)" => opt(|r| r.total_distance_km),
        "Route Efficiency (Running/Total)" => opt(|r| r.route_efficiency),
        "EF_CO2 (kg/km)" => opt(|r| r.ef_co2_kg_per_km),
        "EF_CH4 (kg/km)" => opt(|r| r.ef_ch4_kg_per_km),
        "EF_N2O (kg/km)" => opt(|r| r.ef_n2o_kg_per_km),
        "CO2 (kg)" => opt(|r| r.co2_kg),
        "CH4 (kg)" => opt(|r| r.ch4_kg),
        "N2O (kg)" => opt(|r| r.n2o_kg),
        "CO2e (kg)" => opt(|r| r.co2e_kg)
    )?;
    Ok(df)
}

pub fn consignment_results_frame(results: &[ConsignmentTripResult]) -> anyhow::Result<DataFrame> {
    let df = df!(
        "Trip ID" => results.iter().map(|r| r.trip_id.as_str()).collect::<Vec<_>>(),
        "Vehicle No." => results.iter().map(|r| r.registration.as_str()).collect::<Vec<_>>(),
        "Consignor" => results.iter().map(|r| r.consignor.as_deref()).collect::<Vec<_>>(),
        "Consignment" => results.iter().map(|r| r.consignment.as_deref()).collect::<Vec<_>>(),
        "Distance Covered (km)" => results.iter().map(|r| r.distance_km).collect::<Vec<_>>(),
        "Estimated Consignment Weight (kg)" => results.iter().map(|r| r.consignment_weight_kg).collect::<Vec<_>>(),
        "Total Weight (tonnes)" => results.iter().map(|r| r.total_weight_tonnes).collect::<Vec<_>>(),
        "Carbon Emissions (kg)" => results.iter().map(|r| r.carbon_emissions_kg).collect::<Vec<_>>(),
        "Reference CO2e (kg)" => results.iter().map(|r| r.reference_co2e_kg).collect::<Vec<_>>()
    )?;
    Ok(df)
}

pub fn vehicle_summaries_frame(summaries: &[VehicleSummary]) -> anyhow::Result<DataFrame> {
    let df = df!(
        "Vehicle No." => summaries.iter().map(|s| s.registration.as_str()).collect::<Vec<_>>(),
        "Type" => summaries.iter().map(|s| s.vehicle_type.as_str()).collect::<Vec<_>>(),
        "Fuel" => summaries.iter().map(|s| s.fuel_type.as_str()).collect::<Vec<_>>(),
        "Trips" => summaries.iter().map(|s| s.trips as u64).collect::<Vec<_>>(),
        "Total Distance (km)" => summaries.iter().map(|s| s.total_distance_km).collect::<Vec<_>>(),
        "Total CO2e (kg)" => summaries.iter().map(|s| s.total_co2e_kg).collect::<Vec<_>>(),
        "Avg CO2e/trip (kg)" => summaries.iter().map(|s| s.avg_co2e_per_trip_kg).collect::<Vec<_>>(),
        "Avg Route Efficiency" => summaries.iter().map(|s| s.avg_route_efficiency).collect::<Vec<_>>(),
        "Avg EF_CO2 (kg/km)" => summaries.iter().map(|s| s.avg_ef_co2_kg_per_km).collect::<Vec<_>>(),
        "Benchmark EF_CO2 (kg/km)" => summaries.iter().map(|s| s.benchmark_ef_co2_kg_per_km).collect::<Vec<_>>(),
        "Performance vs Benchmark (%)" => summaries.iter().map(|s| s.performance_vs_benchmark_pct).collect::<Vec<_>>()
    )?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::TripAggregator;

    fn results() -> Vec<TripEmissionResult> {
        let trips = import_trips(Path::new("./src/test_trips.csv")).unwrap();
        let registry =
            import_vehicle_registry(Path::new("./src/vehicle/test_vehicles.csv")).unwrap();
        EmissionCalculator::default().trip_results(&trips, &registry)
    }

    #[test]
    fn test_csv_columns_and_empty_cells() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &results()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Trip ID,Vehicle No.,Vehicle Type,Fuel Type,Running Distance (km),\
             Total Distance (km),Route Efficiency (Running/Total),EF_CO2 (kg/km),\
             EF_CH4 (kg/km),EF_N2O (kg/km),CO2 (kg),CH4 (kg),N2O (kg),CO2e (kg)"
        );
        // unknown vehicle: everything after the distances is empty
        let unknown = text.lines().find(|l| l.starts_with("T-005")).unwrap();
        assert_eq!(unknown, "T-005,ZZ99ZZ9999,,,50.0,0.0,,,,,,,,");
    }

    #[test]
    fn test_csv_file_reads_back_with_class() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("RESULTS.csv");
        let original = results();
        to_csv_file(&path, &original).unwrap();
        let read = read_trip_results(File::open(&path).unwrap()).unwrap();
        assert_eq!(read.len(), original.len());
        for (a, b) in read.iter().zip(original.iter()) {
            assert_eq!(a.trip_id, b.trip_id);
            assert_eq!(a.class, b.class);
            assert_eq!(a.co2e_kg.is_some(), b.co2e_kg.is_some());
        }
        // summaries built from the re-read table still see benchmarks
        let summaries = TripAggregator::default().vehicle_summaries(&read);
        let hgv = summaries
            .iter()
            .find(|s| s.registration == "RJ06FC0709")
            .unwrap();
        assert_eq!(hgv.benchmark_ef_co2_kg_per_km, Some(0.81));
    }

    #[test]
    fn test_run_report_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("RESULTS.csv");
        let results = run_report(
            &EmissionCalculator::default(),
            PathBuf::from("./src/test_trips.csv"),
            PathBuf::from("./src/vehicle/test_vehicles.csv"),
            Some(output.clone()),
        )
        .unwrap();
        let read = read_trip_results(File::open(&output).unwrap()).unwrap();
        assert_eq!(read.len(), results.len());
        assert!(run_report(
            &EmissionCalculator::default(),
            PathBuf::from("./src/no_such_trips.csv"),
            PathBuf::from("./src/vehicle/test_vehicles.csv"),
            None,
        )
        .is_err());
    }

    #[test]
    fn test_frames() {
        let results = results();
        let df = trip_results_frame(&results).unwrap();
        assert_eq!(df.shape(), (5, 14));
        assert_eq!(df.column("CO2e (kg)").unwrap().null_count(), 2);

        let summaries = TripAggregator::default().vehicle_summaries(&results);
        let df = vehicle_summaries_frame(&summaries).unwrap();
        assert_eq!(df.height(), summaries.len());
    }
}
