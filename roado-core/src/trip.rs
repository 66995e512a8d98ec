//! Trip log records.

use crate::imports::*;
use crate::utils::serde_lenient;

/// One row of the trip report export.  Numeric cells that cannot be read as
/// a non-negative number load as `None`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRow {
    #[serde(rename = "Assignment UID", alias = "Trip ID")]
    pub trip_id: String,
    #[serde(rename = "Current Vehicle No.", alias = "Vehicle No.")]
    pub registration: String,
    /// Running distance, km
    #[serde(rename = "Distance Covered", default)]
    #[serde(deserialize_with = "serde_lenient::opt_non_negative")]
    pub distance_covered_km: Option<f64>,
    /// Planned total distance, km
    #[serde(rename = "Total Distance", default)]
    #[serde(deserialize_with = "serde_lenient::opt_non_negative")]
    pub total_distance_km: Option<f64>,
    #[serde(rename = "Consignment", default)]
    #[serde(deserialize_with = "serde_lenient::opt_text")]
    pub consignment: Option<String>,
    #[serde(rename = "Consignor", default)]
    #[serde(deserialize_with = "serde_lenient::opt_text")]
    pub consignor: Option<String>,
}

/// Immutable trip input.
#[cfg_attr(feature = "pyo3", pyclass)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub trip_id: String,
    pub registration: String,
    pub running_distance: Option<si::Length>,
    pub total_distance: Option<si::Length>,
    /// Free-text consignment description
    pub consignment: Option<String>,
    pub consignor: Option<String>,
}

impl TripRecord {
    pub fn new<S: Into<String>>(
        trip_id: S,
        registration: S,
        running_distance: Option<si::Length>,
        total_distance: Option<si::Length>,
    ) -> Self {
        Self {
            trip_id: trip_id.into(),
            registration: registration.into(),
            running_distance,
            total_distance,
            consignment: None,
            consignor: None,
        }
    }

    pub fn with_consignment<S: Into<String>>(mut self, consignor: Option<S>, consignment: Option<S>) -> Self {
        self.consignor = consignor.map(Into::into);
        self.consignment = consignment.map(Into::into);
        self
    }
}

#[cfg(feature = "pyo3")]
#[pymethods]
impl TripRecord {
    #[new]
    #[pyo3(signature = (
        trip_id,
        registration,
        running_distance_km=None,
        total_distance_km=None,
        consignor=None,
        consignment=None,
    ))]
    fn __new__(
        trip_id: String,
        registration: String,
        running_distance_km: Option<f64>,
        total_distance_km: Option<f64>,
        consignor: Option<String>,
        consignment: Option<String>,
    ) -> Self {
        let km = |v: Option<f64>| {
            v.filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v * uc::KM)
        };
        Self::new(
            trip_id,
            registration,
            km(running_distance_km),
            km(total_distance_km),
        )
        .with_consignment(consignor, consignment)
    }

    #[getter]
    fn get_trip_id(&self) -> String {
        self.trip_id.clone()
    }

    #[getter]
    fn get_registration(&self) -> String {
        self.registration.clone()
    }

    #[getter]
    fn get_consignment(&self) -> Option<String> {
        self.consignment.clone()
    }

    #[getter]
    fn get_consignor(&self) -> Option<String> {
        self.consignor.clone()
    }

    #[getter]
    fn get_running_distance_km(&self) -> Option<f64> {
        self.running_distance.map(|d| d.get::<si::kilometer>())
    }

    #[getter]
    fn get_total_distance_km(&self) -> Option<f64> {
        self.total_distance.map(|d| d.get::<si::kilometer>())
    }

    fn __repr__(&self) -> String {
        format!("{self:?}")
    }
}

impl From<TripRow> for TripRecord {
    fn from(row: TripRow) -> Self {
        Self {
            trip_id: row.trip_id.trim().to_string(),
            registration: row.registration.trim().to_string(),
            running_distance: row.distance_covered_km.map(|km| km * uc::KM),
            total_distance: row.total_distance_km.map(|km| km * uc::KM),
            consignment: row.consignment,
            consignor: row.consignor,
        }
    }
}

impl KeyedRecord for TripRecord {
    fn key(&self) -> &str {
        &self.trip_id
    }
}

#[cfg(feature = "pyo3")]
#[cfg_attr(feature = "pyo3", pyfunction(name = "import_trips"))]
pub fn import_trips_py(filepath: PathBuf) -> anyhow::Result<Vec<TripRecord>> {
    import_trips(filepath)
}

pub fn import_trips<P: AsRef<Path>>(filepath: P) -> anyhow::Result<Vec<TripRecord>> {
    let file_read = File::open(filepath.as_ref())
        .with_context(|| format!("Could not open trip table: {:?}", filepath.as_ref()))?;
    read_trips(file_read)
}

pub fn read_trips<R: std::io::Read>(rdr: R) -> anyhow::Result<Vec<TripRecord>> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut trips = Vec::new();
    for (idx, result) in reader.deserialize().enumerate() {
        let row: TripRow = result
            .map_err(|err| Error::ImportError(format!("trip table row {}: {err}", idx + 1)))?;
        trips.push(TripRecord::from(row));
    }
    #[cfg(feature = "logging")]
    log::info!("Loaded {} trip rows", trips.len());
    Ok(trips)
}

/// Keeps the first row for each key, preserving source order.
pub fn dedup_first<T: KeyedRecord>(rows: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut kept = Vec::new();
    for row in rows {
        if seen.insert(row.key().to_string()) {
            kept.push(row);
        }
    }
    kept
}

#[cfg(feature = "pyo3")]
#[cfg_attr(feature = "pyo3", pyfunction(name = "consignors"))]
pub fn consignors_py(trips: Vec<TripRecord>) -> Vec<String> {
    consignors(&trips)
}

/// Distinct non-empty consignors in order of first appearance.
pub fn consignors(trips: &[TripRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    trips
        .iter()
        .filter_map(|t| t.consignor.as_deref())
        .filter(|c| seen.insert(c.to_string()))
        .map(str::to_string)
        .collect()
}
