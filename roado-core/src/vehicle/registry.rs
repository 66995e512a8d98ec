use crate::imports::*;
use crate::utils::serde_lenient;

/// One row of the vehicle registration export (VAHAN dump).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRow {
    /// Registration number, the unique key of the table
    #[serde(rename = "regNo")]
    pub registration: String,
    /// Raw registration category, e.g. `"HGV(Heavy Goods Vehicle)"`
    #[serde(rename = "details.rc_vch_catg", default)]
    #[serde(deserialize_with = "serde_lenient::opt_text")]
    pub category: Option<String>,
    /// Fuel description as registered, e.g. `"DIESEL"`
    #[serde(rename = "details.rc_fuel_desc", default)]
    #[serde(deserialize_with = "serde_lenient::opt_text")]
    pub fuel: Option<String>,
    /// Unladen weight in kilograms
    #[serde(rename = "details.rc_unld_wt", default)]
    #[serde(deserialize_with = "serde_lenient::opt_non_negative")]
    pub unladen_weight_kg: Option<f64>,
}

/// Immutable reference record for a registered vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub registration: String,
    /// Raw category string, empty when the registry has none
    pub category: String,
    /// Fuel description, empty when the registry has none
    pub fuel: String,
    pub unladen_mass: Option<si::Mass>,
}

impl From<VehicleRow> for VehicleRecord {
    fn from(row: VehicleRow) -> Self {
        Self {
            registration: row.registration.trim().to_string(),
            category: row.category.unwrap_or_default(),
            fuel: row.fuel.unwrap_or_default(),
            unladen_mass: row.unladen_weight_kg.map(|kg| kg * uc::KG),
        }
    }
}

impl KeyedRecord for VehicleRecord {
    fn key(&self) -> &str {
        &self.registration
    }
}

/// Registration-keyed vehicle table.  Lookups are exact and case-sensitive;
/// when a registration appears more than once, the first row is kept.
#[cfg_attr(feature = "pyo3", pyclass)]
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRegistry {
    records: HashMap<String, VehicleRecord>,
}

impl VehicleRegistry {
    pub fn new<I: IntoIterator<Item = VehicleRecord>>(records: I) -> Self {
        let mut registry = Self::default();
        for record in records {
            registry.insert(record);
        }
        registry
    }

    /// Inserts `record` unless its registration is already present.
    /// Returns whether the record was inserted.
    pub fn insert(&mut self, record: VehicleRecord) -> bool {
        if self.records.contains_key(record.key()) {
            #[cfg(feature = "logging")]
            log::debug!(
                "Duplicate registration {:?} in vehicle table, keeping first row",
                record.registration
            );
            return false;
        }
        self.records.insert(record.registration.clone(), record);
        true
    }

    pub fn get(&self, registration: &str) -> Option<&VehicleRecord> {
        self.records.get(registration)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(feature = "pyo3")]
#[pymethods]
impl VehicleRegistry {
    #[staticmethod]
    #[pyo3(name = "from_csv")]
    fn from_csv_py(filepath: PathBuf) -> anyhow::Result<Self> {
        import_vehicle_registry(filepath)
    }

    fn __len__(&self) -> usize {
        self.len()
    }
}

pub fn import_vehicle_registry<P: AsRef<Path>>(filepath: P) -> anyhow::Result<VehicleRegistry> {
    let file_read = File::open(filepath.as_ref())
        .with_context(|| format!("Could not open vehicle table: {:?}", filepath.as_ref()))?;
    read_vehicle_registry(file_read)
}

pub fn read_vehicle_registry<R: std::io::Read>(rdr: R) -> anyhow::Result<VehicleRegistry> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut registry = VehicleRegistry::default();
    for (idx, result) in reader.deserialize().enumerate() {
        let row: VehicleRow = result.map_err(|err| {
            Error::ImportError(format!("vehicle table row {}: {err}", idx + 1))
        })?;
        if row.registration.trim().is_empty() {
            continue;
        }
        registry.insert(row.into());
    }
    #[cfg(feature = "logging")]
    log::info!("Loaded {} vehicle records", registry.len());
    Ok(registry)
}
