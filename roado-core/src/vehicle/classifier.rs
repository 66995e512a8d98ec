use super::{VehicleClass, VehicleRegistry};
use crate::imports::*;

/// Fixed class and fuel forced for a registration, regardless of what the
/// vehicle table says about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleOverride {
    pub class: VehicleClass,
    pub fuel: String,
}

/// Registration -> forced (class, fuel).  Checked before any table lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideTable(pub BTreeMap<String, VehicleOverride>);

impl Default for OverrideTable {
    /// Two vehicles whose registry entries are known to be wrong or absent.
    fn default() -> Self {
        Self(BTreeMap::from([
            (
                "RJ06FC0709".to_string(),
                VehicleOverride {
                    class: VehicleClass::Hgv,
                    fuel: "DIESEL".into(),
                },
            ),
            (
                "MH03ES1467".to_string(),
                VehicleOverride {
                    class: VehicleClass::Mgv,
                    fuel: "DIESEL".into(),
                },
            ),
        ]))
    }
}

impl SerdeAPI for OverrideTable {
    fn init(&mut self) -> anyhow::Result<()> {
        ensure!(
            self.0.keys().all(|reg| !reg.trim().is_empty()),
            Error::InitError(format!("{}\nOverride registrations must not be blank", format_dbg!()))
        );
        Ok(())
    }
}

impl OverrideTable {
    pub fn get(&self, registration: &str) -> Option<&VehicleOverride> {
        self.0.get(registration)
    }
}

/// How a [Classification] was reached.
#[cfg_attr(feature = "pyo3", pyclass)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassSource {
    /// Forced by the [OverrideTable]
    Override,
    /// Registry row found and its category matched a class
    Registry,
    /// Registry row found but its category matched no class
    UnmatchedCategory,
    /// Registration absent from the registry
    NotFound,
}

/// Outcome of resolving a registration.
#[cfg_attr(feature = "pyo3", pyclass(get_all))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Resolved class, `None` when unknown
    pub class: Option<VehicleClass>,
    /// Display vehicle type: the raw registry category, or the override's
    /// class code.  Empty when the registration was not found.
    pub vehicle_type: String,
    /// Fuel description, empty when unknown
    pub fuel: String,
    pub source: ClassSource,
}

impl Classification {
    fn not_found() -> Self {
        Self {
            class: None,
            vehicle_type: String::new(),
            fuel: String::new(),
            source: ClassSource::NotFound,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.class.is_some()
    }
}

/// Resolves registrations to [VehicleClass] and fuel.
///
/// Resolution order:
/// 1. exact match in the override table,
/// 2. exact, case-sensitive lookup in the [VehicleRegistry],
/// 3. substring match of the registry category against LGV, MGV, HGV.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleClassifier {
    pub overrides: OverrideTable,
}

impl VehicleClassifier {
    pub fn new(overrides: OverrideTable) -> Self {
        Self { overrides }
    }

    pub fn classify(&self, registration: &str, registry: &VehicleRegistry) -> Classification {
        if let Some(forced) = self.overrides.get(registration) {
            #[cfg(feature = "logging")]
            log::debug!("Override applied for {registration:?}: {}", forced.class);
            return Classification {
                class: Some(forced.class),
                vehicle_type: forced.class.code().to_string(),
                fuel: forced.fuel.clone(),
                source: ClassSource::Override,
            };
        }

        let Some(record) = registry.get(registration) else {
            #[cfg(feature = "logging")]
            log::warn!("Registration {registration:?} not found in vehicle table");
            return Classification::not_found();
        };

        let class = VehicleClass::from_category(&record.category);
        #[cfg(feature = "logging")]
        if class.is_none() {
            log::warn!(
                "Category {:?} of {registration:?} matches no goods-vehicle class",
                record.category
            );
        }
        Classification {
            class,
            vehicle_type: record.category.clone(),
            fuel: record.fuel.clone(),
            source: if class.is_some() {
                ClassSource::Registry
            } else {
                ClassSource::UnmatchedCategory
            },
        }
    }

    /// Unladen mass of `registration` from the registry.  Overrides carry no
    /// mass, so they fall through to the registry row if one exists.
    pub fn unladen_mass(&self, registration: &str, registry: &VehicleRegistry) -> Option<si::Mass> {
        registry.get(registration).and_then(|r| r.unladen_mass)
    }
}
