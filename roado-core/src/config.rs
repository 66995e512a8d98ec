//! Every lookup table the calculation needs, loadable from YAML/JSON/bincode.

use crate::consignment::WeightEstimator;
use crate::emissions::{BenchmarkTable, EmissionFactorTable, TonneKmFactorTable};
use crate::imports::*;
use crate::vehicle::OverrideTable;

/// Registration -> registration shown in vehicle groupings.  Used for plates
/// that were logged under a mistyped number.  Never affects classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationAliases(pub BTreeMap<String, String>);

impl Default for RegistrationAliases {
    fn default() -> Self {
        Self(BTreeMap::from([(
            "RJ06GC0709".to_string(),
            "RJ06FC0709".to_string(),
        )]))
    }
}

impl RegistrationAliases {
    pub fn display<'a>(&'a self, registration: &'a str) -> &'a str {
        self.0
            .get(registration)
            .map(String::as_str)
            .unwrap_or(registration)
    }
}

/// Calculation configuration.  [Default] holds the surveyed reference
/// tables; the uplift and GWP constants are fixed and not part of it.
#[cfg_attr(feature = "pyo3", pyclass)]
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Registrations forced to a class and fuel
    pub overrides: OverrideTable,
    /// Per-km tailpipe factors before uplift, kg/km
    pub tailpipe_factors: EmissionFactorTable,
    /// WRI gCO2e per tonne-km factors
    pub tonne_km_factors: TonneKmFactorTable,
    /// Benchmark CO2 factors, kg/km
    pub benchmarks: BenchmarkTable,
    /// Consignment keyword weights
    pub consignment: WeightEstimator,
    pub registration_aliases: RegistrationAliases,
}

impl SerdeAPI for CalculatorConfig {
    fn init(&mut self) -> anyhow::Result<()> {
        self.overrides.init().with_context(|| format_dbg!())?;
        self.tailpipe_factors.init().with_context(|| format_dbg!())?;
        self.tonne_km_factors.init().with_context(|| format_dbg!())?;
        self.benchmarks.init().with_context(|| format_dbg!())?;
        self.consignment.init().with_context(|| format_dbg!())?;
        #[cfg(feature = "logging")]
        log::info!(
            "Calculator config ready: {} overrides, {} consignment keywords",
            self.overrides.0.len(),
            self.consignment.keywords.len()
        );
        Ok(())
    }
}

#[cfg(feature = "pyo3")]
#[pymethods]
impl CalculatorConfig {
    #[new]
    fn __new__() -> Self {
        Self::default()
    }

    #[staticmethod]
    #[pyo3(name = "from_file")]
    fn from_file_py(filepath: PathBuf) -> anyhow::Result<Self> {
        Self::from_file(filepath, false)
    }

    #[pyo3(name = "to_file")]
    fn to_file_py(&self, filepath: PathBuf) -> anyhow::Result<()> {
        self.to_file(filepath)
    }

    #[pyo3(name = "to_yaml")]
    fn to_yaml_py(&self) -> anyhow::Result<String> {
        self.to_yaml()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::VehicleClass;

    #[test]
    fn test_yaml_round_trip_keeps_reference_tables() {
        let config = CalculatorConfig::default();
        let yaml = config.to_yaml().unwrap();
        let parsed = CalculatorConfig::from_yaml(&yaml, false).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let yaml = "overrides:\n  KA01ZZ0001:\n    class: LGV\n    fuel: CNG\n";
        let config = CalculatorConfig::from_yaml(yaml, false).unwrap();
        assert_eq!(config.overrides.0.len(), 1);
        assert_eq!(
            config.overrides.get("KA01ZZ0001").unwrap().class,
            VehicleClass::Lgv
        );
        assert_eq!(config.tailpipe_factors, EmissionFactorTable::default());
        assert_eq!(config.consignment, WeightEstimator::default());
    }

    #[test]
    fn test_invalid_config_rejected_on_init() {
        let yaml = "benchmarks:\n  HGV: -1.0\n";
        assert!(CalculatorConfig::from_yaml(yaml, false).is_err());
        // skipping init leaves validation to the caller
        assert!(CalculatorConfig::from_yaml(yaml, true).is_ok());
    }

    #[test]
    fn test_file_formats() {
        let dir = tempfile::tempdir().unwrap();
        let config = CalculatorConfig::default();
        for name in ["config.yaml", "config.json", "config.bin"] {
            let path = dir.path().join(name);
            config.to_file(&path).unwrap();
            assert_eq!(CalculatorConfig::from_file(&path, false).unwrap(), config);
        }
        assert!(config.to_file(dir.path().join("config.toml")).is_err());
    }

    #[test]
    fn test_skip_init_on_every_file_format() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CalculatorConfig::default();
        config.benchmarks.0.insert(VehicleClass::Hgv, -1.0);
        for name in ["bad.yaml", "bad.json", "bad.bin"] {
            let path = dir.path().join(name);
            config.to_file(&path).unwrap();
            let err = CalculatorConfig::from_file(&path, false).unwrap_err();
            assert!(format!("{err:?}").contains("non-negative"), "{name}");
            assert_eq!(CalculatorConfig::from_file(&path, true).unwrap(), config);
        }
    }

    #[test]
    fn test_aliases() {
        let aliases = RegistrationAliases::default();
        assert_eq!(aliases.display("RJ06GC0709"), "RJ06FC0709");
        assert_eq!(aliases.display("KA01AB1234"), "KA01AB1234");
    }
}
