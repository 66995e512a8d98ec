use crate::imports::*;
use crate::vehicle::VehicleClass;

/// Real-world uplift applied once to laboratory tailpipe factors.
pub const UPLIFT: f64 = 1.10;
/// AR5 100-year global warming potential of methane
pub const GWP_CH4: f64 = 28.0;
/// AR5 100-year global warming potential of nitrous oxide
pub const GWP_N2O: f64 = 265.0;

/// `round(x * 1.10, 6)`
pub fn uplift(base: f64) -> f64 {
    (base * UPLIFT).round_to(6)
}

/// Per-km tailpipe emission rates of one vehicle class, kg/km.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasFactors {
    pub co2: f64,
    pub ch4: f64,
    pub n2o: f64,
}

impl GasFactors {
    pub fn new(co2: f64, ch4: f64, n2o: f64) -> Self {
        Self { co2, ch4, n2o }
    }

    /// Factors with [uplift] applied to each gas
    pub fn uplifted(&self) -> Self {
        Self {
            co2: uplift(self.co2),
            ch4: uplift(self.ch4),
            n2o: uplift(self.n2o),
        }
    }

    fn all_non_negative(&self) -> bool {
        [self.co2, self.ch4, self.n2o]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Base (pre-uplift) tailpipe factors per class for diesel trucks, WRI India.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmissionFactorTable(pub BTreeMap<VehicleClass, GasFactors>);

impl Default for EmissionFactorTable {
    fn default() -> Self {
        Self(BTreeMap::from([
            (VehicleClass::Lgv, GasFactors::new(0.305, 0.00002, 0.00002)),
            (VehicleClass::Mgv, GasFactors::new(0.59, 0.00003, 0.00003)),
            (VehicleClass::Hgv, GasFactors::new(0.73, 0.00004, 0.00004)),
        ]))
    }
}

impl EmissionFactorTable {
    pub fn base(&self, class: VehicleClass) -> Option<&GasFactors> {
        self.0.get(&class)
    }

    pub fn uplifted(&self, class: VehicleClass) -> Option<GasFactors> {
        self.base(class).map(GasFactors::uplifted)
    }
}

/// Vehicle categories of the WRI India tonne-km factor table, which names the
/// light class LCV rather than LGV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WriCategory {
    #[serde(rename = "LCV")]
    Lcv,
    #[serde(rename = "MGV")]
    Mgv,
    #[serde(rename = "HGV")]
    Hgv,
}

impl From<VehicleClass> for WriCategory {
    fn from(class: VehicleClass) -> Self {
        match class {
            VehicleClass::Lgv => Self::Lcv,
            VehicleClass::Mgv => Self::Mgv,
            VehicleClass::Hgv => Self::Hgv,
        }
    }
}

/// Mass-normalized factors in gCO2e per tonne-km (WRI India 2015).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TonneKmFactorTable(pub BTreeMap<WriCategory, f64>);

impl Default for TonneKmFactorTable {
    fn default() -> Self {
        Self(BTreeMap::from([
            (WriCategory::Hgv, 133.53),
            (WriCategory::Mgv, 168.32),
            (WriCategory::Lcv, 308.23),
        ]))
    }
}

impl TonneKmFactorTable {
    /// gCO2e per tonne-km for `class`, after the LGV -> LCV remap
    pub fn get(&self, class: VehicleClass) -> Option<f64> {
        self.0.get(&WriCategory::from(class)).copied()
    }
}

/// Fleet benchmark CO2 factors per class, kg/km (WRI with GLEC uplift).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BenchmarkTable(pub BTreeMap<VehicleClass, f64>);

impl Default for BenchmarkTable {
    fn default() -> Self {
        Self(BTreeMap::from([
            (VehicleClass::Hgv, 0.81),
            (VehicleClass::Mgv, 0.65),
            (VehicleClass::Lgv, 0.34),
        ]))
    }
}

impl BenchmarkTable {
    pub fn get(&self, class: VehicleClass) -> Option<f64> {
        self.0.get(&class).copied()
    }
}

#[duplicate_item(
    Table                  validation;
    [EmissionFactorTable]  [self.0.values().all(GasFactors::all_non_negative)];
    [TonneKmFactorTable]   [self.0.values().all(|v| v.is_finite() && *v >= 0.0)];
    [BenchmarkTable]       [self.0.values().all(|v| v.is_finite() && *v >= 0.0)]
)]
impl SerdeAPI for Table {
    fn init(&mut self) -> anyhow::Result<()> {
        ensure!(
            validation,
            Error::InitError(format!(
                "{}\n`{}` factors must be finite and non-negative",
                format_dbg!(),
                stringify!(Table)
            ))
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uplift_single_application() {
        assert_eq!(uplift(0.73), 0.803);
        assert_eq!(uplift(0.00004), 0.000044);
        assert_eq!(uplift(0.305), 0.3355);
        assert_eq!(uplift(0.0), 0.0);
        // 0.0000001 * 1.1 rounds away at 6 places
        assert_eq!(uplift(0.000_000_1), 0.0);
    }

    #[test]
    fn test_uplifted_table() {
        let hgv = EmissionFactorTable::default()
            .uplifted(VehicleClass::Hgv)
            .unwrap();
        assert_eq!(hgv, GasFactors::new(0.803, 0.000044, 0.000044));
    }

    #[test]
    fn test_lgv_maps_to_lcv() {
        let wri = TonneKmFactorTable::default();
        assert_eq!(wri.get(VehicleClass::Lgv), Some(308.23));
        assert_eq!(wri.get(VehicleClass::Hgv), Some(133.53));
    }

    #[test]
    fn test_negative_factor_rejected() {
        let mut table = EmissionFactorTable::default();
        table
            .0
            .insert(VehicleClass::Mgv, GasFactors::new(-0.1, 0.0, 0.0));
        assert!(table.init().is_err());

        let mut bench = BenchmarkTable::default();
        assert!(bench.init().is_ok());
        bench.0.insert(VehicleClass::Lgv, f64::NAN);
        assert!(bench.init().is_err());
    }
}
