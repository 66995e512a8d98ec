use super::factors::TonneKmFactorTable;
use crate::imports::*;
use crate::vehicle::VehicleClass;

/// Output of [WeightBasedModel::compute]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightBasedEmission {
    /// Unladen plus consignment mass
    pub total_mass: si::Mass,
    /// gCO2e per tonne-km, `None` when the class had no factor
    pub factor: Option<f64>,
    /// Zero when the factor is missing
    pub co2e_kg: f64,
}

impl WeightBasedEmission {
    pub fn total_weight_tonnes(&self) -> f64 {
        self.total_mass.get::<si::megagram>()
    }

    /// Whether a factor resolved for the vehicle, i.e. `co2e_kg` is a real
    /// estimate rather than the zero fallback.
    pub fn is_available(&self) -> bool {
        self.factor.is_some()
    }

    /// This model's CO2e when available, else `reference` (typically the
    /// tailpipe model's CO2e for the same trip).
    pub fn preferred_co2e(&self, reference: Option<f64>) -> Option<f64> {
        if self.is_available() {
            Some(self.co2e_kg)
        } else {
            reference
        }
    }
}

/// WRI mass-based methodology:
/// `CO2e [kg] = distance [km] * total weight [t] * factor [gCO2e/t-km] / 1000`.
///
/// Unlike [super::TailpipeModel], missing inputs count as zero here, so the
/// result is always a number.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightBasedModel {
    pub factors: TonneKmFactorTable,
}

impl WeightBasedModel {
    pub fn new(factors: TonneKmFactorTable) -> Self {
        Self { factors }
    }

    pub fn compute(
        &self,
        class: Option<VehicleClass>,
        distance: Option<si::Length>,
        unladen_mass: Option<si::Mass>,
        consignment_mass: Option<si::Mass>,
    ) -> WeightBasedEmission {
        let total_mass =
            unladen_mass.unwrap_or(si::Mass::ZERO) + consignment_mass.unwrap_or(si::Mass::ZERO);
        let km = distance.map_or(0.0, |d| d.get::<si::kilometer>());
        let factor = class.and_then(|c| self.factors.get(c));
        let tonnes = total_mass.get::<si::megagram>();
        WeightBasedEmission {
            total_mass,
            factor,
            co2e_kg: km * tonnes * factor.unwrap_or(0.0) / 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hgv_transformer_trip() {
        // 7,500 kg truck carrying 3 transformers for 200 km
        let em = WeightBasedModel::default().compute(
            Some(VehicleClass::Hgv),
            Some(200.0 * uc::KM),
            Some(7_500.0 * uc::KG),
            Some(30_000.0 * uc::KG),
        );
        assert!(almost_eq(em.total_weight_tonnes(), 37.5, None));
        assert!(almost_eq(
            (em.total_mass / uc::TONNE).get::<si::ratio>(),
            37.5,
            None
        ));
        assert_eq!(em.factor, Some(133.53));
        // 200 * 37.5 * 133.53 / 1000
        assert!(almost_eq(em.co2e_kg, 1_001.475, None));
    }

    #[test]
    fn test_lgv_uses_lcv_factor() {
        let em = WeightBasedModel::default().compute(
            Some(VehicleClass::Lgv),
            Some(10.0 * uc::KM),
            None,
            Some(1_000.0 * uc::KG),
        );
        assert_eq!(em.factor, Some(308.23));
        assert!(almost_eq(em.co2e_kg, 3.0823, None));
    }

    #[test]
    fn test_fails_open_to_zero() {
        let model = WeightBasedModel::default();
        let unknown = model.compute(None, Some(100.0 * uc::KM), Some(5_000.0 * uc::KG), None);
        assert_eq!(unknown.co2e_kg, 0.0);
        assert!(!unknown.is_available());
        assert!(almost_eq(unknown.total_weight_tonnes(), 5.0, None));

        let no_distance = model.compute(Some(VehicleClass::Mgv), None, None, None);
        assert_eq!(no_distance.co2e_kg, 0.0);
        assert!(no_distance.is_available());
    }

    #[test]
    fn test_preferred_co2e() {
        let model = WeightBasedModel::default();
        let resolved = model.compute(
            Some(VehicleClass::Mgv),
            Some(100.0 * uc::KM),
            Some(4_000.0 * uc::KG),
            Some(1_000.0 * uc::KG),
        );
        assert_eq!(resolved.preferred_co2e(Some(12.0)), Some(resolved.co2e_kg));

        let unresolved = model.compute(None, Some(100.0 * uc::KM), None, None);
        assert_eq!(unresolved.preferred_co2e(Some(12.0)), Some(12.0));
        assert_eq!(unresolved.preferred_co2e(None), None);
    }
}
