use super::factors::*;
use crate::imports::*;
use crate::vehicle::VehicleClass;

/// Per-gas masses of one trip and their CO2-equivalent, kg.
///
/// CO2 and CO2e are rounded to 2 decimals, CH4 and N2O to 5.  CO2e is
/// computed from the unrounded masses.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasEmissions {
    pub co2_kg: f64,
    pub ch4_kg: f64,
    pub n2o_kg: f64,
    pub co2e_kg: f64,
}

/// Output of [TailpipeModel::compute]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TailpipeEmission {
    /// Uplifted factors that produced `masses`, kg/km
    pub factors: GasFactors,
    pub masses: GasEmissions,
}

/// Per-km tailpipe methodology: uplifted CO2/CH4/N2O factors times running
/// distance, aggregated with AR5 GWPs.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailpipeModel {
    pub factors: EmissionFactorTable,
}

impl TailpipeModel {
    pub fn new(factors: EmissionFactorTable) -> Self {
        Self { factors }
    }

    /// Emissions over `running_distance` for a vehicle of `class`.
    ///
    /// Returns `None` (unavailable, not zero) when the class is unknown, the
    /// distance is missing, or the table has no factors for the class.
    pub fn compute(
        &self,
        class: Option<VehicleClass>,
        running_distance: Option<si::Length>,
    ) -> Option<TailpipeEmission> {
        let factors = self.factors.uplifted(class?)?;
        let km = running_distance?.get::<si::kilometer>();

        let co2 = factors.co2 * km;
        let ch4 = factors.ch4 * km;
        let n2o = factors.n2o * km;
        let co2e = co2 + ch4 * GWP_CH4 + n2o * GWP_N2O;

        Some(TailpipeEmission {
            factors,
            masses: GasEmissions {
                co2_kg: co2.round_to(2),
                ch4_kg: ch4.round_to(5),
                n2o_kg: n2o.round_to(5),
                co2e_kg: co2e.round_to(2),
            },
        })
    }
}

/// Running over total distance, rounded to 3 decimals.  `None` when either
/// distance is missing or the total is zero.
pub fn route_efficiency(running: Option<si::Length>, total: Option<si::Length>) -> Option<f64> {
    utils::checked_ratio(
        running.map(|d| d.get::<si::kilometer>()),
        total.map(|d| d.get::<si::kilometer>()),
    )
    .map(|r| r.round_to(3))
}
