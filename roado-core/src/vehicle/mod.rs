//! Vehicle registry and goods-vehicle classification.

mod classifier;
mod registry;

pub use classifier::*;
pub use registry::*;

use crate::imports::*;

/// Goods-vehicle class used to select emission factors.
///
/// An unresolved class is represented as `None` wherever a class is held
/// (`Option<VehicleClass>`), never as a default variant.
#[cfg_attr(feature = "pyo3", pyclass)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VehicleClass {
    /// Light goods vehicle
    #[serde(rename = "LGV")]
    Lgv,
    /// Medium goods vehicle
    #[serde(rename = "MGV")]
    Mgv,
    /// Heavy goods vehicle
    #[serde(rename = "HGV")]
    Hgv,
}

impl VehicleClass {
    /// Substring match order for raw registration categories; first hit wins.
    pub const MATCH_ORDER: [VehicleClass; 3] =
        [VehicleClass::Lgv, VehicleClass::Mgv, VehicleClass::Hgv];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Lgv => "LGV",
            Self::Mgv => "MGV",
            Self::Hgv => "HGV",
        }
    }

    /// Derives the class from a raw registration category such as
    /// `"HGV(Heavy Goods Vehicle)"` by case-sensitive substring containment,
    /// testing LGV, then MGV, then HGV.
    pub fn from_category(category: &str) -> Option<Self> {
        Self::MATCH_ORDER
            .into_iter()
            .find(|class| category.contains(class.code()))
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for VehicleClass {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim() {
            "LGV" => Ok(Self::Lgv),
            "MGV" => Ok(Self::Mgv),
            "HGV" => Ok(Self::Hgv),
            other => bail!("`VehicleClass` must be 'LGV', 'MGV' or 'HGV', got {other:?}"),
        }
    }
}
