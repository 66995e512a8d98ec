//! Keyword-based consignment weight estimation.
//!
//! Trip logs carry no measured cargo weight, only a free-text description
//! such as `"3 NOS TRANSFORMER"`.  The estimate here is intentionally crude:
//! a quantity parsed from the `NOS` (numbers) marker times a typical unit
//! weight for the first keyword found in the text.

use crate::imports::*;

/// Typical unit weight for items whose description contains `keyword`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordWeight {
    pub keyword: String,
    pub unit_weight_kg: u64,
}

impl KeywordWeight {
    pub fn new<S: Into<String>>(keyword: S, unit_weight_kg: u64) -> Self {
        Self {
            keyword: keyword.into(),
            unit_weight_kg,
        }
    }
}

/// Result of [WeightEstimator::estimate].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsignmentWeightEstimate {
    /// Item count parsed from the description, 1 when none was found
    pub quantity: u64,
    /// Keyword that set the unit weight, `None` for the fallback weight or an
    /// empty description
    pub keyword: Option<String>,
    pub weight_kg: u64,
}

impl ConsignmentWeightEstimate {
    pub fn mass(&self) -> si::Mass {
        self.weight_kg as f64 * uc::KG
    }
}

/// Ordered keyword table; the first keyword contained in the description
/// wins, so table order is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEstimator {
    pub keywords: Vec<KeywordWeight>,
    /// Weight used when no keyword matches; quantity is not applied to it
    pub default_weight_kg: u64,
}

pub const DEFAULT_CONSIGNMENT_WEIGHT_KG: u64 = 500;

impl Default for WeightEstimator {
    fn default() -> Self {
        Self {
            // `GENERATOR` shadows `ABB GENERATOR`; the order is kept as surveyed.
            keywords: vec![
                KeywordWeight::new("GENERATOR", 50_000),
                KeywordWeight::new("ABB GENERATOR", 15_000),
                KeywordWeight::new("GEAR BOX", 20_000),
                KeywordWeight::new("TRANSFORMER", 10_000),
                KeywordWeight::new("SKY LIFT", 15_000),
                KeywordWeight::new("MODULE", 10),
                KeywordWeight::new("CONTACTOR", 5),
                KeywordWeight::new("IGBT", 1),
                KeywordWeight::new("ISOLATOR", 3),
                KeywordWeight::new("INTERFACE", 2),
                KeywordWeight::new("ELECTRICITY", 50_000),
            ],
            default_weight_kg: DEFAULT_CONSIGNMENT_WEIGHT_KG,
        }
    }
}

impl SerdeAPI for WeightEstimator {
    fn init(&mut self) -> anyhow::Result<()> {
        for kw in self.keywords.iter_mut() {
            kw.keyword = kw.keyword.trim().to_uppercase();
            ensure!(
                !kw.keyword.is_empty(),
                Error::InitError(format!("{}\nBlank consignment keyword", format_dbg!()))
            );
        }
        Ok(())
    }
}

impl WeightEstimator {
    /// Estimates the consignment weight from its description.
    /// A missing or blank description weighs nothing.
    pub fn estimate(&self, description: Option<&str>) -> ConsignmentWeightEstimate {
        let text = match description {
            Some(d) if !d.trim().is_empty() => d.to_uppercase(),
            _ => {
                return ConsignmentWeightEstimate {
                    quantity: 1,
                    keyword: None,
                    weight_kg: 0,
                }
            }
        };
        let quantity = parse_quantity(&text);

        match self.keywords.iter().find(|kw| text.contains(&kw.keyword)) {
            Some(kw) => ConsignmentWeightEstimate {
                quantity,
                keyword: Some(kw.keyword.clone()),
                weight_kg: kw.unit_weight_kg.saturating_mul(quantity),
            },
            None => ConsignmentWeightEstimate {
                quantity,
                keyword: None,
                weight_kg: self.default_weight_kg,
            },
        }
    }

    pub fn estimate_kg(&self, description: Option<&str>) -> u64 {
        self.estimate(description).weight_kg
    }
}

/// Item count from an uppercased description.
///
/// Scans tokens after the first for one containing `NOS`.  A pure-digit token
/// right before it is the count; otherwise digits embedded in the `NOS`
/// token itself (`"NOS.4"`, `"4NOS"`) are.  Scanning continues past `NOS`
/// tokens that yield no count.  Defaults to 1.
pub fn parse_quantity(text: &str) -> u64 {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    for (i, token) in tokens.iter().enumerate().skip(1) {
        if !token.contains("NOS") {
            continue;
        }
        let prev = tokens[i - 1];
        let digits: String = if is_digits(prev) {
            prev.to_string()
        } else {
            token.chars().filter(char::is_ascii_digit).collect()
        };
        if digits.is_empty() {
            continue;
        }
        return match digits.parse::<u64>() {
            Ok(n) => n,
            Err(_) => {
                #[cfg(feature = "logging")]
                log::warn!("Quantity {digits:?} in {text:?} overflows, using 1");
                1
            }
        };
    }
    1
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_before_nos() {
        let est = WeightEstimator::default().estimate(Some("3 NOS TRANSFORMER"));
        assert_eq!(est.quantity, 3);
        assert_eq!(est.keyword.as_deref(), Some("TRANSFORMER"));
        assert_eq!(est.weight_kg, 30_000);
    }

    #[test]
    fn test_quantity_inside_nos_token() {
        assert_eq!(parse_quantity("IGBT MODULE NOS.12"), 12);
        assert_eq!(parse_quantity("CONTACTOR 4NOS"), 4);
        assert_eq!(
            WeightEstimator::default().estimate_kg(Some("contactor 4nos")),
            20
        );
    }

    #[test]
    fn test_leading_nos_token_is_ignored() {
        // the first token never counts as a NOS marker
        assert_eq!(parse_quantity("5NOS TRANSFORMER"), 1);
        assert_eq!(parse_quantity("NOS 5 TRANSFORMER"), 1);
    }

    #[test]
    fn test_scan_continues_past_empty_nos() {
        assert_eq!(parse_quantity("PANEL NOS AND 2 NOS"), 2);
    }

    #[test]
    fn test_no_nos_defaults_to_one() {
        assert_eq!(parse_quantity("GEAR BOX"), 1);
        assert_eq!(
            WeightEstimator::default().estimate_kg(Some("gear box")),
            20_000
        );
    }

    #[test]
    fn test_fallback_ignores_quantity() {
        let est = WeightEstimator::default().estimate(Some("RANDOM ITEM XYZ"));
        assert_eq!(est.weight_kg, 500);
        assert!(est.keyword.is_none());
        assert_eq!(
            WeightEstimator::default().estimate_kg(Some("7 NOS CABLE DRUM")),
            500
        );
    }

    #[test]
    fn test_missing_description() {
        let estimator = WeightEstimator::default();
        assert_eq!(estimator.estimate_kg(None), 0);
        assert_eq!(estimator.estimate_kg(Some("")), 0);
        assert_eq!(estimator.estimate_kg(Some("   ")), 0);
    }

    #[test]
    fn test_table_order_wins() {
        // GENERATOR precedes ABB GENERATOR in the table
        let est = WeightEstimator::default().estimate(Some("1 NOS ABB GENERATOR"));
        assert_eq!(est.keyword.as_deref(), Some("GENERATOR"));
        assert_eq!(est.weight_kg, 50_000);

        let reordered = WeightEstimator {
            keywords: vec![
                KeywordWeight::new("ABB GENERATOR", 15_000),
                KeywordWeight::new("GENERATOR", 50_000),
            ],
            default_weight_kg: 500,
        };
        assert_eq!(reordered.estimate_kg(Some("1 NOS ABB GENERATOR")), 15_000);
    }

    #[test]
    fn test_quantity_overflow_falls_back_to_one() {
        assert_eq!(parse_quantity("X 99999999999999999999999 NOS"), 1);
    }

    #[test]
    fn test_init_normalizes_keywords() {
        let mut estimator = WeightEstimator {
            keywords: vec![KeywordWeight::new(" sky lift ", 15_000)],
            default_weight_kg: 500,
        };
        estimator.init().unwrap();
        assert_eq!(estimator.keywords[0].keyword, "SKY LIFT");
        assert_eq!(estimator.estimate_kg(Some("2 nos Sky Lift")), 30_000);

        let mut blank = WeightEstimator {
            keywords: vec![KeywordWeight::new("  ", 1)],
            default_weight_kg: 500,
        };
        assert!(blank.init().is_err());
    }
}
