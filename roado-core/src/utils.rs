use crate::imports::*;

/// Decimal rounding for display and factor normalization.
#[ext(RoundTo)]
pub impl f64 {
    /// Rounds the exact binary value to `places` decimal places, ties to
    /// even, and returns the nearest `f64` to the rounded decimal.
    fn round_to(self, places: usize) -> f64 {
        if !self.is_finite() {
            return self;
        }
        // `{:.N}` formatting is correctly rounded with ties to even
        format!("{self:.places$}").parse().unwrap_or(self)
    }
}

/// Returns true if `val1` and `val2` are within a relative/absolute `epsilon` of each other,
/// depending on magnitude.
pub fn almost_eq(val1: f64, val2: f64, epsilon: Option<f64>) -> bool {
    let epsilon = epsilon.unwrap_or(1e-8);
    ((val2 - val1) / (val1 + val2)).abs() < epsilon || (val2 - val1).abs() < epsilon
}

/// Parses a numeric cell the way trip tables need it: anything that is not a
/// finite, non-negative number is treated as missing.
pub fn parse_non_negative(raw: &str) -> Option<f64> {
    let val: f64 = raw.trim().parse().ok()?;
    (val.is_finite() && val >= 0.0).then_some(val)
}

/// Ratio of `num` to `den`, `None` if either is missing or `den` is zero.
pub fn checked_ratio(num: Option<f64>, den: Option<f64>) -> Option<f64> {
    match (num, den) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

/// Arithmetic mean of the present values, `None` if there are none.
pub fn mean_present<I: IntoIterator<Item = Option<f64>>>(vals: I) -> Option<f64> {
    let (sum, n) = vals
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Sum of the present values; the sum of nothing is zero.
pub fn sum_present<I: IntoIterator<Item = Option<f64>>>(vals: I) -> f64 {
    vals.into_iter().flatten().sum()
}

pub mod serde_lenient {
    //! `deserialize_with` helpers for loosely typed spreadsheet exports.
    use super::parse_non_negative;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Num(f64),
        Text(String),
    }

    /// Non-negative float or `None`; never fails on bad content.
    pub fn opt_non_negative<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let cell: Option<Cell> = Option::deserialize(deserializer).unwrap_or(None);
        Ok(match cell {
            Some(Cell::Num(v)) if v.is_finite() && v >= 0.0 => Some(v),
            Some(Cell::Text(s)) => parse_non_negative(&s),
            _ => None,
        })
    }

    /// Trimmed string or `None` when blank.
    pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text: Option<String> = Option::deserialize(deserializer).unwrap_or(None);
        Ok(text
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()))
    }
}
