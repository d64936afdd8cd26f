//! # Unit Types
//!
//! Small value types shared by the calculators. They keep JSON clean (plain
//! numbers) while making the unit of each number explicit in code.
//!
//! - [`Percentage`] - a discount or margin, stored normalized as a fraction
//! - [`Meters`] - a chimney or ventilation height
//! - [`amount`] - coercion of nullable numeric fields to a usable `f64`
//!
//! ## Example
//!
//! ```rust
//! use pricing_core::units::{Meters, Percentage};
//!
//! // Product-level discount stored as a fraction
//! let a = Percentage::from_fraction(0.26);
//! // Group discount stored as a percent
//! let b = Percentage::from_percent(26.0);
//! assert_eq!(a, b);
//!
//! let h = Meters::parse_flexible("6,5").unwrap();
//! assert_eq!(h.0, 6.5);
//! ```

use serde::{Deserialize, Deserializer, Serialize};

/// VAT multiplier applied to every customer net price.
pub const VAT_MULTIPLIER: f64 = 1.23;

/// Coerce a nullable numeric field to a usable amount.
///
/// Absent, NaN, infinite and negative values all become 0.
pub fn amount(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Format a money amount as it appears on price lists, e.g. `"12.50 zł"`.
pub fn format_currency(value: f64) -> String {
    format!("{:.2} zł", value)
}

// ============================================================================
// Percentage
// ============================================================================

/// A discount or margin rate.
///
/// Manufacturers store rates either as fractions (0.22) or as percents (22).
/// Both enter through an explicit constructor and end up as the same value,
/// so the calculators never multiply by a number in the wrong unit.
///
/// Invalid input (NaN, infinity, negatives) is coerced to 0. Values above
/// 100% are kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(f64);

impl Percentage {
    /// Zero rate
    pub const ZERO: Percentage = Percentage(0.0);

    /// Build from a fraction (0.22 = 22%)
    pub fn from_fraction(fraction: f64) -> Self {
        if fraction.is_finite() && fraction > 0.0 {
            Percentage(fraction)
        } else {
            Percentage(0.0)
        }
    }

    /// Build from a percent (22 = 22%)
    pub fn from_percent(percent: f64) -> Self {
        Self::from_fraction(percent / 100.0)
    }

    /// Build from a nullable fraction field
    pub fn fraction_or_zero(value: Option<f64>) -> Self {
        Self::from_fraction(value.unwrap_or(0.0))
    }

    /// Build from a nullable percent field
    pub fn percent_or_zero(value: Option<f64>) -> Self {
        Self::from_percent(value.unwrap_or(0.0))
    }

    /// Rate as a fraction
    pub fn fraction(&self) -> f64 {
        self.0
    }

    /// Rate as a percent
    pub fn percent(&self) -> f64 {
        self.0 * 100.0
    }

    /// `1 - rate`, the multiplier a discount leaves behind
    pub fn complement(&self) -> f64 {
        1.0 - self.0
    }

    /// `1 + rate`, the multiplier a margin applies
    pub fn markup(&self) -> f64 {
        1.0 + self.0
    }
}

impl std::fmt::Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

// ============================================================================
// Length
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl Meters {
    /// Parse user-typed text, accepting a comma as the decimal separator.
    ///
    /// Returns `None` when the text is not a finite number.
    pub fn parse_flexible(text: &str) -> Option<Meters> {
        let normalized = text.trim().replacen(',', ".", 1);
        match normalized.parse::<f64>() {
            Ok(v) if v.is_finite() => Some(Meters(v)),
            _ => None,
        }
    }
}

impl Meters {
    /// Parse the number at the start of user-typed text and ignore what
    /// follows, so `"6,5 m"` reads as 6.5. Returns `None` when the text does
    /// not start with a finite number.
    pub fn parse_leading(text: &str) -> Option<Meters> {
        let normalized = text.trim().replacen(',', ".", 1);
        let bytes = normalized.as_bytes();
        let mut end = 0;
        if matches!(bytes.first(), Some(b'+' | b'-')) {
            end = 1;
        }
        let digits_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end < bytes.len() && bytes[end] == b'.' {
            end += 1;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
        }
        if !normalized[digits_start..end].bytes().any(|b| b.is_ascii_digit()) {
            return None;
        }
        if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
            let mut exp_end = end + 1;
            if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
                exp_end += 1;
            }
            let exp_digits = exp_end;
            while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
                exp_end += 1;
            }
            if exp_end > exp_digits {
                end = exp_end;
            }
        }
        match normalized[..end].parse::<f64>() {
            Ok(v) if v.is_finite() => Some(Meters(v)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Meters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} m", self.0)
    }
}

// ============================================================================
// Lenient numeric fields
// ============================================================================

/// Deserialize a numeric field that upstream data may hold as a number, a
/// numeric string, null, or garbage. Anything that is not a finite number
/// becomes `None`.
///
/// Use with `#[serde(default, deserialize_with = "lenient_number")]`.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        Some(serde_json::Value::String(s)) => Meters::parse_flexible(&s).map(|m| m.0),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_coercion() {
        assert_eq!(amount(Some(10.9)), 10.9);
        assert_eq!(amount(None), 0.0);
        assert_eq!(amount(Some(f64::NAN)), 0.0);
        assert_eq!(amount(Some(f64::INFINITY)), 0.0);
        assert_eq!(amount(Some(-3.0)), 0.0);
    }

    #[test]
    fn test_percentage_constructors_agree() {
        assert_eq!(Percentage::from_fraction(0.25), Percentage::from_percent(25.0));
        assert_eq!(Percentage::from_percent(30.0).complement(), 0.7);
        assert_eq!(Percentage::from_percent(20.0).markup(), 1.2);
    }

    #[test]
    fn test_percentage_rejects_garbage() {
        assert_eq!(Percentage::from_fraction(f64::NAN), Percentage::ZERO);
        assert_eq!(Percentage::from_percent(-5.0), Percentage::ZERO);
        assert_eq!(Percentage::percent_or_zero(None), Percentage::ZERO);
    }

    #[test]
    fn test_meters_parse_flexible() {
        assert_eq!(Meters::parse_flexible("6"), Some(Meters(6.0)));
        assert_eq!(Meters::parse_flexible(" 7,25 "), Some(Meters(7.25)));
        assert_eq!(Meters::parse_flexible("abc"), None);
        assert_eq!(Meters::parse_flexible("NaN"), None);
    }

    #[test]
    fn test_meters_parse_leading() {
        assert_eq!(Meters::parse_leading("6m"), Some(Meters(6.0)));
        assert_eq!(Meters::parse_leading(" 7,5 m "), Some(Meters(7.5)));
        assert_eq!(Meters::parse_leading(".5"), Some(Meters(0.5)));
        assert_eq!(Meters::parse_leading("-2"), Some(Meters(-2.0)));
        assert_eq!(Meters::parse_leading("1e1x"), Some(Meters(10.0)));
        assert_eq!(Meters::parse_leading("12e"), Some(Meters(12.0)));
        assert_eq!(Meters::parse_leading("m6"), None);
        assert_eq!(Meters::parse_leading("."), None);
        assert_eq!(Meters::parse_leading(""), None);
    }

    #[test]
    fn test_lenient_number() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(default, deserialize_with = "lenient_number")]
            price: Option<f64>,
        }

        let row: Row = serde_json::from_str(r#"{"price": 12.5}"#).unwrap();
        assert_eq!(row.price, Some(12.5));
        let row: Row = serde_json::from_str(r#"{"price": "12,5"}"#).unwrap();
        assert_eq!(row.price, Some(12.5));
        let row: Row = serde_json::from_str(r#"{"price": "n/a"}"#).unwrap();
        assert_eq!(row.price, None);
        let row: Row = serde_json::from_str(r#"{"price": null}"#).unwrap();
        assert_eq!(row.price, None);
        let row: Row = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(row.price, None);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(8.527), "8.53 zł");
        assert_eq!(format_currency(0.0), "0.00 zł");
    }
}
