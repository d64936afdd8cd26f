//! Customer details and the commercial terms applied to a chimney quote.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub description: String,
    /// Purchase discount on chimney parts, percent
    #[serde(default, alias = "rabatZakupowyChimney")]
    pub chimney_discount: f64,
    /// Purchase discount on ventilation blocks, percent
    #[serde(default, alias = "rabatZakupowyVent")]
    pub vent_discount: f64,
    /// Sales margin on chimney parts, percent
    #[serde(default = "default_margin", alias = "marzaChimney")]
    pub chimney_margin: f64,
    /// Sales margin on ventilation blocks, percent
    #[serde(default = "default_margin", alias = "marzaVent")]
    pub vent_margin: f64,
}

fn default_margin() -> f64 {
    20.0
}

impl Default for ClientData {
    fn default() -> Self {
        ClientData {
            name: String::new(),
            street: String::new(),
            city: String::new(),
            phone: String::new(),
            description: String::new(),
            chimney_discount: 0.0,
            vent_discount: 0.0,
            chimney_margin: default_margin(),
            vent_margin: default_margin(),
        }
    }
}

impl ClientData {
    /// Check that every percentage lies within 0-100.
    pub fn validate(&self) -> CalcResult<()> {
        let rates = [
            ("chimney_discount", self.chimney_discount),
            ("vent_discount", self.vent_discount),
            ("chimney_margin", self.chimney_margin),
            ("vent_margin", self.vent_margin),
        ];
        for (field, value) in rates {
            if !(0.0..=100.0).contains(&value) {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Percentage must be within 0-100",
                ));
            }
        }
        Ok(())
    }

    /// One-line address for report headers, skipping empty parts
    pub fn address(&self) -> String {
        [self.street.as_str(), self.city.as_str()]
            .iter()
            .filter(|s| !s.trim().is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let client = ClientData::default();
        assert_eq!(client.chimney_discount, 0.0);
        assert_eq!(client.vent_margin, 20.0);
        assert!(client.validate().is_ok());
    }

    #[test]
    fn test_validate_range() {
        let client = ClientData {
            chimney_margin: 120.0,
            ..Default::default()
        };
        let err = client.validate().unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "chimney_margin"));

        let client = ClientData {
            vent_discount: f64::NAN,
            ..Default::default()
        };
        assert!(client.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let client: ClientData = serde_json::from_str(r#"{"name":"Jan Kowalski","rabatZakupowyChimney":5}"#).unwrap();
        assert_eq!(client.chimney_discount, 5.0);
        assert_eq!(client.chimney_margin, 20.0);
    }

    #[test]
    fn test_address() {
        let client = ClientData {
            street: "Polna 3".to_string(),
            city: "Lębork".to_string(),
            ..Default::default()
        };
        assert_eq!(client.address(), "Polna 3, Lębork");
        assert_eq!(ClientData::default().address(), "");
    }
}
