//! # Porotherm (Wienerberger) ceramic blocks
//!
//! Prices come from trade agreements. Each agreement carries its own product
//! list, transport costs per plant and discount settings. All rates here are
//! stored as fractions (0.22 = 22%).
//!
//! ```text
//! price after discount = (list - list·basic - list·additional) · (1 - cash)
//! transport            = plant route cost / (units per pallet · pallets per truck)
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use super::{finish, transport_per_unit, CatalogProduct, PriceList, Priced};
use crate::errors::{CalcError, CalcResult};
use crate::units::{amount, lenient_number, Percentage};

/// Production plant a product ships from.
///
/// Only Lębork has its own route; every other or missing location ships
/// on the Gnaszyn route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PlantLocation {
    #[serde(rename = "Lębork")]
    Lebork,
    #[default]
    #[serde(rename = "Gnaszyn")]
    Gnaszyn,
}

impl PlantLocation {
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "Lębork" | "Lebork" => PlantLocation::Lebork,
            _ => PlantLocation::Gnaszyn,
        }
    }
}

impl<'de> Deserialize<'de> for PlantLocation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(serde_json::Value::String(name)) => PlantLocation::from_name(&name),
            _ => PlantLocation::Gnaszyn,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PorothermProduct {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: PlantLocation,
    #[serde(default, alias = "netPrice", deserialize_with = "lenient_number")]
    pub net_price: Option<f64>,
    /// Product-specific discount, as a fraction
    #[serde(default, alias = "additionalDiscount", deserialize_with = "lenient_number")]
    pub additional_discount: Option<f64>,
    #[serde(default, alias = "unitsPerPallet", deserialize_with = "lenient_number")]
    pub units_per_pallet: Option<f64>,
    #[serde(default, alias = "palletsPerTruck", deserialize_with = "lenient_number")]
    pub pallets_per_truck: Option<f64>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub specifications: String,
}

impl CatalogProduct for PorothermProduct {
    fn symbol(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn list_price(&self) -> Option<f64> {
        self.net_price
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

/// Truck cost from each plant to the depot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransportCosts {
    #[serde(default, alias = "leborkMalbork", deserialize_with = "lenient_number")]
    pub lebork_malbork: Option<f64>,
    #[serde(default, alias = "gnaszynMalbork", deserialize_with = "lenient_number")]
    pub gnaszyn_malbork: Option<f64>,
}

impl TransportCosts {
    /// Truck cost for a product shipped from `location`
    pub fn for_location(&self, location: PlantLocation) -> f64 {
        match location {
            PlantLocation::Lebork => amount(self.lebork_malbork),
            PlantLocation::Gnaszyn => amount(self.gnaszyn_malbork),
        }
    }
}

/// Discount and margin terms of an agreement, all as fractions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AgreementSettings {
    #[serde(default, alias = "basicDiscount", deserialize_with = "lenient_number")]
    pub basic_discount: Option<f64>,
    #[serde(default, alias = "cashDiscount", deserialize_with = "lenient_number")]
    pub cash_discount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub margin: Option<f64>,
}

impl AgreementSettings {
    /// Reject rates outside 0..=1.
    ///
    /// Absent rates are accepted; calculators treat them as 0.
    pub fn validate(&self) -> CalcResult<()> {
        let rates = [
            ("basic_discount", self.basic_discount),
            ("cash_discount", self.cash_discount),
            ("margin", self.margin),
        ];
        for (field, value) in rates {
            if let Some(v) = value {
                if !(0.0..=1.0).contains(&v) {
                    return Err(CalcError::invalid_input(
                        field,
                        v.to_string(),
                        "Rate must be a fraction between 0 and 1",
                    ));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PorothermAgreement {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default, alias = "validUntil")]
    pub valid_until: String,
    #[serde(default, alias = "transportCosts")]
    pub transport_costs: TransportCosts,
    #[serde(default)]
    pub settings: AgreementSettings,
    #[serde(default)]
    pub products: Vec<PorothermProduct>,
    #[serde(default, alias = "lastUpdate")]
    pub last_update: String,
}

/// Price one product under an agreement's terms.
pub fn calculate(product: &PorothermProduct, agreement: &PorothermAgreement) -> Priced<PorothermProduct> {
    let list = amount(product.net_price);
    let basic = Percentage::fraction_or_zero(agreement.settings.basic_discount);
    let additional = Percentage::fraction_or_zero(product.additional_discount);
    let cash = Percentage::fraction_or_zero(agreement.settings.cash_discount);
    let margin = Percentage::fraction_or_zero(agreement.settings.margin);

    let after_trade = list - list * basic.fraction() - list * additional.fraction();
    let price_after_discount = after_trade * cash.complement();

    // Combined rate, reported for display only
    let kept = (1.0 - basic.fraction() - additional.fraction()) * cash.complement();
    let discount_percent = (1.0 - kept) * 100.0;

    let transport = transport_per_unit(
        agreement.transport_costs.for_location(product.location),
        amount(product.units_per_pallet),
        amount(product.pallets_per_truck),
    );

    Priced {
        product: product.clone(),
        pricing: finish(discount_percent, price_after_discount, transport, margin),
    }
}

/// All Porotherm agreements plus which one is in use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PorothermData {
    #[serde(default)]
    pub agreements: Vec<PorothermAgreement>,
    #[serde(default, alias = "defaultAgreementId")]
    pub default_agreement_id: String,
    #[serde(default, alias = "selectedAgreementId", skip_serializing_if = "Option::is_none")]
    pub selected_agreement_id: Option<String>,
}

impl PorothermData {
    /// The agreement prices are computed against: the selected one, else the
    /// default, else the first on the list.
    pub fn active_agreement(&self) -> Option<&PorothermAgreement> {
        let by_id = |id: &str| self.agreements.iter().find(|a| a.id == id);
        self.selected_agreement_id
            .as_deref()
            .and_then(by_id)
            .or_else(|| by_id(&self.default_agreement_id))
            .or_else(|| self.agreements.first())
    }

    /// Switch the active agreement.
    pub fn select_agreement(&mut self, id: &str) -> CalcResult<()> {
        if !self.agreements.iter().any(|a| a.id == id) {
            return Err(CalcError::invalid_input("agreement_id", id, "No agreement with this id"));
        }
        debug!(agreement = id, "porotherm agreement selected");
        self.selected_agreement_id = Some(id.to_string());
        Ok(())
    }
}

impl PriceList for PorothermData {
    type Product = PorothermProduct;

    fn products(&self) -> &[PorothermProduct] {
        self.active_agreement()
            .map(|a| a.products.as_slice())
            .unwrap_or(&[])
    }

    fn price(&self, product: &PorothermProduct) -> Priced<PorothermProduct> {
        match self.active_agreement() {
            Some(agreement) => calculate(product, agreement),
            None => calculate(product, &PorothermAgreement::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::VAT_MULTIPLIER;

    fn scenario() -> (PorothermProduct, PorothermAgreement) {
        let product = PorothermProduct {
            id: "porotherm-25-pw-kl15".to_string(),
            name: "POROTHERM 25 P+W KL.15".to_string(),
            location: PlantLocation::Lebork,
            net_price: Some(10.9),
            additional_discount: Some(0.26),
            units_per_pallet: Some(72.0),
            pallets_per_truck: Some(19.0),
            ..Default::default()
        };
        let agreement = PorothermAgreement {
            id: "przyszlosc-2".to_string(),
            transport_costs: TransportCosts {
                lebork_malbork: Some(1100.0),
                gnaszyn_malbork: Some(0.0),
            },
            settings: AgreementSettings {
                basic_discount: Some(0.22),
                cash_discount: Some(0.03),
                margin: Some(0.10),
            },
            ..Default::default()
        };
        (product, agreement)
    }

    #[test]
    fn test_reference_scenario() {
        let (product, agreement) = scenario();
        let p = calculate(&product, &agreement).pricing;
        assert!((p.price_after_discount - 10.9 * 0.52 * 0.97).abs() < 1e-9);
        assert!((p.price_after_discount - 5.4982).abs() < 1e-3);
        assert!((p.transport_per_unit - 0.8041).abs() < 1e-4);
        assert!((p.landed_price - 6.3023).abs() < 1e-3);
        assert!((p.customer_net_price - 6.9325).abs() < 1e-3);
        assert!((p.customer_gross_price - 8.5270).abs() < 1e-3);
        assert!((p.discount_percent - 49.56).abs() < 1e-9);
        assert_eq!(p.customer_gross_price, p.customer_net_price * VAT_MULTIPLIER);
    }

    #[test]
    fn test_gnaszyn_uses_its_route_cost() {
        let (mut product, agreement) = scenario();
        product.location = PlantLocation::Gnaszyn;
        let p = calculate(&product, &agreement).pricing;
        assert_eq!(p.transport_per_unit, 0.0);
    }

    #[test]
    fn test_missing_fields_price_to_zero() {
        let p = calculate(&PorothermProduct::default(), &PorothermAgreement::default()).pricing;
        assert_eq!(p.customer_gross_price, 0.0);
        assert_eq!(p.transport_per_unit, 0.0);
    }

    #[test]
    fn test_original_keys_deserialize() {
        let json = r#"{"id":"x","name":"Block","location":"Gnaszyn","netPrice":"9.45",
            "additionalDiscount":0.14,"unitsPerPallet":90,"palletsPerTruck":null}"#;
        let product: PorothermProduct = serde_json::from_str(json).unwrap();
        assert_eq!(product.location, PlantLocation::Gnaszyn);
        assert_eq!(product.net_price, Some(9.45));
        assert_eq!(product.pallets_per_truck, None);
    }

    #[test]
    fn test_active_agreement_fallbacks() {
        let (_, agreement) = scenario();
        let mut first = agreement.clone();
        first.id = "przyszlosc-1".to_string();
        let mut data = PorothermData {
            agreements: vec![first, agreement],
            default_agreement_id: "przyszlosc-2".to_string(),
            selected_agreement_id: None,
        };
        assert_eq!(data.active_agreement().unwrap().id, "przyszlosc-2");

        data.select_agreement("przyszlosc-1").unwrap();
        assert_eq!(data.active_agreement().unwrap().id, "przyszlosc-1");
        assert!(data.select_agreement("missing").is_err());

        data.selected_agreement_id = Some("gone".to_string());
        data.default_agreement_id = "also-gone".to_string();
        assert_eq!(data.active_agreement().unwrap().id, "przyszlosc-1");
    }

    #[test]
    fn test_settings_validation() {
        let (_, agreement) = scenario();
        assert!(agreement.settings.validate().is_ok());
        let bad = AgreementSettings {
            margin: Some(10.0),
            ..agreement.settings
        };
        assert_eq!(bad.validate().unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_unknown_or_missing_location_uses_gnaszyn_route() {
        let (_, mut agreement) = scenario();
        agreement.transport_costs = TransportCosts {
            lebork_malbork: Some(0.0),
            gnaszyn_malbork: Some(1000.0),
        };

        let json = r#"{"id":"a","name":"Block","netPrice":5,"unitsPerPallet":10,"palletsPerTruck":10}"#;
        let missing: PorothermProduct = serde_json::from_str(json).unwrap();
        assert_eq!(missing.location, PlantLocation::Gnaszyn);
        assert!((calculate(&missing, &agreement).pricing.transport_per_unit - 10.0).abs() < 1e-9);

        let json = r#"{"id":"b","name":"Block","location":"Malbork","netPrice":5,"unitsPerPallet":10,"palletsPerTruck":10}"#;
        let unknown: PorothermProduct = serde_json::from_str(json).unwrap();
        assert_eq!(unknown.location, PlantLocation::Gnaszyn);
        assert!((calculate(&unknown, &agreement).pricing.transport_per_unit - 10.0).abs() < 1e-9);

        let lebork: PorothermProduct = serde_json::from_str(r#"{"location":"Lebork"}"#).unwrap();
        assert_eq!(lebork.location, PlantLocation::Lebork);
    }
}
