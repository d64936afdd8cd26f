//! # Bruk-Bet paving stone
//!
//! Discounts are looked up by the product's group name, which must match a
//! key of the discount table exactly. Transport cost is the truck cost of
//! the selected production plant; unknown plants contribute no transport.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{finish, transport_per_unit, CatalogProduct, PriceList, Priced};
use crate::errors::{CalcError, CalcResult};
use crate::units::{amount, lenient_number, Percentage};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrukbetProduct {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default, alias = "grupa")]
    pub group: String,
    #[serde(default, alias = "nazwa")]
    pub name: String,
    /// Production plant name ("ZP")
    #[serde(default, alias = "zp")]
    pub plant: String,
    #[serde(default, alias = "waga", deserialize_with = "lenient_number")]
    pub pallet_weight: Option<f64>,
    #[serde(default, alias = "maxPalletsPerTruck", deserialize_with = "lenient_number")]
    pub max_pallets_per_truck: Option<f64>,
    #[serde(default, alias = "iloscNaPalecie", deserialize_with = "lenient_number")]
    pub units_per_pallet: Option<f64>,
    #[serde(default, alias = "jednostka")]
    pub unit: String,
    #[serde(default, alias = "cenaNetto", deserialize_with = "lenient_number")]
    pub net_price: Option<f64>,
}

impl CatalogProduct for BrukbetProduct {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn unit(&self) -> &str {
        &self.unit
    }

    fn list_price(&self) -> Option<f64> {
        self.net_price
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name[..], &self.symbol[..], &self.group[..], &self.plant[..]]
    }
}

/// A plant trucks are dispatched from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Factory {
    pub id: String,
    #[serde(default, alias = "nazwa")]
    pub name: String,
    #[serde(default, alias = "kosztTransportu", deserialize_with = "lenient_number")]
    pub transport_cost: Option<f64>,
}

impl Factory {
    pub fn new(id: impl Into<String>, name: impl Into<String>, transport_cost: f64) -> Self {
        Factory {
            id: id.into(),
            name: name.into(),
            transport_cost: Some(transport_cost),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrukbetSettings {
    /// Mirrors the selected factory's truck cost
    #[serde(default, alias = "transportRate", deserialize_with = "lenient_number")]
    pub transport_rate: Option<f64>,
    /// Margin in percent
    #[serde(default, deserialize_with = "lenient_number")]
    pub margin: Option<f64>,
    /// Id of the selected factory
    #[serde(default)]
    pub factory: String,
    #[serde(default)]
    pub factories: Vec<Factory>,
    #[serde(default, alias = "maxPalletsPerTruck", deserialize_with = "lenient_number")]
    pub max_pallets_per_truck: Option<f64>,
    /// Group name -> discount percent
    #[serde(default)]
    pub discounts: BTreeMap<String, Option<f64>>,
}

impl Default for BrukbetSettings {
    fn default() -> Self {
        let discounts = [("PRESTIGE", 0.0), ("UNI-DECOR", 5.0), ("STANDARD", 10.0), ("WYROBY UZUPEŁNIAJĄCE", 15.0)]
            .into_iter()
            .map(|(group, pct)| (group.to_string(), Some(pct)))
            .collect();
        BrukbetSettings {
            transport_rate: Some(500.0),
            margin: Some(30.0),
            factory: "brukbet-main".to_string(),
            factories: vec![
                Factory::new("brukbet-main", "BRUK-BET Zakład Główny", 500.0),
                Factory::new("brukbet-north", "BRUK-BET Północ", 450.0),
                Factory::new("brukbet-south", "BRUK-BET Południe", 550.0),
            ],
            max_pallets_per_truck: Some(22.0),
            discounts,
        }
    }
}

impl BrukbetSettings {
    /// Discount for a product group, exact key match only.
    pub fn discount_for(&self, group: &str) -> Percentage {
        Percentage::percent_or_zero(self.discounts.get(group).copied().flatten())
    }

    /// The factory trucks are dispatched from, if the selection is valid.
    pub fn selected_factory(&self) -> Option<&Factory> {
        self.factories.iter().find(|f| f.id == self.factory)
    }

    /// Select a factory and copy its truck cost into the transport rate.
    pub fn select_factory(&mut self, id: &str) -> CalcResult<()> {
        let factory = self
            .factories
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| CalcError::invalid_input("factory", id, "No factory with this id"))?;
        self.transport_rate = factory.transport_cost;
        self.factory = id.to_string();
        debug!(factory = id, "brukbet factory selected");
        Ok(())
    }

    /// Replace the factory list.
    ///
    /// Keeps the current selection when it survives, otherwise falls back to
    /// the first factory (or none). The transport rate follows the selection.
    pub fn replace_factories(&mut self, factories: Vec<Factory>) {
        self.factories = factories;
        if self.selected_factory().is_none() {
            self.factory = self.factories.first().map(|f| f.id.clone()).unwrap_or_default();
        }
        self.transport_rate = Some(self.selected_factory().map(|f| amount(f.transport_cost)).unwrap_or(0.0));
    }
}

pub fn calculate(product: &BrukbetProduct, settings: &BrukbetSettings) -> Priced<BrukbetProduct> {
    let list = amount(product.net_price);
    let discount = settings.discount_for(&product.group);
    let cost = settings
        .selected_factory()
        .map(|f| amount(f.transport_cost))
        .unwrap_or(0.0);

    // Whole units per pallet only
    let units_per_pallet = amount(product.units_per_pallet).trunc();
    let transport = transport_per_unit(cost, units_per_pallet, amount(product.max_pallets_per_truck));

    Priced {
        product: product.clone(),
        pricing: finish(
            discount.percent(),
            list * discount.complement(),
            transport,
            Percentage::percent_or_zero(settings.margin),
        ),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrukbetData {
    #[serde(default)]
    pub settings: BrukbetSettings,
    #[serde(default)]
    pub products: Vec<BrukbetProduct>,
}

impl PriceList for BrukbetData {
    type Product = BrukbetProduct;

    fn products(&self) -> &[BrukbetProduct] {
        &self.products
    }

    fn price(&self, product: &BrukbetProduct) -> Priced<BrukbetProduct> {
        calculate(product, &self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holland() -> BrukbetProduct {
        BrukbetProduct {
            id: "bruk_2".to_string(),
            symbol: "2-KD-HOLLAND-BLE-U0".to_string(),
            group: "STANDARD".to_string(),
            name: "Holland 21x7x10,5 cm".to_string(),
            plant: "Tarnów".to_string(),
            pallet_weight: Some(1.8),
            max_pallets_per_truck: Some(14.0),
            units_per_pallet: Some(198.0),
            unit: "szt.".to_string(),
            net_price: Some(1.35),
        }
    }

    #[test]
    fn test_group_discount_exact_match() {
        let settings = BrukbetSettings::default();
        let p = calculate(&holland(), &settings).pricing;
        assert_eq!(p.discount_percent, 10.0);
        assert!((p.price_after_discount - 1.215).abs() < 1e-9);

        let mut product = holland();
        product.group = "STANDARD-2".to_string();
        let p = calculate(&product, &settings).pricing;
        assert_eq!(p.discount_percent, 0.0);
        assert_eq!(p.price_after_discount, 1.35);
    }

    #[test]
    fn test_transport_from_selected_factory() {
        let mut settings = BrukbetSettings::default();
        let p = calculate(&holland(), &settings).pricing;
        assert!((p.transport_per_unit - 500.0 / (198.0 * 14.0)).abs() < 1e-12);

        settings.factory = "unknown".to_string();
        let p = calculate(&holland(), &settings).pricing;
        assert_eq!(p.transport_per_unit, 0.0);
    }

    #[test]
    fn test_units_per_pallet_truncated() {
        let mut product = holland();
        product.units_per_pallet = Some(10.8);
        let p = calculate(&product, &BrukbetSettings::default()).pricing;
        assert!((p.transport_per_unit - 500.0 / (10.0 * 14.0)).abs() < 1e-12);
    }

    #[test]
    fn test_select_factory_updates_rate() {
        let mut settings = BrukbetSettings::default();
        settings.select_factory("brukbet-north").unwrap();
        assert_eq!(settings.factory, "brukbet-north");
        assert_eq!(settings.transport_rate, Some(450.0));
        assert!(settings.select_factory("nowhere").is_err());
        assert_eq!(settings.factory, "brukbet-north");
    }

    #[test]
    fn test_replace_factories_reselects() {
        let mut settings = BrukbetSettings::default();
        settings.replace_factories(vec![Factory::new("east", "Wschód", 700.0)]);
        assert_eq!(settings.factory, "east");
        assert_eq!(settings.transport_rate, Some(700.0));

        settings.replace_factories(Vec::new());
        assert_eq!(settings.factory, "");
        assert_eq!(settings.transport_rate, Some(0.0));
    }

    #[test]
    fn test_search_fields() {
        let data = BrukbetData {
            settings: BrukbetSettings::default(),
            products: vec![holland()],
        };
        assert_eq!(data.search("tarnów").len(), 1);
        assert_eq!(data.search("holland").len(), 1);
        assert_eq!(data.search("standard").len(), 1);
        assert!(data.search("prestige").is_empty());
    }
}
