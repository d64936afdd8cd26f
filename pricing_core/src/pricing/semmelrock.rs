//! # Semmelrock landscaping stone
//!
//! Group discounts are keyed by group *prefix*: a product in group `G2-b`
//! takes the `G2` discount. When several keys prefix the same group the
//! first one in table order wins, so the table keeps its insertion order.
//!
//! A truck is limited both by pallet count and by weight.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{finish, pallets_by_weight, transport_per_unit, CatalogProduct, PriceList, Priced};
use crate::units::{amount, lenient_number, Percentage};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemmelrockProduct {
    #[serde(default)]
    pub symbol: String,
    #[serde(default, alias = "grupa")]
    pub group: String,
    #[serde(default, alias = "nazwa")]
    pub name: String,
    #[serde(default, alias = "iloscNaPalecie", deserialize_with = "lenient_number")]
    pub units_per_pallet: Option<f64>,
    #[serde(default, alias = "jednostka")]
    pub unit: String,
    /// Pallet weight in tonnes
    #[serde(default, alias = "waga", deserialize_with = "lenient_number")]
    pub pallet_weight: Option<f64>,
    #[serde(default, alias = "cenaNetto", deserialize_with = "lenient_number")]
    pub net_price: Option<f64>,
    #[serde(default, alias = "maxPalletsPerTruck", deserialize_with = "lenient_number")]
    pub max_pallets_per_truck: Option<f64>,
}

impl CatalogProduct for SemmelrockProduct {
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
        vec![&self.name[..], &self.symbol[..], &self.group[..]]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemmelrockSettings {
    /// Cost of one truck
    #[serde(default, alias = "transportRate", deserialize_with = "lenient_number")]
    pub transport_rate: Option<f64>,
    /// Margin in percent
    #[serde(default, deserialize_with = "lenient_number")]
    pub margin: Option<f64>,
    /// Truck payload in tonnes
    #[serde(default, alias = "truckWeight", deserialize_with = "lenient_number")]
    pub truck_weight: Option<f64>,
    /// Used when the product has no pallet cap of its own
    #[serde(default, alias = "maxPalletsPerTruck", deserialize_with = "lenient_number")]
    pub max_pallets_per_truck: Option<f64>,
    /// Group prefix -> discount percent, in table order
    #[serde(default)]
    pub discounts: IndexMap<String, Option<f64>>,
}

impl Default for SemmelrockSettings {
    fn default() -> Self {
        SemmelrockSettings {
            transport_rate: Some(500.0),
            margin: Some(30.0),
            truck_weight: Some(26.0),
            max_pallets_per_truck: Some(22.0),
            discounts: [("G1", 0.0), ("G2", 5.0), ("G3", 10.0), ("G4", 15.0)]
                .into_iter()
                .map(|(group, pct)| (group.to_string(), Some(pct)))
                .collect(),
        }
    }
}

impl SemmelrockSettings {
    /// Discount for a product group: the first configured key the group
    /// starts with, or 0 when none does.
    pub fn discount_for(&self, group: &str) -> Percentage {
        let rate = self
            .discounts
            .iter()
            .find(|(prefix, _)| group.starts_with(prefix.as_str()))
            .and_then(|(_, pct)| *pct);
        Percentage::percent_or_zero(rate)
    }

    /// Pallets per truck for a product after the weight cap.
    pub fn pallets_per_truck(&self, product: &SemmelrockProduct) -> f64 {
        let own = amount(product.max_pallets_per_truck);
        let max = if own > 0.0 { own } else { amount(self.max_pallets_per_truck) };
        pallets_by_weight(max, amount(self.truck_weight), amount(product.pallet_weight))
    }
}

pub fn calculate(product: &SemmelrockProduct, settings: &SemmelrockSettings) -> Priced<SemmelrockProduct> {
    let list = amount(product.net_price);
    let discount = settings.discount_for(&product.group);
    let transport = transport_per_unit(
        amount(settings.transport_rate),
        amount(product.units_per_pallet),
        settings.pallets_per_truck(product),
    );

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
pub struct SemmelrockData {
    #[serde(default)]
    pub settings: SemmelrockSettings,
    #[serde(default)]
    pub products: Vec<SemmelrockProduct>,
}

impl PriceList for SemmelrockData {
    type Product = SemmelrockProduct;

    fn products(&self) -> &[SemmelrockProduct] {
        &self.products
    }

    fn price(&self, product: &SemmelrockProduct) -> Priced<SemmelrockProduct> {
        calculate(product, &self.settings)
    }
}
