//! Polbruk paving stone. The discount is stored per product (percent); the
//! truck is capped by pallet count and by weight, as for Semmelrock.

use serde::{Deserialize, Serialize};

use super::{finish, pallets_by_weight, transport_per_unit, CatalogProduct, PriceList, Priced};
use crate::units::{amount, lenient_number, Percentage};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolbrukProduct {
    #[serde(default)]
    pub symbol: String,
    #[serde(default, alias = "nazwa")]
    pub name: String,
    #[serde(default, alias = "kolor")]
    pub color: String,
    #[serde(default, alias = "ksztalt")]
    pub shape: String,
    #[serde(default, alias = "jednostka")]
    pub unit: String,
    #[serde(default, alias = "iloscNaPalecie", deserialize_with = "lenient_number")]
    pub units_per_pallet: Option<f64>,
    #[serde(default, alias = "waga", deserialize_with = "lenient_number")]
    pub pallet_weight: Option<f64>,
    #[serde(default, alias = "maxPalletsPerTruck", deserialize_with = "lenient_number")]
    pub max_pallets_per_truck: Option<f64>,
    #[serde(default, alias = "cenaNetto", deserialize_with = "lenient_number")]
    pub net_price: Option<f64>,
    /// Discount in percent
    #[serde(default, alias = "rabat", deserialize_with = "lenient_number")]
    pub discount: Option<f64>,
}

impl CatalogProduct for PolbrukProduct {
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
        vec![&self.name[..], &self.symbol[..], &self.color[..], &self.shape[..]]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolbrukSettings {
    #[serde(default, alias = "transportRate", deserialize_with = "lenient_number")]
    pub transport_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub margin: Option<f64>,
    #[serde(default, alias = "truckWeight", deserialize_with = "lenient_number")]
    pub truck_weight: Option<f64>,
    #[serde(default, alias = "maxPalletsPerTruck", deserialize_with = "lenient_number")]
    pub max_pallets_per_truck: Option<f64>,
}

impl Default for PolbrukSettings {
    fn default() -> Self {
        PolbrukSettings {
            transport_rate: Some(500.0),
            margin: Some(30.0),
            truck_weight: Some(24.0),
            max_pallets_per_truck: Some(22.0),
        }
    }
}

pub fn calculate(product: &PolbrukProduct, settings: &PolbrukSettings) -> Priced<PolbrukProduct> {
    let list = amount(product.net_price);
    let discount = Percentage::percent_or_zero(product.discount);

    let own_cap = amount(product.max_pallets_per_truck);
    let max_pallets = if own_cap > 0.0 {
        own_cap
    } else {
        amount(settings.max_pallets_per_truck)
    };
    let pallets = pallets_by_weight(max_pallets, amount(settings.truck_weight), amount(product.pallet_weight));
    let transport = transport_per_unit(amount(settings.transport_rate), amount(product.units_per_pallet), pallets);

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
pub struct PolbrukData {
    #[serde(default)]
    pub settings: PolbrukSettings,
    #[serde(default)]
    pub products: Vec<PolbrukProduct>,
}

impl PriceList for PolbrukData {
    type Product = PolbrukProduct;

    fn products(&self) -> &[PolbrukProduct] {
        &self.products
    }

    fn price(&self, product: &PolbrukProduct) -> Priced<PolbrukProduct> {
        calculate(product, &self.settings)
    }
}
