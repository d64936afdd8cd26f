//! Solbet cellular concrete. One discount and one truck cost for the whole
//! list; discount and margin are percents.

use serde::{Deserialize, Serialize};

use super::{finish, transport_per_unit, CatalogProduct, PriceList, Priced};
use crate::units::{amount, lenient_number, Percentage};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolbetProduct {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Density class, 500 or 600 kg/m³
    #[serde(default, deserialize_with = "lenient_number")]
    pub density: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub width: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub height: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub length: Option<f64>,
    #[serde(default, alias = "priceNet", deserialize_with = "lenient_number")]
    pub net_price: Option<f64>,
    #[serde(default)]
    pub category: String,
    #[serde(default, alias = "unitsPerPallet", deserialize_with = "lenient_number")]
    pub units_per_pallet: Option<f64>,
    #[serde(default, alias = "palletsPerTruck", deserialize_with = "lenient_number")]
    pub pallets_per_truck: Option<f64>,
    #[serde(default, alias = "mortarType", skip_serializing_if = "Option::is_none")]
    pub mortar_type: Option<String>,
    #[serde(default, alias = "mortarConsumption", deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub mortar_consumption: Option<f64>,
}

impl CatalogProduct for SolbetProduct {
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

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolbetSettings {
    /// Cost of one full truck
    #[serde(default, alias = "transportCost", deserialize_with = "lenient_number")]
    pub transport_cost: Option<f64>,
    #[serde(default, alias = "discountPercent", deserialize_with = "lenient_number")]
    pub discount_percent: Option<f64>,
    /// Margin in percent
    #[serde(default, deserialize_with = "lenient_number")]
    pub margin: Option<f64>,
}

impl Default for SolbetSettings {
    fn default() -> Self {
        SolbetSettings {
            transport_cost: Some(2800.0),
            discount_percent: Some(0.0),
            margin: Some(20.0),
        }
    }
}

pub fn calculate(product: &SolbetProduct, settings: &SolbetSettings) -> Priced<SolbetProduct> {
    let list = amount(product.net_price);
    let discount = Percentage::percent_or_zero(settings.discount_percent);
    let transport = transport_per_unit(
        amount(settings.transport_cost),
        amount(product.units_per_pallet),
        amount(product.pallets_per_truck),
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
pub struct SolbetData {
    #[serde(default)]
    pub settings: SolbetSettings,
    #[serde(default)]
    pub products: Vec<SolbetProduct>,
}

impl PriceList for SolbetData {
    type Product = SolbetProduct;

    fn products(&self) -> &[SolbetProduct] {
        &self.products
    }

    fn price(&self, product: &SolbetProduct) -> Priced<SolbetProduct> {
        calculate(product, &self.settings)
    }
}
