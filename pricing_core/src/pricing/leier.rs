//! Leier modular blocks. Product-level discount in percent; a product
//! without its own pallets-per-truck figure ships 22 pallets per truck.

use serde::{Deserialize, Serialize};

use super::{finish, transport_per_unit, CatalogProduct, PriceList, Priced};
use crate::units::{amount, lenient_number, Percentage};

/// Pallets per truck when a product does not say otherwise
pub const DEFAULT_PALLETS_PER_TRUCK: f64 = 22.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeierProduct {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default, alias = "nazwa")]
    pub name: String,
    #[serde(default, alias = "jednostka")]
    pub unit: String,
    #[serde(default, alias = "iloscNaPalecie", deserialize_with = "lenient_number")]
    pub units_per_pallet: Option<f64>,
    #[serde(default, alias = "waga", deserialize_with = "lenient_number")]
    pub pallet_weight: Option<f64>,
    #[serde(default, alias = "cenaNetto", deserialize_with = "lenient_number")]
    pub net_price: Option<f64>,
    #[serde(default, alias = "rabat", deserialize_with = "lenient_number")]
    pub discount: Option<f64>,
    #[serde(default, alias = "palletsPerTruck", deserialize_with = "lenient_number")]
    pub pallets_per_truck: Option<f64>,
}

impl CatalogProduct for LeierProduct {
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
        vec![&self.name[..], &self.symbol[..]]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeierSettings {
    #[serde(default, alias = "transportRate", deserialize_with = "lenient_number")]
    pub transport_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub margin: Option<f64>,
}

impl Default for LeierSettings {
    fn default() -> Self {
        LeierSettings {
            transport_rate: Some(600.0),
            margin: Some(25.0),
        }
    }
}

pub fn calculate(product: &LeierProduct, settings: &LeierSettings) -> Priced<LeierProduct> {
    let list = amount(product.net_price);
    let discount = Percentage::percent_or_zero(product.discount);
    let pallets = match amount(product.pallets_per_truck) {
        p if p > 0.0 => p,
        _ => DEFAULT_PALLETS_PER_TRUCK,
    };
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
pub struct LeierData {
    #[serde(default)]
    pub settings: LeierSettings,
    #[serde(default)]
    pub products: Vec<LeierProduct>,
}

impl PriceList for LeierData {
    type Product = LeierProduct;

    fn products(&self) -> &[LeierProduct] {
        &self.products
    }

    fn price(&self, product: &LeierProduct) -> Priced<LeierProduct> {
        calculate(product, &self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::VAT_MULTIPLIER;

    fn block() -> LeierProduct {
        LeierProduct {
            id: "leier_1".to_string(),
            symbol: "L-P-25".to_string(),
            name: "Pustak ceramiczny 25 P+W".to_string(),
            unit: "szt.".to_string(),
            units_per_pallet: Some(72.0),
            pallet_weight: Some(1.2),
            net_price: Some(8.5),
            discount: Some(10.0),
            pallets_per_truck: Some(22.0),
        }
    }

    #[test]
    fn test_full_pipeline() {
        let p = calculate(&block(), &LeierSettings::default()).pricing;
        let after = 8.5 * 0.9;
        let transport = 600.0 / (72.0 * 22.0);
        assert!((p.price_after_discount - after).abs() < 1e-9);
        assert!((p.transport_per_unit - transport).abs() < 1e-12);
        assert!((p.customer_net_price - (after + transport) * 1.25).abs() < 1e-9);
        assert_eq!(p.customer_gross_price, p.customer_net_price * VAT_MULTIPLIER);
    }

    #[test]
    fn test_default_pallets_per_truck() {
        let mut product = block();
        product.pallets_per_truck = None;
        let with_default = calculate(&product, &LeierSettings::default()).pricing;
        let explicit = calculate(&block(), &LeierSettings::default()).pricing;
        assert_eq!(with_default.transport_per_unit, explicit.transport_per_unit);
    }

    #[test]
    fn test_no_units_no_transport() {
        let mut product = block();
        product.units_per_pallet = Some(f64::NAN);
        let p = calculate(&product, &LeierSettings::default()).pricing;
        assert_eq!(p.transport_per_unit, 0.0);
    }
}
