//! # Price Calculators
//!
//! One calculator per manufacturer. Each follows the same shape:
//!
//! - `*Product` - one price-list row (JSON-serializable, nullable numbers)
//! - `*Settings` - the manufacturer's discount/transport/margin settings
//! - `calculate(&product, &settings) -> Priced<Product>` - pure, never fails
//!
//! The common pipeline lives here:
//!
//! ```text
//! list price ── discount ──► price after discount
//!                                 + transport per unit  (truck cost / units per truck)
//!                            = landed price
//!                              × (1 + margin)          = customer net
//!                              × 1.23                   = customer gross
//! ```
//!
//! ## Example
//!
//! ```rust
//! use pricing_core::pricing::leier::{self, LeierProduct, LeierSettings};
//!
//! let product = LeierProduct {
//!     net_price: Some(8.5),
//!     discount: Some(10.0),
//!     units_per_pallet: Some(72.0),
//!     pallets_per_truck: Some(22.0),
//!     ..Default::default()
//! };
//! let priced = leier::calculate(&product, &LeierSettings::default());
//! assert!((priced.pricing.price_after_discount - 7.65).abs() < 1e-9);
//! ```

pub mod brukbet;
pub mod leier;
pub mod polbruk;
pub mod porotherm;
pub mod semmelrock;
pub mod solbet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::assets;
use crate::errors::{CalcError, CalcResult};
use crate::units::{Percentage, VAT_MULTIPLIER};

pub use brukbet::{BrukbetData, BrukbetProduct, BrukbetSettings};
pub use leier::{LeierData, LeierProduct, LeierSettings};
pub use polbruk::{PolbrukData, PolbrukProduct, PolbrukSettings};
pub use porotherm::{PorothermAgreement, PorothermData, PorothermProduct};
pub use semmelrock::{SemmelrockData, SemmelrockProduct, SemmelrockSettings};
pub use solbet::{SolbetData, SolbetProduct, SolbetSettings};

/// Derived prices for one product.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Effective purchase discount in percent
    pub discount_percent: f64,
    /// Unit purchase price after all discounts
    pub price_after_discount: f64,
    /// Truck cost amortized over one unit
    pub transport_per_unit: f64,
    /// Purchase price plus transport
    pub landed_price: f64,
    /// Landed price with the sales margin applied
    pub customer_net_price: f64,
    /// Customer net price with VAT
    pub customer_gross_price: f64,
}

/// A product together with its derived prices.
///
/// Serializes flat: product fields first, then the breakdown fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Priced<P> {
    #[serde(flatten)]
    pub product: P,
    #[serde(flatten)]
    pub pricing: PriceBreakdown,
}

/// Per-unit share of a truck's transport cost.
///
/// Zero when the truck capacity is zero.
pub fn transport_per_unit(cost_per_truck: f64, units_per_pallet: f64, pallets_per_truck: f64) -> f64 {
    let units_per_truck = units_per_pallet * pallets_per_truck;
    if units_per_truck > 0.0 {
        cost_per_truck / units_per_truck
    } else {
        0.0
    }
}

/// Pallets a truck can take once its weight cap is considered.
///
/// When either weight is unknown (0) the pallet-count cap applies alone.
pub fn pallets_by_weight(max_pallets: f64, truck_weight: f64, pallet_weight: f64) -> f64 {
    if pallet_weight > 0.0 && truck_weight > 0.0 {
        max_pallets.min((truck_weight / pallet_weight).floor())
    } else {
        max_pallets
    }
}

/// Apply transport, margin and VAT to a discounted unit price.
pub(crate) fn finish(
    discount_percent: f64,
    price_after_discount: f64,
    transport_per_unit: f64,
    margin: Percentage,
) -> PriceBreakdown {
    let landed_price = price_after_discount + transport_per_unit;
    let customer_net_price = landed_price * margin.markup();
    PriceBreakdown {
        discount_percent,
        price_after_discount,
        transport_per_unit,
        landed_price,
        customer_net_price,
        customer_gross_price: customer_net_price * VAT_MULTIPLIER,
    }
}

/// Read access every price-list row offers to listings and search.
pub trait CatalogProduct {
    /// Catalog symbol or id
    fn symbol(&self) -> &str;
    /// Display name
    fn name(&self) -> &str;
    /// Sales unit ("szt.", "m²"...); empty when the list has none
    fn unit(&self) -> &str {
        ""
    }
    /// List price before any discount
    fn list_price(&self) -> Option<f64>;
    /// Text fields a search query is matched against
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match over [`CatalogProduct::search_fields`].
    ///
    /// An empty query matches everything.
    fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty()
            || self
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Keep only products matching a search query.
pub fn filter_products<'a, P: CatalogProduct>(products: &'a [P], query: &str) -> Vec<&'a P> {
    products.iter().filter(|p| p.matches(query)).collect()
}

/// Uniform summary of one priced product, for listings across manufacturers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedRow {
    pub symbol: String,
    pub name: String,
    pub unit: String,
    pub list_price: f64,
    #[serde(flatten)]
    pub pricing: PriceBreakdown,
}

impl PricedRow {
    fn from_priced<P: CatalogProduct>(priced: &Priced<P>) -> Self {
        PricedRow {
            symbol: priced.product.symbol().to_string(),
            name: priced.product.name().to_string(),
            unit: priced.product.unit().to_string(),
            list_price: crate::units::amount(priced.product.list_price()),
            pricing: priced.pricing,
        }
    }
}

/// A manufacturer's price list together with its settings.
pub trait PriceList {
    type Product: CatalogProduct + Clone;

    /// Products on the active list
    fn products(&self) -> &[Self::Product];

    /// Price one product against this list's settings
    fn price(&self, product: &Self::Product) -> Priced<Self::Product>;

    /// Price every product on the list
    fn price_all(&self) -> Vec<Priced<Self::Product>> {
        self.products().iter().map(|p| self.price(p)).collect()
    }

    /// Price the products matching `query`
    fn search(&self, query: &str) -> Vec<Priced<Self::Product>> {
        filter_products(self.products(), query)
            .into_iter()
            .map(|p| self.price(p))
            .collect()
    }

    /// Summary rows for the products matching `query`
    fn rows(&self, query: &str) -> Vec<PricedRow> {
        self.search(query).iter().map(PricedRow::from_priced).collect()
    }
}

// ============================================================================
// Manufacturers
// ============================================================================

/// Manufacturers with a price calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Manufacturer {
    Porotherm,
    Solbet,
    Brukbet,
    Semmelrock,
    Polbruk,
    Leier,
}

impl Manufacturer {
    /// All manufacturers, in price-list menu order
    pub const ALL: [Manufacturer; 6] = [
        Manufacturer::Porotherm,
        Manufacturer::Solbet,
        Manufacturer::Brukbet,
        Manufacturer::Semmelrock,
        Manufacturer::Polbruk,
        Manufacturer::Leier,
    ];

    /// Short id used in files and on the command line
    pub fn code(&self) -> &'static str {
        match self {
            Manufacturer::Porotherm => "porotherm",
            Manufacturer::Solbet => "solbet",
            Manufacturer::Brukbet => "brukbet",
            Manufacturer::Semmelrock => "semmelrock",
            Manufacturer::Polbruk => "polbruk",
            Manufacturer::Leier => "leier",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Manufacturer::Porotherm => "POROTHERM (Wienerberger)",
            Manufacturer::Solbet => "SOLBET",
            Manufacturer::Brukbet => "BRUK-BET",
            Manufacturer::Semmelrock => "SEMMELROCK stein+design",
            Manufacturer::Polbruk => "POLBRUK S.A.",
            Manufacturer::Leier => "LEIER",
        }
    }

    /// Product range the manufacturer supplies
    pub fn product_type(&self) -> &'static str {
        match self {
            Manufacturer::Porotherm => "Pustaki ceramiczne",
            Manufacturer::Solbet => "Beton komórkowy",
            Manufacturer::Brukbet => "Kostka brukowa i płyty",
            Manufacturer::Semmelrock => "Rozwiązania krajobrazowe",
            Manufacturer::Polbruk => "Materiały budowlane",
            Manufacturer::Leier => "Systemy budowlane",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().replace(['-', ' ', '_'], "").as_str() {
            "porotherm" | "wienerberger" => Ok(Manufacturer::Porotherm),
            "solbet" => Ok(Manufacturer::Solbet),
            "brukbet" => Ok(Manufacturer::Brukbet),
            "semmelrock" => Ok(Manufacturer::Semmelrock),
            "polbruk" => Ok(Manufacturer::Polbruk),
            "leier" => Ok(Manufacturer::Leier),
            _ => Err(CalcError::invalid_input(
                "manufacturer",
                s,
                "Expected one of: porotherm, solbet, brukbet, semmelrock, polbruk, leier",
            )),
        }
    }
}

impl std::fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Price lists and settings of every manufacturer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManufacturerCatalogs {
    #[serde(default)]
    pub porotherm: PorothermData,
    #[serde(default)]
    pub solbet: SolbetData,
    #[serde(default)]
    pub brukbet: BrukbetData,
    #[serde(default)]
    pub semmelrock: SemmelrockData,
    #[serde(default)]
    pub polbruk: PolbrukData,
    #[serde(default)]
    pub leier: LeierData,
}

static BUILTIN_CATALOGS: Lazy<CalcResult<ManufacturerCatalogs>> =
    Lazy::new(|| assets::load_json("manufacturers.json"));

impl ManufacturerCatalogs {
    /// Starter price lists shipped with the library.
    pub fn builtin() -> CalcResult<Self> {
        (*BUILTIN_CATALOGS).clone()
    }

    /// Priced summary rows for one manufacturer, filtered by `query`.
    pub fn price_rows(&self, manufacturer: Manufacturer, query: &str) -> Vec<PricedRow> {
        match manufacturer {
            Manufacturer::Porotherm => self.porotherm.rows(query),
            Manufacturer::Solbet => self.solbet.rows(query),
            Manufacturer::Brukbet => self.brukbet.rows(query),
            Manufacturer::Semmelrock => self.semmelrock.rows(query),
            Manufacturer::Polbruk => self.polbruk.rows(query),
            Manufacturer::Leier => self.leier.rows(query),
        }
    }

    /// Number of products on a manufacturer's active list
    pub fn product_count(&self, manufacturer: Manufacturer) -> usize {
        match manufacturer {
            Manufacturer::Porotherm => self.porotherm.products().len(),
            Manufacturer::Solbet => self.solbet.products().len(),
            Manufacturer::Brukbet => self.brukbet.products().len(),
            Manufacturer::Semmelrock => self.semmelrock.products().len(),
            Manufacturer::Polbruk => self.polbruk.products().len(),
            Manufacturer::Leier => self.leier.products().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_zero_capacity() {
        assert_eq!(transport_per_unit(1100.0, 0.0, 19.0), 0.0);
        assert_eq!(transport_per_unit(1100.0, 72.0, 0.0), 0.0);
        assert!((transport_per_unit(1100.0, 72.0, 19.0) - 0.804_093_567).abs() < 1e-6);
    }

    #[test]
    fn test_pallets_by_weight() {
        assert_eq!(pallets_by_weight(15.0, 26.0, 1.61), 15.0);
        assert_eq!(pallets_by_weight(22.0, 24.0, 1.5), 16.0);
        assert_eq!(pallets_by_weight(22.0, 0.0, 1.6), 22.0);
        assert_eq!(pallets_by_weight(22.0, 24.0, 0.0), 22.0);
    }

    #[test]
    fn test_finish_gross_is_net_times_vat() {
        let b = finish(10.0, 9.0, 0.5, Percentage::from_percent(25.0));
        assert_eq!(b.landed_price, 9.5);
        assert_eq!(b.customer_gross_price, b.customer_net_price * VAT_MULTIPLIER);
    }

    #[test]
    fn test_manufacturer_parsing() {
        assert_eq!(Manufacturer::from_str_flexible("Bruk-Bet").unwrap(), Manufacturer::Brukbet);
        assert_eq!(Manufacturer::from_str_flexible(" LEIER ").unwrap(), Manufacturer::Leier);
        assert!(Manufacturer::from_str_flexible("silikaty").is_err());
        for m in Manufacturer::ALL {
            assert_eq!(Manufacturer::from_str_flexible(m.code()).unwrap(), m);
        }
    }

    #[test]
    fn test_builtin_catalogs_load() {
        let catalogs = ManufacturerCatalogs::builtin().unwrap();
        assert_eq!(catalogs.product_count(Manufacturer::Porotherm), 3);
        assert_eq!(catalogs.product_count(Manufacturer::Solbet), 2);
        assert_eq!(catalogs.brukbet.settings.factories.len(), 3);
        assert!(catalogs.product_count(Manufacturer::Polbruk) > 0);
    }

    #[test]
    fn test_rows_gross_invariant_all_manufacturers() {
        let catalogs = ManufacturerCatalogs::builtin().unwrap();
        for m in Manufacturer::ALL {
            for row in catalogs.price_rows(m, "") {
                assert_eq!(
                    row.pricing.customer_gross_price,
                    row.pricing.customer_net_price * VAT_MULTIPLIER,
                    "{} {}",
                    m.code(),
                    row.symbol
                );
            }
        }
    }

    #[test]
    fn test_price_rows_search() {
        let catalogs = ManufacturerCatalogs::builtin().unwrap();
        let rows = catalogs.price_rows(Manufacturer::Semmelrock, "umbriano");
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.name.contains("Umbriano")));
    }

    #[test]
    fn test_pricing_is_idempotent() {
        let catalogs = ManufacturerCatalogs::builtin().unwrap();
        for m in Manufacturer::ALL {
            assert_eq!(catalogs.price_rows(m, ""), catalogs.price_rows(m, ""));
        }
    }
}
