//! # Chimney Quote
//!
//! Everything a customer quote needs in one value: the chimney bill of
//! materials, the ventilation bill of materials, the client and the
//! totals of both lists.
//!
//! ```rust
//! use pricing_core::chimney::{
//!     ChimneyConfig, ChimneyQuote, ChimneySystemKind, ClientData, ComponentCatalog, VentilationHeights,
//! };
//!
//! let catalog = ComponentCatalog::builtin().unwrap();
//! let config = ChimneyConfig::default_for(ChimneySystemKind::Insulated);
//! let quote = ChimneyQuote::build(&config, &VentilationHeights::new(), &ClientData::default(), &catalog).unwrap();
//! assert_eq!(quote.system, "LEIER IZOLOWANY");
//! assert!(quote.grand_total_gross() > 0.0);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::bom::expand;
use super::catalog::ComponentCatalog;
use super::client::ClientData;
use super::report::{BomReport, ReportTotals};
use super::system::ChimneyConfig;
use super::ventilation::{expand_ventilation, VentilationHeights};
use crate::errors::CalcResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChimneyQuote {
    /// Display name of the chimney system
    pub system: String,
    pub config: ChimneyConfig,
    pub client: ClientData,
    pub chimney: BomReport,
    pub ventilation: BomReport,
    pub created: DateTime<Utc>,
}

impl ChimneyQuote {
    /// Validate the client terms, expand both bills of materials and
    /// attach the margins.
    pub fn build(
        config: &ChimneyConfig,
        ventilation: &VentilationHeights,
        client: &ClientData,
        catalog: &ComponentCatalog,
    ) -> CalcResult<Self> {
        client.validate()?;
        let chimney_items = expand(config, client.chimney_discount, catalog)?;
        let vent_items = expand_ventilation(ventilation, client.vent_discount, catalog);

        let quote = ChimneyQuote {
            system: config.kind().display_name().to_string(),
            config: config.clone(),
            client: client.clone(),
            chimney: BomReport::new(chimney_items, client.chimney_margin),
            ventilation: BomReport::new(vent_items, client.vent_margin),
            created: Utc::now(),
        };
        info!(
            system = %quote.system,
            chimney_lines = quote.chimney.items.len(),
            vent_lines = quote.ventilation.items.len(),
            "quote built"
        );
        Ok(quote)
    }

    pub fn chimney_totals(&self) -> ReportTotals {
        self.chimney.totals()
    }

    pub fn ventilation_totals(&self) -> ReportTotals {
        self.ventilation.totals()
    }

    /// Net total of both lists after margins
    pub fn grand_total_net(&self) -> f64 {
        self.chimney_totals().total_net_after_margin + self.ventilation_totals().total_net_after_margin
    }

    /// Gross total of both lists after margins
    pub fn grand_total_gross(&self) -> f64 {
        self.chimney_totals().total_gross_after_margin + self.ventilation_totals().total_gross_after_margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chimney::system::ChimneySystemKind;
    use crate::chimney::ventilation::VentilationBlock;
    use crate::units::VAT_MULTIPLIER;

    #[test]
    fn test_quote_totals() {
        let catalog = ComponentCatalog::builtin().unwrap();
        let config = ChimneyConfig::default_for(ChimneySystemKind::Insulated);
        let mut heights = VentilationHeights::new();
        heights.set(VentilationBlock::Lk1, 2.6);
        let client = ClientData {
            chimney_margin: 10.0,
            vent_margin: 0.0,
            ..Default::default()
        };

        let quote = ChimneyQuote::build(&config, &heights, &client, &catalog).unwrap();
        let chimney = quote.chimney_totals();
        assert!((chimney.total_net_after_margin - chimney.total_net * 1.1).abs() < 1e-9);
        assert_eq!(quote.ventilation.items.len(), 1);
        assert!((quote.ventilation_totals().total_net - 8.5 * 11.0).abs() < 1e-9);
        assert!((quote.grand_total_gross() - quote.grand_total_net() * VAT_MULTIPLIER).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_client_rejected() {
        let catalog = ComponentCatalog::builtin().unwrap();
        let config = ChimneyConfig::default_for(ChimneySystemKind::Smart);
        let client = ClientData {
            chimney_discount: -1.0,
            ..Default::default()
        };
        assert!(ChimneyQuote::build(&config, &VentilationHeights::new(), &client, &catalog).is_err());
    }

    #[test]
    fn test_not_implemented_propagates() {
        let catalog = ComponentCatalog::builtin().unwrap();
        let config = ChimneyConfig::default_for(ChimneySystemKind::Multi);
        let err = ChimneyQuote::build(&config, &VentilationHeights::new(), &ClientData::default(), &catalog)
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_IMPLEMENTED");
    }
}
