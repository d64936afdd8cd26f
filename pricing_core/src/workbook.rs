//! # Workbook
//!
//! The `Workbook` is the root container for everything a price desk keeps
//! between sessions. Workbooks serialize to `.cennik` files as
//! human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Workbook
//! ├── meta: WorkbookMetadata (version, owner, timestamps)
//! ├── manufacturers: ManufacturerCatalogs (price lists + settings)
//! ├── chimney: ChimneyWorkspace (component catalog, client, ventilation)
//! └── quotes: HashMap<Uuid, QuoteRequest> (saved chimney configurations)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use pricing_core::workbook::Workbook;
//!
//! let workbook = Workbook::with_builtin_data("Anna").unwrap();
//! assert!(!workbook.chimney.catalog.is_empty());
//!
//! let json = serde_json::to_string_pretty(&workbook).unwrap();
//! assert!(json.contains("Anna"));
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chimney::{ChimneyConfig, ChimneyQuote, ClientData, ComponentCatalog, VentilationHeights};
use crate::errors::{CalcError, CalcResult};
use crate::pricing::ManufacturerCatalogs;

/// Current schema version for .cennik files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root workbook container.
///
/// Saved quotes are stored in a flat UUID-keyed map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workbook {
    pub meta: WorkbookMetadata,

    /// Price lists and settings of every manufacturer
    #[serde(default)]
    pub manufacturers: ManufacturerCatalogs,

    /// Chimney catalog and the current customer's terms
    #[serde(default)]
    pub chimney: ChimneyWorkspace,

    /// Saved chimney quote requests, keyed by UUID
    #[serde(default)]
    pub quotes: HashMap<Uuid, QuoteRequest>,
}

impl Workbook {
    /// Create an empty workbook with no price lists.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pricing_core::workbook::Workbook;
    ///
    /// let workbook = Workbook::new("Anna");
    /// assert_eq!(workbook.meta.owner, "Anna");
    /// assert_eq!(workbook.quote_count(), 0);
    /// ```
    pub fn new(owner: impl Into<String>) -> Self {
        let now = Utc::now();
        Workbook {
            meta: WorkbookMetadata {
                version: SCHEMA_VERSION.to_string(),
                owner: owner.into(),
                created: now,
                modified: now,
            },
            manufacturers: ManufacturerCatalogs::default(),
            chimney: ChimneyWorkspace::default(),
            quotes: HashMap::new(),
        }
    }

    /// Create a workbook seeded with the price lists and component catalog
    /// shipped with the library.
    pub fn with_builtin_data(owner: impl Into<String>) -> CalcResult<Self> {
        let mut workbook = Workbook::new(owner);
        workbook.manufacturers = ManufacturerCatalogs::builtin()?;
        workbook.chimney.catalog = ComponentCatalog::builtin()?;
        Ok(workbook)
    }

    /// Save a quote request. Returns the UUID assigned to it.
    pub fn add_quote(&mut self, request: QuoteRequest) -> Uuid {
        let id = Uuid::new_v4();
        self.quotes.insert(id, request);
        self.touch();
        id
    }

    /// Remove a quote request by UUID.
    pub fn remove_quote(&mut self, id: &Uuid) -> Option<QuoteRequest> {
        let request = self.quotes.remove(id);
        if request.is_some() {
            self.touch();
        }
        request
    }

    pub fn get_quote(&self, id: &Uuid) -> Option<&QuoteRequest> {
        self.quotes.get(id)
    }

    pub fn quote_count(&self) -> usize {
        self.quotes.len()
    }

    /// Build the priced quote for a saved request against this workbook's
    /// component catalog.
    pub fn build_quote(&self, id: &Uuid) -> CalcResult<ChimneyQuote> {
        let request = self
            .get_quote(id)
            .ok_or_else(|| CalcError::invalid_input("quote", id.to_string(), "No saved quote with this id"))?;
        request.build(&self.chimney.catalog)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Workbook::new("")
    }
}

/// Metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbookMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Who keeps this workbook
    pub owner: String,

    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Chimney-side state of a workbook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChimneyWorkspace {
    #[serde(default)]
    pub catalog: ComponentCatalog,
    #[serde(default)]
    pub client: ClientData,
    #[serde(default)]
    pub ventilation: VentilationHeights,
}

/// A chimney configuration saved for later pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Free-form label, e.g. the building address
    #[serde(default)]
    pub label: String,
    pub config: ChimneyConfig,
    #[serde(default)]
    pub ventilation: VentilationHeights,
    #[serde(default)]
    pub client: ClientData,
}

impl QuoteRequest {
    pub fn build(&self, catalog: &ComponentCatalog) -> CalcResult<ChimneyQuote> {
        ChimneyQuote::build(&self.config, &self.ventilation, &self.client, catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chimney::ChimneySystemKind;
    use crate::pricing::Manufacturer;

    fn request() -> QuoteRequest {
        QuoteRequest {
            label: "Dom Polna 3".to_string(),
            config: ChimneyConfig::default_for(ChimneySystemKind::Insulated),
            ventilation: VentilationHeights::new(),
            client: ClientData::default(),
        }
    }

    #[test]
    fn test_workbook_creation() {
        let workbook = Workbook::new("Anna");
        assert_eq!(workbook.meta.owner, "Anna");
        assert_eq!(workbook.meta.version, SCHEMA_VERSION);
        assert!(workbook.chimney.catalog.is_empty());
    }

    #[test]
    fn test_builtin_data() {
        let workbook = Workbook::with_builtin_data("Anna").unwrap();
        assert!(workbook.manufacturers.product_count(Manufacturer::Polbruk) > 0);
        assert!(workbook.chimney.catalog.get("PK_40").is_some());
    }

    #[test]
    fn test_add_build_remove_quote() {
        let mut workbook = Workbook::with_builtin_data("Anna").unwrap();
        let id = workbook.add_quote(request());
        assert_eq!(workbook.quote_count(), 1);

        let quote = workbook.build_quote(&id).unwrap();
        assert_eq!(quote.system, "LEIER IZOLOWANY");

        assert!(workbook.remove_quote(&id).is_some());
        assert!(workbook.build_quote(&id).is_err());
    }

    #[test]
    fn test_workbook_serialization() {
        let mut workbook = Workbook::with_builtin_data("Anna").unwrap();
        workbook.add_quote(request());
        let json = serde_json::to_string_pretty(&workbook).unwrap();
        assert!(json.contains("Dom Polna 3"));
        assert!(json.contains("\"system\": \"izolowany\""));

        let roundtrip: Workbook = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.quote_count(), 1);
        assert_eq!(roundtrip.chimney.catalog, workbook.chimney.catalog);
    }

    #[test]
    fn test_minimal_json_fills_defaults() {
        let json = r#"{"meta":{"version":"0.1.0","owner":"","created":"2025-01-01T00:00:00Z",
            "modified":"2025-01-01T00:00:00Z"}}"#;
        let workbook: Workbook = serde_json::from_str(json).unwrap();
        assert_eq!(workbook.chimney.client.chimney_margin, 20.0);
        assert_eq!(workbook.quote_count(), 0);
    }
}
