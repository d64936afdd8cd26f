//! # pricing_core - Building Materials Pricing Engine
//!
//! `pricing_core` prices construction materials from six manufacturers'
//! lists and builds bills of materials for Leier chimney systems. All inputs
//! and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: calculators are pure functions over a snapshot of data
//! - **Lenient input**: malformed numbers in price lists become 0, not errors
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use pricing_core::chimney::{expand, ChimneyConfig, ChimneySystemKind, ComponentCatalog};
//!
//! let catalog = ComponentCatalog::builtin().unwrap();
//! let config = ChimneyConfig::default_for(ChimneySystemKind::Insulated);
//! let lines = expand(&config, 0.0, &catalog).unwrap();
//! assert_eq!(lines[0].id, "PK_40");
//! ```
//!
//! ## Modules
//!
//! - [`pricing`] - per-manufacturer price calculators
//! - [`chimney`] - chimney and ventilation bills of materials, quotes
//! - [`workbook`] - the saved state: price lists, catalog, quote requests
//! - [`units`] - percentages, lengths, lenient numeric fields
//! - [`errors`] - structured error types
//! - [`file_io`] - workbook files with atomic saves and locking

mod assets;
pub mod chimney;
pub mod errors;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_io;
pub mod pricing;
pub mod units;
pub mod workbook;

pub use errors::{CalcError, CalcResult};
#[cfg(not(target_arch = "wasm32"))]
pub use file_io::{load_workbook, save_workbook, FileLock, JsonFileStore, SnapshotStore};
pub use pricing::{Manufacturer, ManufacturerCatalogs, PriceBreakdown, Priced};
pub use workbook::{QuoteRequest, Workbook, WorkbookMetadata};
