//! # Leier Chimney Systems
//!
//! Bill-of-materials generation for ten chimney systems, the LK ventilation
//! blocks that go alongside them, and the report totals.
//!
//! ```text
//! ChimneyConfig ──► expand() ──────────────► chimney lines ─┐
//! VentilationHeights ──► expand_ventilation() ► vent lines ──┼─► ChimneyQuote
//! ClientData (discounts, margins) ───────────────────────────┘
//! ```
//!
//! Every line is priced from a [`ComponentCatalog`]; parts the catalog
//! does not list, or lists at price 0, are silently left out.

pub mod bom;
pub mod catalog;
pub mod client;
pub mod keys;
pub mod quote;
pub mod report;
pub mod system;
pub mod ventilation;

pub use bom::expand;
pub use catalog::{ChimneyComponent, ComponentCatalog};
pub use client::ClientData;
pub use quote::ChimneyQuote;
pub use report::{summarize, BomReport, ReportItem, ReportTotals};
pub use system::{ChimneyConfig, ChimneySystemKind, HeightInput, OptionCode};
pub use ventilation::{expand_ventilation, VentilationBlock, VentilationHeights};
