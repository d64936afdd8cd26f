//! Chimney component catalog: catalog id -> name and list net price.
//!
//! Missing components and components priced at zero are never ordered; the
//! bill-of-materials builder skips them.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assets;
use crate::errors::{CalcError, CalcResult};

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChimneyComponent {
    pub id: String,
    pub name: String,
    /// List net price per piece
    pub price: f64,
}

impl ChimneyComponent {
    /// True when the component can appear in a bill of materials
    pub fn is_orderable(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}

/// All components keyed by catalog id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentCatalog {
    components: BTreeMap<String, ChimneyComponent>,
}

static BUILTIN_COMPONENTS: Lazy<CalcResult<ComponentCatalog>> =
    Lazy::new(|| assets::load_json("chimney_components.json"));

fn sanitize_price(price: f64) -> f64 {
    if price.is_finite() && price > 0.0 {
        price
    } else {
        0.0
    }
}

impl ComponentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The component price list shipped with the library.
    pub fn builtin() -> CalcResult<Self> {
        (*BUILTIN_COMPONENTS).clone()
    }

    pub fn get(&self, id: &str) -> Option<&ChimneyComponent> {
        self.components.get(id)
    }

    /// Look up a component that can be ordered (present, priced above zero).
    pub fn orderable(&self, id: &str) -> Option<&ChimneyComponent> {
        self.get(id).filter(|c| c.is_orderable())
    }

    /// Add or replace a component. Invalid prices are stored as 0.
    pub fn upsert(&mut self, id: impl Into<String>, name: impl Into<String>, price: f64) {
        let id = id.into();
        let component = ChimneyComponent {
            id: id.clone(),
            name: name.into(),
            price: sanitize_price(price),
        };
        self.components.insert(id, component);
    }

    /// Remove a component, returning it if it existed.
    pub fn remove(&mut self, id: &str) -> Option<ChimneyComponent> {
        self.components.remove(id)
    }

    /// Change the price of an existing component.
    pub fn set_price(&mut self, id: &str, price: f64) -> CalcResult<()> {
        let component = self
            .components
            .get_mut(id)
            .ok_or_else(|| CalcError::component_not_found(id))?;
        component.price = sanitize_price(price);
        debug!(component = id, price = component.price, "component price updated");
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChimneyComponent> {
        self.components.values()
    }

    /// Components whose id or name contains `query` (case-insensitive).
    pub fn search(&self, query: &str) -> Vec<&ChimneyComponent> {
        let needle = query.trim().to_lowercase();
        self.iter()
            .filter(|c| {
                needle.is_empty() || c.id.to_lowercase().contains(&needle) || c.name.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
