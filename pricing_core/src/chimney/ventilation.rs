//! Extra ventilation channels built from LK blocks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bom::BomBuilder;
use super::catalog::ComponentCatalog;
use super::keys;
use super::report::ReportItem;
use super::system::OptionCode;
use crate::errors::{CalcError, CalcResult};
use crate::units::Meters;

/// Height of one ventilation block
pub const VENT_BLOCK_HEIGHT_M: f64 = 0.25;

/// LK ventilation block types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VentilationBlock {
    #[serde(rename = "LK1")]
    Lk1,
    #[serde(rename = "LK2")]
    Lk2,
    #[serde(rename = "LK2-40")]
    Lk2_40,
    #[serde(rename = "LK2-P")]
    Lk2P,
    #[serde(rename = "LK3")]
    Lk3,
    #[serde(rename = "LK3-P")]
    Lk3P,
    #[serde(rename = "LK4")]
    Lk4,
    #[serde(rename = "LK4-P")]
    Lk4P,
}

impl VentilationBlock {
    /// Label shown in forms, with block dimensions
    pub fn label(&self) -> &'static str {
        match self {
            VentilationBlock::Lk1 => "LK1 (20x25cm)",
            VentilationBlock::Lk2 => "LK2 (36x25cm)",
            VentilationBlock::Lk2_40 => "LK2-40 (40x25cm)",
            VentilationBlock::Lk2P => "LK2-P (46x20cm)",
            VentilationBlock::Lk3 => "LK3 (52x25cm)",
            VentilationBlock::Lk3P => "LK3-P (67x20cm)",
            VentilationBlock::Lk4 => "LK4 (68x25cm)",
            VentilationBlock::Lk4P => "LK4-P (88x20cm)",
        }
    }
}

impl OptionCode for VentilationBlock {
    const ALL: &'static [Self] = &[
        VentilationBlock::Lk1,
        VentilationBlock::Lk2,
        VentilationBlock::Lk2_40,
        VentilationBlock::Lk2P,
        VentilationBlock::Lk3,
        VentilationBlock::Lk3P,
        VentilationBlock::Lk4,
        VentilationBlock::Lk4P,
    ];

    fn code(&self) -> &'static str {
        match self {
            VentilationBlock::Lk1 => "LK1",
            VentilationBlock::Lk2 => "LK2",
            VentilationBlock::Lk2_40 => "LK2-40",
            VentilationBlock::Lk2P => "LK2-P",
            VentilationBlock::Lk3 => "LK3",
            VentilationBlock::Lk3P => "LK3-P",
            VentilationBlock::Lk4 => "LK4",
            VentilationBlock::Lk4P => "LK4-P",
        }
    }
}

/// Channel height per block type, in meters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VentilationHeights(BTreeMap<VentilationBlock, f64>);

impl VentilationHeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a height. Negative and non-finite values are stored as 0.
    pub fn set(&mut self, block: VentilationBlock, height: f64) {
        let height = if height.is_finite() && height > 0.0 { height } else { 0.0 };
        self.0.insert(block, height);
    }

    /// Set a height from form text, reading its leading number;
    /// unparseable text counts as 0.
    pub fn set_text(&mut self, block: VentilationBlock, text: &str) {
        let height = Meters::parse_leading(text).map(|m| m.0).unwrap_or(0.0);
        self.set(block, height);
    }

    pub fn get(&self, block: VentilationBlock) -> f64 {
        self.0.get(&block).copied().unwrap_or(0.0)
    }

    /// Channels with a positive height, in block order.
    pub fn channels(&self) -> impl Iterator<Item = (VentilationBlock, f64)> + '_ {
        VentilationBlock::ALL
            .iter()
            .map(|block| (*block, self.get(*block)))
            .filter(|(_, height)| *height > 0.0)
    }

    /// True when no channel has a positive height
    pub fn is_empty(&self) -> bool {
        self.0.values().all(|h| *h <= 0.0)
    }
}

/// Blocks needed for a channel of `height_m`.
pub fn block_count(height_m: f64) -> f64 {
    if height_m.is_finite() && height_m > 0.0 {
        (height_m / VENT_BLOCK_HEIGHT_M).ceil()
    } else {
        0.0
    }
}

/// Ventilation bill of materials, one line per block type with a positive
/// height and an orderable catalog entry, in block-type order.
pub fn expand_ventilation(
    heights: &VentilationHeights,
    purchase_discount_percent: f64,
    catalog: &ComponentCatalog,
) -> Vec<ReportItem> {
    let mut bom = BomBuilder::new(catalog, purchase_discount_percent);
    for block in VentilationBlock::ALL {
        bom.add(&keys::ventilation_block(*block), block_count(heights.get(*block)));
    }
    let items = bom.finish();
    debug!(lines = items.len(), "ventilation expanded");
    items
}

/// Parse `LK1=2.6`-style entries into heights.
pub fn parse_height_entries<'a>(entries: impl IntoIterator<Item = &'a str>) -> CalcResult<VentilationHeights> {
    let mut heights = VentilationHeights::new();
    for entry in entries {
        let (code, value) = entry.split_once('=').ok_or_else(|| {
            CalcError::invalid_input("ventilation", entry, "Expected TYPE=HEIGHT, e.g. LK1=2.6")
        })?;
        let block = VentilationBlock::parse_code("ventilation", code)?;
        heights.set_text(block, value);
    }
    Ok(heights)
}
