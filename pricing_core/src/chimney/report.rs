//! # Report Aggregation
//!
//! A bill of materials is a list of [`ReportItem`] lines. Totals are never
//! stored: [`summarize`] recomputes them from the current lines, so editing
//! a quantity can never leave a stale total behind.

use serde::{Deserialize, Serialize};

use crate::units::{Percentage, VAT_MULTIPLIER};

/// One bill-of-materials line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportItem {
    /// Catalog id the line was built from
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Unit net price after the purchase discount
    pub price: f64,
    /// May be fractional (mineral wool is sold by the half metre)
    pub quantity: f64,
    /// `price * quantity`
    pub total: f64,
}

impl ReportItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64, quantity: f64) -> Self {
        ReportItem {
            id: id.into(),
            name: name.into(),
            price,
            quantity,
            total: price * quantity,
        }
    }

    /// Change the quantity by `delta`. A change that would go below zero is
    /// refused and returns `false`.
    pub fn adjust_quantity(&mut self, delta: f64) -> bool {
        let next = self.quantity + delta;
        if !next.is_finite() || next < 0.0 {
            return false;
        }
        self.quantity = next;
        self.total = self.price * next;
        true
    }
}

/// Totals of one list of lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportTotals {
    pub total_net: f64,
    pub total_net_after_margin: f64,
    pub total_gross_after_margin: f64,
}

/// Sum the lines and apply margin (percent) and VAT.
pub fn summarize(items: &[ReportItem], margin_percent: f64) -> ReportTotals {
    let total_net: f64 = items.iter().map(|i| i.total).sum();
    let after_margin = total_net * Percentage::from_percent(margin_percent).markup();
    ReportTotals {
        total_net,
        total_net_after_margin: after_margin,
        total_gross_after_margin: after_margin * VAT_MULTIPLIER,
    }
}

/// A list of lines together with the margin applied to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BomReport {
    pub items: Vec<ReportItem>,
    /// Margin in percent
    pub margin: f64,
}

impl BomReport {
    pub fn new(items: Vec<ReportItem>, margin: f64) -> Self {
        BomReport { items, margin }
    }

    pub fn totals(&self) -> ReportTotals {
        summarize(&self.items, self.margin)
    }

    /// Adjust the quantity of line `index` by ±`delta`.
    ///
    /// Returns `false` when the index is out of range or the quantity would
    /// drop below zero.
    pub fn adjust(&mut self, index: usize, delta: f64) -> bool {
        self.items
            .get_mut(index)
            .map(|item| item.adjust_quantity(delta))
            .unwrap_or(false)
    }

    /// Adjust the line built from catalog id `id`.
    pub fn adjust_by_id(&mut self, id: &str, delta: f64) -> bool {
        self.items
            .iter_mut()
            .find(|item| item.id == id)
            .map(|item| item.adjust_quantity(delta))
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines() -> Vec<ReportItem> {
        vec![
            ReportItem::new("PK_40", "Pustak kominowy K40", 41.0, 18.0),
            ReportItem::new("WM_18", "Wełna mineralna", 60.0, 6.5),
        ]
    }

    #[test]
    fn test_summarize() {
        let totals = summarize(&lines(), 20.0);
        assert_eq!(totals.total_net, 738.0 + 390.0);
        assert!((totals.total_net_after_margin - 1128.0 * 1.2).abs() < 1e-9);
        assert_eq!(totals.total_gross_after_margin, totals.total_net_after_margin * VAT_MULTIPLIER);
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[], 20.0), ReportTotals::default());
    }

    #[test]
    fn test_adjust_clamps_at_zero() {
        let mut item = ReportItem::new("KU", "Kit", 75.0, 1.0);
        assert!(item.adjust_quantity(-1.0));
        assert_eq!(item.quantity, 0.0);
        assert_eq!(item.total, 0.0);
        assert!(!item.adjust_quantity(-1.0));
        assert_eq!(item.quantity, 0.0);
        assert!(item.adjust_quantity(1.0));
        assert_eq!(item.total, 75.0);
    }

    #[test]
    fn test_report_totals_follow_edits() {
        let mut report = BomReport::new(lines(), 0.0);
        let before = report.totals().total_net;
        assert!(report.adjust(0, 1.0));
        assert_eq!(report.totals().total_net, before + 41.0);
        assert!(report.adjust_by_id("WM_18", -1.0));
        assert_eq!(report.items[1].quantity, 5.5);
        assert!(!report.adjust(9, 1.0));
        assert!(!report.adjust_by_id("NOPE", 1.0));
    }
}
