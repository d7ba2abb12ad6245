// ==========================================
// Viveverde Weekly Purchase-Order System - Item Entities
// ==========================================
// Input-side entities: one struct per external table row.
// No data access logic, no engine logic.
// ==========================================

use crate::domain::types::{Category, ItemKey};
use serde::{Deserialize, Serialize};

// Fixed markup used to derive a missing price from cost (and back).
pub const MARKUP_RATIO: f64 = 2.5;

// ==========================================
// ItemSalesRecord - one historical sales row
// ==========================================
// Units/revenue sold in the analogous week last year. Multiple rows may
// exist per item and week; the demand scaler groups them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSalesRecord {
    pub code: String,
    pub name: String,
    pub size: String,
    pub color: String,
    pub section: String,
    pub week: u32,          // ISO week number
    pub units: f64,         // historical units (fractional after returns)
    pub revenue: f64,       // historical revenue, informational
}

impl ItemSalesRecord {
    pub fn key(&self) -> ItemKey {
        ItemKey::new(&self.code, &self.size, &self.color)
    }
}

// ==========================================
// ItemClassification - ABC+D row
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemClassification {
    pub category: Category,
    pub suggested_action: Option<String>,   // free text, resolved by the engine
    pub suggested_discount_pct: f64,        // informational only
}

impl Default for ItemClassification {
    /// Items absent from the classification table behave as category C
    /// with no suggested action.
    fn default() -> Self {
        Self {
            category: Category::C,
            suggested_action: None,
            suggested_discount_pct: 0.0,
        }
    }
}

// ==========================================
// ItemEconomics - price / cost / supplier
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemEconomics {
    pub price: f64,         // PVP, list price
    pub cost: f64,          // unit cost
    pub supplier: String,
}

impl ItemEconomics {
    /// Derive a missing price or cost through the fixed markup ratio.
    ///
    /// Invariant: price == 0 -> price = cost x 2.5; cost == 0 ->
    /// cost = price / 2.5; both zero -> both stay 0 (the item then
    /// contributes zero revenue, which is not an error).
    ///
    /// Returns true when a derivation was applied.
    pub fn resolve_markup(&mut self) -> bool {
        if self.price == 0.0 && self.cost > 0.0 {
            self.price = self.cost * MARKUP_RATIO;
            true
        } else if self.cost == 0.0 && self.price > 0.0 {
            self.cost = self.price / MARKUP_RATIO;
            true
        } else {
            false
        }
    }
}

// ==========================================
// OperationalSignals - warehouse reality per item
// ==========================================
// Current physical stock plus last week's actual vs targeted sales.
// All three default to 0 when the item is unknown to the signal feeds.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OperationalSignals {
    pub physical_stock: u32,
    pub actual_sales_prev_week: u32,
    pub target_sales_prev_week: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_derives_price_from_cost() {
        let mut eco = ItemEconomics {
            price: 0.0,
            cost: 4.0,
            supplier: String::new(),
        };
        assert!(eco.resolve_markup());
        assert!((eco.price - 10.0).abs() < 1e-9);
        assert!((eco.cost - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_markup_derives_cost_from_price() {
        let mut eco = ItemEconomics {
            price: 10.0,
            cost: 0.0,
            supplier: String::new(),
        };
        assert!(eco.resolve_markup());
        assert!((eco.cost - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_markup_leaves_both_zero() {
        let mut eco = ItemEconomics::default();
        assert!(!eco.resolve_markup());
        assert_eq!(eco.price, 0.0);
        assert_eq!(eco.cost, 0.0);
    }

    #[test]
    fn test_markup_no_change_when_both_present() {
        let mut eco = ItemEconomics {
            price: 12.0,
            cost: 7.0,
            supplier: String::new(),
        };
        assert!(!eco.resolve_markup());
        assert!((eco.price - 12.0).abs() < 1e-9);
        assert!((eco.cost - 7.0).abs() < 1e-9);
    }
}
