// ==========================================
// Viveverde Weekly Purchase-Order System - Revenue Reconciler
// ==========================================
// Stage 2 of the pipeline: ceiling rounding in the demand scaler
// systematically overshoots the revenue target; this stage greedily
// removes the excess one unit at a time, cheapest items first.
// ==========================================
// Single pass, ascending price, each item decremented at most once.
// A greedy heuristic, not a solver: a small positive residual may
// remain when no further single-unit decrement fits. The residual is
// accepted and shows up in the summary attainment percentage.
// ==========================================

use crate::engine::demand_scaler::OrderDraft;
use tracing::{debug, instrument};

// ==========================================
// RevenueReconciler
// ==========================================
pub struct RevenueReconciler;

impl RevenueReconciler {
    pub fn new() -> Self {
        Self
    }

    /// Trim rounding overshoot so projected revenue does not exceed
    /// objetivo_final. Returns the residual delta left after the pass
    /// (0.0 when there was no overshoot).
    ///
    /// Also freezes the per-item money columns: Ventas_Objetivo =
    /// final_units x price, Beneficio_Objetivo = Ventas_Objetivo -
    /// final_units x cost, both rounded to cents.
    #[instrument(skip_all, fields(items = drafts.len(), objetivo_final))]
    pub fn reconcile(&self, drafts: &mut [OrderDraft], objetivo_final: f64) -> f64 {
        let projected: f64 = drafts
            .iter()
            .map(|d| d.final_units as f64 * d.price)
            .sum();
        let delta = projected - objetivo_final;

        let mut remaining = delta;
        if delta > 0.0 {
            // Cheapest first; stable sort keeps the incoming order for
            // equal prices so reruns stay bit-identical.
            let mut by_price: Vec<usize> = (0..drafts.len()).collect();
            by_price.sort_by(|&a, &b| {
                drafts[a]
                    .price
                    .partial_cmp(&drafts[b].price)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            for idx in by_price {
                if remaining <= 0.0 {
                    break;
                }
                let draft = &mut drafts[idx];
                if draft.final_units > 0 && draft.price <= remaining {
                    draft.final_units -= 1;
                    remaining -= draft.price;
                }
            }

            debug!(
                overshoot = delta,
                residual = remaining.max(0.0),
                "revenue overshoot trimmed"
            );
        }

        for draft in drafts.iter_mut() {
            draft.ventas_objetivo = round_cents(draft.final_units as f64 * draft.price);
            draft.beneficio_objetivo =
                round_cents(draft.ventas_objetivo - draft.final_units as f64 * draft.cost);
        }

        remaining.max(0.0)
    }
}

impl Default for RevenueReconciler {
    fn default() -> Self {
        Self::new()
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ==========================================
// Unit tests
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Category, ItemKey, StockScenario};

    fn draft(code: &str, units: u32, price: f64, cost: f64) -> OrderDraft {
        OrderDraft {
            key: ItemKey::new(code, "U", ""),
            name: format!("Articulo {}", code),
            section: "vivero".to_string(),
            week: 14,
            category: Category::A,
            action_factor: 1.0,
            applied_action: "MANTENER".to_string(),
            price,
            cost,
            supplier: String::new(),
            base_units: units as f64,
            weighted_units: units as f64,
            final_units: units,
            ventas_objetivo: 0.0,
            beneficio_objetivo: 0.0,
            safety_target: 0,
            delta_buffer: 0,
            base_order: 0,
            physical_stock: 0,
            corrected_order: 0,
            stock_scenario: StockScenario::Optimal,
            actual_sales_prev_week: 0,
            target_sales_prev_week: 0,
            trend_units: 0,
            final_order: 0,
        }
    }

    #[test]
    fn test_no_overshoot_leaves_units_untouched() {
        let reconciler = RevenueReconciler::new();
        let mut drafts = vec![draft("1", 10, 10.0, 4.0)];
        let residual = reconciler.reconcile(&mut drafts, 100.0);
        assert_eq!(residual, 0.0);
        assert_eq!(drafts[0].final_units, 10);
        assert!((drafts[0].ventas_objetivo - 100.0).abs() < 1e-9);
        assert!((drafts[0].beneficio_objetivo - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_cheapest_items_are_trimmed_first() {
        let reconciler = RevenueReconciler::new();
        let mut drafts = vec![
            draft("expensive", 5, 40.0, 10.0),
            draft("cheap", 5, 5.0, 2.0),
            draft("mid", 5, 12.0, 4.0),
        ];
        // projected = 200 + 25 + 60 = 285; target 270 -> delta 15
        reconciler.reconcile(&mut drafts, 270.0);
        // cheap (5) then mid (12 > 10 remaining? 15-5=10, 12 > 10 skip),
        // expensive 40 > 10 skip -> only cheap trimmed
        assert_eq!(drafts[0].final_units, 5);
        assert_eq!(drafts[1].final_units, 4);
        assert_eq!(drafts[2].final_units, 5);
    }

    #[test]
    fn test_single_pass_never_decrements_twice() {
        let reconciler = RevenueReconciler::new();
        let mut drafts = vec![draft("1", 10, 1.0, 0.5)];
        // Overshoot of 5 could be closed by 5 decrements, but a single
        // pass removes at most one unit per item.
        let residual = reconciler.reconcile(&mut drafts, 5.0);
        assert_eq!(drafts[0].final_units, 9);
        assert!((residual - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_units_never_go_negative() {
        let reconciler = RevenueReconciler::new();
        let mut drafts = vec![draft("1", 0, 2.0, 1.0), draft("2", 1, 3.0, 1.0)];
        reconciler.reconcile(&mut drafts, 0.0);
        assert_eq!(drafts[0].final_units, 0);
        assert_eq!(drafts[1].final_units, 0);
    }

    #[test]
    fn test_residual_accepted_when_no_decrement_fits() {
        let reconciler = RevenueReconciler::new();
        let mut drafts = vec![draft("1", 3, 10.0, 4.0)];
        // delta = 30 - 25 = 5, price 10 > 5 -> nothing fits
        let residual = reconciler.reconcile(&mut drafts, 25.0);
        assert_eq!(drafts[0].final_units, 3);
        assert!((residual - 5.0).abs() < 1e-9);
    }
}
