// ==========================================
// Viveverde Weekly Purchase-Order System - Demand Scaler
// ==========================================
// Stage 1 of the pipeline: turns last year's per-item units into demand
// units scaled to hit this week's revenue target.
// Input: raw sales rows + classification + economics tables
// Output: OrderDraft per item with final_units (ceiling-rounded)
// ==========================================
// Method:
// 1) weighted_units = base_units x action_factor
// 2) total_preliminary = sum(weighted_units x price)
// 3) factor_total = (1 + growth) x (1 + holiday)
// 4) scale = target x factor_total / total_preliminary (guarded to 1.0)
// 5) final_units = ceil(weighted_units x scale), 0 when non-positive
// ==========================================

use crate::domain::item::{ItemClassification, ItemEconomics, ItemSalesRecord};
use crate::domain::types::{Category, ItemKey, StockScenario};
use crate::engine::action_factor::ActionFactorResolver;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

// ==========================================
// OrderDraft - per-item working row
// ==========================================
// Mutable while it moves through the pipeline stages; the assembler
// freezes it into a WeeklyOrderRow.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub key: ItemKey,
    pub name: String,
    pub section: String,
    pub week: u32,

    pub category: Category,
    pub action_factor: f64,
    pub applied_action: String,

    pub price: f64,
    pub cost: f64,
    pub supplier: String,

    pub base_units: f64,
    pub weighted_units: f64,
    pub final_units: u32,

    // Filled by the revenue reconciler
    pub ventas_objetivo: f64,
    pub beneficio_objetivo: f64,

    // Filled by the safety-stock calculator
    pub safety_target: u32,
    pub delta_buffer: i64,
    pub base_order: u32,

    // Filled by the warehouse corrections
    pub physical_stock: u32,
    pub corrected_order: u32,
    pub stock_scenario: StockScenario,
    pub actual_sales_prev_week: u32,
    pub target_sales_prev_week: u32,
    pub trend_units: u32,
    pub final_order: u32,
}

// ==========================================
// ScalingOutcome - section-level scaling facts
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct ScalingOutcome {
    pub factor_total: f64,        // (1 + growth) x (1 + holiday)
    pub scale: f64,
    pub total_preliminary: f64,   // pre-scaling projected revenue
    pub objetivo_final: f64,      // target_revenue x factor_total
}

// ==========================================
// DemandScaler
// ==========================================
pub struct DemandScaler {
    resolver: ActionFactorResolver,
}

impl DemandScaler {
    pub fn new() -> Self {
        Self {
            resolver: ActionFactorResolver::new(),
        }
    }

    /// Scale one section's weekly sales history against its revenue target.
    ///
    /// Rows are grouped by item key (duplicate rows for the same item are
    /// summed). Items missing from the classification table run as
    /// category C with no action; missing price/cost are derived through
    /// the fixed markup. Both recoveries log a warning and never abort
    /// the section.
    #[instrument(skip_all, fields(section = %section, week, rows = rows.len()))]
    pub fn scale(
        &self,
        rows: &[ItemSalesRecord],
        classification: &HashMap<ItemKey, ItemClassification>,
        economics: &HashMap<ItemKey, ItemEconomics>,
        section: &str,
        week: u32,
        target_revenue: f64,
        growth_rate: f64,
        holiday: f64,
    ) -> (Vec<OrderDraft>, ScalingOutcome) {
        // Group duplicate rows per item, preserving first-seen order so
        // reruns over identical input produce identical output.
        let mut order: Vec<ItemKey> = Vec::new();
        let mut grouped: HashMap<ItemKey, (String, f64, f64)> = HashMap::new();
        for row in rows {
            let key = row.key();
            let entry = grouped.entry(key.clone()).or_insert_with(|| {
                order.push(key);
                (row.name.clone(), 0.0, 0.0)
            });
            entry.1 += row.units;
            entry.2 += row.revenue;
        }

        // Per-item action weighting and economics lookup
        let mut drafts: Vec<OrderDraft> = Vec::with_capacity(order.len());
        for key in order {
            let (name, base_units, _base_revenue) = grouped.remove(&key).unwrap();

            let class = match classification.get(&key) {
                Some(c) => c.clone(),
                None => {
                    warn!(item = %key, "item missing from classification table, using category C");
                    ItemClassification::default()
                }
            };

            let action = self.resolver.resolve(class.suggested_action.as_deref());
            let factor = ActionFactorResolver::factor(action);

            let mut eco = match economics.get(&key) {
                Some(e) => e.clone(),
                None => {
                    warn!(item = %key, field = "price/cost", "item missing from economics table");
                    ItemEconomics::default()
                }
            };
            if eco.resolve_markup() {
                warn!(item = %key, field = "price/cost", "derived missing price or cost via markup");
            }

            drafts.push(OrderDraft {
                key,
                name,
                section: section.to_string(),
                week,
                category: class.category,
                action_factor: factor,
                applied_action: ActionFactorResolver::applied_label(factor),
                price: eco.price,
                cost: eco.cost,
                supplier: eco.supplier,
                base_units,
                weighted_units: base_units * factor,
                final_units: 0,
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
            });
        }

        // Section-level scaling factor
        let total_preliminary: f64 = drafts.iter().map(|d| d.weighted_units * d.price).sum();
        let factor_total = (1.0 + growth_rate) * (1.0 + holiday);

        let scale = if total_preliminary > 0.0 && target_revenue > 0.0 {
            (target_revenue * factor_total) / total_preliminary
        } else {
            warn!(
                section,
                total_preliminary,
                target_revenue,
                "no preliminary revenue or no target, scale defaults to 1.0"
            );
            1.0
        };

        debug!(factor_total, scale, total_preliminary, "scaling factors computed");

        // Ceiling rounding: order units are whole and never rounded down.
        for draft in &mut drafts {
            let scaled = draft.weighted_units * scale;
            draft.final_units = if scaled > 0.0 { scaled.ceil() as u32 } else { 0 };
        }

        let outcome = ScalingOutcome {
            factor_total,
            scale,
            total_preliminary,
            objetivo_final: target_revenue * factor_total,
        };

        (drafts, outcome)
    }
}

impl Default for DemandScaler {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// Unit tests
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Category;

    fn sales_row(code: &str, units: f64, week: u32) -> ItemSalesRecord {
        ItemSalesRecord {
            code: code.to_string(),
            name: format!("Articulo {}", code),
            size: "U".to_string(),
            color: "".to_string(),
            section: "vivero".to_string(),
            week,
            units,
            revenue: 0.0,
        }
    }

    fn economics(price: f64, cost: f64) -> ItemEconomics {
        ItemEconomics {
            price,
            cost,
            supplier: "Proveedor SA".to_string(),
        }
    }

    #[test]
    fn test_aligned_forecast_needs_no_scaling_correction() {
        // target x factor_total == preliminary revenue -> scale 1.0 and
        // units pass through unchanged
        let scaler = DemandScaler::new();
        let rows = vec![sales_row("1", 10.0, 14)];
        let mut eco = HashMap::new();
        eco.insert(ItemKey::new("1", "U", ""), economics(10.0, 4.0));

        // objetivo chosen so that target x factor_total == preliminary
        let target = 100.0 / 1.05;
        let (drafts, outcome) =
            scaler.scale(&rows, &HashMap::new(), &eco, "vivero", 14, target, 0.05, 0.0);
        assert!((outcome.scale - 1.0).abs() < 1e-9);
        assert_eq!(drafts[0].final_units, 10);
    }

    #[test]
    fn test_scale_guard_on_zero_preliminary() {
        let scaler = DemandScaler::new();
        let rows = vec![sales_row("1", 10.0, 14)];
        // No economics -> price 0 -> preliminary 0 -> scale 1.0
        let (drafts, outcome) = scaler.scale(
            &rows,
            &HashMap::new(),
            &HashMap::new(),
            "vivero",
            14,
            500.0,
            0.05,
            0.0,
        );
        assert_eq!(outcome.scale, 1.0);
        assert_eq!(drafts[0].final_units, 10);
    }

    #[test]
    fn test_scale_guard_on_zero_target() {
        let scaler = DemandScaler::new();
        let rows = vec![sales_row("1", 10.0, 14)];
        let mut eco = HashMap::new();
        eco.insert(ItemKey::new("1", "U", ""), economics(10.0, 4.0));
        let (_, outcome) =
            scaler.scale(&rows, &HashMap::new(), &eco, "vivero", 14, 0.0, 0.05, 0.0);
        assert_eq!(outcome.scale, 1.0);
    }

    #[test]
    fn test_duplicate_rows_are_grouped() {
        let scaler = DemandScaler::new();
        let rows = vec![sales_row("1", 4.0, 14), sales_row("1", 6.0, 14)];
        let mut eco = HashMap::new();
        eco.insert(ItemKey::new("1", "U", ""), economics(10.0, 4.0));
        let (drafts, _) = scaler.scale(
            &rows,
            &HashMap::new(),
            &eco,
            "vivero",
            14,
            100.0 / 1.05,
            0.05,
            0.0,
        );
        assert_eq!(drafts.len(), 1);
        assert!((drafts[0].base_units - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_eliminated_item_gets_zero_units() {
        let scaler = DemandScaler::new();
        let rows = vec![sales_row("1", 10.0, 14), sales_row("2", 10.0, 14)];
        let mut classes = HashMap::new();
        classes.insert(
            ItemKey::new("1", "U", ""),
            ItemClassification {
                category: Category::D,
                suggested_action: Some("Eliminar del catálogo".to_string()),
                suggested_discount_pct: 0.0,
            },
        );
        let mut eco = HashMap::new();
        eco.insert(ItemKey::new("1", "U", ""), economics(10.0, 4.0));
        eco.insert(ItemKey::new("2", "U", ""), economics(10.0, 4.0));

        let (drafts, _) = scaler.scale(
            &rows,
            &classes,
            &eco,
            "vivero",
            14,
            100.0 / 1.05,
            0.05,
            0.0,
        );
        let eliminated = drafts.iter().find(|d| d.key.code == "1").unwrap();
        assert_eq!(eliminated.final_units, 0);
        assert_eq!(eliminated.applied_action, "ELIMINAR");
    }

    #[test]
    fn test_holiday_uplift_raises_units() {
        let scaler = DemandScaler::new();
        let rows = vec![sales_row("1", 10.0, 14)];
        let mut eco = HashMap::new();
        eco.insert(ItemKey::new("1", "U", ""), economics(10.0, 4.0));

        let (plain, _) =
            scaler.scale(&rows, &HashMap::new(), &eco, "vivero", 14, 100.0, 0.05, 0.0);
        let (uplifted, _) =
            scaler.scale(&rows, &HashMap::new(), &eco, "vivero", 14, 100.0, 0.05, 0.25);
        assert!(uplifted[0].final_units >= plain[0].final_units);
    }
}
