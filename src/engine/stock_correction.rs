// ==========================================
// Viveverde Weekly Purchase-Order System - Stock Deviation Corrector
// ==========================================
// Stage 4 of the pipeline: reconciles the theoretical order against the
// physical stock count reported by the warehouse.
// ==========================================
// corrected_order = max(0, base_order + (safety_target - physical_stock))
//
// Stock above the safety target shrinks the order (possibly to 0);
// stock below it grows the order to restore the buffer. Each row also
// gets a scenario label so buyers can read why the order moved.
// ==========================================

use crate::domain::item::OperationalSignals;
use crate::domain::types::{ItemKey, StockScenario};
use crate::engine::demand_scaler::OrderDraft;
use std::collections::HashMap;
use tracing::{debug, instrument};

// ==========================================
// StockDeviationCorrector
// ==========================================
pub struct StockDeviationCorrector;

impl StockDeviationCorrector {
    pub fn new() -> Self {
        Self
    }

    /// Correct every draft against its physical stock count. Items
    /// absent from the signals feed run with stock 0 (nothing on hand).
    #[instrument(skip_all, fields(items = drafts.len()))]
    pub fn apply(
        &self,
        drafts: &mut [OrderDraft],
        signals: &HashMap<ItemKey, OperationalSignals>,
    ) {
        for draft in drafts.iter_mut() {
            let stock = signals
                .get(&draft.key)
                .map(|s| s.physical_stock)
                .unwrap_or(0);

            draft.physical_stock = stock;
            draft.corrected_order = Self::correct(draft.base_order, draft.safety_target, stock);
            draft.stock_scenario = Self::classify(stock, draft.safety_target);

            if draft.stock_scenario == StockScenario::Surplus {
                debug!(
                    item = %draft.key,
                    stock,
                    safety_target = draft.safety_target,
                    corrected_order = draft.corrected_order,
                    "surplus stock shrank the order"
                );
            }
        }
    }

    /// The correction formula itself.
    pub fn correct(base_order: u32, safety_target: u32, physical_stock: u32) -> u32 {
        (base_order as i64 + safety_target as i64 - physical_stock as i64).max(0) as u32
    }

    /// Position of the warehouse relative to the safety target.
    pub fn classify(physical_stock: u32, safety_target: u32) -> StockScenario {
        if physical_stock < safety_target {
            StockScenario::Deficit
        } else if physical_stock == safety_target {
            StockScenario::Optimal
        } else {
            StockScenario::Surplus
        }
    }
}

impl Default for StockDeviationCorrector {
    fn default() -> Self {
        Self::new()
    }
}
