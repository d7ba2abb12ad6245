// ==========================================
// Viveverde Weekly Purchase-Order System - Trend Corrector
// ==========================================
// Stage 5 of the pipeline: when last week's real sales exceeded last
// week's target, part of the safety buffer was consumed by unplanned
// demand. The excess is replenished proactively on top of the stock
// correction.
// ==========================================
// trend_units = max(0, actual_prev_week - target_prev_week)
// final_order = corrected_order + trend_units
// ==========================================

use crate::domain::item::OperationalSignals;
use crate::domain::types::ItemKey;
use crate::engine::demand_scaler::OrderDraft;
use std::collections::HashMap;
use tracing::instrument;

// ==========================================
// TrendCorrector
// ==========================================
pub struct TrendCorrector;

impl TrendCorrector {
    pub fn new() -> Self {
        Self
    }

    /// Apply the trend correction to every draft. Items absent from the
    /// signals feed run with 0/0 (no trend signal).
    #[instrument(skip_all, fields(items = drafts.len()))]
    pub fn apply(
        &self,
        drafts: &mut [OrderDraft],
        signals: &HashMap<ItemKey, OperationalSignals>,
    ) {
        for draft in drafts.iter_mut() {
            let (actual, target) = signals
                .get(&draft.key)
                .map(|s| (s.actual_sales_prev_week, s.target_sales_prev_week))
                .unwrap_or((0, 0));

            draft.actual_sales_prev_week = actual;
            draft.target_sales_prev_week = target;
            draft.trend_units = Self::trend_units(actual, target);
            draft.final_order = draft.corrected_order + draft.trend_units;
        }
    }

    /// Buffer depletion signal: sales above target, never negative.
    pub fn trend_units(actual: u32, target: u32) -> u32 {
        actual.saturating_sub(target)
    }
}

impl Default for TrendCorrector {
    fn default() -> Self {
        Self::new()
    }
}
