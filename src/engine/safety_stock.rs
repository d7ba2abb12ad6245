// ==========================================
// Viveverde Weekly Purchase-Order System - Safety Stock Calculator
// ==========================================
// Stage 3 of the pipeline: derives each item's minimum buffer and the
// delta against the buffer tracked last week.
// Input: final_units + persisted buffer state
// Output: safety_target / delta_buffer / base_order per item, plus the
// fresh buffer map to persist after the section assembles
// ==========================================
// The persisted buffer is REPLACED with the current safety target every
// week, never accumulated.
// ==========================================

use crate::domain::types::ItemKey;
use crate::engine::demand_scaler::OrderDraft;
use crate::repository::BufferStateRepository;
use std::collections::HashMap;
use tracing::instrument;

// ==========================================
// SafetyStockCalculator
// ==========================================
pub struct SafetyStockCalculator;

impl SafetyStockCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Apply the buffer computation to every draft:
    ///
    /// safety_target = ceil(final_units x safety_pct)
    /// delta_buffer  = safety_target - previous_buffer
    /// base_order    = final_units + delta_buffer (floored at 0)
    ///
    /// Returns the new buffer targets keyed by item; the orchestrator
    /// commits them only after the whole section assembles.
    #[instrument(skip_all, fields(items = drafts.len(), safety_pct))]
    pub fn apply(
        &self,
        drafts: &mut [OrderDraft],
        safety_pct: f64,
        buffer: &dyn BufferStateRepository,
    ) -> HashMap<ItemKey, u32> {
        let mut updates: HashMap<ItemKey, u32> = HashMap::with_capacity(drafts.len());

        for draft in drafts.iter_mut() {
            let safety_target = (draft.final_units as f64 * safety_pct).ceil() as u32;
            let previous = buffer.get(&draft.key);

            draft.safety_target = safety_target;
            draft.delta_buffer = safety_target as i64 - previous as i64;
            draft.base_order =
                (draft.final_units as i64 + draft.delta_buffer).max(0) as u32;

            // Last writer wins for duplicate keys inside one section.
            updates.insert(draft.key.clone(), safety_target);
        }

        updates
    }
}

impl Default for SafetyStockCalculator {
    fn default() -> Self {
        Self::new()
    }
}
