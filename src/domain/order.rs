// ==========================================
// Viveverde Weekly Purchase-Order System - Order Entities
// ==========================================
// Output-side entities: the per-item order row and the per-section
// summary. Rows are created once per (item, week, section) and are
// immutable after assembly.
// ==========================================

use crate::domain::types::{Category, ItemKey, StockScenario};
use serde::{Deserialize, Serialize};

// ==========================================
// WeeklyOrderRow - one emitted order line
// ==========================================
// Carries every intermediate quantity of the pipeline so buyers can audit
// the correction chain: final_units -> base_order -> corrected_order ->
// final_order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyOrderRow {
    // ===== Identity =====
    pub code: String,
    pub name: String,
    pub size: String,
    pub color: String,
    pub section: String,
    pub week: u32,

    // ===== Economics / classification =====
    pub price: f64,                   // PVP
    pub cost: f64,
    pub supplier: String,
    pub category: Category,
    pub applied_action: String,       // label: MANTENER / REDUCIR 20% / ...

    // ===== Forecast (pre-safety) =====
    pub final_units: u32,             // scaled + reconciled demand units

    // ===== Safety buffer =====
    pub safety_target: u32,           // ceil(final_units x safety_pct)
    pub delta_buffer: i64,            // safety_target - previous buffer
    pub base_order: u32,              // final_units + delta_buffer, floored at 0

    // ===== Warehouse corrections =====
    pub physical_stock: u32,
    pub corrected_order: u32,         // max(0, base_order + safety_target - stock)
    pub stock_scenario: StockScenario,
    pub actual_sales_prev_week: u32,
    pub target_sales_prev_week: u32,
    pub trend_units: u32,             // max(0, actual - target)
    pub final_order: u32,             // corrected_order + trend_units

    // ===== Projected money =====
    pub ventas_objetivo: f64,         // final_units x price, cents
    pub beneficio_objetivo: f64,      // ventas_objetivo - final_units x cost
}

impl WeeklyOrderRow {
    pub fn key(&self) -> ItemKey {
        ItemKey::new(&self.code, &self.size, &self.color)
    }
}

// ==========================================
// SectionSummary - per-section weekly metrics
// ==========================================
// Mirrors the consolidated summary sheet: target breakdown with growth
// and holiday uplift, totals over the emitted rows, and attainment
// against the raw revenue target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSummary {
    pub section: String,
    pub week: u32,

    // ===== Targets =====
    pub last_year_revenue: f64,       // historical revenue of the same week
    pub target_revenue: f64,          // configured weekly target
    pub target_with_growth: f64,      // target x (1 + growth)
    pub target_final: f64,            // target x (1 + growth) x (1 + holiday)
    pub uplift_pct: f64,              // (target_final / target - 1) x 100

    // ===== Totals over emitted rows =====
    pub total_units: u64,             // sum of final_order
    pub total_items: usize,
    pub total_revenue: f64,           // sum of ventas_objetivo
    pub attainment_pct: f64,          // total_revenue / target_revenue x 100

    // ===== Category counts =====
    pub items_a: usize,
    pub items_b: usize,
    pub items_c: usize,
    pub items_d: usize,

    // ===== Run parameters echoed for the sheet =====
    pub holiday_pct: f64,
    pub safety_pct: f64,
    pub total_safety_target: u64,     // sum of safety_target
}
