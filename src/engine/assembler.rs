// ==========================================
// Viveverde Weekly Purchase-Order System - Order Assembler
// ==========================================
// Stage 6 of the pipeline: freezes the drafts into immutable order rows,
// applies the emission criterion, and computes the section summary.
// ==========================================
// Emission: EmitFilter::FinalOrder keeps rows with final_order > 0 (the
// default); EmitFilter::FinalUnits keeps rows with final_units > 0,
// which preserves items whose corrected order collapsed to 0 because of
// overstock. One criterion per run, driving both the order file and the
// summary totals.
// ==========================================

use crate::domain::order::{SectionSummary, WeeklyOrderRow};
use crate::domain::types::{Category, EmitFilter};
use crate::engine::demand_scaler::{OrderDraft, ScalingOutcome};
use tracing::{info, instrument};

// ==========================================
// SummaryParams - run facts echoed into the summary
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct SummaryParams {
    pub target_revenue: f64,
    pub growth_rate: f64,
    pub holiday: f64,
    pub safety_pct: f64,
    pub last_year_revenue: f64,
}

// ==========================================
// OrderAssembler
// ==========================================
pub struct OrderAssembler {
    emit_filter: EmitFilter,
}

impl OrderAssembler {
    pub fn new(emit_filter: EmitFilter) -> Self {
        Self { emit_filter }
    }

    /// Freeze drafts into the emitted row set plus the section summary.
    ///
    /// Rows are ordered by supplier, then code, then projected revenue
    /// descending - the order buyers read the sheet in.
    #[instrument(skip_all, fields(section = %section, week, drafts = drafts.len()))]
    pub fn assemble(
        &self,
        drafts: Vec<OrderDraft>,
        section: &str,
        week: u32,
        outcome: &ScalingOutcome,
        params: &SummaryParams,
    ) -> (Vec<WeeklyOrderRow>, SectionSummary) {
        let mut rows: Vec<WeeklyOrderRow> = drafts
            .into_iter()
            .filter(|d| match self.emit_filter {
                EmitFilter::FinalOrder => d.final_order > 0,
                EmitFilter::FinalUnits => d.final_units > 0,
            })
            .map(|d| WeeklyOrderRow {
                code: d.key.code.clone(),
                name: d.name,
                size: d.key.size.clone(),
                color: d.key.color.clone(),
                section: d.section,
                week: d.week,
                price: d.price,
                cost: d.cost,
                supplier: d.supplier,
                category: d.category,
                applied_action: d.applied_action,
                final_units: d.final_units,
                safety_target: d.safety_target,
                delta_buffer: d.delta_buffer,
                base_order: d.base_order,
                physical_stock: d.physical_stock,
                corrected_order: d.corrected_order,
                stock_scenario: d.stock_scenario,
                actual_sales_prev_week: d.actual_sales_prev_week,
                target_sales_prev_week: d.target_sales_prev_week,
                trend_units: d.trend_units,
                final_order: d.final_order,
                ventas_objetivo: d.ventas_objetivo,
                beneficio_objetivo: d.beneficio_objetivo,
            })
            .collect();

        rows.sort_by(|a, b| {
            a.supplier
                .cmp(&b.supplier)
                .then_with(|| a.code.cmp(&b.code))
                .then_with(|| {
                    b.ventas_objetivo
                        .partial_cmp(&a.ventas_objetivo)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        });

        let summary = self.summarize(&rows, section, week, outcome, params);

        info!(
            emitted = rows.len(),
            total_units = summary.total_units,
            total_revenue = summary.total_revenue,
            attainment_pct = summary.attainment_pct,
            "section order assembled"
        );

        (rows, summary)
    }

    fn summarize(
        &self,
        rows: &[WeeklyOrderRow],
        section: &str,
        week: u32,
        outcome: &ScalingOutcome,
        params: &SummaryParams,
    ) -> SectionSummary {
        let total_units: u64 = rows.iter().map(|r| r.final_order as u64).sum();
        let total_revenue: f64 = rows.iter().map(|r| r.ventas_objetivo).sum();
        let total_safety_target: u64 = rows.iter().map(|r| r.safety_target as u64).sum();

        let count = |cat: Category| rows.iter().filter(|r| r.category == cat).count();

        let target = params.target_revenue;
        let uplift_pct = if target > 0.0 {
            round1((outcome.objetivo_final / target - 1.0) * 100.0)
        } else {
            0.0
        };
        let attainment_pct = if target > 0.0 {
            round1(total_revenue / target * 100.0)
        } else {
            0.0
        };

        SectionSummary {
            section: section.to_string(),
            week,
            last_year_revenue: round2(params.last_year_revenue),
            target_revenue: target,
            target_with_growth: round2(target * (1.0 + params.growth_rate)),
            target_final: round2(outcome.objetivo_final),
            uplift_pct,
            total_units,
            total_items: rows.len(),
            total_revenue: round2(total_revenue),
            attainment_pct,
            items_a: count(Category::A),
            items_b: count(Category::B),
            items_c: count(Category::C),
            items_d: count(Category::D),
            holiday_pct: params.holiday * 100.0,
            safety_pct: params.safety_pct * 100.0,
            total_safety_target,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
