// ==========================================
// Viveverde Weekly Purchase-Order System - Pipeline Orchestrator
// ==========================================
// Coordinates the pipeline stages for one (section, week):
// demand scaling -> revenue reconciliation -> safety stock ->
// stock-deviation correction -> trend correction -> assembly.
// ==========================================
// Buffer state is read at the start and committed only after the whole
// section assembles. A missing mandatory table aborts this section/week
// only; the caller moves on to the next section.
// ==========================================

use crate::domain::item::{ItemClassification, ItemEconomics, ItemSalesRecord, OperationalSignals};
use crate::domain::order::{SectionSummary, WeeklyOrderRow};
use crate::domain::types::{EmitFilter, ItemKey};
use crate::engine::assembler::{OrderAssembler, SummaryParams};
use crate::engine::demand_scaler::DemandScaler;
use crate::engine::error::EngineError;
use crate::engine::revenue_reconciler::RevenueReconciler;
use crate::engine::safety_stock::SafetyStockCalculator;
use crate::engine::stock_correction::StockDeviationCorrector;
use crate::engine::trend_correction::TrendCorrector;
use crate::repository::BufferStateRepository;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

// ==========================================
// SectionInputs - tables for one (section, week)
// ==========================================
// Sales, classification and economics are mandatory; operational
// signals default to zero per item when the feed is absent.
#[derive(Debug, Default)]
pub struct SectionInputs {
    pub sales: Vec<ItemSalesRecord>,
    pub classification: Option<HashMap<ItemKey, ItemClassification>>,
    pub economics: Option<HashMap<ItemKey, ItemEconomics>>,
    pub signals: HashMap<ItemKey, OperationalSignals>,
}

// ==========================================
// SectionOrder - one processed (section, week)
// ==========================================
#[derive(Debug, Clone)]
pub struct SectionOrder {
    pub rows: Vec<WeeklyOrderRow>,
    pub summary: SectionSummary,
    // Revenue the greedy reconciliation could not trim (accepted)
    pub reconciliation_residual: f64,
}

// ==========================================
// OrderOrchestrator
// ==========================================
pub struct OrderOrchestrator {
    scaler: DemandScaler,
    reconciler: RevenueReconciler,
    safety: SafetyStockCalculator,
    stock: StockDeviationCorrector,
    trend: TrendCorrector,
    assembler: OrderAssembler,
    growth_rate: f64,
    safety_pct: f64,
}

impl OrderOrchestrator {
    pub fn new(growth_rate: f64, safety_pct: f64, emit_filter: EmitFilter) -> Self {
        Self {
            scaler: DemandScaler::new(),
            reconciler: RevenueReconciler::new(),
            safety: SafetyStockCalculator::new(),
            stock: StockDeviationCorrector::new(),
            trend: TrendCorrector::new(),
            assembler: OrderAssembler::new(emit_filter),
            growth_rate,
            safety_pct,
        }
    }

    /// Run the full pipeline for one section and week.
    ///
    /// # Arguments
    /// - inputs: the section's tables for this week
    /// - target_revenue: configured weekly revenue target
    /// - holiday: per-week holiday multiplier (0.0 when none)
    /// - buffer: the persisted safety-buffer store
    #[instrument(skip_all, fields(section = %section, week))]
    pub fn process_section(
        &self,
        section: &str,
        week: u32,
        inputs: SectionInputs,
        target_revenue: f64,
        holiday: f64,
        buffer: &dyn BufferStateRepository,
    ) -> Result<SectionOrder, EngineError> {
        // Mandatory tables: fail the section, not the run.
        let classification =
            inputs
                .classification
                .ok_or_else(|| EngineError::MissingMandatoryInput {
                    section: section.to_string(),
                    week,
                    table: "classification",
                })?;
        let economics = inputs
            .economics
            .ok_or_else(|| EngineError::MissingMandatoryInput {
                section: section.to_string(),
                week,
                table: "economics",
            })?;
        if inputs.sales.is_empty() {
            return Err(EngineError::MissingMandatoryInput {
                section: section.to_string(),
                week,
                table: "sales",
            });
        }

        info!(
            rows = inputs.sales.len(),
            target_revenue, holiday, "processing section week"
        );

        let last_year_revenue: f64 = inputs.sales.iter().map(|r| r.revenue).sum();

        // Stage 1: scale demand against the revenue target
        debug!("stage 1: demand scaling");
        let (mut drafts, outcome) = self.scaler.scale(
            &inputs.sales,
            &classification,
            &economics,
            section,
            week,
            target_revenue,
            self.growth_rate,
            holiday,
        );

        // Stage 2: trim ceiling overshoot
        debug!("stage 2: revenue reconciliation");
        let residual = self.reconciler.reconcile(&mut drafts, outcome.objetivo_final);

        // Stage 3: safety buffer vs persisted state
        debug!("stage 3: safety stock");
        let buffer_updates = self.safety.apply(&mut drafts, self.safety_pct, buffer);

        // Stage 4: reconcile against physical stock
        debug!("stage 4: stock-deviation correction");
        self.stock.apply(&mut drafts, &inputs.signals);

        // Stage 5: replenish consumed buffer on rising demand
        debug!("stage 5: trend correction");
        self.trend.apply(&mut drafts, &inputs.signals);

        // Stage 6: freeze rows + summary
        debug!("stage 6: assembly");
        let params = SummaryParams {
            target_revenue,
            growth_rate: self.growth_rate,
            holiday,
            safety_pct: self.safety_pct,
            last_year_revenue,
        };
        let (rows, summary) = self
            .assembler
            .assemble(drafts, section, week, &outcome, &params);

        // Stage 7: commit buffer state, only now that assembly succeeded
        debug!("stage 7: buffer commit");
        buffer.commit_section(&buffer_updates)?;

        Ok(SectionOrder {
            rows,
            summary,
            reconciliation_residual: residual,
        })
    }
}
