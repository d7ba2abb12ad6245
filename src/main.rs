// ==========================================
// Viveverde Weekly Purchase-Order System - CLI Entry
// ==========================================
// Usage: retail-order-engine [config.json]
// ==========================================
// One run: load configuration, then for every configured section and
// week run the order pipeline, write the order/summary files and commit
// the safety-buffer state. A failed section is logged and skipped; the
// run continues with the next one.
// ==========================================

use anyhow::Context;
use retail_order_engine::config::RunConfig;
use retail_order_engine::engine::{OrderOrchestrator, SectionInputs};
use retail_order_engine::importer::{
    ClassificationImporter, EconomicsImporter, SalesImporter, SignalsImporter,
};
use retail_order_engine::report::OrderWriter;
use retail_order_engine::repository::JsonFileBufferRepository;
use retail_order_engine::{logging, APP_NAME, VERSION};
use std::collections::HashMap;
use std::env;

fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", APP_NAME);
    tracing::info!("version: {}", VERSION);
    tracing::info!("==================================================");

    let config_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "config/config.json".to_string());
    let config = RunConfig::load(&config_path)
        .with_context(|| format!("cannot load configuration from {}", config_path))?;

    let buffer = JsonFileBufferRepository::open(&config.state_file)
        .with_context(|| format!("cannot open state file {}", config.state_file.display()))?;
    tracing::info!(
        state_file = %config.state_file.display(),
        tracked_items = buffer.tracked_items(),
        last_processed_week = ?buffer.last_processed_week(),
        "buffer state loaded"
    );

    let orchestrator = OrderOrchestrator::new(
        config.growth_rate,
        config.safety_stock_pct,
        config.emit_filter,
    );
    let writer = OrderWriter::new(&config.output_dir);

    let mut sections: Vec<&String> = config.sections.keys().collect();
    sections.sort();

    let mut processed_sections = 0usize;
    let mut failed_sections = 0usize;
    let mut last_week_done: Option<u32> = None;

    for section in sections {
        let section = section.as_str();
        let section_config = &config.sections[section];
        tracing::info!(section, "===== processing section =====");

        // Mandatory tables: a load failure skips the whole section.
        let sales = match SalesImporter::load(&section_config.sales_file, section) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(section, error = %e, "sales table unavailable, section skipped");
                failed_sections += 1;
                continue;
            }
        };
        let classification = match ClassificationImporter::load(&section_config.classification_file)
        {
            Ok(table) => table,
            Err(e) => {
                tracing::error!(section, error = %e, "classification unavailable, section skipped");
                failed_sections += 1;
                continue;
            }
        };
        let economics = match EconomicsImporter::load(&section_config.economics_file) {
            Ok(table) => table,
            Err(e) => {
                tracing::error!(section, error = %e, "economics unavailable, section skipped");
                failed_sections += 1;
                continue;
            }
        };

        // Optional warehouse feed
        let signals = match &section_config.signals_file {
            Some(path) => SignalsImporter::load_optional(path).unwrap_or_else(|e| {
                tracing::warn!(section, error = %e, "signals feed unreadable, using zeros");
                HashMap::new()
            }),
            None => HashMap::new(),
        };

        let mut summaries = Vec::new();
        for week in config.weeks_for(section) {
            let weekly_sales: Vec<_> = sales.iter().filter(|r| r.week == week).cloned().collect();

            let inputs = SectionInputs {
                sales: weekly_sales,
                classification: Some(classification.clone()),
                economics: Some(economics.clone()),
                signals: signals.clone(),
            };

            let order = match orchestrator.process_section(
                section,
                week,
                inputs,
                config.target(section, week),
                config.holiday(week),
                &buffer,
            ) {
                Ok(order) => order,
                Err(e) => {
                    tracing::error!(section, week, error = %e, "week skipped");
                    continue;
                }
            };

            if order.reconciliation_residual > 0.0 {
                tracing::debug!(
                    section,
                    week,
                    residual = order.reconciliation_residual,
                    "accepted reconciliation residual"
                );
            }

            writer.write_order(&order.rows, section, week)?;
            summaries.push(order.summary);
            last_week_done = Some(last_week_done.map_or(week, |w| w.max(week)));
        }

        writer.write_summary(&summaries, section)?;
        processed_sections += 1;
    }

    if let Some(week) = last_week_done {
        buffer.set_last_processed_week(week)?;
    }

    tracing::info!(
        processed_sections,
        failed_sections,
        last_week = ?last_week_done,
        "run finished"
    );

    Ok(())
}
