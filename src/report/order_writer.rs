// ==========================================
// Viveverde Weekly Purchase-Order System - Order File Writer
// ==========================================
// Writes the emitted row set and the section summary as CSV files the
// purchasing team imports into their sheets. Column names follow the
// historical order sheet; spreadsheet styling stays out of scope.
// ==========================================

use crate::domain::order::{SectionSummary, WeeklyOrderRow};
use anyhow::Context;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct OrderWriter {
    output_dir: PathBuf,
}

impl OrderWriter {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Write one (section, week) order file.
    ///
    /// Returns the path written, or None when there are no rows to emit
    /// (an empty order produces no file, mirroring the historical
    /// behavior).
    pub fn write_order(
        &self,
        rows: &[WeeklyOrderRow],
        section: &str,
        week: u32,
    ) -> anyhow::Result<Option<PathBuf>> {
        if rows.is_empty() {
            return Ok(None);
        }

        fs::create_dir_all(&self.output_dir)?;
        let stamp = Local::now().format("%d%m%Y");
        let path = self
            .output_dir
            .join(format!("Pedido_Semana_{:02}_{}_{}.csv", week, section, stamp));

        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("cannot create order file {}", path.display()))?;

        writer.write_record([
            "Codigo_Articulo",
            "Nombre_Articulo",
            "Talla",
            "Color",
            "Seccion",
            "Unidades_Finales",
            "PVP",
            "Coste_Pedido",
            "Categoria",
            "Accion_Aplicada",
            "Stock_Minimo_Objetivo",
            "Diferencia_Stock",
            "Pedido_Base",
            "Stock_Real",
            "Pedido_Corregido_Stock",
            "Escenario_Stock",
            "Uds_Objetivo_Semana_Pasada",
            "Ventas_Reales_Semana_Pasada",
            "Tendencia_Consumo",
            "Pedido_Final",
            "Ventas_Objetivo",
            "Beneficio_Objetivo",
            "Proveedor",
        ])?;

        for row in rows {
            writer.write_record([
                row.code.clone(),
                row.name.clone(),
                row.size.clone(),
                row.color.clone(),
                row.section.clone(),
                row.final_units.to_string(),
                format!("{:.2}", row.price),
                format!("{:.2}", row.cost),
                row.category.to_string(),
                row.applied_action.clone(),
                row.safety_target.to_string(),
                row.delta_buffer.to_string(),
                row.base_order.to_string(),
                row.physical_stock.to_string(),
                row.corrected_order.to_string(),
                row.stock_scenario.to_string(),
                row.target_sales_prev_week.to_string(),
                row.actual_sales_prev_week.to_string(),
                row.trend_units.to_string(),
                row.final_order.to_string(),
                format!("{:.2}", row.ventas_objetivo),
                format!("{:.2}", row.beneficio_objetivo),
                row.supplier.clone(),
            ])?;
        }

        writer.flush()?;
        info!(file = %path.display(), rows = rows.len(), "order file written");
        Ok(Some(path))
    }

    /// Write the consolidated summary for one section.
    pub fn write_summary(
        &self,
        summaries: &[SectionSummary],
        section: &str,
    ) -> anyhow::Result<Option<PathBuf>> {
        if summaries.is_empty() {
            return Ok(None);
        }

        fs::create_dir_all(&self.output_dir)?;
        let stamp = Local::now().format("%d%m%Y");
        let path = self
            .output_dir
            .join(format!("Resumen_Pedidos_{}_{}.csv", section, stamp));

        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("cannot create summary file {}", path.display()))?;

        writer.write_record([
            "Seccion",
            "Semana",
            "Vtas_Semana_Anyo_Pasado",
            "Objetivo_Semana",
            "Objetivo_Con_Crecimiento",
            "Objetivo_Final",
            "Incremento_Pct",
            "Total_Unidades",
            "Total_Articulos",
            "Total_Importe",
            "Alcance_Objetivo_Pct",
            "Articulos_A",
            "Articulos_B",
            "Articulos_C",
            "Articulos_D",
            "Incremento_Festivo_Pct",
            "Stock_Minimo_Pct",
            "Stock_Minimo_Objetivo",
        ])?;

        for s in summaries {
            writer.write_record([
                s.section.clone(),
                s.week.to_string(),
                format!("{:.2}", s.last_year_revenue),
                format!("{:.2}", s.target_revenue),
                format!("{:.2}", s.target_with_growth),
                format!("{:.2}", s.target_final),
                format!("{:.1}", s.uplift_pct),
                s.total_units.to_string(),
                s.total_items.to_string(),
                format!("{:.2}", s.total_revenue),
                format!("{:.1}", s.attainment_pct),
                s.items_a.to_string(),
                s.items_b.to_string(),
                s.items_c.to_string(),
                s.items_d.to_string(),
                format!("{:.1}", s.holiday_pct),
                format!("{:.1}", s.safety_pct),
                s.total_safety_target.to_string(),
            ])?;
        }

        writer.flush()?;
        info!(file = %path.display(), weeks = summaries.len(), "summary file written");
        Ok(Some(path))
    }
}
