// ==========================================
// Viveverde Weekly Purchase-Order System - Sales History Importer
// ==========================================
// Maps raw sales rows into ItemSalesRecord. One file per section; the
// section name comes from the caller, not from the sheet.
// Expected columns: Codigo, Nombre, Talla, Color, Semana, Unidades,
// Importe (accent/case tolerant).
// ==========================================

use crate::domain::item::ItemSalesRecord;
use crate::importer::error::ImportError;
use crate::importer::field_map::{field, parse_f64, parse_units};
use crate::importer::file_parser::{RawRecord, UniversalFileParser};
use std::path::Path;
use tracing::{info, warn};

pub struct SalesImporter;

impl SalesImporter {
    /// Load one section's sales history file.
    pub fn load(path: &Path, section: &str) -> Result<Vec<ItemSalesRecord>, ImportError> {
        let records = UniversalFileParser.parse(path)?;
        let rows = Self::map_records(&records, section);
        info!(
            section,
            file = %path.display(),
            rows = rows.len(),
            "sales history loaded"
        );
        Ok(rows)
    }

    pub fn map_records(records: &[RawRecord], section: &str) -> Vec<ItemSalesRecord> {
        let mut rows = Vec::with_capacity(records.len());

        for (idx, record) in records.iter().enumerate() {
            let code = match field(record, &["Codigo", "Código artículo", "Articulo"]) {
                Some(c) if !c.is_empty() => c.to_string(),
                _ => {
                    warn!(row = idx + 2, "sales row skipped: missing item code");
                    continue;
                }
            };

            let week = field(record, &["Semana"])
                .and_then(parse_units)
                .unwrap_or_else(|| {
                    warn!(row = idx + 2, field = "Semana", "unreadable week, using 0");
                    0
                });

            let units = field(record, &["Unidades"])
                .and_then(parse_f64)
                .unwrap_or_else(|| {
                    warn!(row = idx + 2, field = "Unidades", "unreadable units, using 0");
                    0.0
                });

            let revenue = field(record, &["Importe"])
                .and_then(parse_f64)
                .unwrap_or(0.0);

            rows.push(ItemSalesRecord {
                code,
                name: field(record, &["Nombre", "Nombre Articulo"])
                    .unwrap_or("")
                    .to_string(),
                size: field(record, &["Talla"]).unwrap_or("").to_string(),
                color: field(record, &["Color"]).unwrap_or("").to_string(),
                section: section.to_string(),
                week,
                units,
                revenue,
            });
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>()
    }

    #[test]
    fn test_maps_accented_headers() {
        let records = vec![record(&[
            ("Código artículo", "10234"),
            ("Nombre", "Rosal trepador"),
            ("Talla", "M"),
            ("Color", "ROJO"),
            ("Semana", "14"),
            ("Unidades", "6"),
            ("Importe", "54,00"),
        ])];

        let rows = SalesImporter::map_records(&records, "vivero");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].code, "10234");
        assert_eq!(rows[0].week, 14);
        assert!((rows[0].units - 6.0).abs() < 1e-9);
        assert!((rows[0].revenue - 54.0).abs() < 1e-9);
        assert_eq!(rows[0].section, "vivero");
    }

    #[test]
    fn test_skips_rows_without_code() {
        let records = vec![record(&[("Unidades", "6"), ("Semana", "14")])];
        let rows = SalesImporter::map_records(&records, "vivero");
        assert!(rows.is_empty());
    }
}
