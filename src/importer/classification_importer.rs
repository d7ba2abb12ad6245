// ==========================================
// Viveverde Weekly Purchase-Order System - ABC+D Classification Importer
// ==========================================
// Maps the classification export into ItemClassification keyed by item.
// Expected columns: Articulo/Codigo, Talla, Color, Categoria,
// Accion Sugerida, Descuento Sugerido (%).
// ==========================================

use crate::domain::item::ItemClassification;
use crate::domain::types::{Category, ItemKey};
use crate::importer::error::ImportError;
use crate::importer::field_map::{field, parse_f64};
use crate::importer::file_parser::{RawRecord, UniversalFileParser};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

pub struct ClassificationImporter;

impl ClassificationImporter {
    pub fn load(path: &Path) -> Result<HashMap<ItemKey, ItemClassification>, ImportError> {
        let records = UniversalFileParser.parse(path)?;
        let table = Self::map_records(&records);
        info!(file = %path.display(), items = table.len(), "classification loaded");
        Ok(table)
    }

    pub fn map_records(records: &[RawRecord]) -> HashMap<ItemKey, ItemClassification> {
        let mut table = HashMap::with_capacity(records.len());

        for (idx, record) in records.iter().enumerate() {
            let code = match field(record, &["Articulo", "Artículo", "Codigo"]) {
                Some(c) if !c.is_empty() => c,
                _ => {
                    warn!(row = idx + 2, "classification row skipped: missing item code");
                    continue;
                }
            };

            let key = ItemKey::new(
                code,
                field(record, &["Talla"]).unwrap_or(""),
                field(record, &["Color"]).unwrap_or(""),
            );

            let category = field(record, &["Categoria"])
                .map(Category::parse_or_default)
                .unwrap_or(Category::C);

            let suggested_action = field(record, &["Accion Sugerida", "Acción Sugerida"])
                .filter(|a| !a.is_empty())
                .map(|a| a.to_string());

            let suggested_discount_pct = field(record, &["Descuento Sugerido (%)"])
                .and_then(parse_f64)
                .unwrap_or(0.0);

            // Last row wins for duplicate keys, matching the sheet's
            // own "latest row is authoritative" convention.
            table.insert(
                key,
                ItemClassification {
                    category,
                    suggested_action,
                    suggested_discount_pct,
                },
            );
        }

        table
    }
}
