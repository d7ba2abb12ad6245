// ==========================================
// Viveverde Weekly Purchase-Order System - Operational Signals Importer
// ==========================================
// Maps the warehouse feed into OperationalSignals keyed by item:
// current physical stock and last week's actual vs targeted sales.
// Expected columns: Codigo, Talla, Color, Stock Real, Ventas Reales,
// Unidades Objetivo.
// ==========================================
// The signals feed is OPTIONAL: items (or the whole file) may be
// missing, in which case the corrections run with zeros.
// ==========================================

use crate::domain::item::OperationalSignals;
use crate::domain::types::ItemKey;
use crate::importer::error::ImportError;
use crate::importer::field_map::{field, parse_units};
use crate::importer::file_parser::{RawRecord, UniversalFileParser};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

pub struct SignalsImporter;

impl SignalsImporter {
    /// Load the signals feed; a missing file is an empty feed, not an
    /// error.
    pub fn load_optional(path: &Path) -> Result<HashMap<ItemKey, OperationalSignals>, ImportError> {
        if !path.exists() {
            warn!(file = %path.display(), "signals feed absent, corrections run with zeros");
            return Ok(HashMap::new());
        }
        let records = UniversalFileParser.parse(path)?;
        let table = Self::map_records(&records);
        info!(file = %path.display(), items = table.len(), "operational signals loaded");
        Ok(table)
    }

    pub fn map_records(records: &[RawRecord]) -> HashMap<ItemKey, OperationalSignals> {
        let mut table = HashMap::with_capacity(records.len());

        for (idx, record) in records.iter().enumerate() {
            let code = match field(record, &["Codigo", "Código artículo", "Articulo"]) {
                Some(c) if !c.is_empty() => c,
                _ => {
                    warn!(row = idx + 2, "signals row skipped: missing item code");
                    continue;
                }
            };

            let key = ItemKey::new(
                code,
                field(record, &["Talla"]).unwrap_or(""),
                field(record, &["Color"]).unwrap_or(""),
            );

            let signals = OperationalSignals {
                physical_stock: field(record, &["Stock Real", "Stock Fisico"])
                    .and_then(parse_units)
                    .unwrap_or(0),
                actual_sales_prev_week: field(record, &["Ventas Reales", "Uds. Vtas. reales"])
                    .and_then(parse_units)
                    .unwrap_or(0),
                target_sales_prev_week: field(
                    record,
                    &["Unidades Objetivo", "uds. Objetivo semana pasada"],
                )
                .and_then(parse_units)
                .unwrap_or(0),
            };

            table.insert(key, signals);
        }

        table
    }
}
