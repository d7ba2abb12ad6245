// ==========================================
// Viveverde Weekly Purchase-Order System - Economics Importer
// ==========================================
// Maps the tariff/cost export into ItemEconomics keyed by item.
// Expected columns: Codigo, Talla, Color, Tarifa10 (PVP), Coste,
// Nombre proveedor.
// ==========================================
// The markup derivation for missing price/cost happens in the engine,
// not here: the importer reports the sheet as-is. The only repair done
// at load time is the supplier fallback - rows without a supplier take
// the supplier of any other row with the same bare code.
// ==========================================

use crate::domain::item::ItemEconomics;
use crate::domain::types::ItemKey;
use crate::importer::error::ImportError;
use crate::importer::field_map::{field, parse_f64};
use crate::importer::file_parser::{RawRecord, UniversalFileParser};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

pub struct EconomicsImporter;

impl EconomicsImporter {
    pub fn load(path: &Path) -> Result<HashMap<ItemKey, ItemEconomics>, ImportError> {
        let records = UniversalFileParser.parse(path)?;
        let table = Self::map_records(&records);
        info!(file = %path.display(), items = table.len(), "economics loaded");
        Ok(table)
    }

    pub fn map_records(records: &[RawRecord]) -> HashMap<ItemKey, ItemEconomics> {
        let mut table: HashMap<ItemKey, ItemEconomics> = HashMap::with_capacity(records.len());
        // bare code -> first non-empty supplier seen
        let mut supplier_by_code: HashMap<String, String> = HashMap::new();

        for (idx, record) in records.iter().enumerate() {
            let code = match field(record, &["Codigo", "Código artículo", "Articulo"]) {
                Some(c) if !c.is_empty() => c.to_string(),
                _ => {
                    warn!(row = idx + 2, "economics row skipped: missing item code");
                    continue;
                }
            };

            let key = ItemKey::new(
                code.clone(),
                field(record, &["Talla"]).unwrap_or(""),
                field(record, &["Color"]).unwrap_or(""),
            );

            let price = field(record, &["Tarifa10", "PVP"])
                .and_then(parse_f64)
                .unwrap_or(0.0);
            let cost = field(record, &["Coste"]).and_then(parse_f64).unwrap_or(0.0);
            let supplier = field(record, &["Nombre proveedor", "Proveedor"])
                .unwrap_or("")
                .to_string();

            if !supplier.is_empty() {
                supplier_by_code.entry(code).or_insert_with(|| supplier.clone());
            }

            table.insert(
                key,
                ItemEconomics {
                    price,
                    cost,
                    supplier,
                },
            );
        }

        // Supplier fallback by bare code; price and cost never change here.
        for (key, eco) in table.iter_mut() {
            if eco.supplier.is_empty() {
                if let Some(found) = supplier_by_code.get(&key.code) {
                    eco.supplier = found.clone();
                }
            }
        }

        table
    }
}
