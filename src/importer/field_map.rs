// ==========================================
// Viveverde Weekly Purchase-Order System - Field Mapping Helpers
// ==========================================
// The upstream exports are hand-maintained spreadsheets: header names
// drift in accents, case and spacing ("Código"/"Codigo", "Acción
// Sugerida"/"Accion sugerida"). All column lookups therefore run on
// normalized names.
// ==========================================

use crate::engine::action_factor::normalize;
use crate::importer::file_parser::RawRecord;

/// Fetch a field by any of its candidate header names,
/// diacritics/case/whitespace-insensitive.
pub fn field<'a>(record: &'a RawRecord, candidates: &[&str]) -> Option<&'a str> {
    for candidate in candidates {
        let wanted = normalize(candidate);
        for (header, value) in record {
            if normalize(header) == wanted {
                return Some(value.as_str());
            }
        }
    }
    None
}

/// Parse a numeric cell; accepts comma decimals and a trailing currency
/// sign. Empty cells read as 0.
pub fn parse_f64(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().trim_end_matches('€').trim().replace(',', ".");
    if cleaned.is_empty() {
        return Some(0.0);
    }
    cleaned.parse::<f64>().ok()
}

/// Parse a unit-count cell: numeric, floored at 0, whole units.
pub fn parse_units(raw: &str) -> Option<u32> {
    parse_f64(raw).map(|v| if v > 0.0 { v.round() as u32 } else { 0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_field_lookup_ignores_accents_and_case() {
        let mut record: RawRecord = HashMap::new();
        record.insert("Código".to_string(), "10234".to_string());
        record.insert("Acción Sugerida".to_string(), "Mantener".to_string());

        assert_eq!(field(&record, &["Codigo"]), Some("10234"));
        assert_eq!(field(&record, &["accion sugerida"]), Some("Mantener"));
        assert_eq!(field(&record, &["Talla"]), None);
    }

    #[test]
    fn test_parse_f64_accepts_comma_decimals() {
        assert_eq!(parse_f64("12,50"), Some(12.5));
        assert_eq!(parse_f64("12.50"), Some(12.5));
        assert_eq!(parse_f64(" 3 €"), Some(3.0));
        assert_eq!(parse_f64(""), Some(0.0));
        assert_eq!(parse_f64("n/a"), None);
    }

    #[test]
    fn test_parse_units_floors_negatives() {
        assert_eq!(parse_units("4"), Some(4));
        assert_eq!(parse_units("4.0"), Some(4));
        assert_eq!(parse_units("-2"), Some(0));
    }
}
