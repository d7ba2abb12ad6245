// ==========================================
// Viveverde Weekly Purchase-Order System - Action Factor Resolver
// ==========================================
// Resolves the free-text "Acción Sugerida" merchandising directive into
// a purchase factor applied to last year's units.
// Input: classification action text (possibly absent)
// Output: SuggestedAction variant + numeric factor + applied label
// ==========================================
// The reduction/increase tables are literal business rules and are NOT
// linear ("reducir compras 70%" and "50%" both map to 0.50). Preserve
// the table values; do not infer a formula.
// ==========================================

use crate::domain::types::SuggestedAction;

// ==========================================
// Literal phrase tables
// ==========================================

// Reduction phrases: (phrase, declared pct). First match wins, in order.
const REDUCTION_PHRASES: &[(&str, u32)] = &[
    ("reducir compras 70%", 70),
    ("reducir compras 50%", 50),
    ("reducir compras 40%", 40),
    ("reducir compras 35%", 35),
    ("reducir compras 30%", 30),
    ("reducir compras 25%", 25),
    ("reducir compras 20%", 20),
    ("reducir compras 15%", 15),
    ("aplicar descuento 20%", 20),
    ("implementar promocion del 15%", 15),
];

// Maintain phrases: factor 1.0.
const MAINTAIN_PHRASES: &[&str] = &[
    "mantener el nivel de compras actual",
    "mantener nivel de compras",
    "mantener nivel de compras anterior",
];

// Increase phrases: (phrase, declared pct). First match wins, in order.
const INCREASE_PHRASES: &[(&str, u32)] = &[
    ("aumentar compras 50%", 50),
    ("aumentar compras 40%", 40),
    ("incrementar compras 30%", 30),
    ("aumentar compras 30%", 30),
    ("aumentar compras 25%", 25),
    ("incrementar compras 20%", 20),
    ("aumentar compras 15%", 15),
];

// ==========================================
// ActionFactorResolver
// ==========================================
pub struct ActionFactorResolver;

impl ActionFactorResolver {
    pub fn new() -> Self {
        Self
    }

    /// Parse an action text into its closed form.
    ///
    /// Resolution order (first match wins):
    /// 1) "eliminar del catalogo" -> Eliminate
    /// 2) reduction phrase table -> ReduceByTable(pct)
    /// 3) "aplicar descuento N%" outside the table -> ReduceGeneric(N)
    /// 4) maintain phrases -> Maintain
    /// 5) increase phrase table -> IncreaseByTable(pct)
    /// 6) anything else (or no text) -> Default
    ///
    /// Matching runs on normalized text: lowercase, diacritics stripped,
    /// trimmed.
    pub fn resolve(&self, action_text: Option<&str>) -> SuggestedAction {
        let raw = match action_text {
            Some(t) if !t.trim().is_empty() => t,
            _ => return SuggestedAction::Default,
        };

        let accion = normalize(raw);

        // Rule 1: dropped from the catalogue
        if accion.contains("eliminar del catalogo") {
            return SuggestedAction::Eliminate;
        }

        // Rule 2: reduction table (includes the named promotions)
        for (phrase, pct) in REDUCTION_PHRASES {
            if accion.contains(phrase) {
                return SuggestedAction::ReduceByTable(*pct);
            }
        }

        // Rule 3: generic discount with an extracted percentage
        if accion.contains("aplicar descuento") {
            if let Some(pct) = extract_percentage(&accion, "aplicar descuento") {
                return SuggestedAction::ReduceGeneric(pct);
            }
        }

        // Rule 4: keep buying at the current level
        for phrase in MAINTAIN_PHRASES {
            if accion.contains(phrase) {
                return SuggestedAction::Maintain;
            }
        }

        // Rule 5: increase table
        for (phrase, pct) in INCREASE_PHRASES {
            if accion.contains(phrase) {
                return SuggestedAction::IncreaseByTable(*pct);
            }
        }

        // Rule 6: unrecognized text keeps purchases unchanged
        SuggestedAction::Default
    }

    /// Map a closed action to its purchase factor.
    ///
    /// Pure function; table variants use the literal factor table.
    pub fn factor(action: SuggestedAction) -> f64 {
        match action {
            SuggestedAction::Eliminate => 0.0,
            SuggestedAction::ReduceByTable(pct) => match pct {
                70 => 0.50,
                50 => 0.50,
                40 => 0.60,
                35 => 0.65,
                30 => 0.65,
                25 => 0.75,
                20 => 0.80,
                15 => 0.85,
                // Unreachable through resolve(); treated as keep-level.
                _ => 1.0,
            },
            SuggestedAction::ReduceGeneric(pct) => 1.0 - pct / 100.0,
            SuggestedAction::Maintain => 1.0,
            SuggestedAction::IncreaseByTable(pct) => match pct {
                50 => 1.50,
                40 => 1.40,
                30 => 1.30,
                25 => 1.25,
                20 => 1.20,
                15 => 1.15,
                _ => 1.0,
            },
            SuggestedAction::Default => 1.0,
        }
    }

    /// Label shown in the order file, derived from the factor.
    pub fn applied_label(factor: f64) -> String {
        if factor == 0.0 {
            "ELIMINAR".to_string()
        } else if factor < 1.0 {
            format!("REDUCIR {}%", ((1.0 - factor) * 100.0) as u32)
        } else if factor > 1.0 {
            format!("AUMENTAR {}%", ((factor - 1.0) * 100.0) as u32)
        } else {
            "MANTENER".to_string()
        }
    }
}

impl Default for ActionFactorResolver {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// Text normalization
// ==========================================

/// Lowercase, fold Spanish diacritics, trim.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(fold_diacritic)
        .collect::<String>()
        .trim()
        .to_string()
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

/// Extract the percentage following a marker phrase: "... N%" or "... N,5%".
///
/// Accepts comma or dot decimals; returns None when no digits precede a
/// '%' after the marker.
fn extract_percentage(text: &str, marker: &str) -> Option<f64> {
    let after = &text[text.find(marker)? + marker.len()..];
    let pct_pos = after.find('%')?;
    let digits: String = after[..pct_pos]
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.replace(',', ".").parse::<f64>().ok()
}

// ==========================================
// Unit tests
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn factor_of(text: &str) -> f64 {
        let resolver = ActionFactorResolver::new();
        ActionFactorResolver::factor(resolver.resolve(Some(text)))
    }

    #[test]
    fn test_eliminate_with_accents() {
        assert_eq!(factor_of("Eliminar del catálogo"), 0.0);
    }

    #[test]
    fn test_reduction_table_is_literal() {
        // 70% and 50% intentionally share the same factor.
        assert_eq!(factor_of("Reducir compras 70%"), 0.50);
        assert_eq!(factor_of("Reducir compras 50%"), 0.50);
        assert_eq!(factor_of("Reducir compras 40%"), 0.60);
        assert_eq!(factor_of("Reducir compras 35%"), 0.65);
        assert_eq!(factor_of("Reducir compras 30%"), 0.65);
        assert_eq!(factor_of("Reducir compras 25%"), 0.75);
        assert_eq!(factor_of("Reducir compras 20%"), 0.80);
        assert_eq!(factor_of("Reducir compras 15%"), 0.85);
    }

    #[test]
    fn test_named_promotions() {
        assert_eq!(factor_of("Aplicar descuento 20%"), 0.80);
        assert_eq!(factor_of("Implementar promoción del 15%"), 0.85);
    }

    #[test]
    fn test_generic_discount_extraction() {
        // Not in the table: factor is 1 - N/100.
        let f = factor_of("Aplicar descuento 12,5%");
        assert!((f - 0.875).abs() < 1e-9);
        let f = factor_of("aplicar descuento 35%");
        assert!((f - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_maintain_phrases() {
        assert_eq!(factor_of("Mantener el nivel de compras actual"), 1.0);
        assert_eq!(factor_of("Mantener nivel de compras"), 1.0);
    }

    #[test]
    fn test_increase_table() {
        assert_eq!(factor_of("Aumentar compras 50%"), 1.50);
        assert_eq!(factor_of("Aumentar compras 40%"), 1.40);
        assert_eq!(factor_of("Incrementar compras 30%"), 1.30);
        assert_eq!(factor_of("Aumentar compras 30%"), 1.30);
        assert_eq!(factor_of("Aumentar compras 25%"), 1.25);
        assert_eq!(factor_of("Incrementar compras 20%"), 1.20);
        assert_eq!(factor_of("Aumentar compras 15%"), 1.15);
    }

    #[test]
    fn test_absent_and_unparseable_default_to_one() {
        let resolver = ActionFactorResolver::new();
        assert_eq!(resolver.resolve(None), SuggestedAction::Default);
        assert_eq!(resolver.resolve(Some("   ")), SuggestedAction::Default);
        assert_eq!(resolver.resolve(Some("revisar escaparate")), SuggestedAction::Default);
        assert_eq!(factor_of("aplicar descuento sin cifra"), 1.0);
    }

    #[test]
    fn test_applied_labels() {
        assert_eq!(ActionFactorResolver::applied_label(0.0), "ELIMINAR");
        assert_eq!(ActionFactorResolver::applied_label(1.0), "MANTENER");
        assert_eq!(ActionFactorResolver::applied_label(0.80), "REDUCIR 19%");
        assert_eq!(ActionFactorResolver::applied_label(1.30), "AUMENTAR 30%");
    }
}
