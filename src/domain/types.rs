// ==========================================
// Viveverde Weekly Purchase-Order System - Domain Types
// ==========================================
// Closed enumerations and the composite item key.
// Item identity is (code, size, color) - never code alone.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Category - ABC+D merchandising tier
// ==========================================
// A = must-stock, B = complementary, C = marginal, D = to be discontinued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    A,
    B,
    C,
    D,
}

impl Category {
    /// Parse a category letter; anything unrecognized falls back to C,
    /// matching the behavior of the upstream classification export.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "A" => Category::A,
            "B" => Category::B,
            "D" => Category::D,
            _ => Category::C,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::A => write!(f, "A"),
            Category::B => write!(f, "B"),
            Category::C => write!(f, "C"),
            Category::D => write!(f, "D"),
        }
    }
}

// ==========================================
// SuggestedAction - merchandising directive
// ==========================================
// Closed form of the free-text "Acción Sugerida" column. The percentage
// carried is the one declared in the phrase; the purchase factor applied
// for table variants comes from a literal business table and is NOT
// always 1 - pct/100 (see engine::action_factor).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "kind", content = "pct")]
pub enum SuggestedAction {
    /// "eliminar del catalogo" - item dropped from future buys
    Eliminate,
    /// "reducir compras N%" or a named promotion from the reduction table
    ReduceByTable(u32),
    /// "aplicar descuento N%" outside the table - factor 1 - N/100
    ReduceGeneric(f64),
    /// "mantener (el) nivel de compras ..."
    Maintain,
    /// "aumentar/incrementar compras N%" from the increase table
    IncreaseByTable(u32),
    /// No text, or text that matches nothing
    Default,
}

impl fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestedAction::Eliminate => write!(f, "ELIMINAR"),
            SuggestedAction::ReduceByTable(pct) => write!(f, "REDUCIR_TABLA {}%", pct),
            SuggestedAction::ReduceGeneric(pct) => write!(f, "DESCUENTO {}%", pct),
            SuggestedAction::Maintain => write!(f, "MANTENER"),
            SuggestedAction::IncreaseByTable(pct) => write!(f, "AUMENTAR_TABLA {}%", pct),
            SuggestedAction::Default => write!(f, "DEFECTO"),
        }
    }
}

// ==========================================
// StockScenario - stock vs safety-target position
// ==========================================
// Reason label attached to the stock-deviation correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockScenario {
    /// physical stock below the safety target - order grows to recover
    Deficit,
    /// physical stock exactly at the safety target
    Optimal,
    /// physical stock above the safety target - order shrinks
    Surplus,
}

impl fmt::Display for StockScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockScenario::Deficit => write!(f, "DEFICIT"),
            StockScenario::Optimal => write!(f, "OPTIMO"),
            StockScenario::Surplus => write!(f, "EXCEDENTE"),
        }
    }
}

// ==========================================
// EmitFilter - which rows reach the order file
// ==========================================
// Two criteria coexisted across historical iterations of the system:
// final_order > 0 (current default) and final_units > 0 (keeps rows whose
// corrected order is 0 because of overstock). Configurable, one criterion
// per run, applied to both the order file and the section summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmitFilter {
    FinalOrder,
    FinalUnits,
}

impl Default for EmitFilter {
    fn default() -> Self {
        EmitFilter::FinalOrder
    }
}

// ==========================================
// ItemKey - composite item identity
// ==========================================
// Two variants of the same code (different size or color) are distinct
// items; every per-item map in the system is keyed by this composite.
// Canonical string form "code|size|color" matches the keys used in the
// persisted state file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
    pub code: String,
    pub size: String,
    pub color: String,
}

impl ItemKey {
    pub fn new(code: impl Into<String>, size: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            code: code.into().trim().to_string(),
            size: size.into().trim().to_string(),
            color: color.into().trim().to_string(),
        }
    }

    /// Canonical state-file form: "code|size|color".
    pub fn canonical(&self) -> String {
        format!("{}|{}|{}", self.code, self.size, self.color)
    }

    /// Parse the canonical form back into a key.
    ///
    /// Returns None when the string does not have exactly three segments.
    pub fn from_canonical(raw: &str) -> Option<Self> {
        let mut parts = raw.split('|');
        let code = parts.next()?;
        let size = parts.next()?;
        let color = parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(code, size, color))
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_fallback() {
        assert_eq!(Category::parse_or_default("a"), Category::A);
        assert_eq!(Category::parse_or_default(" B "), Category::B);
        assert_eq!(Category::parse_or_default("D"), Category::D);
        assert_eq!(Category::parse_or_default("X"), Category::C);
        assert_eq!(Category::parse_or_default(""), Category::C);
    }

    #[test]
    fn test_item_key_canonical_round_trip() {
        let key = ItemKey::new("10234", "M", "ROJO");
        assert_eq!(key.canonical(), "10234|M|ROJO");
        assert_eq!(ItemKey::from_canonical("10234|M|ROJO"), Some(key));
    }

    #[test]
    fn test_item_key_rejects_malformed_canonical() {
        assert_eq!(ItemKey::from_canonical("10234|M"), None);
        assert_eq!(ItemKey::from_canonical("10234|M|ROJO|EXTRA"), None);
    }

    #[test]
    fn test_item_key_variants_are_distinct() {
        let a = ItemKey::new("10234", "M", "ROJO");
        let b = ItemKey::new("10234", "L", "ROJO");
        assert_ne!(a, b);
    }
}
