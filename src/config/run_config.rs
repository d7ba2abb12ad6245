// ==========================================
// Viveverde Weekly Purchase-Order System - Run Configuration
// ==========================================
// One immutable configuration value per run, loaded from JSON and
// passed into the pipeline explicitly. No global mutable dictionaries:
// whatever the run needs travels through arguments.
// ==========================================

use crate::domain::types::EmitFilter;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// ==========================================
// SectionConfig - one merchandising section
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    /// week number -> weekly revenue target (EUR)
    #[serde(default)]
    pub weekly_targets: HashMap<u32, f64>,

    // Input files for the section
    pub sales_file: PathBuf,
    pub classification_file: PathBuf,
    pub economics_file: PathBuf,
    /// Optional warehouse feed; corrections run with zeros without it.
    #[serde(default)]
    pub signals_file: Option<PathBuf>,
}

// ==========================================
// RunConfig - the whole run
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Annual growth objective applied on top of every weekly target.
    #[serde(default = "default_growth_rate")]
    pub growth_rate: f64,

    /// Safety buffer as a share of forecast units.
    #[serde(default = "default_safety_pct")]
    pub safety_stock_pct: f64,

    /// week number -> holiday revenue uplift (e.g. 14 -> 0.25)
    #[serde(default)]
    pub holiday_by_week: HashMap<u32, f64>,

    /// Category weights, carried for reporting (not used in the
    /// quantity math).
    #[serde(default = "default_category_weight")]
    pub category_weight: HashMap<String, f64>,

    /// Which rows reach the order file (see EmitFilter).
    #[serde(default)]
    pub emit_filter: EmitFilter,

    /// Weeks to process this run; empty means "every week that has a
    /// target configured".
    #[serde(default)]
    pub weeks: Vec<u32>,

    /// section name -> section configuration
    pub sections: HashMap<String, SectionConfig>,

    /// Cross-week state file; defaults under the user data directory.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Where order and summary files are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl RunConfig {
    /// Load the configuration file (JSON).
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let config: RunConfig = serde_json::from_str(&raw)?;
        info!(
            file = %path.display(),
            sections = config.sections.len(),
            growth = config.growth_rate,
            safety = config.safety_stock_pct,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Holiday uplift for a week; 0.0 when the week has none.
    pub fn holiday(&self, week: u32) -> f64 {
        self.holiday_by_week.get(&week).copied().unwrap_or(0.0)
    }

    /// Revenue target for a section and week; 0.0 when unconfigured
    /// (the scaler then runs with scale 1.0).
    pub fn target(&self, section: &str, week: u32) -> f64 {
        self.sections
            .get(section)
            .and_then(|s| s.weekly_targets.get(&week))
            .copied()
            .unwrap_or(0.0)
    }

    /// Weeks to process for a section: the explicit run list, or every
    /// configured target week in ascending order.
    pub fn weeks_for(&self, section: &str) -> Vec<u32> {
        if !self.weeks.is_empty() {
            return self.weeks.clone();
        }
        let mut weeks: Vec<u32> = self
            .sections
            .get(section)
            .map(|s| s.weekly_targets.keys().copied().collect())
            .unwrap_or_default();
        weeks.sort_unstable();
        weeks
    }
}

fn default_growth_rate() -> f64 {
    0.05
}

fn default_safety_pct() -> f64 {
    0.30
}

fn default_category_weight() -> HashMap<String, f64> {
    HashMap::from([
        ("A".to_string(), 1.0),
        ("B".to_string(), 0.8),
        ("C".to_string(), 0.6),
        ("D".to_string(), 0.0),
    ])
}

fn default_state_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("viveverde")
        .join("state.json")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("pedidos_semanales")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_json() {
        let raw = r#"{
            "sections": {
                "vivero": {
                    "weekly_targets": {"14": 1200.0},
                    "sales_file": "ventas_vivero.xlsx",
                    "classification_file": "abc_vivero.xlsx",
                    "economics_file": "costes_vivero.xlsx"
                }
            }
        }"#;
        let config: RunConfig = serde_json::from_str(raw).unwrap();
        assert!((config.growth_rate - 0.05).abs() < 1e-9);
        assert!((config.safety_stock_pct - 0.30).abs() < 1e-9);
        assert_eq!(config.emit_filter, EmitFilter::FinalOrder);
        assert_eq!(config.target("vivero", 14), 1200.0);
        assert_eq!(config.target("vivero", 15), 0.0);
        assert_eq!(config.holiday(14), 0.0);
        assert_eq!(config.weeks_for("vivero"), vec![14]);
    }

    #[test]
    fn test_holiday_table_lookup() {
        let raw = r#"{
            "holiday_by_week": {"14": 0.25, "18": 0.0},
            "sections": {}
        }"#;
        let config: RunConfig = serde_json::from_str(raw).unwrap();
        assert!((config.holiday(14) - 0.25).abs() < 1e-9);
        assert_eq!(config.holiday(20), 0.0);
    }

    #[test]
    fn test_emit_filter_parses_screaming_case() {
        let raw = r#"{
            "emit_filter": "FINAL_UNITS",
            "sections": {}
        }"#;
        let config: RunConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.emit_filter, EmitFilter::FinalUnits);
    }
}
