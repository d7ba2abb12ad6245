// ==========================================
// Viveverde Weekly Purchase-Order System - Engine Error Types
// ==========================================
// Tool: thiserror derive macro
// ==========================================
// Only a missing mandatory input table is fatal, and only for its own
// section/week. Everything else the pipeline recovers from locally and
// logs at warning level.
// ==========================================

use thiserror::Error;

/// Engine layer error type
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== Fatal per section/week =====
    #[error("mandatory input table missing: {table} (section {section}, week {week})")]
    MissingMandatoryInput {
        section: String,
        week: u32,
        table: &'static str,
    },

    // ===== Propagated from collaborators =====
    #[error("buffer state error: {0}")]
    BufferState(#[from] crate::repository::RepositoryError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
