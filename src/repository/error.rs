// ==========================================
// Viveverde Weekly Purchase-Order System - Repository Error Types
// ==========================================
// Tool: thiserror derive macro
// ==========================================

use thiserror::Error;

/// Repository layer error type
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== State file errors =====
    #[error("state file read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("state file parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("state lock poisoned: {0}")]
    Lock(String),

    // ===== Generic =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
