// ==========================================
// Viveverde Weekly Purchase-Order System - Importer Error Types
// ==========================================
// Tool: thiserror derive macro
// ==========================================

use thiserror::Error;

/// Importer layer error type
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== File errors =====
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("unsupported file format: {0} (only .xlsx/.xls/.csv)")]
    UnsupportedFormat(String),

    #[error("Excel parse failed: {0}")]
    ExcelParseError(String),

    #[error("CSV parse failed: {0}")]
    CsvParseError(String),

    #[error("file read failed: {0}")]
    Io(#[from] std::io::Error),

    // ===== Mapping errors =====
    #[error("required column missing: {0}")]
    ColumnMissing(String),

    #[error("value conversion failed (row {row}, field {field}): {value:?}")]
    TypeConversionError {
        row: usize,
        field: String,
        value: String,
    },
}
