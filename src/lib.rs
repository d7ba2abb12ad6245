// ==========================================
// Viveverde Weekly Purchase-Order System - Core Library
// ==========================================
// Stack: Rust + JSON state + Excel/CSV ingestion
// System role: decision-support system (buyers keep final control)
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - entities and types
pub mod domain;

// Repository layer - persisted buffer state
pub mod repository;

// Engine layer - order computation pipeline
pub mod engine;

// Importer layer - external tabular data
pub mod importer;

// Config layer - run configuration
pub mod config;

// Report layer - order/summary file output
pub mod report;

// Logging
pub mod logging;

// ==========================================
// Core type re-exports
// ==========================================

// Domain types
pub use domain::types::{Category, EmitFilter, ItemKey, StockScenario, SuggestedAction};

// Domain entities
pub use domain::{
    ItemClassification, ItemEconomics, ItemSalesRecord, OperationalSignals, SectionSummary,
    WeeklyOrderRow,
};

// Engines
pub use engine::{
    ActionFactorResolver, DemandScaler, EngineError, OrderAssembler, OrderOrchestrator,
    RevenueReconciler, SafetyStockCalculator, SectionOrder, StockDeviationCorrector,
    TrendCorrector,
};

// Repository
pub use repository::{
    BufferStateRepository, InMemoryBufferRepository, JsonFileBufferRepository, RepositoryError,
};

// Config
pub use config::RunConfig;

// ==========================================
// Constants
// ==========================================

// System version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// System name
pub const APP_NAME: &str = "Sistema de Pedidos Viveverde";

// State file schema version
pub const STATE_VERSION: &str = "v2";
