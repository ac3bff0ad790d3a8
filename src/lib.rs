// ==========================================
// Parking occupancy - core library
// ==========================================
// Occupancy, entry/exit reconciliation, audited corrections,
// role administration and reports for a campus parking lot.
// Stack: Rust + SQLite
// ==========================================

// i18n: messages under locales/
rust_i18n::i18n!("locales", fallback = "pt-BR");

// ==========================================
// Modules
// ==========================================

// Domain - entities and closed enums
pub mod domain;

// Repository - persistence
pub mod repository;

// Engines - pure business rules
pub mod engine;

// Configuration
pub mod config;

// Database infrastructure (connection setup, schema)
pub mod db;

// CSV export
pub mod export;

pub mod logging;

pub mod i18n;

// API - business operations
pub mod api;

// Application wiring and derived state
pub mod app;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    DetailedOccupancyStats, EditHistoryLog, LogPatch, LogWrite, NewVehicle, OccupancyStatDetails,
    ParkingConfig, ParkingLog, UniversityLink, User, UserRole, Vehicle, VehiclePatch, VehicleType,
};

pub use engine::{
    AuditTrailEngine, LogReconciliationEngine, OccupancyCalculator, ReportQueryEngine, RoleGuard,
};

pub use api::{ApiError, ApiResult, ParkingApi, ReportApi, UserApi};

pub use app::{AppState, StateSync};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Controle de Estacionamento";
