// ==========================================
// Parking occupancy - engine layer
// ==========================================
// Pure domain logic over snapshots: no I/O, no global state.
// Callers pass the acting user and the current collections.
// ==========================================

pub mod audit;
pub mod events;
pub mod occupancy;
pub mod reconciliation;
pub mod registration;
pub mod report;
pub mod role_guard;

pub use audit::{AuditTrailEngine, AuditedEdit, EditError, VehicleLogEdit};
pub use events::{ChangeNotifier, CollectionName, CollectionSnapshot, SnapshotPublisher};
pub use occupancy::{LogWithVehicle, OccupancyCalculator};
pub use reconciliation::{LogReconciliationEngine, ReconcileAction, ReconcileError};
pub use registration::{RegistrationError, UserRegistrar, VehicleRegistrar};
pub use report::{FormattedLogRecord, ReportError, ReportQueryEngine, VehicleExportRecord};
pub use role_guard::{GuardError, GuardedAction, RoleGuard};
