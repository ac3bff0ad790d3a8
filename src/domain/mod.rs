// ==========================================
// Parking occupancy - domain layer
// ==========================================
// Entities, enumerations and value objects.
// No storage access, no engine logic.
// ==========================================

pub mod edit_history;
pub mod occupancy;
pub mod parking_config;
pub mod parking_log;
pub mod types;
pub mod user;
pub mod vehicle;

pub use edit_history::{EditHistoryLog, LogField, VehicleField};
pub use occupancy::{DetailedOccupancyStats, OccupancyStatDetails};
pub use parking_config::ParkingConfig;
pub use parking_log::{LogPatch, LogWrite, ParkingLog};
pub use types::{UniversityLink, UserRole, VehicleType};
pub use user::User;
pub use vehicle::{NewVehicle, Vehicle, VehiclePatch};
