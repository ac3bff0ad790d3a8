// ==========================================
// Parking occupancy - repository layer
// ==========================================
// Data mapping only; business rules live in engine/.
// ==========================================

pub mod error;
pub mod parking_log_repo;
mod row_mapping;
pub mod store;
pub mod user_repo;
pub mod vehicle_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use parking_log_repo::ParkingLogRepository;
pub use store::{ParkingStore, SqliteParkingStore};
pub use user_repo::UserRepository;
pub use vehicle_repo::VehicleRepository;
