// ==========================================
// Parking occupancy - parking log repository
// ==========================================
// Table: parking_log
// UNIQUE (vehicle_id, log_date): one record per vehicle per day
// ==========================================

mod core;
mod queries;


pub use self::core::ParkingLogRepository;
