// ==========================================
// Parking occupancy - configuration layer
// ==========================================
// Persistent settings: config_kv table
// Process settings: environment (settings.rs)
// ==========================================

pub mod config_manager;
pub mod settings;

pub use config_manager::{config_keys, ConfigManager};
pub use settings::{get_default_db_path, AppSettings};
