// ==========================================
// Parking occupancy - export layer
// ==========================================

pub mod csv_export;
pub mod error;

pub use csv_export::{
    export_to_file, log_report_filename, to_csv_bytes, write_csv, VEHICLE_LIST_FILENAME,
};
pub use error::ExportError;
