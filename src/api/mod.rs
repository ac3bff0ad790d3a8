// ==========================================
// Parking occupancy - API layer
// ==========================================
// Business operations for the presentation layer and the CLI.
// ==========================================

pub mod error;
pub mod parking_api;
pub mod report_api;
pub mod user_api;

pub use error::{ApiError, ApiResult};
pub use parking_api::{ParkingApi, ParkingLogView};
pub use report_api::{CsvExport, ReportApi};
pub use user_api::UserApi;
