// ==========================================
// API integration test environment
// ==========================================

#[path = "../test_helpers.rs"]
mod test_helpers;

use std::sync::Arc;
use tempfile::NamedTempFile;

use parking_occupancy::api::{ParkingApi, ReportApi, UserApi};
use parking_occupancy::app::AppState;
use parking_occupancy::domain::{User, UserRole};
use parking_occupancy::repository::SqliteParkingStore;

pub struct ApiTestEnv {
    pub db_path: String,
    pub state: AppState,
    pub store: Arc<SqliteParkingStore>,
    pub parking_api: Arc<ParkingApi>,
    pub user_api: Arc<UserApi>,
    pub report_api: Arc<ReportApi>,

    // keeps the database file alive
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let (temp_file, db_path) = test_helpers::create_test_db()?;
        let state = AppState::new(db_path.clone())?;

        Ok(Self {
            db_path,
            store: state.store.clone(),
            parking_api: state.parking_api.clone(),
            user_api: state.user_api.clone(),
            report_api: state.report_api.clone(),
            state,
            _temp_file: temp_file,
        })
    }

    /// First registrant: becomes administrator
    pub async fn admin(&self) -> User {
        let user = self
            .user_api
            .register_user("uid-admin", "admin@campus.br")
            .await
            .expect("admin registration failed");
        assert_eq!(user.role, UserRole::Administrator);
        user
    }

    /// Registers an operator (an administrator must exist already)
    pub async fn operator(&self, uid: &str) -> User {
        self.user_api
            .register_user(uid, &format!("{}@campus.br", uid))
            .await
            .expect("operator registration failed")
    }
}
