// ==========================================
// Parking occupancy - application state
// ==========================================
// Wires the store, the API objects and the derived-state sync.
// ==========================================

use crate::api::{ApiResult, ParkingApi, ReportApi, UserApi};
use crate::app::sync::{OccupancyView, StateSync};
use crate::config::AppSettings;
use crate::domain::ParkingConfig;
use crate::repository::{ParkingStore, SqliteParkingStore};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct AppState {
    pub db_path: String,
    pub store: Arc<SqliteParkingStore>,
    pub parking_api: Arc<ParkingApi>,
    pub user_api: Arc<UserApi>,
    pub report_api: Arc<ReportApi>,
}

/// Running state sync task and its output channel
pub struct SyncHandle {
    pub occupancy: watch::Receiver<OccupancyView>,
    pub task: JoinHandle<StateSync>,
}

impl AppState {
    /// Open the database at `db_path` and build the API objects
    pub fn new(db_path: String) -> ApiResult<Self> {
        tracing::info!(db_path = %db_path, "initializing AppState");
        let store = Arc::new(SqliteParkingStore::open(&db_path)?);
        Ok(Self::with_store(db_path, store))
    }

    pub fn from_settings(settings: &AppSettings) -> ApiResult<Self> {
        crate::i18n::set_locale(&settings.locale);
        Self::new(settings.db_path.clone())
    }

    pub fn with_store(db_path: String, store: Arc<SqliteParkingStore>) -> Self {
        let dyn_store: Arc<dyn ParkingStore> = store.clone();
        Self {
            db_path,
            parking_api: Arc::new(ParkingApi::new(dyn_store.clone())),
            user_api: Arc::new(UserApi::new(dyn_store.clone())),
            report_api: Arc::new(ReportApi::new(dyn_store)),
            store,
        }
    }

    /// Spawn the state sync on the current tokio runtime.
    ///
    /// Subscribes before seeding so no write between the two is lost.
    pub async fn start_sync(&self) -> ApiResult<SyncHandle> {
        let rx = self.store.subscribe();
        let store: Arc<dyn ParkingStore> = self.store.clone();

        let (mut sync, occupancy) = StateSync::new(ParkingConfig::default());
        sync.reload(store.as_ref()).await?;

        let task = tokio::spawn(sync.run(store, rx));
        Ok(SyncHandle { occupancy, task })
    }
}
