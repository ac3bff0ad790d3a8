// ==========================================
// Parking occupancy - storage facade
// ==========================================
// ParkingStore is the seam between the API layer and persistence.
// Every successful write publishes a fresh snapshot of the touched
// collection(s) through the ChangeNotifier.
// ==========================================

use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::{ParkingConfig, ParkingLog, User, UserRole, Vehicle};
use crate::engine::events::{ChangeNotifier, CollectionSnapshot, SnapshotPublisher};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::parking_log_repo::ParkingLogRepository;
use crate::repository::user_repo::UserRepository;
use crate::repository::vehicle_repo::VehicleRepository;
use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

// ==========================================
// ParkingStore trait
// ==========================================
#[async_trait]
pub trait ParkingStore: Send + Sync {
    // ===== Reads =====
    async fn list_vehicles(&self) -> RepositoryResult<Vec<Vehicle>>;
    async fn list_logs(&self) -> RepositoryResult<Vec<ParkingLog>>;
    async fn list_users(&self) -> RepositoryResult<Vec<User>>;
    /// Capacities; defaults are persisted on first read
    async fn get_config(&self) -> RepositoryResult<ParkingConfig>;
    async fn find_logs_by_key(
        &self,
        vehicle_id: &str,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<ParkingLog>>;
    /// Logs with `start <= date <= end`
    async fn list_logs_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<ParkingLog>>;
    async fn find_vehicle(&self, vehicle_id: &str) -> RepositoryResult<Option<Vehicle>>;
    async fn find_log(&self, log_id: &str) -> RepositoryResult<Option<ParkingLog>>;
    async fn find_user(&self, uid: &str) -> RepositoryResult<Option<User>>;

    // ===== Writes =====
    async fn create_vehicle(&self, vehicle: &Vehicle) -> RepositoryResult<()>;
    /// Full-row replace; the vehicle's logs keep their plate copy
    async fn update_vehicle(&self, vehicle: &Vehicle) -> RepositoryResult<()>;
    /// `Err(UniqueConstraintViolation)` when (vehicle_id, date) is taken
    async fn create_log(&self, log: &ParkingLog) -> RepositoryResult<()>;
    async fn update_log(&self, log: &ParkingLog) -> RepositoryResult<()>;
    /// Vehicle and log written together or not at all
    async fn apply_edit(&self, vehicle: &Vehicle, log: &ParkingLog) -> RepositoryResult<()>;
    async fn create_user(&self, user: &User) -> RepositoryResult<()>;
    async fn update_user_role(&self, uid: &str, role: UserRole) -> RepositoryResult<()>;
    async fn delete_user(&self, uid: &str) -> RepositoryResult<()>;
    async fn set_config(&self, config: &ParkingConfig) -> RepositoryResult<()>;

    // ===== Change feed =====
    fn subscribe(&self) -> broadcast::Receiver<CollectionSnapshot>;
}

// ==========================================
// SqliteParkingStore
// ==========================================
pub struct SqliteParkingStore {
    conn: Arc<Mutex<Connection>>,
    vehicles: VehicleRepository,
    logs: ParkingLogRepository,
    users: UserRepository,
    config: ConfigManager,
    notifier: ChangeNotifier,
}

impl SqliteParkingStore {
    /// Open (or create) the database file and ensure the schema
    pub fn open(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;
        tracing::info!(db_path, "parking store opened");
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> RepositoryResult<Self> {
        let conn = crate::db::open_in_memory()
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    /// Wrap a connection whose schema is already initialized
    pub fn from_connection(conn: Connection) -> Self {
        let conn = Arc::new(Mutex::new(conn));
        Self {
            vehicles: VehicleRepository::new(conn.clone()),
            logs: ParkingLogRepository::new(conn.clone()),
            users: UserRepository::new(conn.clone()),
            config: ConfigManager::from_connection(conn.clone()),
            notifier: ChangeNotifier::default(),
            conn,
        }
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    // Snapshot failures are logged only: the write itself has committed.
    fn publish_vehicles(&self) {
        match self.vehicles.find_all() {
            Ok(all) => self.notifier.publish(CollectionSnapshot::Vehicles(Arc::new(all))),
            Err(e) => tracing::warn!(error = %e, "vehicles snapshot skipped"),
        }
    }

    fn publish_logs(&self) {
        match self.logs.find_all() {
            Ok(all) => self.notifier.publish(CollectionSnapshot::ParkingLogs(Arc::new(all))),
            Err(e) => tracing::warn!(error = %e, "parkingLogs snapshot skipped"),
        }
    }

    fn publish_users(&self) {
        match self.users.find_all() {
            Ok(all) => self.notifier.publish(CollectionSnapshot::Users(Arc::new(all))),
            Err(e) => tracing::warn!(error = %e, "users snapshot skipped"),
        }
    }
}

#[async_trait]
impl ParkingStore for SqliteParkingStore {
    async fn list_vehicles(&self) -> RepositoryResult<Vec<Vehicle>> {
        self.vehicles.find_all()
    }

    async fn list_logs(&self) -> RepositoryResult<Vec<ParkingLog>> {
        self.logs.find_all()
    }

    async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        self.users.find_all()
    }

    async fn get_config(&self) -> RepositoryResult<ParkingConfig> {
        let (config, created) = self.config.get_or_init_parking_config()?;
        if created {
            self.notifier.publish(CollectionSnapshot::Settings(config));
        }
        Ok(config)
    }

    async fn find_logs_by_key(
        &self,
        vehicle_id: &str,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<ParkingLog>> {
        self.logs.find_by_key(vehicle_id, date)
    }

    async fn list_logs_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<ParkingLog>> {
        self.logs.find_by_date_range(start, end)
    }

    async fn find_vehicle(&self, vehicle_id: &str) -> RepositoryResult<Option<Vehicle>> {
        self.vehicles.find_by_id(vehicle_id)
    }

    async fn find_log(&self, log_id: &str) -> RepositoryResult<Option<ParkingLog>> {
        self.logs.find_by_id(log_id)
    }

    async fn find_user(&self, uid: &str) -> RepositoryResult<Option<User>> {
        self.users.find_by_uid(uid)
    }

    async fn create_vehicle(&self, vehicle: &Vehicle) -> RepositoryResult<()> {
        self.vehicles.insert(vehicle)?;
        self.publish_vehicles();
        Ok(())
    }

    async fn update_vehicle(&self, vehicle: &Vehicle) -> RepositoryResult<()> {
        self.vehicles.update(vehicle)?;
        self.publish_vehicles();
        Ok(())
    }

    async fn create_log(&self, log: &ParkingLog) -> RepositoryResult<()> {
        self.logs.insert(log)?;
        self.publish_logs();
        Ok(())
    }

    async fn update_log(&self, log: &ParkingLog) -> RepositoryResult<()> {
        self.logs.update(log)?;
        self.publish_logs();
        Ok(())
    }

    async fn apply_edit(&self, vehicle: &Vehicle, log: &ParkingLog) -> RepositoryResult<()> {
        {
            let mut conn = self
                .conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            let tx = conn
                .transaction()
                .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

            // dropping tx on error rolls both writes back
            VehicleRepository::update_with(&tx, vehicle)?;
            ParkingLogRepository::update_with(&tx, log)?;

            tx.commit()
                .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        }

        self.publish_vehicles();
        self.publish_logs();
        Ok(())
    }

    async fn create_user(&self, user: &User) -> RepositoryResult<()> {
        self.users.insert(user)?;
        self.publish_users();
        Ok(())
    }

    async fn update_user_role(&self, uid: &str, role: UserRole) -> RepositoryResult<()> {
        self.users.update_role(uid, role)?;
        self.publish_users();
        Ok(())
    }

    async fn delete_user(&self, uid: &str) -> RepositoryResult<()> {
        self.users.delete(uid)?;
        self.publish_users();
        Ok(())
    }

    async fn set_config(&self, config: &ParkingConfig) -> RepositoryResult<()> {
        self.config.set_parking_config(config)?;
        self.notifier.publish(CollectionSnapshot::Settings(*config));
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<CollectionSnapshot> {
        self.notifier.subscribe()
    }
}
