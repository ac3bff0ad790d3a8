// ==========================================
// Parking occupancy - derived state sync
// ==========================================
// Single owner of the cached collections. Applies snapshots
// received from storage, recomputes occupancy and republishes it
// on a watch channel. Nothing else mutates the cache.
// ==========================================

use crate::domain::{DetailedOccupancyStats, ParkingConfig, ParkingLog, User, Vehicle};
use crate::engine::{CollectionSnapshot, OccupancyCalculator};
use crate::repository::{ParkingStore, RepositoryResult};
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio::time::MissedTickBehavior;

/// How often the loop checks for a day change or a pending reload
pub const HOUSEKEEPING_INTERVAL: Duration = Duration::from_secs(30);

/// Occupancy as seen by the dashboard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OccupancyView {
    pub reference_date: NaiveDate,
    pub stats: DetailedOccupancyStats,
    pub config: ParkingConfig,
}

pub struct StateSync {
    vehicles: Arc<Vec<Vehicle>>,
    logs: Arc<Vec<ParkingLog>>,
    users: Arc<Vec<User>>,
    config: ParkingConfig,
    fixed_date: Option<NaiveDate>, // None: local calendar day at each recompute
    needs_reload: bool,            // set when a reload after lag failed
    tx: watch::Sender<OccupancyView>,
}

impl StateSync {
    pub fn new(config: ParkingConfig) -> (Self, watch::Receiver<OccupancyView>) {
        Self::build(config, None)
    }

    /// Pin the reference date instead of following the clock
    pub fn with_reference_date(
        config: ParkingConfig,
        date: NaiveDate,
    ) -> (Self, watch::Receiver<OccupancyView>) {
        Self::build(config, Some(date))
    }

    fn build(
        config: ParkingConfig,
        fixed_date: Option<NaiveDate>,
    ) -> (Self, watch::Receiver<OccupancyView>) {
        let reference_date = fixed_date.unwrap_or_else(|| Local::now().date_naive());
        let initial = OccupancyView {
            reference_date,
            stats: OccupancyCalculator::calculate(&[], &[], reference_date, &config),
            config,
        };
        let (tx, rx) = watch::channel(initial);
        (
            Self {
                vehicles: Arc::new(Vec::new()),
                logs: Arc::new(Vec::new()),
                users: Arc::new(Vec::new()),
                config,
                fixed_date,
                needs_reload: false,
                tx,
            },
            rx,
        )
    }

    /// Replace one cached collection and republish occupancy
    pub fn apply(&mut self, snapshot: CollectionSnapshot) {
        let collection = snapshot.collection();
        match snapshot {
            CollectionSnapshot::Vehicles(all) => self.vehicles = all,
            CollectionSnapshot::ParkingLogs(all) => self.logs = all,
            CollectionSnapshot::Users(all) => {
                // occupancy does not depend on users
                self.users = all;
                return;
            }
            CollectionSnapshot::Settings(config) => self.config = config,
        }
        tracing::debug!(collection = collection.as_str(), "snapshot applied");
        self.recompute();
    }

    /// Replace every cached collection with the store's current state.
    ///
    /// All four reads must succeed before anything is replaced.
    pub async fn reload(&mut self, store: &dyn ParkingStore) -> RepositoryResult<()> {
        let config = store.get_config().await?;
        let vehicles = store.list_vehicles().await?;
        let logs = store.list_logs().await?;
        let users = store.list_users().await?;

        self.config = config;
        self.vehicles = Arc::new(vehicles);
        self.logs = Arc::new(logs);
        self.users = Arc::new(users);
        self.needs_reload = false;
        tracing::debug!(
            vehicles = self.vehicles.len(),
            logs = self.logs.len(),
            users = self.users.len(),
            "state sync reloaded from store"
        );
        self.recompute();
        Ok(())
    }

    async fn reload_or_defer(&mut self, store: &dyn ParkingStore) {
        if let Err(e) = self.reload(store).await {
            tracing::warn!(error = %e, "state sync reload failed, retrying later");
            self.needs_reload = true;
        }
    }

    /// Recompute when the local calendar day moved past the published view
    fn roll_day(&self) {
        if self.fixed_date.is_some() {
            return;
        }
        let today = Local::now().date_naive();
        let published = self.tx.borrow().reference_date;
        if published != today {
            tracing::info!(%today, "calendar day changed, occupancy recomputed");
            self.recompute();
        }
    }

    fn recompute(&self) {
        let reference_date = self.fixed_date.unwrap_or_else(|| Local::now().date_naive());
        let stats = OccupancyCalculator::calculate(
            &self.vehicles,
            &self.logs,
            reference_date,
            &self.config,
        );
        tracing::debug!(
            %reference_date,
            cars = stats.cars.occupied,
            motorcycles = stats.motorcycles.occupied,
            bicycles = stats.bicycles.occupied,
            "occupancy recomputed"
        );
        self.tx.send_replace(OccupancyView {
            reference_date,
            stats,
            config: self.config,
        });
    }

    /// Consume snapshots until the channel closes.
    ///
    /// A lagged receiver has lost snapshots of unknown collections, so
    /// the whole cache is reloaded from `store`. The housekeeping tick
    /// retries a failed reload and follows the calendar day when the
    /// reference date is not pinned.
    pub async fn run(
        mut self,
        store: Arc<dyn ParkingStore>,
        mut rx: broadcast::Receiver<CollectionSnapshot>,
    ) -> Self {
        let mut housekeeping = tokio::time::interval(HOUSEKEEPING_INTERVAL);
        housekeeping.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                received = rx.recv() => match received {
                    Ok(snapshot) => self.apply(snapshot),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "state sync lagged behind storage, reloading");
                        self.reload_or_defer(store.as_ref()).await;
                    }
                    Err(RecvError::Closed) => {
                        tracing::debug!("snapshot channel closed, state sync stopping");
                        return self;
                    }
                },
                _ = housekeeping.tick() => {
                    if self.needs_reload {
                        self.reload_or_defer(store.as_ref()).await;
                    }
                    self.roll_day();
                }
            }
        }
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn logs(&self) -> &[ParkingLog] {
        &self.logs
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn config(&self) -> ParkingConfig {
        self.config
    }

    pub fn view(&self) -> OccupancyView {
        *self.tx.borrow()
    }
}
