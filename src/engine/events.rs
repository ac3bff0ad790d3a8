// ==========================================
// Parking occupancy - change notifications
// ==========================================
// Storage publishes the full current snapshot of a collection
// after every mutation. Consumers never subscribe to storage
// internals; they receive immutable snapshots over a channel.
// ==========================================

use crate::domain::{ParkingConfig, ParkingLog, User, Vehicle};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Default buffer of the broadcast channel
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

// ==========================================
// Collection names
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionName {
    Vehicles,
    ParkingLogs,
    Users,
    Settings,
}

impl CollectionName {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionName::Vehicles => "vehicles",
            CollectionName::ParkingLogs => "parkingLogs",
            CollectionName::Users => "users",
            CollectionName::Settings => "settings",
        }
    }
}

// ==========================================
// CollectionSnapshot - full state of one collection
// ==========================================

#[derive(Debug, Clone)]
pub enum CollectionSnapshot {
    Vehicles(Arc<Vec<Vehicle>>),
    ParkingLogs(Arc<Vec<ParkingLog>>),
    Users(Arc<Vec<User>>),
    Settings(ParkingConfig),
}

impl CollectionSnapshot {
    pub fn collection(&self) -> CollectionName {
        match self {
            CollectionSnapshot::Vehicles(_) => CollectionName::Vehicles,
            CollectionSnapshot::ParkingLogs(_) => CollectionName::ParkingLogs,
            CollectionSnapshot::Users(_) => CollectionName::Users,
            CollectionSnapshot::Settings(_) => CollectionName::Settings,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CollectionSnapshot::Vehicles(v) => v.len(),
            CollectionSnapshot::ParkingLogs(l) => l.len(),
            CollectionSnapshot::Users(u) => u.len(),
            CollectionSnapshot::Settings(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ==========================================
// Publisher trait
// ==========================================

/// Sink for collection snapshots.
///
/// Storage implementations call it after each successful write.
pub trait SnapshotPublisher: Send + Sync {
    fn publish(&self, snapshot: CollectionSnapshot);
}

// ==========================================
// ChangeNotifier - broadcast fan-out
// ==========================================

#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<CollectionSnapshot>,
}

impl ChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// New receiver; sees every snapshot published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<CollectionSnapshot> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl SnapshotPublisher for ChangeNotifier {
    fn publish(&self, snapshot: CollectionSnapshot) {
        let collection = snapshot.collection();
        let size = snapshot.len();
        // Err only means nobody is listening right now
        match self.tx.send(snapshot) {
            Ok(receivers) => tracing::debug!(
                collection = collection.as_str(),
                size,
                receivers,
                "snapshot published"
            ),
            Err(_) => tracing::trace!(collection = collection.as_str(), "no snapshot subscribers"),
        }
    }
}
