// ==========================================
// Parking occupancy - application layer
// ==========================================

pub mod state;
pub mod sync;

pub use state::{AppState, SyncHandle};
pub use sync::{OccupancyView, StateSync};
