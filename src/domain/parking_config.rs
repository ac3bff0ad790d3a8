// ==========================================
// Parking occupancy - spot pool capacities
// ==========================================

use crate::domain::types::VehicleType;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CAR_SPOTS: u32 = 100;
pub const DEFAULT_MOTORCYCLE_SPOTS: u32 = 40;
pub const DEFAULT_BICYCLE_SPOTS: u32 = 10;

// ==========================================
// ParkingConfig - editable by administrators only
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingConfig {
    pub total_car_spots: u32,
    pub total_motorcycle_spots: u32,
    pub total_bicycle_spots: u32,
}

impl Default for ParkingConfig {
    fn default() -> Self {
        Self {
            total_car_spots: DEFAULT_CAR_SPOTS,
            total_motorcycle_spots: DEFAULT_MOTORCYCLE_SPOTS,
            total_bicycle_spots: DEFAULT_BICYCLE_SPOTS,
        }
    }
}

impl ParkingConfig {
    /// Capacity of the spot pool serving `vehicle_type`
    pub fn capacity_for(&self, vehicle_type: VehicleType) -> u32 {
        match vehicle_type {
            VehicleType::Car => self.total_car_spots,
            VehicleType::Motorcycle => self.total_motorcycle_spots,
            VehicleType::Bicycle => self.total_bicycle_spots,
        }
    }
}
