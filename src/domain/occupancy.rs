// ==========================================
// Parking occupancy - derived occupancy statistics
// ==========================================
// Never persisted; recomputed from the latest snapshot.
// ==========================================

use crate::domain::types::VehicleType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyStatDetails {
    pub occupied: u32,
    pub available: u32, // max(0, total - occupied)
    pub total: u32,
}

impl OccupancyStatDetails {
    pub fn new(occupied: u32, total: u32) -> Self {
        Self {
            occupied,
            available: total.saturating_sub(occupied),
            total,
        }
    }

    /// Vehicles parked beyond the pool capacity
    pub fn overflow(&self) -> u32 {
        self.occupied.saturating_sub(self.total)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedOccupancyStats {
    pub cars: OccupancyStatDetails,
    pub motorcycles: OccupancyStatDetails,
    pub bicycles: OccupancyStatDetails,
}

impl DetailedOccupancyStats {
    pub fn for_type(&self, vehicle_type: VehicleType) -> &OccupancyStatDetails {
        match vehicle_type {
            VehicleType::Car => &self.cars,
            VehicleType::Motorcycle => &self.motorcycles,
            VehicleType::Bicycle => &self.bicycles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_type_picks_pool_and_reports_overflow() {
        let stats = DetailedOccupancyStats {
            cars: OccupancyStatDetails::new(3, 10),
            motorcycles: OccupancyStatDetails::new(0, 4),
            bicycles: OccupancyStatDetails::new(5, 2),
        };

        assert_eq!(stats.for_type(VehicleType::Car).available, 7);
        assert_eq!(stats.for_type(VehicleType::Motorcycle).occupied, 0);
        let bicycles = stats.for_type(VehicleType::Bicycle);
        assert_eq!(bicycles.available, 0);
        assert_eq!(bicycles.overflow(), 3);
    }
}
