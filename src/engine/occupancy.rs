// ==========================================
// Parking occupancy - Occupancy Calculator
// ==========================================
// Pure function of (vehicles, logs, reference date, config).
// Order of the input snapshots never matters.
// ==========================================

use crate::domain::{
    DetailedOccupancyStats, OccupancyStatDetails, ParkingConfig, ParkingLog, Vehicle, VehicleType,
};
use chrono::NaiveDate;
use std::collections::HashMap;

/// A parking log resolved against its vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogWithVehicle<'a> {
    pub log: &'a ParkingLog,
    pub vehicle: &'a Vehicle,
}

pub struct OccupancyCalculator;

impl OccupancyCalculator {
    /// Derive per-category occupancy for `reference_date`.
    ///
    /// Active logs (same day, no exit) are counted by the type of
    /// their vehicle; a log pointing at an unknown vehicle counts nowhere.
    pub fn calculate(
        vehicles: &[Vehicle],
        logs: &[ParkingLog],
        reference_date: NaiveDate,
        config: &ParkingConfig,
    ) -> DetailedOccupancyStats {
        let type_by_id: HashMap<&str, VehicleType> = vehicles
            .iter()
            .map(|v| (v.id.as_str(), v.vehicle_type))
            .collect();

        let mut occupied: HashMap<VehicleType, u32> = HashMap::new();
        for log in logs.iter().filter(|l| l.is_active_on(reference_date)) {
            if let Some(vehicle_type) = type_by_id.get(log.vehicle_id.as_str()) {
                *occupied.entry(*vehicle_type).or_insert(0) += 1;
            }
        }

        let stat = |vehicle_type: VehicleType| {
            OccupancyStatDetails::new(
                occupied.get(&vehicle_type).copied().unwrap_or(0),
                config.capacity_for(vehicle_type),
            )
        };

        DetailedOccupancyStats {
            cars: stat(VehicleType::Car),
            motorcycles: stat(VehicleType::Motorcycle),
            bicycles: stat(VehicleType::Bicycle),
        }
    }

    /// Vehicles currently parked on `date`, earliest entry first.
    ///
    /// `term` filters on plate/owner (case-insensitive); logs without a
    /// resolvable vehicle are skipped.
    pub fn active_entries<'a>(
        vehicles: &'a [Vehicle],
        logs: &'a [ParkingLog],
        date: NaiveDate,
        term: Option<&str>,
    ) -> Vec<LogWithVehicle<'a>> {
        let by_id: HashMap<&str, &Vehicle> = vehicles.iter().map(|v| (v.id.as_str(), v)).collect();
        let needle = crate::engine::report::normalize_term(term);

        let mut entries: Vec<LogWithVehicle<'a>> = logs
            .iter()
            .filter(|log| log.is_active_on(date))
            .filter_map(|log| {
                by_id
                    .get(log.vehicle_id.as_str())
                    .map(|vehicle| LogWithVehicle { log, vehicle: *vehicle })
            })
            .filter(|entry| match &needle {
                Some(n) => entry.vehicle.matches_plate_or_owner(n),
                None => true,
            })
            .collect();

        entries.sort_by(|a, b| a.log.entry_time.cmp(&b.log.entry_time));
        entries
    }
}
