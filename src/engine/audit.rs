// ==========================================
// Parking occupancy - Audit Trail Engine
// ==========================================
// Diffs an original record against a partial update restricted
// to the editable allow-list and produces the history entries to
// append plus the merged record to persist.
// ==========================================

use crate::domain::{
    EditHistoryLog, LogField, LogPatch, ParkingLog, Vehicle, VehicleField, VehiclePatch,
};
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("registro {log_id} não pertence ao veículo {vehicle_id}")]
    LogVehicleMismatch { log_id: String, vehicle_id: String },
}

/// Result of auditing one entity
#[derive(Debug, Clone, PartialEq)]
pub struct AuditedEdit<T> {
    /// Entries appended by this edit, in field order
    pub entries: Vec<EditHistoryLog>,
    /// Record to persist, history already extended
    pub merged: T,
}

impl<T> AuditedEdit<T> {
    pub fn has_changes(&self) -> bool {
        !self.entries.is_empty()
    }
}

/// One logical correction touching a vehicle and one of its logs.
/// Persisted both-or-neither.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleLogEdit {
    pub vehicle: AuditedEdit<Vehicle>,
    pub log: AuditedEdit<ParkingLog>,
}

impl VehicleLogEdit {
    pub fn is_noop(&self) -> bool {
        !self.vehicle.has_changes() && !self.log.has_changes()
    }

    pub fn entry_count(&self) -> usize {
        self.vehicle.entries.len() + self.log.entries.len()
    }
}

pub struct AuditTrailEngine;

impl AuditTrailEngine {
    /// Entry for one field, `None` when old and new stringify the same
    pub fn history_entry(
        field_label: &str,
        old_value: &str,
        new_value: &str,
        edited_by: &str,
        timestamp: DateTime<Utc>,
    ) -> Option<EditHistoryLog> {
        if old_value == new_value {
            return None;
        }
        Some(EditHistoryLog {
            timestamp,
            edited_by: edited_by.to_string(),
            field: field_label.to_string(),
            old_value: old_value.to_string(),
            new_value: new_value.to_string(),
        })
    }

    pub fn audit_vehicle_edit(
        original: &Vehicle,
        patch: &VehiclePatch,
        edited_by: &str,
        timestamp: DateTime<Utc>,
    ) -> AuditedEdit<Vehicle> {
        let entries: Vec<EditHistoryLog> = VehicleField::ALL
            .iter()
            .filter_map(|field| {
                let new_value = patch.field_value(*field)?;
                Self::history_entry(
                    field.label(),
                    &original.field_value(*field),
                    &new_value,
                    edited_by,
                    timestamp,
                )
            })
            .collect();

        let mut merged = patch.apply_to(original);
        merged.edit_history.extend(entries.iter().cloned());

        AuditedEdit { entries, merged }
    }

    pub fn audit_log_edit(
        original: &ParkingLog,
        patch: &LogPatch,
        edited_by: &str,
        timestamp: DateTime<Utc>,
    ) -> AuditedEdit<ParkingLog> {
        let entries: Vec<EditHistoryLog> = LogField::ALL
            .iter()
            .filter_map(|field| {
                let new_value = patch.field_value(*field)?;
                Self::history_entry(
                    field.label(),
                    &original.field_value(*field),
                    &new_value,
                    edited_by,
                    timestamp,
                )
            })
            .collect();

        let mut merged = patch.apply_to(original);
        merged.edit_history.extend(entries.iter().cloned());

        AuditedEdit { entries, merged }
    }

    /// Plan a combined vehicle + log correction.
    ///
    /// The log's denormalized plate follows the edited vehicle plate;
    /// that copy is not audited on the log itself.
    pub fn plan_edit(
        vehicle: &Vehicle,
        log: &ParkingLog,
        vehicle_patch: &VehiclePatch,
        log_patch: &LogPatch,
        edited_by: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<VehicleLogEdit, EditError> {
        if log.vehicle_id != vehicle.id {
            return Err(EditError::LogVehicleMismatch {
                log_id: log.id.clone(),
                vehicle_id: vehicle.id.clone(),
            });
        }

        let vehicle_edit = Self::audit_vehicle_edit(vehicle, vehicle_patch, edited_by, timestamp);
        let mut log_edit = Self::audit_log_edit(log, log_patch, edited_by, timestamp);
        log_edit.merged.plate = vehicle_edit.merged.plate.clone();

        Ok(VehicleLogEdit {
            vehicle: vehicle_edit,
            log: log_edit,
        })
    }

    /// Copy of a history sorted for display, newest first
    pub fn newest_first(history: &[EditHistoryLog]) -> Vec<EditHistoryLog> {
        let mut sorted = history.to_vec();
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        sorted
    }
}
