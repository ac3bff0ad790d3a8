// ==========================================
// Parking occupancy - Log Reconciliation Engine
// ==========================================
// Decides whether an entry/exit event updates the day's record
// for the vehicle or creates it. Keyed by (vehicle_id, date).
// ==========================================

use crate::domain::{LogWrite, ParkingLog, Vehicle};
use chrono::NaiveTime;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("veículo não encontrado: vehicle_id={vehicle_id}")]
    VehicleNotFound { vehicle_id: String },

    #[error("registro de estacionamento não encontrado: log_id={log_id}")]
    LogNotFound { log_id: String },
}

/// Write instruction produced for storage
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileAction {
    /// No record for the key yet
    Create(ParkingLog),
    /// Existing record overwritten in place (id and history kept)
    Update(ParkingLog),
}

impl ReconcileAction {
    pub fn record(&self) -> &ParkingLog {
        match self {
            ReconcileAction::Create(log) | ReconcileAction::Update(log) => log,
        }
    }

    pub fn into_record(self) -> ParkingLog {
        match self {
            ReconcileAction::Create(log) | ReconcileAction::Update(log) => log,
        }
    }

    pub fn is_create(&self) -> bool {
        matches!(self, ReconcileAction::Create(_))
    }
}

pub struct LogReconciliationEngine;

impl LogReconciliationEngine {
    /// Reconcile a candidate write against the logs already stored for its key.
    ///
    /// # Parameters
    /// - `vehicles`: current vehicle snapshot
    /// - `same_key_logs`: result of querying storage for (vehicle_id, date);
    ///   logs for other keys are ignored
    /// - `operator`: e-mail of the acting operator
    pub fn reconcile(
        vehicles: &[Vehicle],
        same_key_logs: &[ParkingLog],
        write: &LogWrite,
        operator: &str,
    ) -> Result<ReconcileAction, ReconcileError> {
        let vehicle = vehicles
            .iter()
            .find(|v| v.id == write.vehicle_id)
            .ok_or_else(|| ReconcileError::VehicleNotFound {
                vehicle_id: write.vehicle_id.clone(),
            })?;

        let mut matching = same_key_logs
            .iter()
            .filter(|l| l.vehicle_id == write.vehicle_id && l.date == write.date);

        match matching.next() {
            Some(existing) => {
                let extra = matching.count();
                if extra > 0 {
                    tracing::warn!(
                        vehicle_id = %write.vehicle_id,
                        date = %write.date,
                        duplicates = extra,
                        "multiple parking logs share one key, updating the first"
                    );
                }

                let mut updated = existing.clone();
                updated.entry_time = write.entry_time;
                updated.exit_time = write.exit_time;
                updated.plate = vehicle.plate.clone();
                updated.operator_name = operator.to_string();
                Ok(ReconcileAction::Update(updated))
            }
            None => Ok(ReconcileAction::Create(ParkingLog {
                id: Uuid::new_v4().to_string(),
                vehicle_id: write.vehicle_id.clone(),
                plate: vehicle.plate.clone(),
                date: write.date,
                entry_time: write.entry_time,
                exit_time: write.exit_time,
                operator_name: operator.to_string(),
                edit_history: vec![],
            })),
        }
    }

    /// Close an open stay by log id (quick exit).
    ///
    /// Goes through [`LogReconciliationEngine::reconcile`] so plate and
    /// operator are refreshed exactly like a regular save.
    pub fn quick_exit(
        vehicles: &[Vehicle],
        logs: &[ParkingLog],
        log_id: &str,
        exit_time: NaiveTime,
        operator: &str,
    ) -> Result<ParkingLog, ReconcileError> {
        let log = logs
            .iter()
            .find(|l| l.id == log_id)
            .ok_or_else(|| ReconcileError::LogNotFound {
                log_id: log_id.to_string(),
            })?;

        let write = LogWrite {
            vehicle_id: log.vehicle_id.clone(),
            date: log.date,
            entry_time: log.entry_time,
            exit_time: Some(exit_time),
        };

        Self::reconcile(vehicles, std::slice::from_ref(log), &write, operator)
            .map(ReconcileAction::into_record)
    }
}
