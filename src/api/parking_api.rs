// ==========================================
// Parking occupancy - parking API
// ==========================================
// Vehicle registration, entry/exit logging, audited corrections,
// capacities and occupancy. Snapshots are read from the store,
// decisions are taken by the engines, results written back.
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{
    DetailedOccupancyStats, EditHistoryLog, LogPatch, LogWrite, NewVehicle, ParkingConfig,
    ParkingLog, User, Vehicle, VehiclePatch,
};
use crate::engine::{
    AuditTrailEngine, LogReconciliationEngine, LogWithVehicle, OccupancyCalculator,
    ReconcileAction, RoleGuard, VehicleLogEdit, VehicleRegistrar,
};
use crate::i18n::t_with_args;
use crate::repository::ParkingStore;
use chrono::{Local, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use std::sync::Arc;

// ==========================================
// ParkingLogView - owned log + vehicle pair
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingLogView {
    pub log: ParkingLog,
    pub vehicle: Vehicle,
}

impl From<LogWithVehicle<'_>> for ParkingLogView {
    fn from(row: LogWithVehicle<'_>) -> Self {
        Self {
            log: row.log.clone(),
            vehicle: row.vehicle.clone(),
        }
    }
}

// ==========================================
// ParkingApi
// ==========================================
pub struct ParkingApi {
    store: Arc<dyn ParkingStore>,
}

impl ParkingApi {
    pub fn new(store: Arc<dyn ParkingStore>) -> Self {
        Self { store }
    }

    // ==========================================
    // Vehicles
    // ==========================================

    /// Register a vehicle on behalf of `actor`
    pub async fn register_vehicle(&self, actor: &User, input: &NewVehicle) -> ApiResult<Vehicle> {
        let vehicles = self.store.list_vehicles().await?;
        let vehicle = VehicleRegistrar::prepare(&vehicles, input, &actor.email, Utc::now())
            .map_err(|e| {
                tracing::warn!(actor = %actor.email, error = %e, "vehicle registration refused");
                ApiError::from(e)
            })?;

        self.store.create_vehicle(&vehicle).await?;
        tracing::info!(
            vehicle_id = %vehicle.id,
            plate = %vehicle.plate,
            vehicle_type = %vehicle.vehicle_type,
            registered_by = %actor.email,
            "vehicle registered"
        );
        Ok(vehicle)
    }

    /// Audited correction of a vehicle alone.
    ///
    /// Same validation as registration; a new plate is not copied onto
    /// the vehicle's existing logs.
    pub async fn update_vehicle(
        &self,
        editor: &User,
        vehicle_id: &str,
        patch: &VehiclePatch,
    ) -> ApiResult<Vehicle> {
        let vehicles = self.store.list_vehicles().await?;
        let original = vehicles
            .iter()
            .find(|v| v.id == vehicle_id)
            .ok_or_else(|| ApiError::vehicle_not_found(vehicle_id))?;

        let patch = VehicleRegistrar::prepare_patch(&vehicles, original, patch).map_err(|e| {
            tracing::warn!(
                vehicle_id,
                editor = %editor.email,
                error = %e,
                "vehicle edit refused"
            );
            ApiError::from(e)
        })?;
        let edit =
            AuditTrailEngine::audit_vehicle_edit(original, &patch, &editor.email, Utc::now());
        if !edit.has_changes() {
            return Ok(edit.merged);
        }

        self.store.update_vehicle(&edit.merged).await?;
        tracing::info!(
            vehicle_id,
            edited_by = %editor.email,
            entries = edit.entries.len(),
            "vehicle edited"
        );
        Ok(edit.merged)
    }

    pub async fn vehicle_history(&self, vehicle_id: &str) -> ApiResult<Vec<EditHistoryLog>> {
        let vehicle = self
            .store
            .find_vehicle(vehicle_id)
            .await?
            .ok_or_else(|| ApiError::vehicle_not_found(vehicle_id))?;
        Ok(AuditTrailEngine::newest_first(&vehicle.edit_history))
    }

    pub async fn log_history(&self, log_id: &str) -> ApiResult<Vec<EditHistoryLog>> {
        let log = self
            .store
            .find_log(log_id)
            .await?
            .ok_or_else(|| ApiError::log_not_found(log_id))?;
        Ok(AuditTrailEngine::newest_first(&log.edit_history))
    }

    // ==========================================
    // Entry / exit
    // ==========================================

    /// Record an entry/exit event, creating or updating the day's log.
    ///
    /// A concurrent create for the same (vehicle, date) surfaces as a
    /// unique violation; the key is re-read and the write retried once
    /// as an update.
    pub async fn save_log(&self, operator: &User, write: &LogWrite) -> ApiResult<ParkingLog> {
        let vehicles = self.store.list_vehicles().await?;
        let same_key = self.store.find_logs_by_key(&write.vehicle_id, write.date).await?;

        let action =
            LogReconciliationEngine::reconcile(&vehicles, &same_key, write, &operator.email)?;
        match action {
            ReconcileAction::Update(log) => {
                self.store.update_log(&log).await?;
                tracing::info!(
                    log_id = %log.id,
                    vehicle_id = %log.vehicle_id,
                    date = %log.date,
                    "parking log updated"
                );
                Ok(log)
            }
            ReconcileAction::Create(log) => match self.store.create_log(&log).await {
                Ok(()) => {
                    tracing::info!(
                        log_id = %log.id,
                        vehicle_id = %log.vehicle_id,
                        date = %log.date,
                        "parking log created"
                    );
                    Ok(log)
                }
                Err(e) if e.is_unique_violation() => {
                    tracing::warn!(
                        vehicle_id = %write.vehicle_id,
                        date = %write.date,
                        "parking log created concurrently, retrying as update"
                    );
                    self.retry_as_update(&vehicles, operator, write).await
                }
                Err(e) => Err(e.into()),
            },
        }
    }

    async fn retry_as_update(
        &self,
        vehicles: &[Vehicle],
        operator: &User,
        write: &LogWrite,
    ) -> ApiResult<ParkingLog> {
        let same_key = self.store.find_logs_by_key(&write.vehicle_id, write.date).await?;
        match LogReconciliationEngine::reconcile(vehicles, &same_key, write, &operator.email)? {
            ReconcileAction::Update(log) => {
                self.store.update_log(&log).await?;
                Ok(log)
            }
            // the conflicting row vanished between the two reads
            ReconcileAction::Create(_) => Err(ApiError::StorageError(t_with_args(
                "storage.failure",
                &[("detail", "parking_log key conflict")],
            ))),
        }
    }

    /// Close an open stay
    pub async fn quick_exit(
        &self,
        operator: &User,
        log_id: &str,
        exit_time: NaiveTime,
    ) -> ApiResult<ParkingLog> {
        let vehicles = self.store.list_vehicles().await?;
        let logs = self.store.list_logs().await?;

        let log = LogReconciliationEngine::quick_exit(
            &vehicles,
            &logs,
            log_id,
            exit_time,
            &operator.email,
        )?;
        self.store.update_log(&log).await?;
        tracing::info!(log_id = %log.id, exit_time = %exit_time, "quick exit recorded");
        Ok(log)
    }

    // ==========================================
    // Audited correction
    // ==========================================

    /// Apply a correction to a vehicle and one of its logs together.
    ///
    /// # Errors
    /// - NotFound: vehicle or log missing
    /// - ValidationError: log belongs to another vehicle, the new date
    ///   already holds a log of the same vehicle, a required field is
    ///   blank or the new plate belongs to another vehicle
    pub async fn update_log_and_vehicle(
        &self,
        editor: &User,
        vehicle_id: &str,
        log_id: &str,
        vehicle_patch: &VehiclePatch,
        log_patch: &LogPatch,
    ) -> ApiResult<VehicleLogEdit> {
        let vehicles = self.store.list_vehicles().await?;
        let logs = self.store.list_logs().await?;

        let vehicle = vehicles
            .iter()
            .find(|v| v.id == vehicle_id)
            .ok_or_else(|| ApiError::vehicle_not_found(vehicle_id))?;
        let log = logs
            .iter()
            .find(|l| l.id == log_id)
            .ok_or_else(|| ApiError::log_not_found(log_id))?;

        let vehicle_patch = VehicleRegistrar::prepare_patch(&vehicles, vehicle, vehicle_patch)
            .map_err(|e| {
                tracing::warn!(
                    vehicle_id,
                    editor = %editor.email,
                    error = %e,
                    "vehicle edit refused"
                );
                ApiError::from(e)
            })?;

        let edit = AuditTrailEngine::plan_edit(
            vehicle,
            log,
            &vehicle_patch,
            log_patch,
            &editor.email,
            Utc::now(),
        )?;
        if edit.is_noop() {
            tracing::debug!(vehicle_id, log_id, "edit without changes, nothing written");
            return Ok(edit);
        }

        let new_date = edit.log.merged.date;
        if new_date != log.date
            && logs
                .iter()
                .any(|l| l.id != log.id && l.vehicle_id == log.vehicle_id && l.date == new_date)
        {
            return Err(Self::duplicate_daily_log(new_date));
        }

        self.store
            .apply_edit(&edit.vehicle.merged, &edit.log.merged)
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    Self::duplicate_daily_log(new_date)
                } else {
                    ApiError::from(e)
                }
            })?;

        tracing::info!(
            vehicle_id,
            log_id,
            edited_by = %editor.email,
            entries = edit.entry_count(),
            "vehicle and log edited"
        );
        Ok(edit)
    }

    fn duplicate_daily_log(date: NaiveDate) -> ApiError {
        ApiError::ValidationError(t_with_args(
            "validation.duplicate_daily_log",
            &[("date", &date.to_string())],
        ))
    }

    // ==========================================
    // Capacities and occupancy
    // ==========================================

    pub async fn parking_config(&self) -> ApiResult<ParkingConfig> {
        Ok(self.store.get_config().await?)
    }

    /// Replace the spot capacities (administrators only)
    pub async fn save_config(&self, actor: &User, config: &ParkingConfig) -> ApiResult<()> {
        RoleGuard::check_config_edit(actor).map_err(|e| {
            tracing::warn!(actor = %actor.email, "parking config edit refused");
            ApiError::from(e)
        })?;
        self.store.set_config(config).await?;
        tracing::info!(
            actor = %actor.email,
            cars = config.total_car_spots,
            motorcycles = config.total_motorcycle_spots,
            bicycles = config.total_bicycle_spots,
            "parking config saved"
        );
        Ok(())
    }

    pub async fn occupancy_for(&self, date: NaiveDate) -> ApiResult<DetailedOccupancyStats> {
        let vehicles = self.store.list_vehicles().await?;
        let logs = self.store.list_logs_between(date, date).await?;
        let config = self.store.get_config().await?;
        Ok(OccupancyCalculator::calculate(&vehicles, &logs, date, &config))
    }

    /// Occupancy for the local calendar day
    pub async fn current_occupancy(&self) -> ApiResult<DetailedOccupancyStats> {
        self.occupancy_for(Local::now().date_naive()).await
    }

    /// Vehicles currently parked on `date`, earliest entry first
    pub async fn active_entries(
        &self,
        date: NaiveDate,
        term: Option<&str>,
    ) -> ApiResult<Vec<ParkingLogView>> {
        let vehicles = self.store.list_vehicles().await?;
        let logs = self.store.list_logs_between(date, date).await?;
        Ok(OccupancyCalculator::active_entries(&vehicles, &logs, date, term)
            .into_iter()
            .map(ParkingLogView::from)
            .collect())
    }
}
