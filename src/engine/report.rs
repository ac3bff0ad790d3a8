// ==========================================
// Parking occupancy - Report Query Engine
// ==========================================
// Date-range and text-search queries over the log/vehicle
// snapshots, producing flat rows ready for display or CSV.
// ==========================================

use crate::domain::parking_log::{format_date, hhmm};
use crate::domain::{ParkingLog, Vehicle};
use crate::engine::occupancy::LogWithVehicle;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Shown in the exit column while a stay is open
pub const OPEN_EXIT_PLACEHOLDER: &str = "N/A";
/// Shown for vehicle columns when the log points at an unknown vehicle
pub const MISSING_VEHICLE_PLACEHOLDER: &str = "Não encontrado";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("intervalo de datas inválido: {start} > {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

// ==========================================
// FormattedLogRecord - one report row
// ==========================================
// Field names double as CSV headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedLogRecord {
    #[serde(rename = "Data")]
    pub date: String,
    #[serde(rename = "Placa/ID")]
    pub plate: String,
    #[serde(rename = "Entrada")]
    pub entry_time: String,
    #[serde(rename = "Saída")]
    pub exit_time: String,
    #[serde(rename = "Proprietário")]
    pub owner_name: String,
    #[serde(rename = "Modelo")]
    pub model: String,
    #[serde(rename = "Operador")]
    pub operator_name: String,
}

// ==========================================
// VehicleExportRecord - vehicle list row
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleExportRecord {
    #[serde(rename = "Placa/ID")]
    pub plate: String,
    #[serde(rename = "Proprietário")]
    pub owner_name: String,
    #[serde(rename = "Vínculo")]
    pub university_link: String,
    #[serde(rename = "Modelo")]
    pub model: String,
    #[serde(rename = "Cor")]
    pub color: String,
    #[serde(rename = "Tipo")]
    pub vehicle_type: String,
    #[serde(rename = "Cadastrado Por")]
    pub registered_by: String,
}

impl From<&Vehicle> for VehicleExportRecord {
    fn from(v: &Vehicle) -> Self {
        Self {
            plate: v.plate.clone(),
            owner_name: v.owner_name.clone(),
            university_link: v.university_link.to_string(),
            model: v.model.clone(),
            color: v.color.clone(),
            vehicle_type: v.vehicle_type.to_string(),
            registered_by: v.registered_by.clone(),
        }
    }
}

/// Trimmed, lower-cased search term; blank means "no filter"
pub(crate) fn normalize_term(term: Option<&str>) -> Option<String> {
    term.map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty())
}

pub struct ReportQueryEngine;

impl ReportQueryEngine {
    /// Logs dated within `[start, end]`, optionally filtered by plate/owner,
    /// formatted and sorted most recent first.
    ///
    /// # Errors
    /// `ReportError::InvalidRange` when `start > end`.
    pub fn query_logs(
        vehicles: &[Vehicle],
        logs: &[ParkingLog],
        start: NaiveDate,
        end: NaiveDate,
        term: Option<&str>,
    ) -> Result<Vec<FormattedLogRecord>, ReportError> {
        if start > end {
            return Err(ReportError::InvalidRange { start, end });
        }

        let by_id: HashMap<&str, &Vehicle> = vehicles.iter().map(|v| (v.id.as_str(), v)).collect();
        let needle = normalize_term(term);

        let mut selected: Vec<(&ParkingLog, Option<&Vehicle>)> = logs
            .iter()
            .filter(|log| log.date >= start && log.date <= end)
            .map(|log| (log, by_id.get(log.vehicle_id.as_str()).copied()))
            .filter(|(_, vehicle)| match (&needle, vehicle) {
                (None, _) => true,
                (Some(n), Some(v)) => v.matches_plate_or_owner(n),
                (Some(_), None) => false,
            })
            .collect();

        selected.sort_by(|(a, _), (b, _)| (b.date, b.entry_time).cmp(&(a.date, a.entry_time)));

        Ok(selected
            .into_iter()
            .map(|(log, vehicle)| Self::format_log(log, vehicle))
            .collect())
    }

    /// Vehicle-only search on plate/owner/model, sorted by owner name
    pub fn search_vehicles<'a>(vehicles: &'a [Vehicle], term: Option<&str>) -> Vec<&'a Vehicle> {
        let needle = normalize_term(term);
        let mut found: Vec<&Vehicle> = vehicles
            .iter()
            .filter(|v| match &needle {
                Some(n) => v.matches_plate_owner_or_model(n),
                None => true,
            })
            .collect();
        found.sort_by(|a, b| a.owner_name.cmp(&b.owner_name));
        found
    }

    /// Logs of one day with their vehicles, earliest entry first.
    /// Logs with an unknown vehicle are left out.
    pub fn daily_logs<'a>(
        vehicles: &'a [Vehicle],
        logs: &'a [ParkingLog],
        date: NaiveDate,
        term: Option<&str>,
    ) -> Vec<LogWithVehicle<'a>> {
        let by_id: HashMap<&str, &Vehicle> = vehicles.iter().map(|v| (v.id.as_str(), v)).collect();
        let needle = normalize_term(term);

        let mut rows: Vec<LogWithVehicle<'a>> = logs
            .iter()
            .filter(|log| log.date == date)
            .filter_map(|log| {
                by_id
                    .get(log.vehicle_id.as_str())
                    .map(|vehicle| LogWithVehicle { log, vehicle: *vehicle })
            })
            .filter(|row| match &needle {
                Some(n) => row.vehicle.matches_plate_owner_or_model(n),
                None => true,
            })
            .collect();

        rows.sort_by(|a, b| a.log.entry_time.cmp(&b.log.entry_time));
        rows
    }

    pub fn vehicle_export_records(vehicles: &[&Vehicle]) -> Vec<VehicleExportRecord> {
        vehicles.iter().map(|v| VehicleExportRecord::from(*v)).collect()
    }

    fn format_log(log: &ParkingLog, vehicle: Option<&Vehicle>) -> FormattedLogRecord {
        FormattedLogRecord {
            date: format_date(log.date),
            plate: log.plate.clone(),
            entry_time: hhmm::format(log.entry_time),
            exit_time: log
                .exit_time
                .map(hhmm::format)
                .unwrap_or_else(|| OPEN_EXIT_PLACEHOLDER.to_string()),
            owner_name: vehicle
                .map(|v| v.owner_name.clone())
                .unwrap_or_else(|| MISSING_VEHICLE_PLACEHOLDER.to_string()),
            model: vehicle
                .map(|v| v.model.clone())
                .unwrap_or_else(|| MISSING_VEHICLE_PLACEHOLDER.to_string()),
            operator_name: log.operator_name.clone(),
        }
    }
}
