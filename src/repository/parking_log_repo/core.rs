use crate::domain::parking_log::{format_date, hhmm};
use crate::domain::ParkingLog;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_mapping::{history_json, parse_date, parse_history, parse_time};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

pub(super) const SELECT_COLUMNS: &str = r#"
    SELECT log_id, vehicle_id, plate, log_date, entry_time, exit_time,
           operator_name, edit_history_json
    FROM parking_log
"#;

// ==========================================
// ParkingLogRepository
// ==========================================
// Pure data mapping; reconciliation lives in the engine layer.
pub struct ParkingLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ParkingLogRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    pub(super) fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // Writes
    // ==========================================

    /// Insert a log.
    ///
    /// # Returns
    /// - `Err(UniqueConstraintViolation)`: the vehicle already has a log that day
    pub fn insert(&self, log: &ParkingLog) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        Self::insert_with(&conn, log)
    }

    pub fn update(&self, log: &ParkingLog) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        Self::update_with(&conn, log)
    }

    pub fn insert_with(conn: &Connection, log: &ParkingLog) -> RepositoryResult<()> {
        conn.execute(
            r#"
            INSERT INTO parking_log (
                log_id, vehicle_id, plate, log_date, entry_time, exit_time,
                operator_name, edit_history_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                log.id,
                log.vehicle_id,
                log.plate,
                format_date(log.date),
                hhmm::format(log.entry_time),
                log.exit_time.map(hhmm::format),
                log.operator_name,
                history_json(&log.edit_history)?,
            ],
        )?;
        Ok(())
    }

    pub fn update_with(conn: &Connection, log: &ParkingLog) -> RepositoryResult<()> {
        let rows = conn.execute(
            r#"
            UPDATE parking_log SET
                vehicle_id = ?2, plate = ?3, log_date = ?4, entry_time = ?5,
                exit_time = ?6, operator_name = ?7, edit_history_json = ?8
            WHERE log_id = ?1
            "#,
            params![
                log.id,
                log.vehicle_id,
                log.plate,
                format_date(log.date),
                hhmm::format(log.entry_time),
                log.exit_time.map(hhmm::format),
                log.operator_name,
                history_json(&log.edit_history)?,
            ],
        )?;

        if rows == 0 {
            return Err(RepositoryError::not_found("ParkingLog", &log.id));
        }
        Ok(())
    }

    pub(super) fn map_row(row: &Row<'_>) -> rusqlite::Result<ParkingLog> {
        let date: String = row.get(3)?;
        let entry: String = row.get(4)?;
        let exit: Option<String> = row.get(5)?;
        let history: String = row.get(7)?;

        let exit_time = match exit.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(parse_time(5, raw)?),
        };

        Ok(ParkingLog {
            id: row.get(0)?,
            vehicle_id: row.get(1)?,
            plate: row.get(2)?,
            date: parse_date(3, &date)?,
            entry_time: parse_time(4, &entry)?,
            exit_time,
            operator_name: row.get(6)?,
            edit_history: parse_history(7, &history)?,
        })
    }
}
