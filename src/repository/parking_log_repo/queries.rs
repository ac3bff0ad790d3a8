use super::core::{ParkingLogRepository, SELECT_COLUMNS};
use crate::domain::parking_log::format_date;
use crate::domain::ParkingLog;
use crate::repository::error::RepositoryResult;
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

impl ParkingLogRepository {
    // ==========================================
    // Queries
    // ==========================================

    pub fn find_all(&self) -> RepositoryResult<Vec<ParkingLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY log_date, entry_time", SELECT_COLUMNS))?;
        let logs = stmt
            .query_map([], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    pub fn find_by_id(&self, log_id: &str) -> RepositoryResult<Option<ParkingLog>> {
        let conn = self.get_conn()?;
        let log = conn
            .query_row(
                &format!("{} WHERE log_id = ?1", SELECT_COLUMNS),
                params![log_id],
                Self::map_row,
            )
            .optional()?;
        Ok(log)
    }

    /// All logs of a vehicle on a date.
    ///
    /// Normally zero or one; more only for data written before the
    /// unique index existed.
    pub fn find_by_key(
        &self,
        vehicle_id: &str,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<ParkingLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE vehicle_id = ?1 AND log_date = ?2 ORDER BY rowid",
            SELECT_COLUMNS
        ))?;
        let logs = stmt
            .query_map(params![vehicle_id, format_date(date)], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    /// Logs with `start <= date <= end` (ISO dates compare as text)
    pub fn find_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<ParkingLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE log_date >= ?1 AND log_date <= ?2 ORDER BY log_date, entry_time",
            SELECT_COLUMNS
        ))?;
        let logs = stmt
            .query_map(params![format_date(start), format_date(end)], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }
}
