// ==========================================
// Parking occupancy - row mapping helpers
// ==========================================
// Text columns -> typed domain values. Conversion failures are
// reported as FromSqlConversionFailure with the column index.
// ==========================================

use crate::domain::parking_log::{hhmm, DATE_FORMAT};
use crate::domain::EditHistoryLog;
use crate::repository::error::RepositoryResult;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::types::Type;

pub(crate) fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

pub(crate) fn parse_enum<T>(
    idx: usize,
    raw: &str,
    parse: fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    parse(raw).ok_or_else(|| conversion_error(idx, format!("unknown enum value '{}'", raw)))
}

pub(crate) fn parse_date(idx: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| conversion_error(idx, format!("invalid date '{}': {}", raw, e)))
}

pub(crate) fn parse_time(idx: usize, raw: &str) -> rusqlite::Result<NaiveTime> {
    hhmm::parse(raw).map_err(|e| conversion_error(idx, format!("invalid time '{}': {}", raw, e)))
}

pub(crate) fn parse_history(idx: usize, raw: &str) -> rusqlite::Result<Vec<EditHistoryLog>> {
    serde_json::from_str(raw)
        .map_err(|e| conversion_error(idx, format!("invalid edit history: {}", e)))
}

pub(crate) fn history_json(history: &[EditHistoryLog]) -> RepositoryResult<String> {
    Ok(serde_json::to_string(history)?)
}
