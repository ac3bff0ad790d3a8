// ==========================================
// Parking occupancy - parking log domain model
// ==========================================
// Invariant: at most one ParkingLog per (vehicle_id, date).
// exit_time == None means the vehicle is still parked.
// ==========================================

use crate::domain::edit_history::{EditHistoryLog, LogField};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// ==========================================
// ParkingLog - one vehicle's stay on one day
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingLog {
    pub id: String,
    pub vehicle_id: String, // Vehicle.id (not enforced by storage)
    pub plate: String,      // copy of Vehicle.plate at write time
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub entry_time: NaiveTime,
    #[serde(with = "hhmm::option", default)]
    pub exit_time: Option<NaiveTime>,
    pub operator_name: String,
    #[serde(default)]
    pub edit_history: Vec<EditHistoryLog>,
}

impl ParkingLog {
    /// Active on `date`: logged that day and not yet exited
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.date == date && self.exit_time.is_none()
    }

    pub fn field_value(&self, field: LogField) -> String {
        match field {
            LogField::Date => format_date(self.date),
            LogField::EntryTime => hhmm::format(self.entry_time),
            LogField::ExitTime => self.exit_time.map(hhmm::format).unwrap_or_default(),
        }
    }
}

// ==========================================
// LogWrite - candidate entry/exit event (no id yet)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogWrite {
    pub vehicle_id: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub entry_time: NaiveTime,
    #[serde(with = "hhmm::option", default)]
    pub exit_time: Option<NaiveTime>,
}

// ==========================================
// LogPatch - partial update over the editable allow-list
// ==========================================
// exit_time: None = untouched, Some(None) = cleared (stay re-opened)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogPatch {
    pub date: Option<NaiveDate>,
    pub entry_time: Option<NaiveTime>,
    pub exit_time: Option<Option<NaiveTime>>,
}

impl LogPatch {
    pub fn field_value(&self, field: LogField) -> Option<String> {
        match field {
            LogField::Date => self.date.map(format_date),
            LogField::EntryTime => self.entry_time.map(hhmm::format),
            LogField::ExitTime => self
                .exit_time
                .map(|exit| exit.map(hhmm::format).unwrap_or_default()),
        }
    }

    pub fn apply_to(&self, original: &ParkingLog) -> ParkingLog {
        let mut merged = original.clone();
        if let Some(date) = self.date {
            merged.date = date;
        }
        if let Some(entry_time) = self.entry_time {
            merged.entry_time = entry_time;
        }
        if let Some(exit_time) = self.exit_time {
            merged.exit_time = exit_time;
        }
        merged
    }
}

/// ISO calendar day, `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ==========================================
// hhmm - `HH:MM` wire format for NaiveTime
// ==========================================
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn format(time: NaiveTime) -> String {
        time.format(FORMAT).to_string()
    }

    pub fn parse(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(raw.trim(), FORMAT)
    }

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            time: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(t) => serializer.serialize_some(&super::format(*t)),
                None => serializer.serialize_none(),
            }
        }

        /// Missing, null and "" all mean "not exited"
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if !raw.trim().is_empty() => {
                    super::parse(&raw).map(Some).map_err(serde::de::Error::custom)
                }
                _ => Ok(None),
            }
        }
    }
}
