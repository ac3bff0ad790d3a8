// ==========================================
// Parking occupancy - edit history (audit trail entries)
// ==========================================
// Append-only: entries are never rewritten once stored.
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// EditHistoryLog - one field-level correction
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditHistoryLog {
    pub timestamp: DateTime<Utc>, // when the edit was written
    pub edited_by: String,        // editor e-mail
    pub field: String,            // human label, e.g. "Placa"
    pub old_value: String,
    pub new_value: String,
}

// ==========================================
// VehicleField - user-editable vehicle attributes
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleField {
    Plate,
    OwnerName,
    Model,
    Color,
    UniversityLink,
    VehicleType,
}

impl VehicleField {
    /// Allow-list, in the order entries are emitted
    pub const ALL: [VehicleField; 6] = [
        VehicleField::Plate,
        VehicleField::OwnerName,
        VehicleField::Model,
        VehicleField::Color,
        VehicleField::UniversityLink,
        VehicleField::VehicleType,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            VehicleField::Plate => "Placa",
            VehicleField::OwnerName => "Proprietário",
            VehicleField::Model => "Modelo",
            VehicleField::Color => "Cor",
            VehicleField::UniversityLink => "Vínculo",
            VehicleField::VehicleType => "Tipo",
        }
    }
}

// ==========================================
// LogField - user-editable parking log attributes
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogField {
    Date,
    EntryTime,
    ExitTime,
}

impl LogField {
    pub const ALL: [LogField; 3] = [LogField::Date, LogField::EntryTime, LogField::ExitTime];

    pub fn label(&self) -> &'static str {
        match self {
            LogField::Date => "Data",
            LogField::EntryTime => "Entrada",
            LogField::ExitTime => "Saída",
        }
    }
}
