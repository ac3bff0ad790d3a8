// ==========================================
// Parking occupancy - vehicle domain model
// ==========================================

use crate::domain::edit_history::{EditHistoryLog, VehicleField};
use crate::domain::types::{UniversityLink, VehicleType};
use serde::{Deserialize, Serialize};

/// Prefix of the synthetic plate token given to bicycles
pub const BICYCLE_PLATE_PREFIX: &str = "BICI-";

// ==========================================
// Vehicle - registered vehicle
// ==========================================
// Never deleted; mutated only through the audited edit flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    pub plate: String, // unique for non-bicycles, BICI-<millis> for bicycles
    pub owner_name: String,
    pub university_link: UniversityLink,
    pub model: String,
    pub color: String,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub registered_by: String, // registrant e-mail
    #[serde(default)]
    pub edit_history: Vec<EditHistoryLog>,
}

impl Vehicle {
    /// Stringified value of an editable field, as recorded in the audit trail
    pub fn field_value(&self, field: VehicleField) -> String {
        match field {
            VehicleField::Plate => self.plate.clone(),
            VehicleField::OwnerName => self.owner_name.clone(),
            VehicleField::Model => self.model.clone(),
            VehicleField::Color => self.color.clone(),
            VehicleField::UniversityLink => self.university_link.to_string(),
            VehicleField::VehicleType => self.vehicle_type.to_string(),
        }
    }

    pub fn is_bicycle(&self) -> bool {
        self.vehicle_type == VehicleType::Bicycle
    }

    /// Case-insensitive substring match on plate or owner name.
    /// `needle` must already be lower-cased.
    pub fn matches_plate_or_owner(&self, needle: &str) -> bool {
        self.plate.to_lowercase().contains(needle)
            || self.owner_name.to_lowercase().contains(needle)
    }

    /// Same as [`Vehicle::matches_plate_or_owner`], also looking at the model
    pub fn matches_plate_owner_or_model(&self, needle: &str) -> bool {
        self.matches_plate_or_owner(needle) || self.model.to_lowercase().contains(needle)
    }
}

// ==========================================
// NewVehicle - registration input
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVehicle {
    #[serde(default)]
    pub plate: String, // ignored for bicycles
    pub owner_name: String,
    pub university_link: UniversityLink,
    pub model: String,
    pub color: String,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
}

// ==========================================
// VehiclePatch - partial update over the editable allow-list
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePatch {
    pub plate: Option<String>,
    pub owner_name: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub university_link: Option<UniversityLink>,
    #[serde(rename = "type")]
    pub vehicle_type: Option<VehicleType>,
}

impl VehiclePatch {
    /// Stringified proposed value, `None` when the field is not touched
    pub fn field_value(&self, field: VehicleField) -> Option<String> {
        match field {
            VehicleField::Plate => self.plate.clone(),
            VehicleField::OwnerName => self.owner_name.clone(),
            VehicleField::Model => self.model.clone(),
            VehicleField::Color => self.color.clone(),
            VehicleField::UniversityLink => self.university_link.map(|v| v.to_string()),
            VehicleField::VehicleType => self.vehicle_type.map(|v| v.to_string()),
        }
    }

    /// Apply the patch onto a copy of `original` (history untouched)
    pub fn apply_to(&self, original: &Vehicle) -> Vehicle {
        let mut merged = original.clone();
        if let Some(plate) = &self.plate {
            merged.plate = plate.clone();
        }
        if let Some(owner_name) = &self.owner_name {
            merged.owner_name = owner_name.clone();
        }
        if let Some(model) = &self.model {
            merged.model = model.clone();
        }
        if let Some(color) = &self.color {
            merged.color = color.clone();
        }
        if let Some(link) = self.university_link {
            merged.university_link = link;
        }
        if let Some(vehicle_type) = self.vehicle_type {
            merged.vehicle_type = vehicle_type;
        }
        merged
    }
}
