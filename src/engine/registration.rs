// ==========================================
// Parking occupancy - vehicle and user registration
// ==========================================
// Validates registration input against the current snapshot and
// builds the record to create. Bicycles carry no plate and get a
// synthetic BICI-<millis> token instead.
// ==========================================

use crate::domain::vehicle::BICYCLE_PLATE_PREFIX;
use crate::domain::{NewVehicle, User, Vehicle, VehiclePatch, VehicleType};
use crate::engine::role_guard::RoleGuard;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("campos obrigatórios ausentes: {}", .fields.join(", "))]
    MissingRequiredFields { fields: Vec<&'static str> },

    #[error("placa já cadastrada: {plate}")]
    DuplicatePlate { plate: String },

    #[error("e-mail já cadastrado: {email}")]
    EmailInUse { email: String },
}

pub struct VehicleRegistrar;

impl VehicleRegistrar {
    /// Build the vehicle to create.
    ///
    /// # Rules
    /// - owner name, model and color are required; plate too unless bicycle
    /// - non-bicycle plates are upper-cased and must not exist yet
    /// - bicycles get a unique `BICI-<unix millis>` token
    pub fn prepare(
        existing: &[Vehicle],
        input: &NewVehicle,
        registered_by: &str,
        now: DateTime<Utc>,
    ) -> Result<Vehicle, RegistrationError> {
        let is_bicycle = input.vehicle_type == VehicleType::Bicycle;

        let mut missing = Vec::new();
        if !is_bicycle && input.plate.trim().is_empty() {
            missing.push("plate");
        }
        if input.owner_name.trim().is_empty() {
            missing.push("ownerName");
        }
        if input.model.trim().is_empty() {
            missing.push("model");
        }
        if input.color.trim().is_empty() {
            missing.push("color");
        }
        if !missing.is_empty() {
            return Err(RegistrationError::MissingRequiredFields { fields: missing });
        }

        let plate = if is_bicycle {
            Self::bicycle_token(existing, now)
        } else {
            let plate = input.plate.trim().to_uppercase();
            if existing.iter().any(|v| v.plate == plate) {
                return Err(RegistrationError::DuplicatePlate { plate });
            }
            plate
        };

        Ok(Vehicle {
            id: Uuid::new_v4().to_string(),
            plate,
            owner_name: input.owner_name.trim().to_string(),
            university_link: input.university_link,
            model: input.model.trim().to_string(),
            color: input.color.trim().to_string(),
            vehicle_type: input.vehicle_type,
            registered_by: registered_by.to_string(),
            edit_history: vec![],
        })
    }

    /// Normalize a correction to `original` under the registration rules.
    ///
    /// Touched text fields are trimmed and must not be blank. When the
    /// edited vehicle is not a bicycle its plate is upper-cased and must
    /// not belong to any other vehicle.
    pub fn prepare_patch(
        existing: &[Vehicle],
        original: &Vehicle,
        patch: &VehiclePatch,
    ) -> Result<VehiclePatch, RegistrationError> {
        let trimmed = |value: &Option<String>| value.as_ref().map(|v| v.trim().to_string());
        let mut normalized = VehiclePatch {
            plate: trimmed(&patch.plate),
            owner_name: trimmed(&patch.owner_name),
            model: trimmed(&patch.model),
            color: trimmed(&patch.color),
            university_link: patch.university_link,
            vehicle_type: patch.vehicle_type,
        };

        let mut missing = Vec::new();
        let blank = |value: &Option<String>| value.as_deref().is_some_and(|v| v.is_empty());
        if blank(&normalized.plate) {
            missing.push("plate");
        }
        if blank(&normalized.owner_name) {
            missing.push("ownerName");
        }
        if blank(&normalized.model) {
            missing.push("model");
        }
        if blank(&normalized.color) {
            missing.push("color");
        }
        if !missing.is_empty() {
            return Err(RegistrationError::MissingRequiredFields { fields: missing });
        }

        let merged = normalized.apply_to(original);
        if merged.is_bicycle() {
            return Ok(normalized);
        }

        let plate = merged.plate.to_uppercase();
        if existing.iter().any(|v| v.id != original.id && v.plate == plate) {
            return Err(RegistrationError::DuplicatePlate { plate });
        }
        if normalized.plate.is_some() {
            normalized.plate = Some(plate);
        }
        Ok(normalized)
    }

    /// `BICI-<millis>`, bumped until no vehicle in the snapshot holds it
    fn bicycle_token(existing: &[Vehicle], now: DateTime<Utc>) -> String {
        let taken: HashSet<&str> = existing.iter().map(|v| v.plate.as_str()).collect();
        let mut millis = now.timestamp_millis();
        loop {
            let token = format!("{}{}", BICYCLE_PLATE_PREFIX, millis);
            if !taken.contains(token.as_str()) {
                return token;
            }
            millis += 1;
        }
    }
}

pub struct UserRegistrar;

impl UserRegistrar {
    /// Build the account record for an identity issued by the provider
    pub fn prepare(users: &[User], uid: &str, email: &str) -> Result<User, RegistrationError> {
        let email = email.trim();
        let mut missing = Vec::new();
        if uid.trim().is_empty() {
            missing.push("uid");
        }
        if email.is_empty() {
            missing.push("email");
        }
        if !missing.is_empty() {
            return Err(RegistrationError::MissingRequiredFields { fields: missing });
        }

        if users.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
            return Err(RegistrationError::EmailInUse {
                email: email.to_string(),
            });
        }

        Ok(User {
            uid: uid.trim().to_string(),
            email: email.to_string(),
            role: RoleGuard::role_for_new_user(users),
        })
    }
}
