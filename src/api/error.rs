// ==========================================
// Parking occupancy - API error types
// ==========================================
// Maps engine/repository/export errors onto the four user-facing
// categories (validation, not found, authorization, storage) plus
// the invalid date range signal. Messages are localized at
// conversion time through rust-i18n.
// ==========================================

use crate::engine::{
    EditError, GuardError, GuardedAction, ReconcileError, RegistrationError, ReportError,
};
use crate::export::ExportError;
use crate::i18n::t_with_args;
use crate::repository::error::RepositoryError;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // Caller errors
    // ==========================================
    #[error("{0}")]
    ValidationError(String),

    #[error("{message}")]
    InvalidDateRange {
        start: NaiveDate,
        end: NaiveDate,
        message: String,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AuthorizationError(String),

    // ==========================================
    // Storage errors
    // ==========================================
    #[error("{0}")]
    StorageError(String),

    // ==========================================
    // Generic
    // ==========================================
    #[error("erro interno: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// Stable category code, independent of the locale
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::ValidationError(_) => "ValidationError",
            ApiError::InvalidDateRange { .. } => "InvalidDateRange",
            ApiError::NotFound(_) => "NotFoundError",
            ApiError::AuthorizationError(_) => "AuthorizationError",
            ApiError::StorageError(_) => "StorageError",
            ApiError::InternalError(_) | ApiError::Other(_) => "InternalError",
        }
    }

    pub(crate) fn vehicle_not_found(id: &str) -> Self {
        ApiError::NotFound(t_with_args("not_found.vehicle", &[("id", id)]))
    }

    pub(crate) fn log_not_found(id: &str) -> Self {
        ApiError::NotFound(t_with_args("not_found.log", &[("id", id)]))
    }

    pub(crate) fn user_not_found(id: &str) -> Self {
        ApiError::NotFound(t_with_args("not_found.user", &[("id", id)]))
    }

    fn storage(detail: &str) -> Self {
        ApiError::StorageError(t_with_args("storage.failure", &[("detail", detail)]))
    }
}

// ==========================================
// From RepositoryError
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => match entity.as_str() {
                "Vehicle" => ApiError::vehicle_not_found(&id),
                "ParkingLog" => ApiError::log_not_found(&id),
                "User" => ApiError::user_not_found(&id),
                _ => ApiError::NotFound(format!("{}(id={})", entity, id)),
            },
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
            other => {
                tracing::error!(error = %other, "storage failure");
                ApiError::storage(&other.to_string())
            }
        }
    }
}

// ==========================================
// From engine errors
// ==========================================
impl From<ReconcileError> for ApiError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::VehicleNotFound { vehicle_id } => {
                ApiError::vehicle_not_found(&vehicle_id)
            }
            ReconcileError::LogNotFound { log_id } => ApiError::log_not_found(&log_id),
        }
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        let message = match &err {
            RegistrationError::MissingRequiredFields { fields } => {
                t_with_args("validation.required_fields", &[("fields", &fields.join(", "))])
            }
            RegistrationError::DuplicatePlate { plate } => {
                t_with_args("validation.duplicate_plate", &[("plate", plate)])
            }
            RegistrationError::EmailInUse { email } => {
                t_with_args("validation.email_in_use", &[("email", email)])
            }
        };
        ApiError::ValidationError(message)
    }
}

impl From<GuardError> for ApiError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::UserNotFound { uid } => ApiError::user_not_found(&uid),
            GuardError::AdministratorRequired { action } => ApiError::AuthorizationError(
                t_with_args("auth.admin_required", &[("action", action.as_str())]),
            ),
            GuardError::SelfModification { .. } => {
                ApiError::AuthorizationError(t_with_args("auth.self_modification", &[]))
            }
            GuardError::LastAdministrator { action, .. } => {
                let key = match action {
                    GuardedAction::DeleteUser => "auth.last_admin_delete",
                    GuardedAction::ChangeRole | GuardedAction::EditParkingConfig => {
                        "auth.last_admin_demote"
                    }
                };
                ApiError::AuthorizationError(t_with_args(key, &[]))
            }
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::InvalidRange { start, end } => ApiError::InvalidDateRange {
                start,
                end,
                message: t_with_args(
                    "validation.invalid_date_range",
                    &[("start", &start.to_string()), ("end", &end.to_string())],
                ),
            },
        }
    }
}

impl From<EditError> for ApiError {
    fn from(err: EditError) -> Self {
        match err {
            EditError::LogVehicleMismatch { log_id, vehicle_id } => {
                ApiError::ValidationError(t_with_args(
                    "validation.log_vehicle_mismatch",
                    &[("log_id", &log_id), ("vehicle_id", &vehicle_id)],
                ))
            }
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::NoData => ApiError::ValidationError(t_with_args("export.no_data", &[])),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

/// Result alias
pub type ApiResult<T> = Result<T, ApiError>;
