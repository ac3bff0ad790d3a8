// ==========================================
// Parking occupancy - process settings
// ==========================================
// Read once at startup from the environment.
// ==========================================

use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "PARKING_OCCUPANCY_DB_PATH";
pub const LOCALE_ENV: &str = "PARKING_OCCUPANCY_LOCALE";
pub const DEFAULT_LOCALE: &str = "pt-BR";
const DB_FILE_NAME: &str = "parking_occupancy.db";

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub db_path: String,
    pub locale: String,
}

impl AppSettings {
    pub fn from_env() -> Self {
        let locale = non_empty_env(LOCALE_ENV).unwrap_or_else(|| DEFAULT_LOCALE.to_string());
        Self {
            db_path: get_default_db_path(),
            locale,
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Database file location.
///
/// `PARKING_OCCUPANCY_DB_PATH` wins; otherwise the user data directory,
/// falling back to the working directory.
pub fn get_default_db_path() -> String {
    if let Some(path) = non_empty_env(DB_PATH_ENV) {
        return path;
    }

    let mut path = PathBuf::from(format!("./{}", DB_FILE_NAME));

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        let dir = data_dir.join("parking-occupancy-dev");
        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("parking-occupancy");

        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::warn!(
                dir = %dir.display(),
                error = %e,
                "cannot create data dir, using working dir"
            );
        } else {
            path = dir.join(DB_FILE_NAME);
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_from_env_has_a_locale() {
        let settings = AppSettings::from_env();
        assert!(!settings.locale.is_empty());
    }
}
