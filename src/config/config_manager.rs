// ==========================================
// Parking occupancy - configuration manager
// ==========================================
// Storage: config_kv table (key-value + scope)
// Holds the parking capacities; created lazily with defaults
// on first read.
// ==========================================

use crate::domain::ParkingConfig;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Share an existing connection
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Raw value of a global key
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        read_value(&conn, key)
    }

    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        write_value(&conn, key, value)
    }

    // ==========================================
    // Parking capacities
    // ==========================================

    /// Stored capacities, or None when none have been written yet.
    ///
    /// A partially written configuration is completed with defaults.
    pub fn get_parking_config(&self) -> RepositoryResult<Option<ParkingConfig>> {
        let conn = self.get_conn()?;
        let (config, missing) = read_parking_config(&conn)?;
        if missing == config_keys::CAPACITY_KEYS.len() {
            return Ok(None);
        }
        Ok(Some(config))
    }

    /// Stored capacities, writing the defaults first if absent.
    ///
    /// # Returns
    /// - `(config, true)`: defaults were written by this call
    pub fn get_or_init_parking_config(&self) -> RepositoryResult<(ParkingConfig, bool)> {
        let mut conn = self.get_conn()?;
        let (config, missing) = read_parking_config(&conn)?;
        if missing == 0 {
            return Ok((config, false));
        }

        tracing::info!(missing_keys = missing, "parking config absent, writing defaults");
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        write_parking_config(&tx, &config)?;
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok((config, true))
    }

    /// Replace all three capacities atomically
    pub fn set_parking_config(&self, config: &ParkingConfig) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        write_parking_config(&tx, config)?;
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }
}

fn read_value(conn: &Connection, key: &str) -> RepositoryResult<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(value)
}

fn write_value(conn: &Connection, key: &str, value: &str) -> RepositoryResult<()> {
    conn.execute(
        "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
         ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
        params![key, value],
    )?;
    Ok(())
}

fn read_capacity(conn: &Connection, key: &str, default: u32) -> RepositoryResult<(u32, bool)> {
    match read_value(conn, key)? {
        None => Ok((default, true)),
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .map(|v| (v, false))
            .map_err(|e| RepositoryError::FieldValueError {
                field: key.to_string(),
                message: format!("'{}': {}", raw, e),
            }),
    }
}

/// Returns the config (defaults filled in) and how many keys were absent
fn read_parking_config(conn: &Connection) -> RepositoryResult<(ParkingConfig, usize)> {
    let defaults = ParkingConfig::default();
    let (cars, m1) = read_capacity(conn, config_keys::TOTAL_CAR_SPOTS, defaults.total_car_spots)?;
    let (motorcycles, m2) = read_capacity(
        conn,
        config_keys::TOTAL_MOTORCYCLE_SPOTS,
        defaults.total_motorcycle_spots,
    )?;
    let (bicycles, m3) = read_capacity(
        conn,
        config_keys::TOTAL_BICYCLE_SPOTS,
        defaults.total_bicycle_spots,
    )?;

    let missing = [m1, m2, m3].iter().filter(|m| **m).count();
    Ok((
        ParkingConfig {
            total_car_spots: cars,
            total_motorcycle_spots: motorcycles,
            total_bicycle_spots: bicycles,
        },
        missing,
    ))
}

fn write_parking_config(conn: &Connection, config: &ParkingConfig) -> RepositoryResult<()> {
    write_value(conn, config_keys::TOTAL_CAR_SPOTS, &config.total_car_spots.to_string())?;
    write_value(
        conn,
        config_keys::TOTAL_MOTORCYCLE_SPOTS,
        &config.total_motorcycle_spots.to_string(),
    )?;
    write_value(
        conn,
        config_keys::TOTAL_BICYCLE_SPOTS,
        &config.total_bicycle_spots.to_string(),
    )?;
    Ok(())
}

// ==========================================
// Config keys
// ==========================================
pub mod config_keys {
    pub const TOTAL_CAR_SPOTS: &str = "parking.total_car_spots";
    pub const TOTAL_MOTORCYCLE_SPOTS: &str = "parking.total_motorcycle_spots";
    pub const TOTAL_BICYCLE_SPOTS: &str = "parking.total_bicycle_spots";

    pub const CAPACITY_KEYS: [&str; 3] =
        [TOTAL_CAR_SPOTS, TOTAL_MOTORCYCLE_SPOTS, TOTAL_BICYCLE_SPOTS];
}
