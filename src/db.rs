// ==========================================
// Parking occupancy - SQLite connection setup
// ==========================================
// One place for connection PRAGMAs and the schema, so every
// store/repository opens the database the same way.
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// Default busy_timeout (ms)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Schema version written by [`init_schema`]
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Apply the per-connection PRAGMAs
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection with the shared configuration
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// In-memory database, configured and with the schema in place
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Create tables and indexes if missing (idempotent).
///
/// `parking_log` carries a UNIQUE index on (vehicle_id, log_date):
/// the one-record-per-day invariant is enforced here as well as
/// by the reconciliation engine.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS vehicle (
            vehicle_id TEXT PRIMARY KEY,
            plate TEXT NOT NULL,
            owner_name TEXT NOT NULL,
            university_link TEXT NOT NULL,
            model TEXT NOT NULL,
            color TEXT NOT NULL,
            vehicle_type TEXT NOT NULL,
            registered_by TEXT NOT NULL,
            edit_history_json TEXT NOT NULL DEFAULT '[]'
        );
        CREATE INDEX IF NOT EXISTS idx_vehicle_plate ON vehicle(plate);

        CREATE TABLE IF NOT EXISTS parking_log (
            log_id TEXT PRIMARY KEY,
            vehicle_id TEXT NOT NULL,
            plate TEXT NOT NULL,
            log_date TEXT NOT NULL,
            entry_time TEXT NOT NULL,
            exit_time TEXT,
            operator_name TEXT NOT NULL,
            edit_history_json TEXT NOT NULL DEFAULT '[]'
        );
        CREATE UNIQUE INDEX IF NOT EXISTS uq_parking_log_vehicle_date
            ON parking_log(vehicle_id, log_date);
        CREATE INDEX IF NOT EXISTS idx_parking_log_date ON parking_log(log_date);

        CREATE TABLE IF NOT EXISTS app_user (
            uid TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            role TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// Read schema_version (None when the table does not exist)
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
