// ==========================================
// Parking occupancy - vehicle repository
// ==========================================
// Table: vehicle
// Vehicles are never deleted.
// ==========================================

use crate::domain::{UniversityLink, Vehicle, VehicleType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_mapping::{history_json, parse_enum, parse_history};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_COLUMNS: &str = r#"
    SELECT vehicle_id, plate, owner_name, university_link, model, color,
           vehicle_type, registered_by, edit_history_json
    FROM vehicle
"#;

// ==========================================
// VehicleRepository
// ==========================================
pub struct VehicleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl VehicleRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // Writes
    // ==========================================

    pub fn insert(&self, vehicle: &Vehicle) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        Self::insert_with(&conn, vehicle)
    }

    pub fn update(&self, vehicle: &Vehicle) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        Self::update_with(&conn, vehicle)
    }

    /// Insert on a caller-held connection or transaction
    pub fn insert_with(conn: &Connection, vehicle: &Vehicle) -> RepositoryResult<()> {
        conn.execute(
            r#"
            INSERT INTO vehicle (
                vehicle_id, plate, owner_name, university_link, model, color,
                vehicle_type, registered_by, edit_history_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                vehicle.id,
                vehicle.plate,
                vehicle.owner_name,
                vehicle.university_link.as_str(),
                vehicle.model,
                vehicle.color,
                vehicle.vehicle_type.as_str(),
                vehicle.registered_by,
                history_json(&vehicle.edit_history)?,
            ],
        )?;
        Ok(())
    }

    /// Full-row update on a caller-held connection or transaction
    pub fn update_with(conn: &Connection, vehicle: &Vehicle) -> RepositoryResult<()> {
        let rows = conn.execute(
            r#"
            UPDATE vehicle SET
                plate = ?2, owner_name = ?3, university_link = ?4, model = ?5,
                color = ?6, vehicle_type = ?7, registered_by = ?8, edit_history_json = ?9
            WHERE vehicle_id = ?1
            "#,
            params![
                vehicle.id,
                vehicle.plate,
                vehicle.owner_name,
                vehicle.university_link.as_str(),
                vehicle.model,
                vehicle.color,
                vehicle.vehicle_type.as_str(),
                vehicle.registered_by,
                history_json(&vehicle.edit_history)?,
            ],
        )?;

        if rows == 0 {
            return Err(RepositoryError::not_found("Vehicle", &vehicle.id));
        }
        Ok(())
    }

    // ==========================================
    // Queries
    // ==========================================

    pub fn find_all(&self) -> RepositoryResult<Vec<Vehicle>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY rowid", SELECT_COLUMNS))?;
        let vehicles = stmt
            .query_map([], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(vehicles)
    }

    pub fn find_by_id(&self, vehicle_id: &str) -> RepositoryResult<Option<Vehicle>> {
        let conn = self.get_conn()?;
        let vehicle = conn
            .query_row(
                &format!("{} WHERE vehicle_id = ?1", SELECT_COLUMNS),
                params![vehicle_id],
                Self::map_row,
            )
            .optional()?;
        Ok(vehicle)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Vehicle> {
        let link: String = row.get(3)?;
        let vehicle_type: String = row.get(6)?;
        let history: String = row.get(8)?;

        Ok(Vehicle {
            id: row.get(0)?,
            plate: row.get(1)?,
            owner_name: row.get(2)?,
            university_link: parse_enum(3, &link, UniversityLink::from_str)?,
            model: row.get(4)?,
            color: row.get(5)?,
            vehicle_type: parse_enum(6, &vehicle_type, VehicleType::from_str)?,
            registered_by: row.get(7)?,
            edit_history: parse_history(8, &history)?,
        })
    }
}
