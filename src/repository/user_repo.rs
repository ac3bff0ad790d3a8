// ==========================================
// Parking occupancy - user repository
// ==========================================
// Table: app_user (email UNIQUE)
// ==========================================

use crate::domain::{User, UserRole};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_mapping::parse_enum;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct UserRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UserRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, user: &User) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO app_user (uid, email, role) VALUES (?1, ?2, ?3)",
            params![user.uid, user.email, user.role.as_str()],
        )?;
        Ok(())
    }

    pub fn update_role(&self, uid: &str, role: UserRole) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE app_user SET role = ?2 WHERE uid = ?1",
            params![uid, role.as_str()],
        )?;
        if rows == 0 {
            return Err(RepositoryError::not_found("User", uid));
        }
        Ok(())
    }

    pub fn delete(&self, uid: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute("DELETE FROM app_user WHERE uid = ?1", params![uid])?;
        if rows == 0 {
            return Err(RepositoryError::not_found("User", uid));
        }
        Ok(())
    }

    pub fn find_all(&self) -> RepositoryResult<Vec<User>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT uid, email, role FROM app_user ORDER BY email")?;
        let users = stmt
            .query_map([], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    pub fn find_by_uid(&self, uid: &str) -> RepositoryResult<Option<User>> {
        let conn = self.get_conn()?;
        let user = conn
            .query_row(
                "SELECT uid, email, role FROM app_user WHERE uid = ?1",
                params![uid],
                Self::map_row,
            )
            .optional()?;
        Ok(user)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<User> {
        let role: String = row.get(2)?;
        Ok(User {
            uid: row.get(0)?,
            email: row.get(1)?,
            role: parse_enum(2, &role, UserRole::from_str)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn setup() -> UserRepository {
        UserRepository::new(Arc::new(Mutex::new(open_in_memory().unwrap())))
    }

    fn user(uid: &str, email: &str, role: UserRole) -> User {
        User {
            uid: uid.to_string(),
            email: email.to_string(),
            role,
        }
    }

    #[test]
    fn test_insert_update_delete() {
        let repo = setup();
        repo.insert(&user("u1", "ana@ufc.br", UserRole::Administrator)).unwrap();
        repo.insert(&user("u2", "bia@ufc.br", UserRole::Operator)).unwrap();

        repo.update_role("u2", UserRole::Administrator).unwrap();
        assert_eq!(
            repo.find_by_uid("u2").unwrap().unwrap().role,
            UserRole::Administrator
        );

        repo.delete("u1").unwrap();
        let remaining = repo.find_all().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].email, "bia@ufc.br");
    }

    #[test]
    fn test_duplicate_email_is_unique_violation() {
        let repo = setup();
        repo.insert(&user("u1", "ana@ufc.br", UserRole::Operator)).unwrap();
        let err = repo.insert(&user("u2", "ana@ufc.br", UserRole::Operator)).unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[test]
    fn test_missing_user_is_not_found() {
        let repo = setup();
        assert!(matches!(
            repo.delete("ghost").unwrap_err(),
            RepositoryError::NotFound { .. }
        ));
        assert!(matches!(
            repo.update_role("ghost", UserRole::Operator).unwrap_err(),
            RepositoryError::NotFound { .. }
        ));
    }
}
