// ==========================================
// Parking occupancy - system users
// ==========================================
// The identity provider issues uid/e-mail; the core only
// stores the role. The acting user is always passed explicitly.
// ==========================================

use crate::domain::types::UserRole;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub email: String,
    pub role: UserRole,
}

impl User {
    pub fn is_administrator(&self) -> bool {
        self.role == UserRole::Administrator
    }
}

/// Number of administrators in a user snapshot
pub fn count_administrators(users: &[User]) -> usize {
    users.iter().filter(|u| u.is_administrator()).count()
}
