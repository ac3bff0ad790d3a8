// ==========================================
// Parking occupancy - Role Authorization Guard
// ==========================================
// Validates role changes, user deletion and capacity edits
// before anything is sent to storage. The acting user is always
// an explicit parameter.
// ==========================================

use crate::domain::user::count_administrators;
use crate::domain::{User, UserRole};
use thiserror::Error;

/// Privileged operation being checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedAction {
    DeleteUser,
    ChangeRole,
    EditParkingConfig,
}

impl GuardedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardedAction::DeleteUser => "delete_user",
            GuardedAction::ChangeRole => "change_role",
            GuardedAction::EditParkingConfig => "edit_parking_config",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    #[error("ação restrita a administradores: action={}", .action.as_str())]
    AdministratorRequired { action: GuardedAction },

    #[error("o usuário não pode alterar a própria conta: uid={uid}")]
    SelfModification { uid: String },

    #[error("único administrador do sistema: uid={uid}, action={}", .action.as_str())]
    LastAdministrator { uid: String, action: GuardedAction },

    #[error("usuário não encontrado: uid={uid}")]
    UserNotFound { uid: String },
}

pub struct RoleGuard;

impl RoleGuard {
    /// First registrant becomes administrator, everyone after is operator
    pub fn role_for_new_user(users: &[User]) -> UserRole {
        if users.is_empty() {
            UserRole::Administrator
        } else {
            UserRole::Operator
        }
    }

    /// Check a user deletion; returns the target on success
    pub fn check_delete<'a>(
        users: &'a [User],
        actor: &User,
        target_uid: &str,
    ) -> Result<&'a User, GuardError> {
        let target = Self::find_target(users, target_uid)?;
        Self::require_administrator(actor, GuardedAction::DeleteUser)?;

        if target.is_administrator() && count_administrators(users) <= 1 {
            return Err(GuardError::LastAdministrator {
                uid: target.uid.clone(),
                action: GuardedAction::DeleteUser,
            });
        }
        Self::reject_self(actor, target)?;

        Ok(target)
    }

    /// Check a role change; returns the target on success
    pub fn check_role_change<'a>(
        users: &'a [User],
        actor: &User,
        target_uid: &str,
        new_role: UserRole,
    ) -> Result<&'a User, GuardError> {
        let target = Self::find_target(users, target_uid)?;
        Self::require_administrator(actor, GuardedAction::ChangeRole)?;

        let demotion = target.is_administrator() && new_role == UserRole::Operator;
        if demotion && count_administrators(users) <= 1 {
            return Err(GuardError::LastAdministrator {
                uid: target.uid.clone(),
                action: GuardedAction::ChangeRole,
            });
        }
        Self::reject_self(actor, target)?;

        Ok(target)
    }

    /// Spot capacities are editable by administrators only
    pub fn check_config_edit(actor: &User) -> Result<(), GuardError> {
        Self::require_administrator(actor, GuardedAction::EditParkingConfig)
    }

    fn find_target<'a>(users: &'a [User], uid: &str) -> Result<&'a User, GuardError> {
        users
            .iter()
            .find(|u| u.uid == uid)
            .ok_or_else(|| GuardError::UserNotFound { uid: uid.to_string() })
    }

    fn require_administrator(actor: &User, action: GuardedAction) -> Result<(), GuardError> {
        if actor.is_administrator() {
            Ok(())
        } else {
            Err(GuardError::AdministratorRequired { action })
        }
    }

    fn reject_self(actor: &User, target: &User) -> Result<(), GuardError> {
        if actor.uid == target.uid {
            Err(GuardError::SelfModification {
                uid: target.uid.clone(),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(uid: &str, role: UserRole) -> User {
        User {
            uid: uid.to_string(),
            email: format!("{}@x.com", uid),
            role,
        }
    }

    #[test]
    fn test_first_registrant_is_administrator() {
        assert_eq!(RoleGuard::role_for_new_user(&[]), UserRole::Administrator);
        assert_eq!(
            RoleGuard::role_for_new_user(&[user("a", UserRole::Administrator)]),
            UserRole::Operator
        );
    }

    #[test]
    fn test_single_admin_cannot_be_deleted_or_demoted() {
        let users = vec![user("admin", UserRole::Administrator), user("op", UserRole::Operator)];
        let actor = users[0].clone();

        let delete = RoleGuard::check_delete(&users, &actor, "admin");
        assert!(matches!(delete, Err(GuardError::LastAdministrator { .. })));

        let demote = RoleGuard::check_role_change(&users, &actor, "admin", UserRole::Operator);
        assert!(matches!(demote, Err(GuardError::LastAdministrator { .. })));
    }

    #[test]
    fn test_with_two_admins_either_succeeds() {
        let users = vec![
            user("a1", UserRole::Administrator),
            user("a2", UserRole::Administrator),
        ];
        let actor = users[0].clone();

        assert_eq!(RoleGuard::check_delete(&users, &actor, "a2").unwrap().uid, "a2");
        assert_eq!(
            RoleGuard::check_role_change(&users, &actor, "a2", UserRole::Operator)
                .unwrap()
                .uid,
            "a2"
        );
    }

    #[test]
    fn test_self_modification_is_refused() {
        let users = vec![
            user("a1", UserRole::Administrator),
            user("a2", UserRole::Administrator),
        ];
        let actor = users[0].clone();

        let result = RoleGuard::check_delete(&users, &actor, "a1");
        assert_eq!(result, Err(GuardError::SelfModification { uid: "a1".to_string() }));
    }

    #[test]
    fn test_operator_cannot_use_privileged_paths() {
        let users = vec![user("a1", UserRole::Administrator), user("op", UserRole::Operator)];
        let operator = users[1].clone();

        assert!(matches!(
            RoleGuard::check_role_change(&users, &operator, "a1", UserRole::Operator),
            Err(GuardError::AdministratorRequired { .. })
        ));
        assert!(matches!(
            RoleGuard::check_config_edit(&operator),
            Err(GuardError::AdministratorRequired {
                action: GuardedAction::EditParkingConfig
            })
        ));
        assert!(RoleGuard::check_config_edit(&users[0]).is_ok());
    }

    #[test]
    fn test_promotion_and_unknown_target() {
        let users = vec![user("a1", UserRole::Administrator), user("op", UserRole::Operator)];
        let actor = users[0].clone();

        assert!(
            RoleGuard::check_role_change(&users, &actor, "op", UserRole::Administrator).is_ok()
        );
        assert_eq!(
            RoleGuard::check_delete(&users, &actor, "ghost"),
            Err(GuardError::UserNotFound { uid: "ghost".to_string() })
        );
    }
}
