// ==========================================
// Parking occupancy - user API
// ==========================================
// Account registration and role administration.
// Every privileged call takes the acting user explicitly.
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{User, UserRole};
use crate::engine::{RoleGuard, UserRegistrar};
use crate::i18n::t_with_args;
use crate::repository::ParkingStore;
use std::sync::Arc;

pub struct UserApi {
    store: Arc<dyn ParkingStore>,
}

impl UserApi {
    pub fn new(store: Arc<dyn ParkingStore>) -> Self {
        Self { store }
    }

    /// Register an identity issued by the authentication provider.
    ///
    /// The first account ever registered becomes administrator.
    pub async fn register_user(&self, uid: &str, email: &str) -> ApiResult<User> {
        let users = self.store.list_users().await?;
        let user = UserRegistrar::prepare(&users, uid, email)?;

        self.store.create_user(&user).await.map_err(|e| {
            if e.is_unique_violation() {
                ApiError::ValidationError(t_with_args(
                    "validation.email_in_use",
                    &[("email", &user.email)],
                ))
            } else {
                ApiError::from(e)
            }
        })?;

        tracing::info!(uid = %user.uid, email = %user.email, role = %user.role, "user registered");
        Ok(user)
    }

    pub async fn list_users(&self) -> ApiResult<Vec<User>> {
        Ok(self.store.list_users().await?)
    }

    pub async fn find_user(&self, uid: &str) -> ApiResult<User> {
        self.store
            .find_user(uid)
            .await?
            .ok_or_else(|| ApiError::user_not_found(uid))
    }

    /// Delete `target_uid`; refused for self and for the last administrator
    pub async fn delete_user(&self, actor: &User, target_uid: &str) -> ApiResult<()> {
        let users = self.store.list_users().await?;
        RoleGuard::check_delete(&users, actor, target_uid).map_err(|e| {
            tracing::warn!(actor = %actor.email, target_uid, error = %e, "user deletion refused");
            ApiError::from(e)
        })?;

        self.store.delete_user(target_uid).await?;
        tracing::info!(actor = %actor.email, target_uid, "user deleted");
        Ok(())
    }

    /// Change the role of `target_uid`; refused for self and for demoting
    /// the last administrator
    pub async fn change_user_role(
        &self,
        actor: &User,
        target_uid: &str,
        new_role: UserRole,
    ) -> ApiResult<User> {
        let users = self.store.list_users().await?;
        let target = RoleGuard::check_role_change(&users, actor, target_uid, new_role).map_err(|e| {
            tracing::warn!(actor = %actor.email, target_uid, error = %e, "role change refused");
            ApiError::from(e)
        })?;

        let mut updated = target.clone();
        if updated.role == new_role {
            return Ok(updated);
        }

        self.store.update_user_role(target_uid, new_role).await?;
        tracing::info!(
            actor = %actor.email,
            target_uid,
            from = %updated.role,
            to = %new_role,
            "user role changed"
        );
        updated.role = new_role;
        Ok(updated)
    }
}
