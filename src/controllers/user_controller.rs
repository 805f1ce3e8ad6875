use std::sync::Arc;

use tracing::info;

use crate::dto::auth_dto::UpdateRoleRequest;
use crate::models::auth::{AuthenticatedUser, IdentityUser, Role};
use crate::services::authorization_service::{authorize_user_action, require_admin_tier, RoleCensus, UserAction};
use crate::services::identity_service::IdentityProvider;
use crate::utils::errors::{forbidden_error, not_found_error, AppError};

/// Gestión de usuarios sobre el proveedor de identidad
pub struct UserController {
    identity: Arc<dyn IdentityProvider>,
}

impl UserController {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }

    pub async fn list(&self, actor: &AuthenticatedUser) -> Result<Vec<IdentityUser>, AppError> {
        require_admin_tier(actor)?;
        self.identity.list_users().await
    }

    pub async fn change_role(
        &self,
        actor: &AuthenticatedUser,
        target_id: &str,
        request: UpdateRoleRequest,
    ) -> Result<IdentityUser, AppError> {
        // Antes de consultar al proveedor: un driver sólo puede actuar sobre sí mismo
        if !actor.is_admin_tier() && actor.id != target_id {
            return Err(forbidden_error("cambiar el rol", "requiere rol de administrador"));
        }

        let new_role = Role::from_str(&request.role)
            .ok_or_else(|| AppError::BadRequest(format!("Rol inválido: {}", request.role)))?;

        let target = self.find_target(target_id).await?;
        let census = self.census().await?;
        authorize_user_action(actor, &target.id, target.role, UserAction::ChangeRole(new_role), census)?;

        let updated = self.identity.update_user_role(&target.id, new_role).await?;
        info!(
            "👤 Rol de {} cambiado de {} a {} por {}",
            updated.email,
            target.role.as_str(),
            new_role.as_str(),
            actor.email
        );
        Ok(updated)
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, target_id: &str) -> Result<(), AppError> {
        require_admin_tier(actor)?;

        let target = self.find_target(target_id).await?;
        let census = self.census().await?;
        authorize_user_action(actor, &target.id, target.role, UserAction::Delete, census)?;

        self.identity.delete_user(&target.id).await?;
        info!("🗑️ Usuario {} eliminado por {}", target.email, actor.email);
        Ok(())
    }

    async fn find_target(&self, id: &str) -> Result<IdentityUser, AppError> {
        self.identity
            .get_user(id)
            .await?
            .ok_or_else(|| not_found_error("Usuario", id))
    }

    async fn census(&self) -> Result<RoleCensus, AppError> {
        let users = self.identity.list_users().await?;
        Ok(RoleCensus {
            super_admins: users.iter().filter(|u| u.role == Role::SuperAdmin).count(),
        })
    }
}
