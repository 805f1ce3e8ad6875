use tracing::info;

use crate::dto::auth_dto::AdminRegistrationPayload;
use crate::models::auth::AuthenticatedUser;
use crate::models::settings::AdminRegistrationSetting;
use crate::repositories::settings_repository::SettingsRepository;
use crate::services::authorization_service::require_super_admin;
use crate::store::EventStore;
use crate::utils::errors::AppError;
use crate::utils::validation::now_rfc3339;

pub struct SettingsController {
    settings: SettingsRepository,
}

impl SettingsController {
    pub fn new(store: EventStore) -> Self {
        Self {
            settings: SettingsRepository::new(store),
        }
    }

    pub async fn admin_registration(&self) -> Result<AdminRegistrationPayload, AppError> {
        let setting = self.settings.admin_registration().await?;
        Ok(AdminRegistrationPayload {
            enabled: setting.enabled,
        })
    }

    pub async fn set_admin_registration(
        &self,
        user: &AuthenticatedUser,
        payload: AdminRegistrationPayload,
    ) -> Result<AdminRegistrationPayload, AppError> {
        require_super_admin(user)?;

        let setting = AdminRegistrationSetting {
            enabled: payload.enabled,
            updated_at: Some(now_rfc3339()),
            updated_by: Some(user.email.clone()),
        };
        self.settings.set_admin_registration(&setting).await?;

        info!(
            "⚙️ Registro de administradores {} por {}",
            if setting.enabled { "habilitado" } else { "deshabilitado" },
            user.email
        );
        Ok(payload)
    }
}
