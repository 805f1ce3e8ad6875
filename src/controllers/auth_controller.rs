//! Alta self-service de usuarios
//!
//! Un usuario nuevo es conductor por defecto. El alta como administrador
//! sólo se acepta con el ajuste de registro de administradores activo, y
//! nadie puede registrarse directamente como super administrador.

use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use crate::dto::auth_dto::SignupRequest;
use crate::models::auth::{IdentityUser, Role};
use crate::repositories::settings_repository::SettingsRepository;
use crate::services::identity_service::{IdentityProvider, NewIdentity};
use crate::store::EventStore;
use crate::utils::errors::{forbidden_error, required_field, AppError};

pub struct AuthController {
    identity: Arc<dyn IdentityProvider>,
    settings: SettingsRepository,
}

impl AuthController {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: EventStore) -> Self {
        Self {
            identity,
            settings: SettingsRepository::new(store),
        }
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<IdentityUser, AppError> {
        request.validate()?;

        let role = match request.role.as_deref().map(str::trim) {
            None | Some("") => Role::Driver,
            Some(raw) => Role::from_str(raw)
                .ok_or_else(|| AppError::BadRequest(format!("Rol inválido: {}", raw)))?,
        };

        match role {
            Role::Driver => {}
            Role::Admin => {
                if !self.settings.admin_registration().await?.enabled {
                    warn!("🚫 Alta de administrador rechazada: registro deshabilitado");
                    return Err(forbidden_error(
                        "registrarse como administrador",
                        "el registro de administradores está deshabilitado",
                    ));
                }
            }
            Role::SuperAdmin => {
                return Err(forbidden_error(
                    "registrarse como super administrador",
                    "este rol no admite alta directa",
                ));
            }
        }

        let identity = NewIdentity {
            email: required_field(request.email, "email")?.trim().to_lowercase(),
            password: required_field(request.password, "password")?,
            name: required_field(request.name, "name")?.trim().to_string(),
            role,
        };

        let user = self.identity.create_user(&identity).await?;
        info!("🆕 Usuario {} registrado como {}", user.email, role.as_str());
        Ok(user)
    }
}
