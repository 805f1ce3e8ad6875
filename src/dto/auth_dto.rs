use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::validate_not_empty;

// Request de alta self-service
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(required(message = "El email es requerido"), email(message = "Email inválido"))]
    pub email: Option<String>,

    #[validate(
        required(message = "La contraseña es requerida"),
        length(min = 6, message = "La contraseña debe tener al menos 6 caracteres")
    )]
    pub password: Option<String>,

    #[validate(required(message = "El nombre es requerido"), custom = "validate_not_empty")]
    pub name: Option<String>,

    /// "driver" (por defecto) o "admin"
    pub role: Option<String>,
}

// Request para cambiar el rol de un usuario
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

// Request/response del ajuste de registro de administradores
#[derive(Debug, Deserialize, Serialize)]
pub struct AdminRegistrationPayload {
    pub enabled: bool,
}
