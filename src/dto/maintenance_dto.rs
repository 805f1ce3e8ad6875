use serde::Deserialize;
use validator::Validate;

// Request para registrar un cambio de aceite
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OilChangeRequest {
    #[validate(
        required(message = "El kilometraje actual es requerido"),
        range(min = 1, message = "El kilometraje actual debe ser positivo")
    )]
    pub current_km: Option<i64>,

    #[validate(length(max = 500))]
    pub notes: Option<String>,
}
