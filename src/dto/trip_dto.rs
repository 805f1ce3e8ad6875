use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::trip::Trip;
use crate::utils::validation::validate_not_empty;

// Request para iniciar un trayecto
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    #[validate(required(message = "La matrícula es requerida"), custom = "validate_not_empty")]
    pub plate: Option<String>,

    #[validate(required(message = "El color es requerido"), custom = "validate_not_empty")]
    pub color: Option<String>,

    #[validate(required(message = "El modelo es requerido"), custom = "validate_not_empty")]
    pub model: Option<String>,

    #[validate(
        required(message = "El kilometraje inicial es requerido"),
        range(min = 0, message = "El kilometraje inicial no puede ser negativo")
    )]
    pub km_start: Option<i64>,

    #[validate(required(message = "La hora de inicio es requerida"), custom = "validate_not_empty")]
    pub time_start: Option<String>,

    #[validate(required(message = "El destino es requerido"), custom = "validate_not_empty")]
    pub destination: Option<String>,
}

// Request para finalizar un trayecto
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompleteTripRequest {
    #[validate(
        required(message = "El kilometraje final es requerido"),
        range(min = 0, message = "El kilometraje final no puede ser negativo")
    )]
    pub km_end: Option<i64>,

    #[validate(required(message = "La hora de llegada es requerida"), custom = "validate_not_empty")]
    pub time_end: Option<String>,
}

// Response del último trayecto de un vehículo
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastTripResponse {
    pub trip: Option<Trip>,
    pub last_km: Option<i64>,
}
