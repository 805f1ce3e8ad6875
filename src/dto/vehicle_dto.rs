use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::{validate_license_plate, validate_not_empty};

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    #[validate(required(message = "La matrícula es requerida"), custom = "validate_license_plate")]
    pub plate: Option<String>,

    #[validate(required(message = "La marca es requerida"), custom = "validate_not_empty")]
    pub brand: Option<String>,

    #[validate(required(message = "El modelo es requerido"), custom = "validate_not_empty")]
    pub model: Option<String>,

    pub color: Option<String>,

    #[validate(range(min = 1900, max = 2100, message = "Año inválido"))]
    pub year: Option<i32>,
}

// Request para actualizar un vehículo (`plate` distinta = renombrar)
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
    #[validate(custom = "validate_license_plate")]
    pub plate: Option<String>,

    #[validate(custom = "validate_not_empty")]
    pub brand: Option<String>,

    #[validate(custom = "validate_not_empty")]
    pub model: Option<String>,

    pub color: Option<String>,

    #[validate(range(min = 1900, max = 2100, message = "Año inválido"))]
    pub year: Option<i32>,
}

// Request para actualizar el nivel de combustible
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FuelUpdateRequest {
    #[validate(
        required(message = "El nivel de combustible es requerido"),
        range(min = 0, max = 100, message = "El nivel de combustible debe estar entre 0 y 100")
    )]
    pub fuel_level: Option<i64>,
}
