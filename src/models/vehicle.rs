//! Modelo de Vehicle
//!
//! La matrícula normalizada es la clave natural. La disponibilidad no se
//! persiste: se recalcula en cada petición a partir de los trayectos.

use serde::{Deserialize, Serialize};

use super::trip::Trip;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub plate: String,
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_updated_by: Option<String>,
}

/// Vehículo anotado con su disponibilidad calculada
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleWithAvailability {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub is_available: bool,
    pub active_trip: Option<Trip>,
}
