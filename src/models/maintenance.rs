//! Modelos de mantenimiento
//!
//! Marca de agua del último cambio de aceite e historial inmutable.

use serde::{Deserialize, Serialize};

/// Kilómetros entre cambios de aceite por defecto
pub const DEFAULT_OIL_CHANGE_INTERVAL_KM: i64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceType {
    OilChange,
}

/// Entrada del historial; nunca se modifica ni se borra
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceHistoryEntry {
    pub id: String,
    pub plate: String,
    #[serde(rename = "type")]
    pub kind: MaintenanceType,
    pub km: i64,
    pub date: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Estado de mantenimiento calculado para una matrícula
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceStatus {
    pub plate: String,
    pub total_km: i64,
    pub last_oil_change: i64,
    pub km_since_oil_change: i64,
    pub needs_oil_change: bool,
    pub oil_change_interval: i64,
}

impl MaintenanceStatus {
    pub fn compute(plate: &str, total_km: i64, last_oil_change: i64, interval: i64) -> Self {
        let km_since_oil_change = total_km.saturating_sub(last_oil_change);
        Self {
            plate: plate.to_string(),
            total_km,
            last_oil_change,
            km_since_oil_change,
            needs_oil_change: km_since_oil_change >= interval,
            oil_change_interval: interval,
        }
    }
}
