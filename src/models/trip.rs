//! Modelo de Trip
//!
//! Un trayecto de uso de un vehículo. Se crea `in_progress` y pasa una sola
//! vez a `completed`. Los registros antiguos pueden venir incompletos, por
//! eso casi todo lo que no es identidad es tolerante a ausencias.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::validation::{normalize_plate, parse_timestamp_or_epoch};

/// Estado del trayecto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    InProgress,
    Completed,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::InProgress => "in_progress",
            TripStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    pub plate: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub model: String,
    pub km_start: i64,
    #[serde(default)]
    pub time_start: String,
    #[serde(default)]
    pub km_end: Option<i64>,
    #[serde(default)]
    pub time_end: Option<String>,
    #[serde(default)]
    pub destination: String,
    pub status: TripStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
}

impl Trip {
    pub fn is_in_progress(&self) -> bool {
        self.status == TripStatus::InProgress
    }

    pub fn is_completed(&self) -> bool {
        self.status == TripStatus::Completed
    }

    /// Fecha de creación; ausente o ilegible cuenta como epoch 0
    pub fn created_at_or_epoch(&self) -> DateTime<Utc> {
        parse_timestamp_or_epoch(self.created_at.as_deref())
    }

    pub fn completed_at_or_epoch(&self) -> DateTime<Utc> {
        parse_timestamp_or_epoch(self.completed_at.as_deref())
    }

    /// Comparación de matrícula tolerante a mayúsculas y espacios
    pub fn matches_plate(&self, plate: &str) -> bool {
        normalize_plate(&self.plate) == normalize_plate(plate)
    }

    /// Kilómetros recorridos si el trayecto está completado y tiene kmEnd
    pub fn distance_km(&self) -> Option<i64> {
        match (self.status, self.km_end) {
            (TripStatus::Completed, Some(km_end)) => Some(km_end.saturating_sub(self.km_start)),
            _ => None,
        }
    }

    /// Último odómetro conocido del trayecto
    pub fn last_known_km(&self) -> i64 {
        self.km_end.unwrap_or(self.km_start)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Trip mínimo para tests
    pub fn trip(id: &str, plate: &str, status: TripStatus, created_at: Option<&str>) -> Trip {
        Trip {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            user_name: "Ana".to_string(),
            plate: plate.to_string(),
            color: "Blanco".to_string(),
            model: "Partner".to_string(),
            km_start: 100,
            time_start: "2024-03-01T08:00".to_string(),
            km_end: if status == TripStatus::Completed { Some(150) } else { None },
            time_end: None,
            destination: "Centro".to_string(),
            status,
            created_at: created_at.map(str::to_string),
            completed_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::trip;
    use super::*;

    #[test]
    fn test_wire_format_is_camel_case_with_snake_status() {
        let t = trip("t1", "ABC-123", TripStatus::InProgress, Some("2024-03-01T08:00:00Z"));
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["kmStart"], 100);
        assert_eq!(json["userId"], "user-1");
        assert!(json["kmEnd"].is_null());
    }

    #[test]
    fn test_legacy_record_without_optional_fields_parses() {
        let raw = r#"{"id":"t9","userId":"u","plate":"abc-123","kmStart":5,"status":"completed"}"#;
        let t: Trip = serde_json::from_str(raw).unwrap();
        assert!(t.matches_plate("ABC-123"));
        assert_eq!(t.created_at_or_epoch(), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(t.distance_km(), None);
    }

    #[test]
    fn test_distance_only_for_completed_trips() {
        let mut t = trip("t1", "ABC-123", TripStatus::Completed, None);
        t.km_start = 100;
        t.km_end = Some(10_300);
        assert_eq!(t.distance_km(), Some(10_200));

        t.status = TripStatus::InProgress;
        assert_eq!(t.distance_km(), None);
    }

    #[test]
    fn test_distance_saturates_on_legacy_extremes() {
        let mut t = trip("t1", "ABC-123", TripStatus::Completed, None);
        t.km_start = i64::MAX;
        t.km_end = Some(-2);
        assert_eq!(t.distance_km(), Some(i64::MIN));
    }
}
