//! Resolución de disponibilidad de vehículos
//!
//! La disponibilidad es función del último trayecto de la matrícula, no de
//! "cualquier trayecto abierto": un `in_progress` huérfano más antiguo no
//! bloquea el vehículo. Orden: `createdAt` descendente (ausente o ilegible
//! cuenta como epoch 0) y, a igualdad, `completed` antes que `in_progress`.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::trip::{Trip, TripStatus};
use crate::models::vehicle::{Vehicle, VehicleWithAvailability};
use crate::utils::validation::normalize_plate;

/// Resultado de la resolución para una matrícula
#[derive(Debug, Clone, PartialEq)]
pub struct Availability {
    pub is_available: bool,
    pub active_trip: Option<Trip>,
}

impl Availability {
    pub fn available() -> Self {
        Self {
            is_available: true,
            active_trip: None,
        }
    }
}

fn status_rank(status: TripStatus) -> u8 {
    match status {
        TripStatus::Completed => 0,
        TripStatus::InProgress => 1,
    }
}

/// Orden "más reciente primero" con desempate a favor de `completed`
pub fn recency_order(a: &Trip, b: &Trip) -> Ordering {
    b.created_at_or_epoch()
        .cmp(&a.created_at_or_epoch())
        .then_with(|| status_rank(a.status).cmp(&status_rank(b.status)))
}

/// Trayectos de la matrícula ordenados por `recency_order`
pub fn rank_trips_for_plate<'a>(trips: &'a [Trip], plate: &str) -> Vec<&'a Trip> {
    let plate = normalize_plate(plate);
    let mut ranked: Vec<&Trip> = trips.iter().filter(|t| t.matches_plate(&plate)).collect();
    ranked.sort_by(|a, b| recency_order(a, b));
    ranked
}

/// Último trayecto de la matrícula según el orden de disponibilidad
pub fn latest_trip<'a>(trips: &'a [Trip], plate: &str) -> Option<&'a Trip> {
    rank_trips_for_plate(trips, plate).into_iter().next()
}

/// Determina si el vehículo está libre y qué trayecto lo bloquea
pub fn resolve_availability(trips: &[Trip], plate: &str) -> Availability {
    match latest_trip(trips, plate) {
        Some(trip) if trip.is_in_progress() => Availability {
            is_available: false,
            active_trip: Some(trip.clone()),
        },
        _ => Availability::available(),
    }
}

/// Anota cada vehículo con su disponibilidad usando un único escaneo de trayectos
pub fn annotate_vehicles(vehicles: Vec<Vehicle>, trips: &[Trip]) -> Vec<VehicleWithAvailability> {
    let mut by_plate: HashMap<String, Vec<Trip>> = HashMap::new();
    for trip in trips {
        by_plate
            .entry(normalize_plate(&trip.plate))
            .or_default()
            .push(trip.clone());
    }

    vehicles
        .into_iter()
        .map(|vehicle| {
            let availability = by_plate
                .get(&normalize_plate(&vehicle.plate))
                .map(|plate_trips| resolve_availability(plate_trips, &vehicle.plate))
                .unwrap_or_else(Availability::available);
            VehicleWithAvailability {
                vehicle,
                is_available: availability.is_available,
                active_trip: availability.active_trip,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trip::fixtures::trip;

    #[test]
    fn test_no_trips_means_available() {
        let result = resolve_availability(&[], "ABC-123");
        assert_eq!(result, Availability::available());
    }

    #[test]
    fn test_trips_of_other_plates_are_ignored() {
        let trips = vec![trip("t1", "OTHER-1", TripStatus::InProgress, Some("2024-03-01T08:00:00Z"))];
        assert!(resolve_availability(&trips, "ABC-123").is_available);
    }

    #[test]
    fn test_latest_in_progress_blocks_vehicle() {
        let trips = vec![
            trip("old", "ABC-123", TripStatus::Completed, Some("2024-03-01T08:00:00Z")),
            trip("new", "ABC-123", TripStatus::InProgress, Some("2024-03-02T08:00:00Z")),
        ];
        let result = resolve_availability(&trips, "ABC-123");
        assert!(!result.is_available);
        assert_eq!(result.active_trip.map(|t| t.id), Some("new".to_string()));
    }

    #[test]
    fn test_latest_completed_wins_over_older_orphans() {
        let trips = vec![
            trip("orphan-1", "ABC-123", TripStatus::InProgress, Some("2024-01-01T08:00:00Z")),
            trip("orphan-2", "ABC-123", TripStatus::InProgress, Some("2024-02-01T08:00:00Z")),
            trip("latest", "ABC-123", TripStatus::Completed, Some("2024-03-01T08:00:00Z")),
        ];
        let result = resolve_availability(&trips, "ABC-123");
        assert!(result.is_available);
        assert!(result.active_trip.is_none());
    }

    #[test]
    fn test_equal_timestamps_prefer_completed() {
        let ts = Some("2024-03-01T08:00:00Z");
        let trips = vec![
            trip("stuck", "ABC-123", TripStatus::InProgress, ts),
            trip("done", "ABC-123", TripStatus::Completed, ts),
        ];
        assert!(resolve_availability(&trips, "ABC-123").is_available);
        assert_eq!(latest_trip(&trips, "ABC-123").map(|t| t.id.as_str()), Some("done"));
    }

    #[test]
    fn test_missing_timestamps_sort_last() {
        let trips = vec![
            trip("legacy", "ABC-123", TripStatus::InProgress, None),
            trip("garbage", "ABC-123", TripStatus::InProgress, Some("not a date")),
            trip("real", "ABC-123", TripStatus::Completed, Some("2020-01-01T00:00:00Z")),
        ];
        assert!(resolve_availability(&trips, "ABC-123").is_available);
    }

    #[test]
    fn test_both_missing_timestamps_prefer_completed() {
        let trips = vec![
            trip("a", "ABC-123", TripStatus::InProgress, None),
            trip("b", "ABC-123", TripStatus::Completed, None),
        ];
        assert!(resolve_availability(&trips, "ABC-123").is_available);
    }

    #[test]
    fn test_plate_matching_is_normalized() {
        let trips = vec![trip("t1", " abc-123", TripStatus::InProgress, Some("2024-03-01T08:00:00Z"))];
        assert!(!resolve_availability(&trips, "ABC-123 ").is_available);
    }

    #[test]
    fn test_annotate_vehicles() {
        let vehicle = |plate: &str| Vehicle {
            plate: plate.to_string(),
            brand: "Peugeot".into(),
            model: "Partner".into(),
            color: "Blanco".into(),
            year: Some(2020),
            created_at: None,
            created_by: None,
            updated_at: None,
            updated_by: None,
            fuel_level: None,
            fuel_updated_at: None,
            fuel_updated_by: None,
        };
        let trips = vec![trip("t1", "BUSY-1", TripStatus::InProgress, Some("2024-03-01T08:00:00Z"))];

        let annotated = annotate_vehicles(vec![vehicle("BUSY-1"), vehicle("FREE-1")], &trips);
        assert!(!annotated[0].is_available);
        assert_eq!(annotated[0].active_trip.as_ref().map(|t| t.id.as_str()), Some("t1"));
        assert!(annotated[1].is_available);
        assert!(annotated[1].active_trip.is_none());
    }
}
