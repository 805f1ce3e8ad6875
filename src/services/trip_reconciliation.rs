//! Reconciliación de trayectos duplicados
//!
//! Escrituras inconsistentes pueden dejar varias copias del mismo id.
//! No hay fuente canónica: estas reglas deciden qué copia se muestra.

use std::collections::HashMap;

use crate::models::trip::Trip;

/// true si `candidate` debe reemplazar a `current` en el listado del usuario
fn prefer_candidate(current: &Trip, candidate: &Trip) -> bool {
    match (current.is_completed(), candidate.is_completed()) {
        (false, true) => true,
        (true, true) => candidate.completed_at_or_epoch() > current.completed_at_or_epoch(),
        _ => false,
    }
}

/// Deduplicado para el listado del propio usuario: `completed` gana a
/// `in_progress` y, entre dos `completed`, el de `completedAt` más tardío.
/// Resultado ordenado por `createdAt` descendente.
pub fn dedup_user_trips(trips: Vec<Trip>) -> Vec<Trip> {
    let mut order: Vec<String> = Vec::new();
    let mut by_id: HashMap<String, Trip> = HashMap::new();

    for trip in trips {
        match by_id.get(&trip.id) {
            Some(current) => {
                if prefer_candidate(current, &trip) {
                    by_id.insert(trip.id.clone(), trip);
                }
            }
            None => {
                order.push(trip.id.clone());
                by_id.insert(trip.id.clone(), trip);
            }
        }
    }

    let mut result: Vec<Trip> = order.into_iter().filter_map(|id| by_id.remove(&id)).collect();
    result.sort_by(|a, b| b.created_at_or_epoch().cmp(&a.created_at_or_epoch()));
    result
}

/// Deduplicado del listado de administración: primera aparición por id, sin reordenar
pub fn dedup_first_occurrence(trips: Vec<Trip>) -> Vec<Trip> {
    let mut seen = std::collections::HashSet::new();
    trips.into_iter().filter(|t| seen.insert(t.id.clone())).collect()
}
