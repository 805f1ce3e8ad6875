use crate::models::trip::Trip;
use crate::store::EventStore;
use crate::utils::errors::{store_error, AppError};

/// Acceso a trayectos (`trip:{id}`) y al índice por usuario (`user_trips:{userId}`)
#[derive(Clone)]
pub struct TripRepository {
    store: EventStore,
}

impl TripRepository {
    pub fn new(store: EventStore) -> Self {
        Self { store }
    }

    fn trip_key(&self, id: &str) -> String {
        self.store.key(&["trip", id])
    }

    fn index_key(&self, user_id: &str) -> String {
        self.store.key(&["user_trips", user_id])
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Trip>, AppError> {
        self.store
            .get(&self.trip_key(id))
            .await
            .map_err(|e| store_error("Error finding trip", e))
    }

    pub async fn save(&self, trip: &Trip) -> Result<(), AppError> {
        self.store
            .set(&self.trip_key(&trip.id), trip)
            .await
            .map_err(|e| store_error("Error saving trip", e))
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.store
            .delete(&self.trip_key(id))
            .await
            .map_err(|e| store_error("Error deleting trip", e))
    }

    /// Escaneo completo de trayectos
    pub async fn find_all(&self) -> Result<Vec<Trip>, AppError> {
        self.store
            .scan(&self.store.prefix(&["trip"]))
            .await
            .map_err(|e| store_error("Error listing trips", e))
    }

    /// Historial completo de una matrícula (sin ordenar)
    pub async fn find_by_plate(&self, plate: &str) -> Result<Vec<Trip>, AppError> {
        let trips = self.find_all().await?;
        Ok(trips.into_iter().filter(|t| t.matches_plate(plate)).collect())
    }

    pub async fn find_many(&self, ids: &[String]) -> Result<Vec<Trip>, AppError> {
        let keys: Vec<String> = ids.iter().map(|id| self.trip_key(id)).collect();
        self.store
            .get_many(&keys)
            .await
            .map_err(|e| store_error("Error fetching trips", e))
    }

    pub async fn user_trip_ids(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        let ids: Option<Vec<String>> = self
            .store
            .get(&self.index_key(user_id))
            .await
            .map_err(|e| store_error("Error reading user trip index", e))?;
        Ok(ids.unwrap_or_default())
    }

    pub async fn add_to_user_index(&self, user_id: &str, trip_id: &str) -> Result<(), AppError> {
        let mut ids = self.user_trip_ids(user_id).await?;
        if !ids.iter().any(|id| id == trip_id) {
            ids.push(trip_id.to_string());
        }
        self.store
            .set(&self.index_key(user_id), &ids)
            .await
            .map_err(|e| store_error("Error writing user trip index", e))
    }

    /// Quita una referencia del índice; devuelve si existía
    pub async fn remove_from_user_index(&self, user_id: &str, trip_id: &str) -> Result<bool, AppError> {
        let ids = self.user_trip_ids(user_id).await?;
        let before = ids.len();
        let remaining: Vec<String> = ids.into_iter().filter(|id| id != trip_id).collect();
        if remaining.len() == before {
            return Ok(false);
        }

        self.store
            .set(&self.index_key(user_id), &remaining)
            .await
            .map_err(|e| store_error("Error writing user trip index", e))?;
        Ok(true)
    }
}
