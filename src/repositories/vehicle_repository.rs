use crate::models::vehicle::Vehicle;
use crate::store::EventStore;
use crate::utils::errors::{store_error, AppError};
use crate::utils::validation::normalize_plate;

/// Acceso a vehículos (`vehicle:{PLATE}`); las matrículas se normalizan aquí
#[derive(Clone)]
pub struct VehicleRepository {
    store: EventStore,
}

impl VehicleRepository {
    pub fn new(store: EventStore) -> Self {
        Self { store }
    }

    fn key(&self, plate: &str) -> String {
        self.store.key(&["vehicle", &normalize_plate(plate)])
    }

    pub async fn find_by_plate(&self, plate: &str) -> Result<Option<Vehicle>, AppError> {
        self.store
            .get(&self.key(plate))
            .await
            .map_err(|e| store_error("Error finding vehicle", e))
    }

    pub async fn exists(&self, plate: &str) -> Result<bool, AppError> {
        Ok(self.find_by_plate(plate).await?.is_some())
    }

    pub async fn save(&self, vehicle: &Vehicle) -> Result<(), AppError> {
        self.store
            .set(&self.key(&vehicle.plate), vehicle)
            .await
            .map_err(|e| store_error("Error saving vehicle", e))
    }

    pub async fn delete(&self, plate: &str) -> Result<(), AppError> {
        self.store
            .delete(&self.key(plate))
            .await
            .map_err(|e| store_error("Error deleting vehicle", e))
    }

    /// Todos los vehículos ordenados por matrícula
    pub async fn find_all(&self) -> Result<Vec<Vehicle>, AppError> {
        let mut vehicles: Vec<Vehicle> = self
            .store
            .scan(&self.store.prefix(&["vehicle"]))
            .await
            .map_err(|e| store_error("Error listing vehicles", e))?;
        vehicles.sort_by(|a, b| a.plate.cmp(&b.plate));
        Ok(vehicles)
    }
}
