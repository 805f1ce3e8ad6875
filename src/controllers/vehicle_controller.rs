use tracing::{error, info, warn};
use validator::Validate;

use crate::dto::vehicle_dto::{CreateVehicleRequest, FuelUpdateRequest, UpdateVehicleRequest};
use crate::models::auth::AuthenticatedUser;
use crate::models::vehicle::{Vehicle, VehicleWithAvailability};
use crate::repositories::maintenance_repository::MaintenanceRepository;
use crate::repositories::trip_repository::TripRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::authorization_service::require_admin_tier;
use crate::services::availability_service::annotate_vehicles;
use crate::store::EventStore;
use crate::utils::errors::{not_found_error, required_field, AppError};
use crate::utils::validation::{normalize_plate, now_rfc3339};

/// Resultado de un alta de vehículo (upsert)
#[derive(Debug, Clone)]
pub struct VehicleUpsert {
    pub vehicle: Vehicle,
    pub created: bool,
}

pub struct VehicleController {
    vehicles: VehicleRepository,
    trips: TripRepository,
    maintenance: MaintenanceRepository,
}

impl VehicleController {
    pub fn new(store: EventStore) -> Self {
        Self {
            vehicles: VehicleRepository::new(store.clone()),
            trips: TripRepository::new(store.clone()),
            maintenance: MaintenanceRepository::new(store),
        }
    }

    /// Flota anotada con disponibilidad
    pub async fn list(&self) -> Result<Vec<VehicleWithAvailability>, AppError> {
        let vehicles = self.vehicles.find_all().await?;
        let trips = self.trips.find_all().await?;
        Ok(annotate_vehicles(vehicles, &trips))
    }

    /// Registros tal cual, sin disponibilidad
    pub async fn list_raw(&self, user: &AuthenticatedUser) -> Result<Vec<Vehicle>, AppError> {
        require_admin_tier(user)?;
        self.vehicles.find_all().await
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateVehicleRequest,
    ) -> Result<VehicleUpsert, AppError> {
        require_admin_tier(user)?;
        request.validate()?;

        let plate = normalize_plate(&required_field(request.plate, "plate")?);
        let brand = required_field(request.brand, "brand")?.trim().to_string();
        let model = required_field(request.model, "model")?.trim().to_string();
        let color = request.color.map(|c| c.trim().to_string()).unwrap_or_default();
        let now = now_rfc3339();

        // Upsert: si ya existe se conservan los metadatos de creación y el combustible
        let (vehicle, created) = match self.vehicles.find_by_plate(&plate).await? {
            Some(existing) => (
                Vehicle {
                    brand,
                    model,
                    color,
                    year: request.year.or(existing.year),
                    updated_at: Some(now),
                    updated_by: Some(user.id.clone()),
                    ..existing
                },
                false,
            ),
            None => (
                Vehicle {
                    plate,
                    brand,
                    model,
                    color,
                    year: request.year,
                    created_at: Some(now),
                    created_by: Some(user.id.clone()),
                    updated_at: None,
                    updated_by: None,
                    fuel_level: None,
                    fuel_updated_at: None,
                    fuel_updated_by: None,
                },
                true,
            ),
        };

        self.vehicles.save(&vehicle).await?;

        if created {
            info!("🚙 Vehículo {} registrado por {}", vehicle.plate, user.name);
        } else {
            info!("🚙 Vehículo {} sobrescrito por {}", vehicle.plate, user.name);
        }
        Ok(VehicleUpsert { vehicle, created })
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        plate: &str,
        request: UpdateVehicleRequest,
    ) -> Result<Vehicle, AppError> {
        require_admin_tier(user)?;
        request.validate()?;

        let old_plate = normalize_plate(plate);
        let current = self
            .vehicles
            .find_by_plate(&old_plate)
            .await?
            .ok_or_else(|| not_found_error("Vehículo", &old_plate))?;

        let new_plate = request
            .plate
            .as_deref()
            .map(normalize_plate)
            .filter(|p| *p != old_plate);

        let mut updated = current;
        if let Some(brand) = request.brand {
            updated.brand = brand.trim().to_string();
        }
        if let Some(model) = request.model {
            updated.model = model.trim().to_string();
        }
        if let Some(color) = request.color {
            updated.color = color.trim().to_string();
        }
        if request.year.is_some() {
            updated.year = request.year;
        }
        updated.updated_at = Some(now_rfc3339());
        updated.updated_by = Some(user.id.clone());

        let Some(new_plate) = new_plate else {
            self.vehicles.save(&updated).await?;
            info!("✏️ Vehículo {} actualizado por {}", old_plate, user.name);
            return Ok(updated);
        };

        if self.vehicles.exists(&new_plate).await? {
            return Err(AppError::Conflict(format!(
                "Ya existe un vehículo con la matrícula {}",
                new_plate
            )));
        }

        updated.plate = new_plate.clone();
        self.vehicles.save(&updated).await?;
        self.migrate_plate(&old_plate, &new_plate).await;

        info!("🔁 Vehículo {} renombrado a {} por {}", old_plate, new_plate, user.name);
        Ok(updated)
    }

    /// Mueve la marca de agua y borra las claves antiguas. Sin rollback:
    /// cada fallo parcial se registra y la operación sigue.
    async fn migrate_plate(&self, old_plate: &str, new_plate: &str) {
        let mut watermark_migrated = true;
        match self.maintenance.find_watermark(old_plate).await {
            Ok(Some(km)) => {
                if let Err(e) = self.maintenance.set_watermark(new_plate, km).await {
                    error!("❌ No se pudo copiar la marca de agua de {} a {}: {}", old_plate, new_plate, e);
                    watermark_migrated = false;
                }
            }
            Ok(None) => {}
            Err(e) => {
                error!("❌ No se pudo leer la marca de agua de {}: {}", old_plate, e);
                watermark_migrated = false;
            }
        }

        if let Err(e) = self.vehicles.delete(old_plate).await {
            warn!("⚠️ Registro antiguo {} no eliminado tras renombrar: {}", old_plate, e);
        }

        if watermark_migrated {
            if let Err(e) = self.maintenance.delete_watermark(old_plate).await {
                warn!("⚠️ Marca de agua antigua {} no eliminada: {}", old_plate, e);
            }
        }
    }

    pub async fn delete(&self, user: &AuthenticatedUser, plate: &str) -> Result<(), AppError> {
        require_admin_tier(user)?;

        let plate = normalize_plate(plate);
        if !self.vehicles.exists(&plate).await? {
            return Err(not_found_error("Vehículo", &plate));
        }

        self.vehicles.delete(&plate).await?;
        if let Err(e) = self.maintenance.delete_watermark(&plate).await {
            warn!("⚠️ Vehículo {} eliminado pero su marca de agua persiste: {}", plate, e);
        }

        info!("🗑️ Vehículo {} eliminado por {}", plate, user.name);
        Ok(())
    }

    pub async fn update_fuel(
        &self,
        user: &AuthenticatedUser,
        plate: &str,
        request: FuelUpdateRequest,
    ) -> Result<Vehicle, AppError> {
        request.validate()?;
        let level = required_field(request.fuel_level, "fuelLevel")?;
        let level = u8::try_from(level)
            .map_err(|_| AppError::BadRequest("El nivel de combustible debe estar entre 0 y 100".to_string()))?;

        let plate = normalize_plate(plate);
        let mut vehicle = self
            .vehicles
            .find_by_plate(&plate)
            .await?
            .ok_or_else(|| not_found_error("Vehículo", &plate))?;

        vehicle.fuel_level = Some(level);
        vehicle.fuel_updated_at = Some(now_rfc3339());
        vehicle.fuel_updated_by = Some(user.name.clone());
        self.vehicles.save(&vehicle).await?;

        info!("⛽ Combustible de {} actualizado a {}%", plate, level);
        Ok(vehicle)
    }
}
