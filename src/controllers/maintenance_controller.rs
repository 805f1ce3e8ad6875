//! Mantenimiento de vehículos
//!
//! El kilometraje total de un vehículo es la suma de las distancias de sus
//! trayectos completados. La marca de agua guarda el kilometraje del último
//! cambio de aceite y se sobrescribe en cada registro.

use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::maintenance_dto::OilChangeRequest;
use crate::models::auth::AuthenticatedUser;
use crate::models::maintenance::{MaintenanceHistoryEntry, MaintenanceStatus, MaintenanceType};
use crate::repositories::maintenance_repository::MaintenanceRepository;
use crate::repositories::trip_repository::TripRepository;
use crate::services::authorization_service::require_admin_tier;
use crate::store::EventStore;
use crate::utils::errors::{required_field, AppError};
use crate::utils::validation::{normalize_plate, now_rfc3339};

pub struct MaintenanceController {
    trips: TripRepository,
    maintenance: MaintenanceRepository,
    oil_change_interval_km: i64,
}

impl MaintenanceController {
    pub fn new(store: EventStore, oil_change_interval_km: i64) -> Self {
        Self {
            trips: TripRepository::new(store.clone()),
            maintenance: MaintenanceRepository::new(store),
            oil_change_interval_km,
        }
    }

    pub async fn status(&self, plate: &str) -> Result<MaintenanceStatus, AppError> {
        let plate = normalize_plate(plate);
        let trips = self.trips.find_by_plate(&plate).await?;
        let total_km = trips
            .iter()
            .filter_map(|trip| trip.distance_km())
            .fold(0, i64::saturating_add);
        let last_oil_change = self.maintenance.watermark(&plate).await?;

        Ok(MaintenanceStatus::compute(
            &plate,
            total_km,
            last_oil_change,
            self.oil_change_interval_km,
        ))
    }

    pub async fn record_oil_change(
        &self,
        user: &AuthenticatedUser,
        plate: &str,
        request: OilChangeRequest,
    ) -> Result<MaintenanceStatus, AppError> {
        require_admin_tier(user)?;
        request.validate()?;

        let plate = normalize_plate(plate);
        let current_km = required_field(request.current_km, "currentKm")?;

        self.maintenance.set_watermark(&plate, current_km).await?;

        // El historial es best-effort: la marca de agua ya quedó escrita
        let entry = MaintenanceHistoryEntry {
            id: Uuid::new_v4().to_string(),
            plate: plate.clone(),
            kind: MaintenanceType::OilChange,
            km: current_km,
            date: now_rfc3339(),
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            notes: request.notes.filter(|n| !n.trim().is_empty()),
        };
        if let Err(e) = self.maintenance.append_history(&entry).await {
            warn!("⚠️ Cambio de aceite de {} registrado sin entrada de historial: {}", plate, e);
        }

        info!("🛢️ Cambio de aceite de {} registrado a {} km por {}", plate, current_km, user.name);
        self.status(&plate).await
    }

    pub async fn history(&self, plate: &str) -> Result<Vec<MaintenanceHistoryEntry>, AppError> {
        self.maintenance.history(plate).await
    }
}
