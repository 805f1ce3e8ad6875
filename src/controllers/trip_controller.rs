//! Libro de trayectos
//!
//! Alta, cierre, borrado y listados de trayectos. El alta consulta la
//! disponibilidad antes de escribir; la ventana entre lectura y escritura
//! no está protegida y dos altas simultáneas pueden pasar ambas. El
//! resolutor "último gana" reconcilia ese caso en lecturas posteriores.

use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::trip_dto::{CompleteTripRequest, CreateTripRequest, LastTripResponse};
use crate::models::auth::AuthenticatedUser;
use crate::models::trip::{Trip, TripStatus};
use crate::repositories::trip_repository::TripRepository;
use crate::services::authorization_service::{can_delete_trip, require_admin_tier};
use crate::services::availability_service::{latest_trip, resolve_availability};
use crate::services::trip_reconciliation::{dedup_first_occurrence, dedup_user_trips};
use crate::store::EventStore;
use crate::utils::errors::{forbidden_error, not_found_error, required_field, AppError};
use crate::utils::validation::{normalize_plate, now_rfc3339};

/// Resultado de un borrado de trayecto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripDeletion {
    Deleted,
    /// El registro ya no existía; sólo se limpió el índice del usuario
    GhostCleaned,
}

pub struct TripController {
    repository: TripRepository,
}

impl TripController {
    pub fn new(store: EventStore) -> Self {
        Self {
            repository: TripRepository::new(store),
        }
    }

    pub async fn create(&self, user: &AuthenticatedUser, request: CreateTripRequest) -> Result<Trip, AppError> {
        request.validate()?;

        let plate = normalize_plate(&required_field(request.plate, "plate")?);

        let history = self.repository.find_by_plate(&plate).await?;
        let availability = resolve_availability(&history, &plate);
        if let Some(active) = availability.active_trip {
            return Err(AppError::Conflict(format!(
                "El vehículo {} ya está en uso por {}",
                plate, active.user_name
            )));
        }

        let trip = Trip {
            id: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            plate,
            color: required_field(request.color, "color")?.trim().to_string(),
            model: required_field(request.model, "model")?.trim().to_string(),
            km_start: required_field(request.km_start, "kmStart")?,
            time_start: required_field(request.time_start, "timeStart")?,
            km_end: None,
            time_end: None,
            destination: required_field(request.destination, "destination")?.trim().to_string(),
            status: TripStatus::InProgress,
            created_at: Some(now_rfc3339()),
            completed_at: None,
        };

        self.repository.save(&trip).await?;

        // Segunda escritura independiente: si falla, el trayecto ya existe y no se deshace
        if let Err(e) = self.repository.add_to_user_index(&user.id, &trip.id).await {
            error!(
                "❌ Trayecto {} guardado pero el índice del usuario {} no se actualizó: {}",
                trip.id, user.id, e
            );
            return Err(AppError::Internal(format!(
                "Trip {} was saved but the user trip index could not be updated",
                trip.id
            )));
        }

        info!("🚗 Trayecto {} iniciado por {} con {}", trip.id, user.name, trip.plate);
        Ok(trip)
    }

    pub async fn complete(
        &self,
        user: &AuthenticatedUser,
        trip_id: &str,
        request: CompleteTripRequest,
    ) -> Result<Trip, AppError> {
        let mut trip = self
            .repository
            .find_by_id(trip_id)
            .await?
            .ok_or_else(|| not_found_error("Trayecto", trip_id))?;

        if trip.user_id != user.id {
            return Err(forbidden_error("finalizar el trayecto", "no eres el conductor"));
        }
        if trip.is_completed() {
            return Err(AppError::Conflict("El trayecto ya fue finalizado".to_string()));
        }

        request.validate()?;

        let km_end = required_field(request.km_end, "kmEnd")?;
        if km_end < trip.km_start {
            // No se rechaza: sólo el cliente valida kmEnd >= kmStart
            warn!(
                "⚠️ Trayecto {} finalizado con kmEnd {} menor que kmStart {}",
                trip.id, km_end, trip.km_start
            );
        }

        trip.km_end = Some(km_end);
        trip.time_end = Some(required_field(request.time_end, "timeEnd")?);
        trip.status = TripStatus::Completed;
        trip.completed_at = Some(now_rfc3339());

        self.repository.save(&trip).await?;

        info!(
            "🏁 Trayecto {} pasa a {} ({} km)",
            trip.id,
            trip.status.as_str(),
            km_end.saturating_sub(trip.km_start)
        );
        Ok(trip)
    }

    pub async fn delete(&self, user: &AuthenticatedUser, trip_id: &str) -> Result<TripDeletion, AppError> {
        let Some(trip) = self.repository.find_by_id(trip_id).await? else {
            // Referencia fantasma: limpiar el índice y responder éxito
            match self.repository.remove_from_user_index(&user.id, trip_id).await {
                Ok(true) => info!("🧹 Referencia fantasma {} eliminada del índice de {}", trip_id, user.id),
                Ok(false) => info!("🧹 Trayecto {} inexistente, nada que limpiar", trip_id),
                Err(e) => warn!("⚠️ No se pudo limpiar la referencia fantasma {}: {}", trip_id, e),
            }
            return Ok(TripDeletion::GhostCleaned);
        };

        if !can_delete_trip(user, &trip.user_id) {
            return Err(forbidden_error("eliminar el trayecto", "no eres el conductor ni administrador"));
        }

        self.repository.delete(trip_id).await?;

        if let Err(e) = self.repository.remove_from_user_index(&trip.user_id, trip_id).await {
            warn!("⚠️ Trayecto {} eliminado pero el índice de {} quedó desfasado: {}", trip_id, trip.user_id, e);
        }

        info!("🗑️ Trayecto {} eliminado por {}", trip_id, user.name);
        Ok(TripDeletion::Deleted)
    }

    pub async fn list_for_user(&self, user: &AuthenticatedUser) -> Result<Vec<Trip>, AppError> {
        let ids = self.repository.user_trip_ids(&user.id).await?;
        let trips = self.repository.find_many(&ids).await?;
        if trips.len() < ids.len() {
            warn!(
                "⚠️ Índice de {} con {} referencias fantasma",
                user.id,
                ids.len() - trips.len()
            );
        }
        Ok(dedup_user_trips(trips))
    }

    pub async fn list_all(&self, user: &AuthenticatedUser) -> Result<Vec<Trip>, AppError> {
        require_admin_tier(user)?;
        let trips = self.repository.find_all().await?;
        Ok(dedup_first_occurrence(trips))
    }

    pub async fn last_trip(&self, plate: &str) -> Result<LastTripResponse, AppError> {
        let history = self.repository.find_by_plate(plate).await?;
        let trip = latest_trip(&history, plate).cloned();
        Ok(LastTripResponse {
            last_km: trip.as_ref().map(Trip::last_known_km),
            trip,
        })
    }
}
