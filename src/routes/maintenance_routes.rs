use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::maintenance_controller::MaintenanceController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::maintenance_dto::OilChangeRequest;
use crate::models::auth::AuthenticatedUser;
use crate::models::maintenance::{MaintenanceHistoryEntry, MaintenanceStatus};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas de mantenimiento, montadas bajo `/vehicles`
pub fn create_maintenance_router() -> Router<AppState> {
    Router::new()
        .route("/:plate/maintenance", get(maintenance_status))
        .route("/:plate/oil-change", post(record_oil_change))
        .route("/:plate/maintenance-history", get(maintenance_history))
}

fn controller(state: &AppState) -> MaintenanceController {
    MaintenanceController::new(state.store.clone(), state.config.oil_change_interval_km)
}

async fn maintenance_status(
    State(state): State<AppState>,
    Path(plate): Path<String>,
) -> Result<Json<MaintenanceStatus>, AppError> {
    Ok(Json(controller(&state).status(&plate).await?))
}

async fn record_oil_change(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(plate): Path<String>,
    payload: Result<Json<OilChangeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<MaintenanceStatus>>, AppError> {
    let Json(request) = payload?;
    let status = controller(&state).record_oil_change(&user, &plate, request).await?;
    Ok(Json(ApiResponse::success_with_message(status, "Cambio de aceite registrado")))
}

async fn maintenance_history(
    State(state): State<AppState>,
    Path(plate): Path<String>,
) -> Result<Json<Vec<MaintenanceHistoryEntry>>, AppError> {
    Ok(Json(controller(&state).history(&plate).await?))
}
