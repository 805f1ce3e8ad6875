use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, post, put},
    Extension, Json, Router,
};

use crate::controllers::trip_controller::{TripController, TripDeletion};
use crate::dto::common_dto::ApiResponse;
use crate::dto::trip_dto::{CompleteTripRequest, CreateTripRequest};
use crate::models::auth::AuthenticatedUser;
use crate::models::trip::Trip;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_trip_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_trip).get(list_my_trips))
        .route("/:id", delete(delete_trip))
        .route("/:id/complete", put(complete_trip))
}

async fn create_trip(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<CreateTripRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Trip>>), AppError> {
    let Json(request) = payload?;
    let controller = TripController::new(state.store.clone());
    let trip = controller.create(&user, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(trip, "Trayecto iniciado exitosamente")),
    ))
}

async fn complete_trip(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    payload: Result<Json<CompleteTripRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Trip>>, AppError> {
    let Json(request) = payload?;
    let controller = TripController::new(state.store.clone());
    let trip = controller.complete(&user, &id, request).await?;
    Ok(Json(ApiResponse::success_with_message(trip, "Trayecto finalizado exitosamente")))
}

async fn delete_trip(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = TripController::new(state.store.clone());
    let message = match controller.delete(&user, &id).await? {
        TripDeletion::Deleted => "Trayecto eliminado exitosamente",
        TripDeletion::GhostCleaned => "El trayecto ya no existía; referencia eliminada",
    };
    Ok(Json(ApiResponse::message(message)))
}

async fn list_my_trips(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<Trip>>, AppError> {
    let controller = TripController::new(state.store.clone());
    Ok(Json(controller.list_for_user(&user).await?))
}
