use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};

use crate::controllers::trip_controller::TripController;
use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::trip_dto::LastTripResponse;
use crate::dto::vehicle_dto::{CreateVehicleRequest, FuelUpdateRequest, UpdateVehicleRequest};
use crate::models::auth::AuthenticatedUser;
use crate::models::vehicle::{Vehicle, VehicleWithAvailability};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/:plate", put(update_vehicle).delete(delete_vehicle))
        .route("/:plate/fuel", post(update_fuel))
        .route("/:plate/last-trip", get(last_trip))
}

async fn list_vehicles(State(state): State<AppState>) -> Result<Json<Vec<VehicleWithAvailability>>, AppError> {
    let controller = VehicleController::new(state.store.clone());
    Ok(Json(controller.list().await?))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<CreateVehicleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Vehicle>>), AppError> {
    let Json(request) = payload?;
    let controller = VehicleController::new(state.store.clone());
    let upsert = controller.create(&user, request).await?;

    let (status, message) = if upsert.created {
        (StatusCode::CREATED, "Vehículo creado exitosamente")
    } else {
        (StatusCode::OK, "Vehículo actualizado exitosamente")
    };
    Ok((status, Json(ApiResponse::success_with_message(upsert.vehicle, message))))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(plate): Path<String>,
    payload: Result<Json<UpdateVehicleRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let Json(request) = payload?;
    let controller = VehicleController::new(state.store.clone());
    let vehicle = controller.update(&user, &plate, request).await?;
    Ok(Json(ApiResponse::success_with_message(vehicle, "Vehículo actualizado exitosamente")))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(plate): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = VehicleController::new(state.store.clone());
    controller.delete(&user, &plate).await?;
    Ok(Json(ApiResponse::message("Vehículo eliminado exitosamente")))
}

async fn update_fuel(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(plate): Path<String>,
    payload: Result<Json<FuelUpdateRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let Json(request) = payload?;
    let controller = VehicleController::new(state.store.clone());
    let vehicle = controller.update_fuel(&user, &plate, request).await?;
    Ok(Json(ApiResponse::success_with_message(vehicle, "Nivel de combustible actualizado")))
}

async fn last_trip(
    State(state): State<AppState>,
    Path(plate): Path<String>,
) -> Result<Json<LastTripResponse>, AppError> {
    let controller = TripController::new(state.store.clone());
    Ok(Json(controller.last_trip(&plate).await?))
}
