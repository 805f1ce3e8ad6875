use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{delete, get, put},
    Extension, Json, Router,
};

use crate::controllers::trip_controller::TripController;
use crate::controllers::user_controller::UserController;
use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::auth_dto::UpdateRoleRequest;
use crate::dto::common_dto::ApiResponse;
use crate::models::auth::{AuthenticatedUser, IdentityUser};
use crate::models::trip::Trip;
use crate::models::vehicle::Vehicle;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas de administración; cada controlador comprueba el rol
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/trips", get(list_all_trips))
        .route("/vehicles", get(list_raw_vehicles))
        .route("/users", get(list_users))
        .route("/users/:id", delete(delete_user))
        .route("/users/:id/role", put(change_role))
}

async fn list_all_trips(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<Trip>>, AppError> {
    let controller = TripController::new(state.store.clone());
    Ok(Json(controller.list_all(&user).await?))
}

async fn list_raw_vehicles(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    let controller = VehicleController::new(state.store.clone());
    Ok(Json(controller.list_raw(&user).await?))
}

async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<IdentityUser>>, AppError> {
    let controller = UserController::new(state.identity_provider());
    Ok(Json(controller.list(&user).await?))
}

async fn delete_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = UserController::new(state.identity_provider());
    controller.delete(&user, &id).await?;
    Ok(Json(ApiResponse::message("Usuario eliminado exitosamente")))
}

async fn change_role(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateRoleRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<IdentityUser>>, AppError> {
    let Json(request) = payload?;
    let controller = UserController::new(state.identity_provider());
    let updated = controller.change_role(&user, &id, request).await?;
    Ok(Json(ApiResponse::success_with_message(updated, "Rol actualizado exitosamente")))
}
