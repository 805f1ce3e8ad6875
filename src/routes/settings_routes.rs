use axum::{
    extract::{rejection::JsonRejection, State},
    handler::Handler,
    middleware::from_fn_with_state,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::settings_controller::SettingsController;
use crate::dto::auth_dto::AdminRegistrationPayload;
use crate::dto::common_dto::ApiResponse;
use crate::middleware::auth::auth_middleware;
use crate::models::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// La lectura es pública (la usa el formulario de alta); la escritura exige sesión
pub fn create_settings_router(state: AppState) -> Router<AppState> {
    Router::new().route(
        "/admin-registration",
        get(get_admin_registration)
            .put(update_admin_registration.layer(from_fn_with_state(state, auth_middleware))),
    )
}

async fn get_admin_registration(State(state): State<AppState>) -> Result<Json<AdminRegistrationPayload>, AppError> {
    let controller = SettingsController::new(state.store.clone());
    Ok(Json(controller.admin_registration().await?))
}

async fn update_admin_registration(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<AdminRegistrationPayload>, JsonRejection>,
) -> Result<Json<ApiResponse<AdminRegistrationPayload>>, AppError> {
    let Json(payload) = payload?;
    let controller = SettingsController::new(state.store.clone());
    let updated = controller.set_admin_registration(&user, payload).await?;
    Ok(Json(ApiResponse::success_with_message(updated, "Ajuste actualizado")))
}
