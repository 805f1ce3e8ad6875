use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::warn;

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::SignupRequest;
use crate::dto::common_dto::ApiResponse;
use crate::models::auth::IdentityUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas públicas
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/signup", post(signup))
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (status, store) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            warn!("⚠️ Health check: almacén no disponible: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    (
        status,
        Json(json!({
            "status": if status == StatusCode::OK { "ok" } else { "degraded" },
            "store": store,
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<IdentityUser>>), AppError> {
    let Json(request) = payload?;
    let controller = AuthController::new(state.identity_provider(), state.store.clone());
    let user = controller.signup(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(user, "Usuario registrado exitosamente")),
    ))
}
