//! Middleware de autenticación
//!
//! Resuelve la identidad del llamante a partir del token y la inyecta en
//! las extensions de la request. Cualquier fallo corta la request con 401.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::services::identity_service::extract_token;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Middleware de autenticación
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(request.headers());
    let user = state.identity.resolve(token.as_deref()).await?;

    debug!("🔑 {} autenticado como {}", user.email, user.role.as_str());

    // Inyectar usuario autenticado en las extensions
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
