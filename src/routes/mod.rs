//! Rutas HTTP
//!
//! `create_router` monta las rutas públicas y las protegidas por el
//! middleware de autenticación, con CORS, compresión y trazas.

pub mod admin_routes;
pub mod auth_routes;
pub mod maintenance_routes;
pub mod settings_routes;
pub mod trip_routes;
pub mod vehicle_routes;

use axum::{middleware::from_fn_with_state, Router};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::{auth::auth_middleware, cors::cors_layer};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/trips", trip_routes::create_trip_router())
        .nest(
            "/vehicles",
            vehicle_routes::create_vehicle_router().merge(maintenance_routes::create_maintenance_router()),
        )
        .nest("/admin", admin_routes::create_admin_router())
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(auth_routes::create_auth_router())
        .nest("/settings", settings_routes::create_settings_router(state.clone()))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors_layer(&state.config.cors_origins)),
        )
        .with_state(state)
}
