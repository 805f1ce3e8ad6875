//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Todo es `Clone` barato (respaldado por `Arc`).

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::services::identity_service::{IdentityProvider, IdentityResolver};
use crate::store::EventStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub store: EventStore,
    pub identity: IdentityResolver,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, store: EventStore, provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            identity: IdentityResolver::new(provider),
        }
    }

    /// Proveedor de identidad para las operaciones de administración
    pub fn identity_provider(&self) -> Arc<dyn IdentityProvider> {
        self.identity.provider().clone()
    }
}
