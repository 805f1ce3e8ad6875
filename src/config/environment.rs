//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

use crate::models::maintenance::DEFAULT_OIL_CHANGE_INTERVAL_KM;
use crate::store::store_config::{StoreBackend, StoreConfig};

/// Configuración del proveedor de identidad
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub url: String,
    pub anon_key: String,
    pub service_role_key: String,
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub store: StoreConfig,
    pub auth: AuthConfig,
    pub oil_change_interval_km: i64,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn required_var(name: &str) -> Result<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow!("{} must be set", name))
}

fn parsed_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", name)),
        _ => Ok(default),
    }
}

/// Lista separada por comas; vacía si la variable no existe
fn list_var(name: &str) -> Vec<String> {
    env::var(name)
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl EnvironmentConfig {
    pub fn from_env() -> Result<Self> {
        let backend_raw = var_or("STORE_BACKEND", "redis");
        let backend = StoreBackend::from_str(&backend_raw)
            .ok_or_else(|| anyhow!("STORE_BACKEND must be 'redis' or 'memory', got '{}'", backend_raw))?;

        let defaults = StoreConfig::default();
        let oil_change_interval_km = parsed_var("OIL_CHANGE_INTERVAL_KM", DEFAULT_OIL_CHANGE_INTERVAL_KM)?;
        if oil_change_interval_km <= 0 {
            return Err(anyhow!("OIL_CHANGE_INTERVAL_KM must be positive"));
        }

        Ok(Self {
            environment: var_or("ENVIRONMENT", "development"),
            port: parsed_var("PORT", 3000)?,
            host: var_or("HOST", "0.0.0.0"),
            cors_origins: list_var("CORS_ORIGINS"),
            store: StoreConfig {
                backend,
                redis_url: var_or("REDIS_URL", &defaults.redis_url),
                namespace: var_or("STORE_NAMESPACE", &defaults.namespace),
            },
            auth: AuthConfig {
                url: required_var("AUTH_URL")?,
                anon_key: required_var("AUTH_ANON_KEY")?,
                service_role_key: required_var("AUTH_SERVICE_ROLE_KEY")?,
            },
            oil_change_interval_km,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Configuración local con almacén en memoria, sin leer el entorno
    pub fn in_memory() -> Self {
        Self {
            environment: "development".to_string(),
            port: 0,
            host: "127.0.0.1".to_string(),
            cors_origins: Vec::new(),
            store: StoreConfig {
                backend: StoreBackend::Memory,
                ..StoreConfig::default()
            },
            auth: AuthConfig {
                url: "http://localhost:9999".to_string(),
                anon_key: "anon".to_string(),
                service_role_key: "service".to_string(),
            },
            oil_change_interval_km: DEFAULT_OIL_CHANGE_INTERVAL_KM,
        }
    }
}
