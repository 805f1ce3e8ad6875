use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use fleet_trips::config::environment::EnvironmentConfig;
use fleet_trips::services::identity_service::HttpIdentityProvider;
use fleet_trips::store::{EventStore, KvStore, MemoryStore, RedisStore, StoreBackend};
use fleet_trips::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚚 Fleet Trips - Libro de trayectos de la flota");
    info!("================================================");

    let config = EnvironmentConfig::from_env().map_err(|e| {
        error!("❌ Configuración inválida: {}", e);
        e
    })?;
    if config.is_development() {
        info!("🛠️ Modo desarrollo ({})", config.environment);
    }

    // Inicializar almacén
    let kv: Arc<dyn KvStore> = match config.store.backend {
        StoreBackend::Redis => match RedisStore::new(&config.store).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                error!("❌ Error conectando a Redis: {}", e);
                return Err(anyhow::anyhow!("Error de Redis: {}", e));
            }
        },
        StoreBackend::Memory => {
            warn!("⚠️ Usando almacén en memoria: los datos se pierden al reiniciar");
            Arc::new(MemoryStore::new())
        }
    };
    let store = EventStore::new(kv, config.store.namespace.clone());

    // Proveedor de identidad
    let provider = HttpIdentityProvider::new(
        reqwest::Client::new(),
        &config.auth.url,
        &config.auth.anon_key,
        &config.auth.service_role_key,
    );
    info!("🔐 Proveedor de identidad: {}", config.auth.url);

    if config.cors_origins.is_empty() && config.is_production() {
        warn!("⚠️ CORS permisivo en producción: define CORS_ORIGINS");
    }

    let addr: SocketAddr = config.server_url().parse()?;
    let oil_change_interval = config.oil_change_interval_km;
    let app = create_router(AppState::new(config, store, Arc::new(provider)));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("   POST /signup - Alta de usuario");
    info!("   GET|PUT /settings/admin-registration - Registro de administradores");
    info!("🚗 Trayectos:");
    info!("   POST /trips - Iniciar trayecto");
    info!("   GET  /trips - Mis trayectos");
    info!("   PUT  /trips/:id/complete - Finalizar trayecto");
    info!("   DELETE /trips/:id - Eliminar trayecto");
    info!("🚙 Vehículos:");
    info!("   GET  /vehicles - Flota con disponibilidad");
    info!("   POST /vehicles - Registrar vehículo");
    info!("   PUT  /vehicles/:plate - Actualizar o renombrar");
    info!("   DELETE /vehicles/:plate - Eliminar vehículo");
    info!("   POST /vehicles/:plate/fuel - Nivel de combustible");
    info!("   GET  /vehicles/:plate/last-trip - Último trayecto");
    info!("🛢️ Mantenimiento (cada {} km):", oil_change_interval);
    info!("   GET  /vehicles/:plate/maintenance - Estado");
    info!("   POST /vehicles/:plate/oil-change - Registrar cambio de aceite");
    info!("   GET  /vehicles/:plate/maintenance-history - Historial");
    info!("👑 Administración:");
    info!("   GET  /admin/trips - Todos los trayectos");
    info!("   GET  /admin/vehicles - Vehículos sin anotar");
    info!("   GET  /admin/users - Usuarios");
    info!("   PUT  /admin/users/:id/role - Cambiar rol");
    info!("   DELETE /admin/users/:id - Eliminar usuario");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
