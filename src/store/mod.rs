//! Almacenamiento clave-valor
//!
//! Adaptador delgado sobre un almacén clave-valor durable externo
//! (get/set/delete y escaneo por prefijo). No hay transacciones multi-clave:
//! cada escritura es independiente.

pub mod event_store;
pub mod memory_store;
pub mod redis_store;
pub mod store_config;

pub use event_store::EventStore;
pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
pub use store_config::{StoreBackend, StoreConfig};

use anyhow::Result;

/// Operaciones básicas del almacén (valores como JSON serializado)
#[async_trait::async_trait]
pub trait KvStore: Send + Sync {
    /// Comprobación de salud del backend
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    /// Lectura puntual; `None` si la clave no existe
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Escritura puntual (sobrescribe)
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Borrado puntual; borrar una clave inexistente no es un error
    async fn delete(&self, key: &str) -> Result<()>;

    /// Todas las entradas cuya clave empieza por `prefix`, sin orden garantizado
    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>>;

    /// Lectura por lotes, un resultado por clave en el mismo orden
    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>>;
}
