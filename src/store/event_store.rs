//! Adaptador tipado sobre `KvStore`
//!
//! Añade el namespace a las claves y (de)serializa los valores como JSON.
//! Los repositorios sólo hablan con este tipo.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use super::KvStore;

#[derive(Clone)]
pub struct EventStore {
    inner: Arc<dyn KvStore>,
    namespace: String,
}

impl EventStore {
    pub fn new(inner: Arc<dyn KvStore>, namespace: impl Into<String>) -> Self {
        Self {
            inner,
            namespace: namespace.into(),
        }
    }

    /// Generar clave con namespace
    pub fn key(&self, parts: &[&str]) -> String {
        let mut key = self.namespace.clone();
        for part in parts {
            key.push(':');
            key.push_str(part);
        }
        key
    }

    /// Prefijo para escanear (termina en ':')
    pub fn prefix(&self, parts: &[&str]) -> String {
        let mut prefix = self.key(parts);
        prefix.push(':');
        prefix
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.inner.get(key).await? {
            Some(raw) => {
                let value = serde_json::from_str(&raw)
                    .with_context(|| format!("valor corrupto en clave {}", key))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub async fn set<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.inner.set(key, raw).await
    }

    pub async fn ping(&self) -> Result<()> {
        self.inner.ping().await
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        self.inner.delete(key).await
    }

    /// Lectura por lotes; las claves ausentes o ilegibles se omiten
    pub async fn get_many<T: DeserializeOwned>(&self, keys: &[String]) -> Result<Vec<T>> {
        let raw_values = self.inner.mget(keys).await?;
        Ok(keys
            .iter()
            .zip(raw_values)
            .filter_map(|(key, raw)| raw.and_then(|raw| decode_lenient(key, &raw)))
            .collect())
    }

    /// Escaneo por prefijo; los registros ilegibles se omiten con un warning
    pub async fn scan<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>> {
        let entries = self.inner.scan_prefix(prefix).await?;
        Ok(entries
            .into_iter()
            .filter_map(|(key, raw)| decode_lenient(&key, &raw))
            .collect())
    }
}

fn decode_lenient<T: DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("⚠️ Registro ilegible en {}: {}", key, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KvStore, MemoryStore};
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
    }

    fn store() -> (MemoryStore, EventStore) {
        let memory = MemoryStore::new();
        let events = EventStore::new(Arc::new(memory.clone()), "test");
        (memory, events)
    }

    #[test]
    fn test_key_and_prefix_layout() {
        let (_, events) = store();
        assert_eq!(events.key(&["vehicle", "ABC-123"]), "test:vehicle:ABC-123");
        assert_eq!(events.prefix(&["trip"]), "test:trip:");
    }

    #[tokio::test]
    async fn test_scan_skips_corrupt_records() {
        let (memory, events) = store();
        events.set("test:s:1", &Sample { name: "ok".into() }).await.unwrap();
        memory.set("test:s:2", "{not json".into()).await.unwrap();

        let found: Vec<Sample> = events.scan("test:s:").await.unwrap();
        assert_eq!(found, vec![Sample { name: "ok".into() }]);
    }

    #[tokio::test]
    async fn test_get_many_skips_missing() {
        let (_, events) = store();
        events.set("test:s:1", &Sample { name: "uno".into() }).await.unwrap();

        let found: Vec<Sample> = events
            .get_many(&["test:s:1".to_string(), "test:s:9".to_string()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "uno");
    }
}
