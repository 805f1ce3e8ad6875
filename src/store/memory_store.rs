//! Almacén en memoria
//!
//! Implementación de `KvStore` para desarrollo local y tests. Permite
//! simular fallos de escritura por prefijo de clave.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::sync::RwLock;

use super::KvStore;

#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<BTreeMap<String, String>>>,
    failing_prefixes: Arc<RwLock<Vec<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Las escrituras y borrados sobre claves con este prefijo fallarán
    pub async fn fail_writes_with_prefix(&self, prefix: &str) {
        self.failing_prefixes.write().await.push(prefix.to_string());
    }

    pub async fn clear_failures(&self) {
        self.failing_prefixes.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn keys(&self) -> Vec<String> {
        self.entries.read().await.keys().cloned().collect()
    }

    async fn check_writable(&self, key: &str) -> Result<()> {
        let failing = self.failing_prefixes.read().await;
        if failing.iter().any(|prefix| key.starts_with(prefix.as_str())) {
            return Err(anyhow!("simulated write failure for key {}", key));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.check_writable(key).await?;
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.check_writable(key).await?;
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        let entries = self.entries.read().await;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        let entries = self.entries.read().await;
        Ok(keys.iter().map(|key| entries.get(key).cloned()).collect())
    }
}
