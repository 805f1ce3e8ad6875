use crate::models::maintenance::MaintenanceHistoryEntry;
use crate::store::EventStore;
use crate::utils::errors::{store_error, AppError};
use crate::utils::validation::{normalize_plate, parse_timestamp_or_epoch};

/// Marca de agua de cambio de aceite (`oil_change:{PLATE}`) e historial
/// (`maintenance:{PLATE}:{id}`)
#[derive(Clone)]
pub struct MaintenanceRepository {
    store: EventStore,
}

impl MaintenanceRepository {
    pub fn new(store: EventStore) -> Self {
        Self { store }
    }

    fn watermark_key(&self, plate: &str) -> String {
        self.store.key(&["oil_change", &normalize_plate(plate)])
    }

    fn history_key(&self, plate: &str, id: &str) -> String {
        self.store.key(&["maintenance", &normalize_plate(plate), id])
    }

    /// `None` si nunca se registró un cambio de aceite
    pub async fn find_watermark(&self, plate: &str) -> Result<Option<i64>, AppError> {
        self.store
            .get(&self.watermark_key(plate))
            .await
            .map_err(|e| store_error("Error reading oil change watermark", e))
    }

    pub async fn watermark(&self, plate: &str) -> Result<i64, AppError> {
        Ok(self.find_watermark(plate).await?.unwrap_or(0))
    }

    pub async fn set_watermark(&self, plate: &str, km: i64) -> Result<(), AppError> {
        self.store
            .set(&self.watermark_key(plate), &km)
            .await
            .map_err(|e| store_error("Error writing oil change watermark", e))
    }

    pub async fn delete_watermark(&self, plate: &str) -> Result<(), AppError> {
        self.store
            .delete(&self.watermark_key(plate))
            .await
            .map_err(|e| store_error("Error deleting oil change watermark", e))
    }

    pub async fn append_history(&self, entry: &MaintenanceHistoryEntry) -> Result<(), AppError> {
        self.store
            .set(&self.history_key(&entry.plate, &entry.id), entry)
            .await
            .map_err(|e| store_error("Error writing maintenance history", e))
    }

    /// Historial de la matrícula, más reciente primero
    pub async fn history(&self, plate: &str) -> Result<Vec<MaintenanceHistoryEntry>, AppError> {
        let prefix = self.store.prefix(&["maintenance", &normalize_plate(plate)]);
        let mut entries: Vec<MaintenanceHistoryEntry> = self
            .store
            .scan(&prefix)
            .await
            .map_err(|e| store_error("Error listing maintenance history", e))?;

        entries.sort_by(|a, b| {
            parse_timestamp_or_epoch(Some(&b.date)).cmp(&parse_timestamp_or_epoch(Some(&a.date)))
        });
        Ok(entries)
    }
}
