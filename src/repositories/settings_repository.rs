use crate::models::settings::AdminRegistrationSetting;
use crate::store::EventStore;
use crate::utils::errors::{store_error, AppError};

/// Ajustes globales (`settings:*`), siempre leídos del almacén sin caché local
#[derive(Clone)]
pub struct SettingsRepository {
    store: EventStore,
}

impl SettingsRepository {
    pub fn new(store: EventStore) -> Self {
        Self { store }
    }

    fn admin_registration_key(&self) -> String {
        self.store.key(&["settings", "admin_registration"])
    }

    /// Deshabilitado si el ajuste no existe
    pub async fn admin_registration(&self) -> Result<AdminRegistrationSetting, AppError> {
        let setting: Option<AdminRegistrationSetting> = self
            .store
            .get(&self.admin_registration_key())
            .await
            .map_err(|e| store_error("Error reading admin registration setting", e))?;
        Ok(setting.unwrap_or_default())
    }

    pub async fn set_admin_registration(&self, setting: &AdminRegistrationSetting) -> Result<(), AppError> {
        self.store
            .set(&self.admin_registration_key(), setting)
            .await
            .map_err(|e| store_error("Error writing admin registration setting", e))
    }
}
