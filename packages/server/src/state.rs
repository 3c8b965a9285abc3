use std::sync::Arc;

use common::storage::ObjectStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::report::ReportRenderer;
use crate::services::RegistrationService;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub object_store: Arc<dyn ObjectStore>,
    pub reports: Arc<dyn ReportRenderer>,
}

impl AppState {
    /// Registration service over the shared pool and object store.
    pub fn registrations(&self) -> RegistrationService<'_, DatabaseConnection> {
        RegistrationService::new(
            &self.db,
            self.object_store.as_ref(),
            &self.config.storage.folder,
        )
    }
}
