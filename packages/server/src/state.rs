use std::sync::Arc;

use sea_orm::DatabaseConnection;
use storage::PhotoStore;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub photo_store: Arc<dyn PhotoStore>,
}
