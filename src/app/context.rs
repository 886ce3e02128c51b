use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{Result, YomuError};
use crate::catalog::http_client::HttpCatalog;
use crate::catalog::{AuthSession, CatalogClient};
use crate::config::Config;
use crate::store::sqlite::SqliteStore;
use crate::store::ProgressStore;

pub struct AppContext {
    pub config: Config,
    pub catalog: Arc<dyn CatalogClient>,
    pub store: Arc<dyn ProgressStore>,
}

impl AppContext {
    pub fn new(config: Config, auth: Option<AuthSession>, db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let catalog: Arc<dyn CatalogClient> = Arc::new(HttpCatalog::new(&config.api, auth)?);
        let store: Arc<dyn ProgressStore> = Arc::new(SqliteStore::new(&db_path)?);

        Ok(Self {
            config,
            catalog,
            store,
        })
    }

    pub fn in_memory(config: Config, auth: Option<AuthSession>) -> Result<Self> {
        let catalog: Arc<dyn CatalogClient> = Arc::new(HttpCatalog::new(&config.api, auth)?);
        let store: Arc<dyn ProgressStore> = Arc::new(SqliteStore::in_memory()?);

        Ok(Self {
            config,
            catalog,
            store,
        })
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| YomuError::Config("Could not find data directory".into()))?;
        let yomu_dir = data_dir.join("yomu");
        std::fs::create_dir_all(&yomu_dir)?;
        Ok(yomu_dir.join("yomu.db"))
    }
}
