use crate::config::AppConfig;
use crate::db;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = db::connect(&config.database_url).await?;
        Ok(Self { db, config })
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }

    /// Fresh, migrated in-memory database with test secrets.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::in_memory());
        let db = db::connect(&config.database_url).await?;
        Ok(Self::from_parts(db, config))
    }
}
