use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::{AppConfig, StoreBackend};
use crate::users::db_store::DbStore;
use crate::users::file_store::FileStore;
use crate::users::store::UserStore;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn UserStore>,
}

impl AppState {
    /// Wires the process-wide dependencies: configuration, database pool and
    /// the record store selected by `STORE_BACKEND`. Built once at startup
    /// and handed to every handler through the router state.
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let store: Arc<dyn UserStore> = match config.store_backend {
            StoreBackend::File => Arc::new(FileStore::new(&config.users_file)),
            StoreBackend::Database => Arc::new(DbStore::new(db.clone())),
        };

        Ok(Self { db, config, store })
    }

    pub fn from_parts(db: PgPool, config: Arc<AppConfig>, store: Arc<dyn UserStore>) -> Self {
        Self { db, config, store }
    }
}
