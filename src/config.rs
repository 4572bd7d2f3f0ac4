use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_hours: i64,
}

/// Record-store backend serving the /users routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    File,
    Database,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub users_file: PathBuf,
    pub store_backend: StoreBackend,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let users_file = std::env::var("USERS_FILE")
            .unwrap_or_else(|_| "users.json".into())
            .into();
        let store_backend = match std::env::var("STORE_BACKEND").as_deref() {
            Ok("database") => StoreBackend::Database,
            _ => StoreBackend::File,
        };
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            ttl_hours: std::env::var("JWT_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(4),
        };
        Ok(Self {
            database_url,
            users_file,
            store_backend,
            jwt,
        })
    }
}
