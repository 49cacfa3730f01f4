use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use utoipa::ToSchema;

use crate::state::Config;

pub type DbPool = Pool<Postgres>;

/// Connects the pool. Production keeps serving with a lazy pool when the
/// database is unreachable; every data request then fails on its own.
pub async fn create_pool(config: &Config) -> Result<DbPool, sqlx::Error> {
    let options = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(config.database_acquire_timeout_secs));

    match options.clone().connect(&config.database_url).await {
        Ok(pool) => {
            tracing::info!("Database connected");
            Ok(pool)
        }
        Err(e) if config.environment.is_production() => {
            tracing::error!(error = %e, "Database connection error");
            tracing::warn!("Continuing without database connection");
            options.connect_lazy(&config.database_url)
        }
        Err(e) => Err(e),
    }
}

pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DbStatus {
    Connected,
    Disconnected,
}

/// Liveness probe for whatever backs the repositories.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn status(&self) -> DbStatus;
}

#[async_trait]
impl HealthCheck for DbPool {
    async fn status(&self) -> DbStatus {
        if self.is_closed() {
            return DbStatus::Disconnected;
        }

        let probe = sqlx::query("SELECT 1").execute(self);
        match tokio::time::timeout(Duration::from_secs(2), probe).await {
            Ok(Ok(_)) => DbStatus::Connected,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Database health probe failed");
                DbStatus::Disconnected
            }
            Err(_) => {
                tracing::warn!("Database health probe timed out");
                DbStatus::Disconnected
            }
        }
    }
}
