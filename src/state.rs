use std::{sync::Arc, time::Instant};

use anyhow::{bail, Context};

use crate::{
    auth::auth_service::AuthService,
    db::{DbPool, HealthCheck},
    notification::{
        notification_repository::{NotificationRepository, PgNotificationRepository},
        notification_service::NotificationService,
    },
    task::{
        task_repository::{PgTaskRepository, TaskRepository},
        task_service::TaskService,
    },
    user::user_repository::{PgUserRepository, UserRepository},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub user_repository: Arc<dyn UserRepository>,
    pub auth_service: AuthService,
    pub task_service: TaskService,
    pub notification_service: NotificationService,
    pub health: Arc<dyn HealthCheck>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        config: Config,
        users: Arc<dyn UserRepository>,
        tasks: Arc<dyn TaskRepository>,
        notifications: Arc<dyn NotificationRepository>,
        health: Arc<dyn HealthCheck>,
    ) -> Self {
        let config = Arc::new(config);

        let auth_service = AuthService::new(
            users.clone(),
            config.jwt_secret.clone(),
            config.jwt_expiration_hours,
            config.bcrypt_cost,
        );

        Self {
            user_repository: users,
            auth_service,
            task_service: TaskService::new(tasks),
            notification_service: NotificationService::new(notifications),
            health,
            started_at: Instant::now(),
            config,
        }
    }

    /// Wires every repository to the same Postgres pool.
    pub fn with_pool(config: Config, pool: DbPool) -> Self {
        Self::new(
            config,
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgTaskRepository::new(pool.clone())),
            Arc::new(PgNotificationRepository::new(pool.clone())),
            Arc::new(pool),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_acquire_timeout_secs: u64,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub bcrypt_cost: u32,
    pub allowed_origins: Vec<String>,
}

const DEFAULT_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match get("APP_ENV").as_deref() {
            None | Some("development") | Some("dev") => Environment::Development,
            Some("production") | Some("prod") => Environment::Production,
            Some("test") => Environment::Test,
            Some(other) => bail!("APP_ENV has unknown value {:?}", other),
        };

        let mut allowed_origins: Vec<String> = match get("ALLOWED_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };
        if let Some(frontend) = get("FRONTEND_URL").filter(|v| !v.trim().is_empty()) {
            allowed_origins.push(frontend.trim().to_string());
        }

        Ok(Self {
            environment,
            host: get("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&get, "PORT", 5000)?,
            database_url: get("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", 10)?,
            database_acquire_timeout_secs: parse_or(&get, "DATABASE_ACQUIRE_TIMEOUT_SECS", 5)?,
            jwt_secret: get("JWT_SECRET")
                .filter(|s| !s.is_empty())
                .context("JWT_SECRET must be set")?,
            jwt_expiration_hours: parse_or(&get, "JWT_EXPIRATION_HOURS", 24)?,
            bcrypt_cost: parse_or(&get, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            allowed_origins,
        })
    }
}

fn parse_or<F, T>(get: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number, got {:?}", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/tasks"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.port, 5000);
        assert_eq!(config.jwt_expiration_hours, 24);
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "http://127.0.0.1:3000"]
        );
    }

    #[test]
    fn test_origins_and_frontend_url() {
        let config = Config::from_lookup(lookup(&[
            ("APP_ENV", "production"),
            ("DATABASE_URL", "postgres://localhost/tasks"),
            ("JWT_SECRET", "secret"),
            ("ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
            ("FRONTEND_URL", "https://app.example"),
        ]))
        .unwrap();

        assert!(config.environment.is_production());
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example", "https://app.example"]
        );
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let err = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/tasks")]))
            .unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_bad_port_is_an_error() {
        let result = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/tasks"),
            ("JWT_SECRET", "secret"),
            ("PORT", "eighty"),
        ]));
        assert!(result.is_err());
    }
}
