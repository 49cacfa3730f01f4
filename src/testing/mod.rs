//! Helpers for exercising the service without a database.

mod memory_store;

use std::sync::Arc;

pub use memory_store::MemoryStore;

use crate::state::{AppState, Config, Environment};

/// Configuration suitable for tests: cheap hashing, fixed secret.
pub fn test_config() -> Config {
    Config {
        environment: Environment::Test,
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "memory://".to_string(),
        database_max_connections: 1,
        database_acquire_timeout_secs: 1,
        jwt_secret: "test-secret".to_string(),
        jwt_expiration_hours: 1,
        bcrypt_cost: 4,
        allowed_origins: vec!["http://localhost:3000".to_string()],
    }
}

/// Application state whose repositories all share one [`MemoryStore`].
pub fn memory_state(store: Arc<MemoryStore>) -> AppState {
    AppState::new(
        test_config(),
        store.clone(),
        store.clone(),
        store.clone(),
        store,
    )
}
