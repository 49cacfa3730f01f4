pub mod auth;
pub mod security;

pub use auth::{auth_middleware, AuthUser};
