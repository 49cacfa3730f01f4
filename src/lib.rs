pub mod auth;
pub mod db;
pub mod dto;
pub mod error;
pub mod health;
pub mod middleware;
pub mod notification;
pub mod routes;
pub mod state;
pub mod task;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod user;
pub mod validation;
