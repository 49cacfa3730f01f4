use axum::{
    extract::{OriginalUri, State},
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::{db::DbStatus, state::AppState};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DatabaseHealth {
    pub status: DbStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub environment: String,
    pub database: DatabaseHealth,
    /// Seconds since the process started serving.
    pub uptime: u64,
}

/// Service and database health
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_status = state.health.status().await;

    Json(HealthResponse {
        success: true,
        status: "OK".to_string(),
        timestamp: Utc::now(),
        environment: state.config.environment.as_str().to_string(),
        database: DatabaseHealth { status: db_status },
        uptime: state.started_at.elapsed().as_secs(),
    })
}

pub async fn api_index() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Task Manager API v1.0",
        "documentation": {
            "auth": {
                "register": "POST /api/auth/register",
                "login": "POST /api/auth/login",
                "getCurrentUser": "GET /api/auth/me"
            },
            "tasks": {
                "getAll": "GET /api/tasks",
                "getOne": "GET /api/tasks/:id",
                "create": "POST /api/tasks",
                "update": "PUT /api/tasks/:id",
                "delete": "DELETE /api/tasks/:id"
            },
            "notifications": {
                "getAll": "GET /api/notifications",
                "markRead": "PUT /api/notifications/:id/read",
                "markAllRead": "PUT /api/notifications/read-all",
                "delete": "DELETE /api/notifications/:id"
            },
            "health": "GET /api/health",
            "openapi": "GET /swagger-ui"
        },
        "status": "operational"
    }))
}

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Task Manager Backend API",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment.as_str(),
        "timestamp": Utc::now(),
        "endpoints": {
            "api": "/api",
            "health": "/api/health",
            "auth": "/api/auth",
            "tasks": "/api/tasks",
            "notifications": "/api/notifications"
        }
    }))
}

/// Connectivity probe for frontends.
pub async fn ping() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Backend API is working!",
        "timestamp": Utc::now(),
    }))
}

pub async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": format!("Route not found: {}", uri),
            "suggestion": "Check /api for available endpoints",
        })),
    )
}

/// Known path, unsupported verb.
pub async fn method_not_allowed(
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({
            "success": false,
            "message": format!("Method {} not allowed for {}", method, uri),
            "suggestion": "Check /api for available endpoints",
        })),
    )
}
