use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::notification_models::Notification;
use crate::{
    dto::MessageResponse,
    error::{AppError, Result},
    middleware::AuthUser,
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationListResponse {
    pub success: bool,
    pub count: usize,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationEnvelope {
    pub success: bool,
    pub notification: Notification,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MarkAllReadResponse {
    pub success: bool,
    pub message: String,
    pub modified: u64,
}

fn parse_notification_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Notification not found".into()))
}

/// Get notifications for the authenticated user, newest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "List of notifications", body = NotificationListResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn get_notifications(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<NotificationListResponse>> {
    let notifications = state.notification_service.list(user_id).await?;

    Ok(Json(NotificationListResponse {
        success: true,
        count: notifications.len(),
        notifications,
    }))
}

/// Mark one notification as read
#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    params(("id" = String, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Notification marked as read", body = NotificationEnvelope),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Notification not found")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<NotificationEnvelope>> {
    let notification = state
        .notification_service
        .mark_read(user_id, parse_notification_id(&id)?)
        .await?;

    Ok(Json(NotificationEnvelope {
        success: true,
        notification,
    }))
}

/// Mark every notification as read
#[utoipa::path(
    put,
    path = "/api/notifications/read-all",
    responses(
        (status = 200, description = "All notifications marked as read", body = MarkAllReadResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MarkAllReadResponse>> {
    let modified = state.notification_service.mark_all_read(user_id).await?;

    Ok(Json(MarkAllReadResponse {
        success: true,
        message: "All notifications marked as read".to_string(),
        modified,
    }))
}

/// Delete a notification
#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(("id" = String, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Notification deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Notification not found")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state
        .notification_service
        .delete(user_id, parse_notification_id(&id)?)
        .await?;

    Ok(Json(MessageResponse::new("Notification deleted")))
}
