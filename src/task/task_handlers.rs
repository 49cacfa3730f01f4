use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use super::task_dto::{
    CreateTaskRequest, TaskEnvelope, TaskListResponse, TaskQuery, UpdateTaskRequest,
};
use crate::{
    dto::MessageResponse,
    error::{AppError, Result},
    middleware::AuthUser,
    state::AppState,
    validation::{ValidatedJson, ValidatedQuery},
};

/// A malformed id cannot name an owned task, so it is reported as missing.
fn parse_task_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Task not found".into()))
}

/// Get all tasks for the authenticated user
#[utoipa::path(
    get,
    path = "/api/tasks",
    params(
        ("status" = Option<String>, Query, description = "Filter by status (pending, in-progress, completed)"),
        ("priority" = Option<String>, Query, description = "Filter by priority (low, medium, high)"),
        ("search" = Option<String>, Query, description = "Case-insensitive search over title and description"),
        ("sortBy" = Option<String>, Query, description = "Sort field (createdAt, updatedAt, title, status, priority)"),
        ("sortOrder" = Option<String>, Query, description = "Sort order (asc, desc)"),
        ("page" = Option<u32>, Query, description = "Page number, starting at 1"),
        ("limit" = Option<u32>, Query, description = "Items per page (1-100)")
    ),
    responses(
        (status = 200, description = "List of tasks", body = TaskListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Invalid query")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn get_tasks(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidatedQuery(query): ValidatedQuery<TaskQuery>,
) -> Result<Json<TaskListResponse>> {
    let (tasks, pagination) = state.task_service.list_tasks(user_id, query.into()).await?;

    Ok(Json(TaskListResponse {
        success: true,
        count: tasks.len(),
        tasks,
        pagination,
    }))
}

/// Get a single task
#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task found", body = TaskEnvelope),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn get_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<TaskEnvelope>> {
    let task = state
        .task_service
        .get_task(user_id, parse_task_id(&id)?)
        .await?;

    Ok(Json(TaskEnvelope { success: true, task }))
}

/// Create a task
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskEnvelope),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Validation error")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateTaskRequest>,
) -> Result<impl IntoResponse> {
    let task = state.task_service.create_task(user_id, payload).await?;

    Ok((StatusCode::CREATED, Json(TaskEnvelope { success: true, task })))
}

/// Update a task
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task id")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskEnvelope),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateTaskRequest>,
) -> Result<Json<TaskEnvelope>> {
    let task = state
        .task_service
        .update_task(user_id, parse_task_id(&id)?, payload)
        .await?;

    Ok(Json(TaskEnvelope { success: true, task }))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state
        .task_service
        .delete_task(user_id, parse_task_id(&id)?)
        .await?;

    Ok(Json(MessageResponse::new("Task deleted successfully")))
}
