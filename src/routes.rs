use crate::{
    auth::{
        auth_dto::{AuthResponse, LoginRequest, RegisterRequest, UserEnvelope},
        auth_handlers,
    },
    db::DbStatus,
    dto::MessageResponse,
    health,
    middleware::{auth_middleware, security},
    notification::{
        notification_handlers::{
            self, MarkAllReadResponse, NotificationEnvelope, NotificationListResponse,
        },
        Notification, NotificationData, NotificationType,
    },
    state::AppState,
    task::{
        task_dto::{CreateTaskRequest, Pagination, TaskEnvelope, TaskListResponse, UpdateTaskRequest},
        task_handlers, Task, TaskPriority, TaskStatus,
    },
    user::{user_handlers, UserResponse},
    validation::FieldError,
};
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth_handlers::register,
        auth_handlers::login,
        user_handlers::get_me,
        task_handlers::get_tasks,
        task_handlers::get_task,
        task_handlers::create_task,
        task_handlers::update_task,
        task_handlers::delete_task,
        notification_handlers::get_notifications,
        notification_handlers::mark_notification_read,
        notification_handlers::mark_all_notifications_read,
        notification_handlers::delete_notification,
        health::health_check,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            UserEnvelope,
            UserResponse,
            CreateTaskRequest,
            UpdateTaskRequest,
            Task,
            TaskStatus,
            TaskPriority,
            TaskEnvelope,
            TaskListResponse,
            Pagination,
            Notification,
            NotificationType,
            NotificationData,
            NotificationEnvelope,
            NotificationListResponse,
            MarkAllReadResponse,
            MessageResponse,
            FieldError,
            DbStatus,
            health::HealthResponse,
            health::DatabaseHealth,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "tasks", description = "Task management endpoints"),
        (name = "notifications", description = "Notification endpoints"),
        (name = "system", description = "Health and diagnostics")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = security::cors_layer(&state.config);

    let auth_routes = Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
        .merge(
            Router::new()
                .route("/me", get(user_handlers::get_me))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    let task_routes = Router::new()
        .route(
            "/",
            get(task_handlers::get_tasks).post(task_handlers::create_task),
        )
        .route(
            "/:id",
            get(task_handlers::get_task)
                .put(task_handlers::update_task)
                .delete(task_handlers::delete_task),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let notification_routes = Router::new()
        .route("/", get(notification_handlers::get_notifications))
        .route(
            "/read-all",
            put(notification_handlers::mark_all_notifications_read),
        )
        .route(
            "/:id/read",
            put(notification_handlers::mark_notification_read),
        )
        .route(
            "/:id",
            axum::routing::delete(notification_handlers::delete_notification),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = Router::new()
        .route("/", get(health::api_index))
        .route("/health", get(health::health_check))
        .route("/test/test", get(health::ping))
        .nest("/auth", auth_routes)
        .nest("/tasks", task_routes)
        .nest("/notifications", notification_routes);

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(health::root))
        .nest("/api", api_routes)
        .method_not_allowed_fallback(health::method_not_allowed)
        .fallback(health::not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    security::with_security_headers(router).with_state(state)
}
