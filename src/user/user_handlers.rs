use axum::{Extension, Json};

use crate::{auth::auth_dto::UserEnvelope, error::Result, user::user_models::User};

/// Get current user profile
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "User profile retrieved successfully", body = UserEnvelope),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(Extension(user): Extension<User>) -> Result<Json<UserEnvelope>> {
    Ok(Json(UserEnvelope {
        success: true,
        user: user.into(),
    }))
}
