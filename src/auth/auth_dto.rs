use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    user::user_models::UserResponse,
    validation::{trim, Normalize, TextFields},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 2, max = 50, message = "Name must be between 2 and 50 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

impl TextFields for RegisterRequest {
    const TEXT_FIELDS: &'static [&'static str] = &["name", "email", "password"];
}

impl Normalize for RegisterRequest {
    fn normalize(&mut self) {
        trim(&mut self.name);
        normalize_email(&mut self.email);
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl TextFields for LoginRequest {
    const TEXT_FIELDS: &'static [&'static str] = &["email", "password"];
}

impl Normalize for LoginRequest {
    fn normalize(&mut self) {
        normalize_email(&mut self.email);
    }
}

fn normalize_email(email: &mut String) {
    *email = email.trim().to_lowercase();
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserEnvelope {
    pub success: bool,
    pub user: UserResponse,
}
