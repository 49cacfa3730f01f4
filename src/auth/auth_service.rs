use std::sync::Arc;

use uuid::Uuid;

use crate::auth::{create_token, hash_password, verify_password, verify_token};
use crate::error::{AppError, Result};
use crate::user::user_models::{NewUser, User};
use crate::user::user_repository::UserRepository;

#[derive(Clone)]
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    jwt_secret: String,
    jwt_expiration_hours: i64,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        jwt_secret: String,
        jwt_expiration_hours: i64,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            user_repo,
            jwt_secret,
            jwt_expiration_hours,
            bcrypt_cost,
        }
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(User, String)> {
        if self.user_repo.find_by_email(email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        let password = password.to_string();
        let cost = self.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("hashing task failed: {}", e)))??;

        let user = self
            .user_repo
            .create(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        let token = self.issue_token(user.id)?;
        tracing::info!(user_id = %user.id, "User registered");

        Ok((user, token))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password = password.to_string();
        let hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("hashing task failed: {}", e)))?;

        if !matches {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.issue_token(user.id)?;
        Ok((user, token))
    }

    /// Resolves a bearer token to a live user.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let claims = verify_token(token, &self.jwt_secret)?;
        let user_id = claims.user_id()?;

        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Not authorized, user not found".to_string()))
    }

    pub fn issue_token(&self, user_id: Uuid) -> Result<String> {
        create_token(user_id, &self.jwt_secret, self.jwt_expiration_hours)
    }
}
