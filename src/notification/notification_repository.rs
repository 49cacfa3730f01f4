use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::notification_models::{NewNotification, Notification};
use crate::error::Result;

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Newest first.
    async fn find_all_by_user(&self, user_id: Uuid) -> Result<Vec<Notification>>;

    async fn mark_as_read(&self, id: Uuid, user_id: Uuid) -> Result<Option<Notification>>;

    /// Returns how many unread notifications were flipped.
    async fn mark_all_as_read(&self, user_id: Uuid) -> Result<u64>;

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<u64>;

    async fn create(&self, notification: NewNotification) -> Result<Notification>;
}

#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn find_all_by_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    async fn mark_as_read(&self, id: Uuid, user_id: Uuid) -> Result<Option<Notification>> {
        let notification = sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET is_read = true, updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notification)
    }

    async fn mark_all_as_read(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true, updated_at = NOW()
             WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn create(&self, notification: NewNotification) -> Result<Notification> {
        let notification = sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (user_id, title, message, kind, task_id, due_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(notification.user_id)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.kind.as_str())
        .bind(&notification.data.task_id)
        .bind(notification.data.due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }
}
