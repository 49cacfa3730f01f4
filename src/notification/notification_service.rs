use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use super::{
    notification_models::{NewNotification, Notification},
    notification_repository::NotificationRepository,
};
use crate::{
    error::{AppError, Result},
    validation::Normalize,
};

#[derive(Clone)]
pub struct NotificationService {
    repo: Arc<dyn NotificationRepository>,
}

fn not_found() -> AppError {
    AppError::NotFound("Notification not found".into())
}

impl NotificationService {
    pub fn new(repo: Arc<dyn NotificationRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        self.repo.find_all_by_user(user_id).await
    }

    pub async fn mark_read(&self, user_id: Uuid, id: Uuid) -> Result<Notification> {
        self.repo
            .mark_as_read(id, user_id)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        let modified = self.repo.mark_all_as_read(user_id).await?;
        tracing::debug!(%user_id, modified, "Marked notifications as read");
        Ok(modified)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        match self.repo.delete(id, user_id).await? {
            0 => Err(not_found()),
            _ => Ok(()),
        }
    }

    /// Entry point for producers; there is no HTTP route for it.
    /// Trims and checks the payload before it is stored.
    pub async fn notify(&self, mut notification: NewNotification) -> Result<Notification> {
        notification.normalize();
        notification.validate()?;

        let created = self.repo.create(notification).await?;
        tracing::info!(
            notification_id = %created.id,
            user_id = %created.user_id,
            kind = created.kind.as_str(),
            "Notification created"
        );
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::notification_models::{NotificationData, NotificationType};
    use crate::testing::MemoryStore;

    fn new_notification(user_id: Uuid, title: &str) -> NewNotification {
        NewNotification {
            user_id,
            title: title.into(),
            message: format!("{} happened", title),
            kind: NotificationType::System,
            data: NotificationData::default(),
        }
    }

    #[tokio::test]
    async fn test_mark_all_read_is_idempotent() {
        let service = NotificationService::new(Arc::new(MemoryStore::new()));
        let user = Uuid::new_v4();
        service.notify(new_notification(user, "One")).await.unwrap();
        service.notify(new_notification(user, "Two")).await.unwrap();

        assert_eq!(service.mark_all_read(user).await.unwrap(), 2);
        assert!(service.list(user).await.unwrap().iter().all(|n| n.read));

        assert_eq!(service.mark_all_read(user).await.unwrap(), 0);
        assert!(service.list(user).await.unwrap().iter().all(|n| n.read));
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_scoped() {
        let service = NotificationService::new(Arc::new(MemoryStore::new()));
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        service.notify(new_notification(user, "Older")).await.unwrap();
        service.notify(new_notification(other, "Not yours")).await.unwrap();
        service.notify(new_notification(user, "Newer")).await.unwrap();

        let titles: Vec<String> = service
            .list(user)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["Newer", "Older"]);
    }

    #[tokio::test]
    async fn test_notify_rejects_oversized_fields() {
        let service = NotificationService::new(Arc::new(MemoryStore::new()));
        let user = Uuid::new_v4();

        let err = service
            .notify(NewNotification {
                title: "t".repeat(101),
                message: "m".repeat(501),
                ..new_notification(user, "ignored")
            })
            .await
            .unwrap_err();

        match err {
            AppError::Validation(errors) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["message", "title"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(service.list(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notify_trims_and_requires_text() {
        let service = NotificationService::new(Arc::new(MemoryStore::new()));
        let user = Uuid::new_v4();

        let created = service
            .notify(NewNotification {
                title: "  Standup  ".into(),
                ..new_notification(user, "ignored")
            })
            .await
            .unwrap();
        assert_eq!(created.title, "Standup");

        let err = service
            .notify(NewNotification {
                message: "   ".into(),
                ..new_notification(user, "Blank")
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_foreign_notification_is_not_found() {
        let service = NotificationService::new(Arc::new(MemoryStore::new()));
        let owner = Uuid::new_v4();
        let created = service.notify(new_notification(owner, "Mine")).await.unwrap();

        let intruder = Uuid::new_v4();
        assert!(matches!(
            service.mark_read(intruder, created.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(intruder, created.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(!service.list(owner).await.unwrap()[0].read);
    }
}
