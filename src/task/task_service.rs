use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::task::task_dto::{CreateTaskRequest, Pagination, TaskFilter, UpdateTaskRequest};
use crate::task::task_models::{NewTask, Task, TaskChanges};
use crate::task::task_repository::TaskRepository;

/// Service layer for task-related business logic.
#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
}

fn not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_tasks(
        &self,
        user_id: Uuid,
        filter: TaskFilter,
    ) -> Result<(Vec<Task>, Pagination)> {
        let (tasks, total) = self.repo.find_all(user_id, &filter).await?;
        Ok((tasks, Pagination::new(filter.page, filter.limit, total)))
    }

    pub async fn get_task(&self, user_id: Uuid, task_id: Uuid) -> Result<Task> {
        self.repo
            .find_by_id(task_id, user_id)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn create_task(&self, user_id: Uuid, payload: CreateTaskRequest) -> Result<Task> {
        let new_task = NewTask {
            title: payload.title,
            description: payload.description,
            status: parse_field("status", payload.status.as_deref())?.unwrap_or_default(),
            priority: parse_field("priority", payload.priority.as_deref())?.unwrap_or_default(),
        };

        let task = self.repo.create(user_id, new_task).await?;
        tracing::debug!(task_id = %task.id, %user_id, "Task created");
        Ok(task)
    }

    pub async fn update_task(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        payload: UpdateTaskRequest,
    ) -> Result<Task> {
        let changes = TaskChanges {
            title: payload.title,
            description: payload.description,
            status: parse_field("status", payload.status.as_deref())?,
            priority: parse_field("priority", payload.priority.as_deref())?,
        };

        self.repo
            .update(task_id, user_id, changes)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn delete_task(&self, user_id: Uuid, task_id: Uuid) -> Result<()> {
        match self.repo.delete(task_id, user_id).await? {
            0 => Err(not_found()),
            _ => {
                tracing::debug!(%task_id, %user_id, "Task deleted");
                Ok(())
            }
        }
    }
}

fn parse_field<T: std::str::FromStr>(field: &str, value: Option<&str>) -> Result<Option<T>> {
    value
        .map(|v| {
            v.parse()
                .map_err(|_| AppError::invalid_field(field, &format!("Invalid {}", field)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::task_models::{TaskPriority, TaskStatus};
    use crate::testing::MemoryStore;

    fn service() -> TaskService {
        TaskService::new(Arc::new(MemoryStore::new()))
    }

    fn create(title: &str) -> CreateTaskRequest {
        CreateTaskRequest {
            title: title.into(),
            description: None,
            status: None,
            priority: None,
        }
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let tasks = service();
        let user = Uuid::new_v4();
        let task = tasks
            .create_task(
                user,
                CreateTaskRequest {
                    priority: Some("high".into()),
                    ..create("Buy milk")
                },
            )
            .await
            .unwrap();

        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.user_id, user);

        let fetched = tasks.get_task(user, task.id).await.unwrap();
        assert_eq!(fetched.title, "Buy milk");
    }

    #[tokio::test]
    async fn test_other_users_task_is_not_found() {
        let tasks = service();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let task = tasks.create_task(owner, create("Private")).await.unwrap();

        assert!(matches!(
            tasks.get_task(intruder, task.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            tasks
                .update_task(
                    intruder,
                    task.id,
                    UpdateTaskRequest {
                        title: Some("Mine now".into()),
                        description: None,
                        status: None,
                        priority: None,
                    },
                )
                .await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            tasks.delete_task(intruder, task.id).await,
            Err(AppError::NotFound(_))
        ));

        assert_eq!(tasks.get_task(owner, task.id).await.unwrap().title, "Private");
    }

    #[tokio::test]
    async fn test_update_changes_only_given_fields() {
        let tasks = service();
        let user = Uuid::new_v4();
        let task = tasks
            .create_task(
                user,
                CreateTaskRequest {
                    description: Some("keep me".into()),
                    ..create("Original")
                },
            )
            .await
            .unwrap();

        let updated = tasks
            .update_task(
                user,
                task.id,
                UpdateTaskRequest {
                    title: None,
                    description: None,
                    status: Some("completed".into()),
                    priority: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Original");
        assert_eq!(updated.description.as_deref(), Some("keep me"));
        assert_eq!(updated.status, TaskStatus::Completed);
        assert!(updated.updated_at >= task.updated_at);
    }

    #[tokio::test]
    async fn test_pagination() {
        let tasks = service();
        let user = Uuid::new_v4();
        for i in 0..25 {
            tasks.create_task(user, create(&format!("Task {}", i))).await.unwrap();
        }

        let (first, pagination) = tasks
            .list_tasks(user, TaskFilter { limit: 10, ..Default::default() })
            .await
            .unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(pagination.pages, 3);
        assert_eq!(pagination.total, 25);

        let (last, _) = tasks
            .list_tasks(user, TaskFilter { page: 3, limit: 10, ..Default::default() })
            .await
            .unwrap();
        assert_eq!(last.len(), 5);
    }
}
