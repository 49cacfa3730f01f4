use std::{
    cmp::Ordering,
    sync::atomic::{AtomicU64, Ordering as AtomicOrdering},
};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::{mapref::entry::Entry, DashMap};
use uuid::Uuid;

use crate::{
    db::{DbStatus, HealthCheck},
    error::{AppError, Result},
    notification::{
        notification_models::{NewNotification, Notification},
        notification_repository::NotificationRepository,
    },
    task::{
        task_dto::{SortField, SortOrder, TaskFilter},
        task_models::{NewTask, Task, TaskChanges},
        task_repository::TaskRepository,
    },
    user::{
        user_models::{NewUser, User},
        user_repository::UserRepository,
    },
};

/// Records tagged with insertion order so equal timestamps still sort stably.
struct Stored<T> {
    seq: u64,
    record: T,
}

/// Process-local store with the same ownership and ordering rules as the
/// Postgres repositories.
#[derive(Default)]
pub struct MemoryStore {
    seq: AtomicU64,
    users: DashMap<Uuid, User>,
    emails: DashMap<String, Uuid>,
    tasks: DashMap<Uuid, Stored<Task>>,
    notifications: DashMap<Uuid, Stored<Notification>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, AtomicOrdering::SeqCst)
    }

    /// Drops a user without touching their tasks or notifications.
    pub fn remove_user(&self, user_id: Uuid) {
        if let Some((_, user)) = self.users.remove(&user_id) {
            self.emails.remove(&user.email);
        }
    }
}

fn matches_filter(task: &Task, filter: &TaskFilter) -> bool {
    if filter.status.is_some_and(|s| s != task.status) {
        return false;
    }
    if filter.priority.is_some_and(|p| p != task.priority) {
        return false;
    }
    if let Some(search) = filter.search.as_deref() {
        let needle = search.to_lowercase();
        let in_title = task.title.to_lowercase().contains(&needle);
        let in_description = task
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&needle));
        if !in_title && !in_description {
            return false;
        }
    }
    true
}

fn compare_tasks(a: &Stored<Task>, b: &Stored<Task>, field: SortField) -> Ordering {
    let (x, y) = (&a.record, &b.record);
    let primary = match field {
        SortField::CreatedAt => x.created_at.cmp(&y.created_at),
        SortField::UpdatedAt => x.updated_at.cmp(&y.updated_at),
        SortField::Title => x.title.cmp(&y.title),
        SortField::Status => x.status.as_str().cmp(y.status.as_str()),
        SortField::Priority => x.priority.as_str().cmp(y.priority.as_str()),
    };
    primary.then(a.seq.cmp(&b.seq))
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new_user: NewUser) -> Result<User> {
        let id = Uuid::new_v4();
        match self.emails.entry(new_user.email.clone()) {
            Entry::Occupied(_) => return Err(AppError::DuplicateEmail),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let now = Utc::now();
        let user = User {
            id,
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let id = match self.emails.get(email) {
            Some(id) => *id,
            None => return Ok(None),
        };
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        Ok(self.users.get(&user_id).map(|u| u.clone()))
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn find_all(&self, user_id: Uuid, filter: &TaskFilter) -> Result<(Vec<Task>, u64)> {
        let mut matching: Vec<Stored<Task>> = self
            .tasks
            .iter()
            .filter(|entry| entry.record.user_id == user_id && matches_filter(&entry.record, filter))
            .map(|entry| Stored {
                seq: entry.seq,
                record: entry.record.clone(),
            })
            .collect();

        matching.sort_by(|a, b| {
            let ord = compare_tasks(a, b, filter.sort_by);
            match filter.sort_order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.limit as usize)
            .map(|s| s.record)
            .collect();

        Ok((page, total))
    }

    async fn find_by_id(&self, task_id: Uuid, user_id: Uuid) -> Result<Option<Task>> {
        Ok(self
            .tasks
            .get(&task_id)
            .filter(|t| t.record.user_id == user_id)
            .map(|t| t.record.clone()))
    }

    async fn create(&self, user_id: Uuid, task: NewTask) -> Result<Task> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            user_id,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            created_at: now,
            updated_at: now,
        };
        self.tasks.insert(
            task.id,
            Stored {
                seq: self.next_seq(),
                record: task.clone(),
            },
        );
        Ok(task)
    }

    async fn update(
        &self,
        task_id: Uuid,
        user_id: Uuid,
        changes: TaskChanges,
    ) -> Result<Option<Task>> {
        let mut entry = match self.tasks.get_mut(&task_id) {
            Some(entry) if entry.record.user_id == user_id => entry,
            _ => return Ok(None),
        };

        let task = &mut entry.record;
        if let Some(title) = changes.title {
            task.title = title;
        }
        if let Some(description) = changes.description {
            task.description = Some(description);
        }
        if let Some(status) = changes.status {
            task.status = status;
        }
        if let Some(priority) = changes.priority {
            task.priority = priority;
        }
        task.updated_at = Utc::now();

        Ok(Some(task.clone()))
    }

    async fn delete(&self, task_id: Uuid, user_id: Uuid) -> Result<u64> {
        let removed = self
            .tasks
            .remove_if(&task_id, |_, t| t.record.user_id == user_id);
        Ok(removed.map_or(0, |_| 1))
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn find_all_by_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let mut owned: Vec<(u64, Notification)> = self
            .notifications
            .iter()
            .filter(|n| n.record.user_id == user_id)
            .map(|n| (n.seq, n.record.clone()))
            .collect();

        owned.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then(seq_b.cmp(seq_a))
        });

        Ok(owned.into_iter().map(|(_, n)| n).collect())
    }

    async fn mark_as_read(&self, id: Uuid, user_id: Uuid) -> Result<Option<Notification>> {
        let mut entry = match self.notifications.get_mut(&id) {
            Some(entry) if entry.record.user_id == user_id => entry,
            _ => return Ok(None),
        };

        entry.record.read = true;
        entry.record.updated_at = Utc::now();
        Ok(Some(entry.record.clone()))
    }

    async fn mark_all_as_read(&self, user_id: Uuid) -> Result<u64> {
        let now = Utc::now();
        let mut modified = 0;
        for mut entry in self.notifications.iter_mut() {
            let n = &mut entry.record;
            if n.user_id == user_id && !n.read {
                n.read = true;
                n.updated_at = now;
                modified += 1;
            }
        }
        Ok(modified)
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<u64> {
        let removed = self
            .notifications
            .remove_if(&id, |_, n| n.record.user_id == user_id);
        Ok(removed.map_or(0, |_| 1))
    }

    async fn create(&self, notification: NewNotification) -> Result<Notification> {
        let now = Utc::now();
        let created = Notification {
            id: Uuid::new_v4(),
            user_id: notification.user_id,
            title: notification.title,
            message: notification.message,
            kind: notification.kind,
            read: false,
            data: notification.data,
            created_at: now,
            updated_at: now,
        };
        self.notifications.insert(
            created.id,
            Stored {
                seq: self.next_seq(),
                record: created.clone(),
            },
        );
        Ok(created)
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn status(&self) -> DbStatus {
        DbStatus::Connected
    }
}
