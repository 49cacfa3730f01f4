use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{
    task_dto::TaskFilter,
    task_models::{NewTask, Task, TaskChanges},
};
use crate::error::Result;

/// Task storage. Every method is scoped to `user_id`; a task owned by
/// someone else behaves exactly like a missing one.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// One page of matching tasks plus the total match count.
    async fn find_all(&self, user_id: Uuid, filter: &TaskFilter) -> Result<(Vec<Task>, u64)>;

    async fn find_by_id(&self, task_id: Uuid, user_id: Uuid) -> Result<Option<Task>>;

    async fn create(&self, user_id: Uuid, task: NewTask) -> Result<Task>;

    async fn update(&self, task_id: Uuid, user_id: Uuid, changes: TaskChanges)
        -> Result<Option<Task>>;

    /// Returns the number of rows removed (0 or 1).
    async fn delete(&self, task_id: Uuid, user_id: Uuid) -> Result<u64>;
}

#[derive(Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escapes LIKE metacharacters so the search term matches literally.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, user_id: Uuid, filter: &TaskFilter) {
    qb.push(" WHERE user_id = ").push_bind(user_id);

    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(priority) = filter.priority {
        qb.push(" AND priority = ").push_bind(priority.as_str());
    }
    if let Some(search) = filter.search.as_deref() {
        let pattern = like_pattern(search);
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR COALESCE(description, '') ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

/// One page of tasks, ordered by the requested column with `id` as tie-breaker.
fn list_query(user_id: Uuid, filter: &TaskFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM tasks");
    push_filters(&mut query, user_id, filter);
    query
        .push(" ORDER BY ")
        .push(filter.sort_by.column())
        .push(" ")
        .push(filter.sort_order.sql())
        .push(", id ")
        .push(filter.sort_order.sql())
        .push(" LIMIT ")
        .push_bind(i64::from(filter.limit))
        .push(" OFFSET ")
        .push_bind(filter.offset() as i64);
    query
}

/// Only the fields present in `changes` are written.
fn update_query(
    task_id: Uuid,
    user_id: Uuid,
    changes: TaskChanges,
) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::<Postgres>::new("UPDATE tasks SET updated_at = NOW()");

    if let Some(title) = changes.title {
        query.push(", title = ").push_bind(title);
    }
    if let Some(description) = changes.description {
        query.push(", description = ").push_bind(description);
    }
    if let Some(status) = changes.status {
        query.push(", status = ").push_bind(status.as_str());
    }
    if let Some(priority) = changes.priority {
        query.push(", priority = ").push_bind(priority.as_str());
    }

    query
        .push(" WHERE id = ")
        .push_bind(task_id)
        .push(" AND user_id = ")
        .push_bind(user_id)
        .push(" RETURNING *");
    query
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn find_all(&self, user_id: Uuid, filter: &TaskFilter) -> Result<(Vec<Task>, u64)> {
        let tasks = list_query(user_id, filter)
            .build_query_as::<Task>()
            .fetch_all(&self.pool)
            .await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM tasks");
        push_filters(&mut count, user_id, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        Ok((tasks, total.max(0) as u64))
    }

    async fn find_by_id(&self, task_id: Uuid, user_id: Uuid) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(task)
    }

    async fn create(&self, user_id: Uuid, task: NewTask) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (user_id, title, description, status, priority)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    async fn update(
        &self,
        task_id: Uuid,
        user_id: Uuid,
        changes: TaskChanges,
    ) -> Result<Option<Task>> {
        let mut query = update_query(task_id, user_id, changes);

        let task = query
            .build_query_as::<Task>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(task)
    }

    async fn delete(&self, task_id: Uuid, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
