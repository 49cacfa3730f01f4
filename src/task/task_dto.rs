use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::task_models::{Task, TaskPriority, TaskStatus};
use crate::validation::{blank_to_none, one_of, trim, trim_opt, Normalize, TextFields};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

fn validate_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, &TaskStatus::ALL, "status", "Invalid status")
}

fn validate_priority(value: &str) -> Result<(), ValidationError> {
    one_of(value, &TaskPriority::ALL, "priority", "Invalid priority")
}

fn validate_sort_by(value: &str) -> Result<(), ValidationError> {
    one_of(value, &SortField::ALL, "sort_by", "Invalid sort field")
}

fn validate_sort_order(value: &str) -> Result<(), ValidationError> {
    one_of(value, &["asc", "desc"], "sort_order", "Sort order must be asc or desc")
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTaskRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: String,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
    #[validate(custom(function = "validate_priority"))]
    pub priority: Option<String>,
}

const TASK_TEXT_FIELDS: &[&str] = &["title", "description", "status", "priority"];

impl TextFields for CreateTaskRequest {
    const TEXT_FIELDS: &'static [&'static str] = TASK_TEXT_FIELDS;
}

impl Normalize for CreateTaskRequest {
    fn normalize(&mut self) {
        trim(&mut self.title);
        trim_opt(&mut self.description);
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
    #[validate(custom(function = "validate_priority"))]
    pub priority: Option<String>,
}

impl TextFields for UpdateTaskRequest {
    const TEXT_FIELDS: &'static [&'static str] = TASK_TEXT_FIELDS;
}

impl Normalize for UpdateTaskRequest {
    fn normalize(&mut self) {
        trim_opt(&mut self.title);
        trim_opt(&mut self.description);
    }
}

/// Query string of `GET /api/tasks`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<u32>,
    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
    #[validate(custom(function = "validate_priority"))]
    pub priority: Option<String>,
    pub search: Option<String>,
    #[validate(custom(function = "validate_sort_by"))]
    pub sort_by: Option<String>,
    #[validate(custom(function = "validate_sort_order"))]
    pub sort_order: Option<String>,
}

impl Normalize for TaskQuery {
    fn normalize(&mut self) {
        blank_to_none(&mut self.status);
        blank_to_none(&mut self.priority);
        blank_to_none(&mut self.search);
        blank_to_none(&mut self.sort_by);
        blank_to_none(&mut self.sort_order);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
    Status,
    Priority,
}

impl SortField {
    pub const ALL: [&'static str; 7] = [
        "createdAt",
        "created_at",
        "updatedAt",
        "updated_at",
        "title",
        "status",
        "priority",
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "createdAt" | "created_at" => Some(SortField::CreatedAt),
            "updatedAt" | "updated_at" => Some(SortField::UpdatedAt),
            "title" => Some(SortField::Title),
            "status" => Some(SortField::Status),
            "priority" => Some(SortField::Priority),
            _ => None,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Title => "title",
            SortField::Status => "status",
            SortField::Priority => "priority",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Validated listing criteria handed to the repository.
#[derive(Debug, Clone)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub search: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub page: u32,
    pub limit: u32,
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self {
            status: None,
            priority: None,
            search: None,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl TaskFilter {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

impl From<TaskQuery> for TaskFilter {
    /// Expects a query that already passed validation; unknown values fall back to defaults.
    fn from(query: TaskQuery) -> Self {
        Self {
            status: query.status.and_then(|s| s.parse().ok()),
            priority: query.priority.and_then(|p| p.parse().ok()),
            search: query.search,
            sort_by: query
                .sort_by
                .as_deref()
                .and_then(SortField::parse)
                .unwrap_or_default(),
            sort_order: match query.sort_order.as_deref() {
                Some("asc") => SortOrder::Asc,
                _ => SortOrder::Desc,
            },
            page: query.page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    pub current: u32,
    pub pages: u32,
    pub total: u64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let limit = u64::from(limit.max(1));
        Self {
            current: page,
            pages: total.div_ceil(limit) as u32,
            total,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskListResponse {
    pub success: bool,
    pub count: usize,
    pub tasks: Vec<Task>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskEnvelope {
    pub success: bool,
    pub task: Task,
}
