use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::ParseEnumError,
    validation::{trim, Normalize},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    #[default]
    Task,
    System,
    Reminder,
    Update,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Task => "task",
            NotificationType::System => "system",
            NotificationType::Reminder => "reminder",
            NotificationType::Update => "update",
        }
    }
}

impl FromStr for NotificationType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task" => Ok(NotificationType::Task),
            "system" => Ok(NotificationType::System),
            "reminder" => Ok(NotificationType::Reminder),
            "update" => Ok(NotificationType::Update),
            other => Err(ParseEnumError {
                kind: "notification type",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for NotificationType {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Optional payload linking a notification to a task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub kind: NotificationType,
    #[sqlx(rename = "is_read")]
    pub read: bool,
    #[sqlx(flatten)]
    pub data: NotificationData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Written by producers outside the HTTP surface (schedulers, other services).
#[derive(Debug, Clone, Validate)]
pub struct NewNotification {
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 500, message = "Message must be between 1 and 500 characters"))]
    pub message: String,
    pub kind: NotificationType,
    pub data: NotificationData,
}

impl Normalize for NewNotification {
    fn normalize(&mut self) {
        trim(&mut self.title);
        trim(&mut self.message);
    }
}
