pub mod notification_handlers;
pub mod notification_models;
pub mod notification_repository;
pub mod notification_service;

pub use notification_models::{NewNotification, Notification, NotificationData, NotificationType};
pub use notification_repository::{NotificationRepository, PgNotificationRepository};
pub use notification_service::NotificationService;
