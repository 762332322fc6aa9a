use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// A single notification record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[schema(
        value_type = String,
        format = "uuid",
        example = "123e4567-e89b-12d3-a456-426614174000"
    )]
    pub id: Uuid,

    /// Recipient of the notification
    #[schema(example = "u1")]
    pub user_id: String,

    #[schema(example = "hello")]
    pub message: String,

    /// Free-form channel tag, e.g. "email" or "push"
    #[serde(rename = "type")]
    #[schema(example = "push")]
    pub notification_type: String,

    #[schema(value_type = String, format = "date-time", example = "2024-01-01T12:00:00Z")]
    pub created_at: DateTime<Utc>,

    pub is_read: bool,

    /// Deduplication key of the upstream event, absent for API-created records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_key: Option<String>,
}

/// Request body for creating a notification.
///
/// Missing fields deserialize as empty strings so that validation, not the
/// JSON extractor, decides what a bad request is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    #[serde(default)]
    #[schema(example = "u1")]
    pub user_id: String,

    #[serde(default)]
    #[schema(example = "hello")]
    pub message: String,

    #[serde(default, rename = "type")]
    #[schema(example = "push")]
    pub notification_type: String,
}

/// A "notification-requested" event delivered by the broker.
///
/// Every field is optional on the wire; the pipeline rejects events without
/// a recipient or a message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "type")]
    pub notification_type: Option<String>,
    #[serde(default)]
    pub source_key: Option<String>,
}

/// Optional filters for listing notifications
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct NotificationFilter {
    /// Only notifications addressed to this user
    pub user_id: Option<String>,

    /// Only notifications carrying this type tag
    #[serde(rename = "type")]
    pub notification_type: Option<String>,

    /// `true` keeps only unread notifications, `false` only read ones
    pub unread: Option<bool>,
}

impl NotificationFilter {
    pub fn matches(&self, notification: &Notification) -> bool {
        if let Some(user_id) = &self.user_id {
            if &notification.user_id != user_id {
                return false;
            }
        }
        if let Some(notification_type) = &self.notification_type {
            if &notification.notification_type != notification_type {
                return false;
            }
        }
        if let Some(unread) = self.unread {
            if notification.is_read == unread {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Notification not found")]
    NotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Notification {0} already exists")]
    DuplicateId(Uuid),

    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Broker error: {0}")]
    BrokerError(#[from] redis::RedisError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Notification {
        Notification {
            id: Uuid::parse_str("123e4567-e89b-12d3-a456-426614174000").unwrap(),
            user_id: "u1".to_string(),
            message: "hello".to_string(),
            notification_type: "push".to_string(),
            created_at: Utc::now(),
            is_read: false,
            source_key: None,
        }
    }

    #[test]
    fn test_notification_serializes_camel_case() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains(r#""userId":"u1""#));
        assert!(json.contains(r#""type":"push""#));
        assert!(json.contains(r#""isRead":false"#));
        assert!(json.contains(r#""createdAt":"#));
        assert!(!json.contains("sourceKey"));
    }

    #[test]
    fn test_create_request_missing_fields_default_to_empty() {
        let request: CreateNotificationRequest =
            serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert_eq!(request.user_id, "");
        assert_eq!(request.message, "hi");
        assert_eq!(request.notification_type, "");
    }

    #[test]
    fn test_event_deserialization() {
        let event: NotificationEvent = serde_json::from_str(
            r#"{"userId":"u1","message":"hello","type":"email","sourceKey":"evt-1"}"#,
        )
        .unwrap();
        assert_eq!(event.user_id.as_deref(), Some("u1"));
        assert_eq!(event.notification_type.as_deref(), Some("email"));
        assert_eq!(event.source_key.as_deref(), Some("evt-1"));

        let partial: NotificationEvent = serde_json::from_str(r#"{"message":"x"}"#).unwrap();
        assert!(partial.user_id.is_none());
        assert!(partial.source_key.is_none());
    }

    #[test]
    fn test_filter_matches() {
        let mut notification = sample();
        assert!(NotificationFilter::default().matches(&notification));

        let by_user = NotificationFilter {
            user_id: Some("u2".to_string()),
            ..Default::default()
        };
        assert!(!by_user.matches(&notification));

        let by_type = NotificationFilter {
            notification_type: Some("push".to_string()),
            ..Default::default()
        };
        assert!(by_type.matches(&notification));

        let unread = NotificationFilter {
            unread: Some(true),
            ..Default::default()
        };
        let read = NotificationFilter {
            unread: Some(false),
            ..Default::default()
        };
        assert!(unread.matches(&notification));
        assert!(!read.matches(&notification));

        notification.is_read = true;
        assert!(!unread.matches(&notification));
        assert!(read.matches(&notification));
    }
}
