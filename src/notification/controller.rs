use crate::notification::model::{
    CreateNotificationRequest, ErrorResponse, NotificationError, NotificationFilter,
};
use crate::notification::service::NotificationService;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

// Helper function to convert NotificationError to HTTP response
fn error_response(err: NotificationError) -> Response {
    let (status, message, code) = match err {
        NotificationError::NotFound => (
            StatusCode::NOT_FOUND,
            "Notification not found".to_string(),
            "NOT_FOUND",
        ),
        NotificationError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg, "INVALID_INPUT"),
        other => {
            error!("Notification operation failed: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                "INTERNAL_ERROR",
            )
        }
    };

    (
        status,
        Json(ErrorResponse {
            error: message,
            code: code.to_string(),
        }),
    )
        .into_response()
}

/// List notifications
///
/// Returns all notifications in creation order, optionally narrowed by recipient,
/// type or read state.
#[utoipa::path(
    get,
    path = "/notifications",
    params(NotificationFilter),
    responses(
        (status = 200, description = "Notifications retrieved successfully", body = [Notification])
    ),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(service): State<Arc<NotificationService>>,
    Query(filter): Query<NotificationFilter>,
) -> Response {
    let notifications = service.list_filtered(&filter);
    info!("Listing {} notifications", notifications.len());
    (StatusCode::OK, Json(notifications)).into_response()
}

/// Get notification by ID
#[utoipa::path(
    get,
    path = "/notifications/{id}",
    params(
        ("id" = String, Path, description = "Notification UUID")
    ),
    responses(
        (status = 200, description = "Notification retrieved successfully", body = Notification),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    tag = "notifications"
)]
pub async fn get_notification(
    State(service): State<Arc<NotificationService>>,
    Path(id): Path<Uuid>,
) -> Response {
    match service.fetch(&id) {
        Ok(notification) => (StatusCode::OK, Json(notification)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Create a notification
///
/// Creates an unread notification; the generated `id` and `createdAt` are echoed back.
#[utoipa::path(
    post,
    path = "/notifications",
    request_body = CreateNotificationRequest,
    responses(
        (status = 201, description = "Notification created successfully", body = Notification),
        (status = 400, description = "userId or message is empty", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notifications"
)]
pub async fn create_notification(
    State(service): State<Arc<NotificationService>>,
    Json(request): Json<CreateNotificationRequest>,
) -> Response {
    info!("Creating notification for user {:?}", request.user_id);

    match service.create(request) {
        Ok(notification) => (StatusCode::CREATED, Json(notification)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Mark notification as read
#[utoipa::path(
    put,
    path = "/notifications/{id}/read",
    params(
        ("id" = String, Path, description = "Notification UUID")
    ),
    responses(
        (status = 204, description = "Notification marked as read"),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    tag = "notifications"
)]
pub async fn mark_notification_read(
    State(service): State<Arc<NotificationService>>,
    Path(id): Path<Uuid>,
) -> Response {
    match service.mark_read(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// Delete notification
#[utoipa::path(
    delete,
    path = "/notifications/{id}",
    params(
        ("id" = String, Path, description = "Notification UUID")
    ),
    responses(
        (status = 204, description = "Notification deleted"),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    tag = "notifications"
)]
pub async fn delete_notification(
    State(service): State<Arc<NotificationService>>,
    Path(id): Path<Uuid>,
) -> Response {
    match service.remove(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}
