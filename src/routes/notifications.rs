use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::notification::controller;
use crate::notification::service::NotificationService;

/// Create a router for the notification CRUD endpoints
pub fn routes(service: Arc<NotificationService>) -> Router {
    Router::new()
        .route(
            "/notifications",
            get(controller::list_notifications).post(controller::create_notification),
        )
        .route(
            "/notifications/:id",
            get(controller::get_notification).delete(controller::delete_notification),
        )
        // Trailing-slash form of the lookup used by some clients
        .route("/notifications/:id/", get(controller::get_notification))
        .route(
            "/notifications/:id/read",
            put(controller::mark_notification_read),
        )
        .with_state(service)
}
