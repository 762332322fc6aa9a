use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::notification::service::NotificationService;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    message: String,
    notifications: usize,
}

/// Public health check endpoint
///
/// Returns status "ok" and the number of stored notifications if the service is running
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is healthy", body = HealthResponse),
    ),
    tag = "health"
)]
pub async fn health_check(State(service): State<Arc<NotificationService>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            message: "Server is running".to_string(),
            notifications: service.count(),
        }),
    )
}

pub fn routes(service: Arc<NotificationService>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(service)
}
