pub mod health;
pub mod notifications;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::notification::service::NotificationService;

/// Build the full application router
pub fn app(service: Arc<NotificationService>) -> Router {
    Router::new()
        // API documentation
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(health::routes(service.clone()))
        .merge(notifications::routes(service))
        .route(
            "/",
            get(|| async { "Welcome to the Notification Service API" }),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
