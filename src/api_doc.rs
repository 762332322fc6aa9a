use utoipa::OpenApi;

/// API documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Notification Service API",
        version = "0.1.0",
        description = "REST API for creating, reading and acknowledging notifications"
    ),
    paths(
        crate::routes::health::health_check,
        crate::notification::controller::list_notifications,
        crate::notification::controller::get_notification,
        crate::notification::controller::create_notification,
        crate::notification::controller::mark_notification_read,
        crate::notification::controller::delete_notification
    ),
    components(
        schemas(
            crate::routes::health::HealthResponse,
            crate::notification::model::Notification,
            crate::notification::model::CreateNotificationRequest,
            crate::notification::model::ErrorResponse
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "notifications", description = "Notification management endpoints")
    )
)]
pub struct ApiDoc;
