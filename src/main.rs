mod api_doc;
mod config;
mod events;
mod notification;
mod routes;

use dotenv::dotenv;
use redis::Client;
use std::{net::SocketAddr, sync::Arc};
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::events::listener::EventListener;
use crate::notification::pipeline::IngestionPipeline;
use crate::notification::service::NotificationService;
use crate::notification::store::NotificationStore;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    tracing_subscriber::fmt::init();

    // Load .env file if it exists
    dotenv().ok();

    let app_config = AppConfig::from_env()?;
    let host: std::net::IpAddr = app_config.host.parse()?;

    let notification_service = Arc::new(NotificationService::new(IngestionPipeline::new(
        NotificationStore::new(),
    )));

    // Start the broker listener if configured
    let listener_task = if let Some(url) = &app_config.redis_url {
        info!(
            "Listening for notification events on {} via {}",
            app_config.events_channel, url
        );
        match Client::open(url.clone()) {
            Ok(client) => {
                let listener = EventListener::new(
                    client,
                    app_config.events_channel.clone(),
                    notification_service.pipeline().clone(),
                );
                Some(tokio::spawn(listener.run()))
            }
            Err(e) => {
                error!("Invalid Redis URL, event ingestion disabled: {}", e);
                None
            }
        }
    } else {
        info!("No Redis URL configured, proceeding without event ingestion");
        None
    };

    let app = routes::app(notification_service);

    // Try successive ports
    let mut port = app_config.port;
    let max_tries = app_config.port_retries.max(1);
    for attempt in 1..=max_tries {
        let addr = SocketAddr::new(host, port);
        match axum::Server::try_bind(&addr) {
            Ok(server) => {
                info!("Server started at http://{}", addr);
                info!("API Documentation: http://{}/docs", addr);
                let result = server
                    .serve(app.into_make_service())
                    .with_graceful_shutdown(shutdown_signal())
                    .await;
                if let Some(task) = listener_task {
                    task.abort();
                }
                return result.map_err(|e| e.into());
            }
            Err(e) => {
                warn!("Failed to bind {}: {}", addr, e);
                if attempt == max_tries {
                    break;
                }
                port = port.saturating_add(1);
            }
        }
    }

    Err("Failed to bind to any port".into())
}
