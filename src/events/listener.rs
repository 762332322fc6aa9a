use futures::StreamExt;
use redis::Client;
use std::time::Duration;
use tokio::time;
use tracing::{debug, error, info, warn};

use crate::notification::model::{NotificationError, NotificationEvent};
use crate::notification::pipeline::IngestionPipeline;
use crate::notification::store::Admission;

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Decode one broker payload and hand it to the pipeline
pub fn ingest_payload(
    pipeline: &IngestionPipeline,
    payload: &str,
) -> Result<Admission, NotificationError> {
    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| NotificationError::MalformedEvent(e.to_string()))?;
    // Serde would otherwise fill the struct from a positional array.
    if !value.is_object() {
        return Err(NotificationError::MalformedEvent(
            "payload is not a JSON object".to_string(),
        ));
    }
    let event: NotificationEvent = serde_json::from_value(value)
        .map_err(|e| NotificationError::MalformedEvent(e.to_string()))?;
    pipeline.admit_from_event(event)
}

/// Subscribes to the notification events channel and feeds every message
/// into the ingestion pipeline.
pub struct EventListener {
    client: Client,
    channel: String,
    pipeline: IngestionPipeline,
}

impl EventListener {
    pub fn new(client: Client, channel: String, pipeline: IngestionPipeline) -> Self {
        Self {
            client,
            channel,
            pipeline,
        }
    }

    /// Run until the task is aborted, resubscribing after broker failures
    pub async fn run(self) {
        loop {
            match self.subscribe().await {
                Ok(()) => warn!("Subscription to {} ended", self.channel),
                Err(e) => error!("Subscription to {} failed: {}", self.channel, e),
            }
            time::sleep(RECONNECT_DELAY).await;
        }
    }

    async fn subscribe(&self) -> Result<(), NotificationError> {
        let mut pubsub = self.client.get_async_pubsub().await?;
        pubsub.subscribe(&self.channel).await?;
        info!("Subscribed to Redis channel: {}", self.channel);

        let mut messages = pubsub.on_message();
        while let Some(msg) = messages.next().await {
            let payload: String = match msg.get_payload() {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("Dropping undecodable message on {}: {}", self.channel, e);
                    continue;
                }
            };
            self.handle(&payload);
        }
        Ok(())
    }

    fn handle(&self, payload: &str) {
        match ingest_payload(&self.pipeline, payload) {
            Ok(admission) if !admission.is_created() => {
                debug!("Duplicate delivery of notification {}", admission.notification().id)
            }
            Ok(_) => {}
            Err(NotificationError::MalformedEvent(reason)) => {
                warn!("Rejected malformed event ({}): {}", reason, payload)
            }
            Err(e) => error!("Failed to admit event: {}", e),
        }
    }
}
