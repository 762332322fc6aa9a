use crate::notification::model::{Notification, NotificationError, NotificationEvent};
use crate::notification::store::{Admission, NotificationStore};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Source of creation timestamps
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Source of fresh notification identifiers
#[cfg_attr(test, mockall::automock)]
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> Uuid;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Single admission point for notifications, whether they come from the API
/// or from the broker.
#[derive(Clone)]
pub struct IngestionPipeline {
    store: NotificationStore,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl IngestionPipeline {
    pub fn new(store: NotificationStore) -> Self {
        Self::with_sources(store, Arc::new(SystemClock), Arc::new(RandomIdGenerator))
    }

    pub fn with_sources(
        store: NotificationStore,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self { store, clock, ids }
    }

    pub fn store(&self) -> &NotificationStore {
        &self.store
    }

    fn build(
        &self,
        user_id: String,
        message: String,
        notification_type: String,
        source_key: Option<String>,
    ) -> Notification {
        Notification {
            id: self.ids.next_id(),
            user_id,
            message,
            notification_type,
            created_at: self.clock.now(),
            is_read: false,
            source_key,
        }
    }

    /// Construct and store a notification requested through the API
    pub fn admit_from_api(
        &self,
        user_id: String,
        message: String,
        notification_type: String,
    ) -> Result<Notification, NotificationError> {
        let notification = self.build(user_id, message, notification_type, None);
        self.store.put(notification.clone())?;

        info!(
            "Admitted notification {} for user {} from API",
            notification.id, notification.user_id
        );
        Ok(notification)
    }

    /// Admit a broker event. Replaying an event with a known source key
    /// returns the record stored the first time.
    pub fn admit_from_event(
        &self,
        event: NotificationEvent,
    ) -> Result<Admission, NotificationError> {
        let user_id = required(event.user_id, "userId")?;
        let message = required(event.message, "message")?;
        let notification_type = event.notification_type.unwrap_or_default();
        let source_key = event.source_key.filter(|key| !key.trim().is_empty());

        match &source_key {
            Some(key) => {
                if let Some(existing) = self.store.find_by_source_key(key) {
                    info!("Event {} replayed, keeping notification {}", key, existing.id);
                    return Ok(Admission::Existing(existing));
                }
            }
            None => warn!(
                "Event for user {} carries no source key, admitting without deduplication",
                user_id
            ),
        }

        // The store re-checks the key under its lock for concurrent deliveries.
        let admission = self.store.admit_keyed(self.build(
            user_id,
            message,
            notification_type,
            source_key,
        ))?;

        match &admission {
            Admission::Created(n) => info!(
                "Admitted notification {} for user {} from event {:?}",
                n.id, n.user_id, n.source_key
            ),
            Admission::Existing(n) => info!(
                "Event {:?} replayed, keeping notification {}",
                n.source_key, n.id
            ),
        }
        Ok(admission)
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, NotificationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(NotificationError::MalformedEvent(format!(
            "missing required field `{}`",
            field
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn fixed_pipeline(id: Uuid) -> IngestionPipeline {
        let mut clock = MockClock::new();
        clock.expect_now().returning(fixed_time);
        let mut ids = MockIdGenerator::new();
        ids.expect_next_id().returning(move || id);
        IngestionPipeline::with_sources(NotificationStore::new(), Arc::new(clock), Arc::new(ids))
    }

    fn event(source_key: Option<&str>) -> NotificationEvent {
        NotificationEvent {
            user_id: Some("u1".to_string()),
            message: Some("hello".to_string()),
            notification_type: Some("push".to_string()),
            source_key: source_key.map(str::to_string),
        }
    }

    #[test]
    fn test_admit_from_api_uses_injected_sources() {
        let id = Uuid::parse_str("123e4567-e89b-12d3-a456-426614174000").unwrap();
        let pipeline = fixed_pipeline(id);

        let n = pipeline
            .admit_from_api("u1".to_string(), "hello".to_string(), "push".to_string())
            .unwrap();

        assert_eq!(n.id, id);
        assert_eq!(n.created_at, fixed_time());
        assert!(!n.is_read);
        assert!(n.source_key.is_none());
        assert_eq!(pipeline.store().get(&id).unwrap(), n);
    }

    #[test]
    fn test_repeated_id_surfaces_duplicate_id() {
        let id = Uuid::new_v4();
        let pipeline = fixed_pipeline(id);

        pipeline
            .admit_from_api("u1".to_string(), "first".to_string(), "push".to_string())
            .unwrap();
        let second =
            pipeline.admit_from_api("u1".to_string(), "second".to_string(), "push".to_string());

        assert!(matches!(second, Err(NotificationError::DuplicateId(dup)) if dup == id));
        assert_eq!(pipeline.store().get(&id).unwrap().message, "first");
    }

    #[test]
    fn test_admit_from_event_is_idempotent() {
        let pipeline = IngestionPipeline::new(NotificationStore::new());

        let first = pipeline.admit_from_event(event(Some("evt-1"))).unwrap();
        assert!(first.is_created());
        assert_eq!(first.notification().source_key.as_deref(), Some("evt-1"));

        let second = pipeline.admit_from_event(event(Some("evt-1"))).unwrap();
        assert_eq!(second, Admission::Existing(first.notification().clone()));

        let keyed: Vec<_> = pipeline
            .store()
            .list_all()
            .into_iter()
            .filter(|n| n.source_key.as_deref() == Some("evt-1"))
            .collect();
        assert_eq!(keyed.len(), 1);
    }

    #[test]
    fn test_replay_does_not_consume_new_identity() {
        let mut ids = MockIdGenerator::new();
        ids.expect_next_id().times(1).returning(Uuid::new_v4);
        let pipeline = IngestionPipeline::with_sources(
            NotificationStore::new(),
            Arc::new(SystemClock),
            Arc::new(ids),
        );

        let first = pipeline.admit_from_event(event(Some("evt-1"))).unwrap();
        let replay = pipeline.admit_from_event(event(Some("evt-1"))).unwrap();
        assert_eq!(first.notification().id, replay.notification().id);
    }

    #[test]
    fn test_event_without_source_key_is_not_deduplicated() {
        let pipeline = IngestionPipeline::new(NotificationStore::new());
        pipeline.admit_from_event(event(None)).unwrap();
        pipeline.admit_from_event(event(Some("  "))).unwrap();
        assert_eq!(pipeline.store().count(), 2);
        assert!(pipeline.store().list_all().iter().all(|n| n.source_key.is_none()));
    }

    #[test]
    fn test_malformed_events_are_rejected() {
        let pipeline = IngestionPipeline::new(NotificationStore::new());

        let mut no_user = event(Some("evt-2"));
        no_user.user_id = None;
        assert!(matches!(
            pipeline.admit_from_event(no_user),
            Err(NotificationError::MalformedEvent(_))
        ));

        let mut empty_message = event(Some("evt-3"));
        empty_message.message = Some(" ".to_string());
        assert!(matches!(
            pipeline.admit_from_event(empty_message),
            Err(NotificationError::MalformedEvent(_))
        ));

        assert_eq!(pipeline.store().count(), 0);
    }

    #[test]
    fn test_missing_type_defaults_to_empty_tag() {
        let pipeline = IngestionPipeline::new(NotificationStore::new());
        let mut untyped = event(Some("evt-4"));
        untyped.notification_type = None;
        let admitted = pipeline.admit_from_event(untyped).unwrap();
        assert_eq!(admitted.notification().notification_type, "");
    }
}
