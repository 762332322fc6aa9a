use crate::notification::model::{
    CreateNotificationRequest, Notification, NotificationError, NotificationFilter,
};
use crate::notification::pipeline::IngestionPipeline;
use crate::notification::store::NotificationStore;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct NotificationService {
    store: NotificationStore,
    pipeline: IngestionPipeline,
}

impl NotificationService {
    pub fn new(pipeline: IngestionPipeline) -> Self {
        Self {
            store: pipeline.store().clone(),
            pipeline,
        }
    }

    pub fn pipeline(&self) -> &IngestionPipeline {
        &self.pipeline
    }

    pub fn count(&self) -> usize {
        self.store.count()
    }

    // All notifications in creation order
    pub fn list(&self) -> Vec<Notification> {
        self.store.list_all()
    }

    pub fn list_filtered(&self, filter: &NotificationFilter) -> Vec<Notification> {
        self.list()
            .into_iter()
            .filter(|n| filter.matches(n))
            .collect()
    }

    pub fn fetch(&self, id: &Uuid) -> Result<Notification, NotificationError> {
        self.store.get(id)
    }

    pub fn create(
        &self,
        request: CreateNotificationRequest,
    ) -> Result<Notification, NotificationError> {
        if request.user_id.trim().is_empty() {
            return Err(NotificationError::InvalidInput(
                "userId must not be empty".to_string(),
            ));
        }
        if request.message.trim().is_empty() {
            return Err(NotificationError::InvalidInput(
                "message must not be empty".to_string(),
            ));
        }

        self.pipeline
            .admit_from_api(request.user_id, request.message, request.notification_type)
    }

    pub fn mark_read(&self, id: &Uuid) -> Result<(), NotificationError> {
        self.store.update_read_state(id, true)?;
        info!("Marked notification {} as read", id);
        Ok(())
    }

    pub fn remove(&self, id: &Uuid) -> Result<(), NotificationError> {
        let removed = self.store.delete(id)?;
        info!("Deleted notification {} for user {}", removed.id, removed.user_id);
        Ok(())
    }
}
