use crate::notification::model::{Notification, NotificationError};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;
use uuid::Uuid;

/// Outcome of a keyed admission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// A new record was stored
    Created(Notification),
    /// A record with the same source key already existed and was returned as-is
    Existing(Notification),
}

impl Admission {
    pub fn notification(&self) -> &Notification {
        match self {
            Admission::Created(n) | Admission::Existing(n) => n,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Admission::Created(_))
    }
}

#[derive(Debug, Default)]
struct Table {
    // Insertion sequence -> record; iteration order is creation order.
    records: BTreeMap<u64, Notification>,
    by_id: HashMap<Uuid, u64>,
    by_source_key: HashMap<String, Uuid>,
    next_seq: u64,
}

impl Table {
    fn get(&self, id: &Uuid) -> Option<&Notification> {
        self.by_id.get(id).and_then(|seq| self.records.get(seq))
    }

    fn insert(&mut self, notification: Notification) -> Result<(), NotificationError> {
        if self.by_id.contains_key(&notification.id) {
            return Err(NotificationError::DuplicateId(notification.id));
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        self.by_id.insert(notification.id, seq);
        if let Some(key) = &notification.source_key {
            self.by_source_key.insert(key.clone(), notification.id);
        }
        self.records.insert(seq, notification);
        Ok(())
    }
}

/// Concurrency-safe in-memory table of notifications.
///
/// Every operation takes the table-wide lock exactly once, so no caller can
/// observe a half-applied mutation and operations on the same id are
/// serialized.
#[derive(Debug, Clone, Default)]
pub struct NotificationStore {
    table: Arc<RwLock<Table>>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Table> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Table> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a record whose id is not yet present
    pub fn put(&self, notification: Notification) -> Result<(), NotificationError> {
        debug!("Storing notification {}", notification.id);
        self.write().insert(notification)
    }

    /// Insert a record unless one with the same source key is already stored.
    ///
    /// Records without a source key are always inserted.
    pub fn admit_keyed(&self, notification: Notification) -> Result<Admission, NotificationError> {
        let mut table = self.write();

        if let Some(key) = &notification.source_key {
            let existing = table
                .by_source_key
                .get(key)
                .and_then(|id| table.get(id))
                .cloned();
            if let Some(existing) = existing {
                debug!("Source key {} already admitted as {}", key, existing.id);
                return Ok(Admission::Existing(existing));
            }
        }

        table.insert(notification.clone())?;
        Ok(Admission::Created(notification))
    }

    pub fn get(&self, id: &Uuid) -> Result<Notification, NotificationError> {
        self.read().get(id).cloned().ok_or(NotificationError::NotFound)
    }

    pub fn find_by_source_key(&self, key: &str) -> Option<Notification> {
        let table = self.read();
        table
            .by_source_key
            .get(key)
            .and_then(|id| table.get(id))
            .cloned()
    }

    /// Snapshot of all records in creation order
    pub fn list_all(&self) -> Vec<Notification> {
        self.read().records.values().cloned().collect()
    }

    /// Set the read flag. The flag never goes back from true to false, so
    /// `read == false` on an already read record leaves it read.
    pub fn update_read_state(&self, id: &Uuid, read: bool) -> Result<(), NotificationError> {
        let mut table = self.write();
        let seq = *table.by_id.get(id).ok_or(NotificationError::NotFound)?;
        let record = table
            .records
            .get_mut(&seq)
            .ok_or(NotificationError::NotFound)?;
        record.is_read |= read;
        Ok(())
    }

    pub fn delete(&self, id: &Uuid) -> Result<Notification, NotificationError> {
        let mut table = self.write();
        let seq = table.by_id.remove(id).ok_or(NotificationError::NotFound)?;
        let removed = table
            .records
            .remove(&seq)
            .ok_or(NotificationError::NotFound)?;
        if let Some(key) = &removed.source_key {
            table.by_source_key.remove(key);
        }
        Ok(removed)
    }

    /// Number of live records
    pub fn count(&self) -> usize {
        self.read().records.len()
    }
}
