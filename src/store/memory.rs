//! In-process record store.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

use crate::models::{NewSpeciesRecord, SpeciesRecord};
use crate::store::{RecordStore, StoreError};

/// Record store backed by an in-memory map.
///
/// Delete failures can be injected with [`MemoryStore::fail_deletes`] to
/// exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<i64, SpeciesRecord>>,
    failing_deletes: Mutex<Option<String>>,
    deletes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `records`
    pub fn with_records(records: impl IntoIterator<Item = SpeciesRecord>) -> Self {
        Self {
            records: Mutex::new(records.into_iter().map(|r| (r.id, r)).collect()),
            ..Default::default()
        }
    }

    /// Make every following delete fail with `message`
    pub async fn fail_deletes(&self, message: impl Into<String>) {
        *self.failing_deletes.lock().await = Some(message.into());
    }

    /// Number of delete requests received, successful or not
    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self) -> Result<Vec<SpeciesRecord>, StoreError> {
        Ok(self.records.lock().await.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<SpeciesRecord>, StoreError> {
        Ok(self.records.lock().await.get(&id).cloned())
    }

    async fn insert(&self, record: &NewSpeciesRecord) -> Result<SpeciesRecord, StoreError> {
        let mut records = self.records.lock().await;
        let id = records.keys().next_back().map_or(1, |last| last + 1);
        let stored = SpeciesRecord::from_new(id, record.clone());
        records.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: i64,
        record: &NewSpeciesRecord,
    ) -> Result<SpeciesRecord, StoreError> {
        let mut records = self.records.lock().await;
        let slot = records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        *slot = SpeciesRecord::from_new(id, record.clone());
        Ok(slot.clone())
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.failing_deletes.lock().await.clone() {
            return Err(StoreError::Api {
                status: 500,
                message,
            });
        }

        self.records.lock().await.remove(&id);
        Ok(())
    }
}
