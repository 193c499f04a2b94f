//! In-process record store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{FolioError, FolioResult};
use crate::traits::DocumentStore;
use crate::types::{ContentRecord, RecordUpdate};

/// Record store backed by a map behind an async lock.
#[derive(Default)]
pub struct MemoryDocumentStore {
    records: RwLock<HashMap<String, ContentRecord>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `records`.
    pub fn with_records(records: impl IntoIterator<Item = ContentRecord>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().map(|r| (r.id.clone(), r)).collect()),
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Check if the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, id: &str) -> FolioResult<Option<ContentRecord>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn put(&self, record: ContentRecord) -> FolioResult<()> {
        self.records.write().await.insert(record.id.clone(), record);
        Ok(())
    }

    async fn update(&self, id: &str, update: RecordUpdate) -> FolioResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(id)
            .ok_or_else(|| FolioError::not_found(id))?;
        record.apply(&update, Utc::now());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
