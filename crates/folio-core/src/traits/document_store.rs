//! Record store trait and related types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::FolioResult;
use crate::types::{ContentRecord, RecordUpdate};

/// Key-value store of content records.
///
/// `update` is the single mutation primitive used by the pipeline: an atomic
/// overwrite of the fields named by the update on one record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a record by id.
    async fn get(&self, id: &str) -> FolioResult<Option<ContentRecord>>;

    /// Insert or replace a whole record (CRUD-layer write).
    async fn put(&self, record: ContentRecord) -> FolioResult<()>;

    /// Apply `update` to an existing record, stamping it with the store's clock.
    ///
    /// Fails with `NotFound` when the record does not exist.
    async fn update(&self, id: &str, update: RecordUpdate) -> FolioResult<()>;

    /// Human-readable name for this store.
    fn name(&self) -> &str;
}

/// Record store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreProvider {
    /// In-process map, lost on restart.
    Memory,
    /// SQLite database file.
    #[default]
    Sqlite,
}

/// Record store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend to use.
    pub provider: StoreProvider,
    /// Database path for the `sqlite` provider (`:memory:` for a transient database).
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: StoreProvider::Sqlite,
            path: PathBuf::from("folio.db"),
        }
    }
}
