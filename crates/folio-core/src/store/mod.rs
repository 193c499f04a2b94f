//! Record store implementations.

mod memory;
mod sqlite;

use std::sync::Arc;

pub use memory::MemoryDocumentStore;
pub use sqlite::SqliteDocumentStore;

use crate::error::FolioResult;
use crate::traits::{DocumentStore, StoreConfig, StoreProvider};

/// Create the configured record store.
pub fn create_store(config: &StoreConfig) -> FolioResult<Arc<dyn DocumentStore>> {
    match config.provider {
        StoreProvider::Memory => Ok(Arc::new(MemoryDocumentStore::new())),
        StoreProvider::Sqlite => Ok(Arc::new(SqliteDocumentStore::new(&config.path)?)),
    }
}
