//! folio-core - Extraction pipeline for uploaded content.
//!
//! Connects storage events and admin requests to the extractors in
//! `folio-extractors`, persisting the result on content records.
//!
//! - [`IngestionTrigger`] - automatic extraction for one storage event
//! - [`ReextractService`] - admin re-extraction across every file of a record
//! - [`DocumentStore`] - record persistence (memory, SQLite)
//! - [`EventBus`] / [`TriggerWorker`] - in-process event delivery
//!
//! # Example
//!
//! ```ignore
//! use folio_core::{create_store, FolioConfig, IngestionTrigger, StorageEvent};
//!
//! let config = FolioConfig::from_env();
//! let store = create_store(&config.store)?;
//! let trigger = IngestionTrigger::new(router, store, &config.content_prefix);
//!
//! trigger.handle(&StorageEvent::new("bucket", "content/abc/scan.png", "image/png")).await?;
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod ingestion;
pub mod reextract;
pub mod storage_path;
pub mod store;
pub mod traits;
pub mod types;

pub use config::{AuthConfig, EventDispatch, EventsConfig, FolioConfig, ServerConfig};
pub use error::{ErrorCode, FolioError, FolioResult};
pub use events::{EventBus, EventSubscriber, TriggerWorker};
pub use ingestion::{IgnoreReason, IngestionTrigger, TriggerOutcome};
pub use reextract::ReextractService;
pub use storage_path::{parse_file_url, ContentPath, PathError, DEFAULT_CONTENT_PREFIX};
pub use store::{create_store, MemoryDocumentStore, SqliteDocumentStore};
pub use traits::{DocumentStore, StoreConfig, StoreProvider};
pub use types::{
    ContentRecord, ExtractionOutcome, ReextractRequest, ReextractResponse, RecordUpdate,
    RequesterClaims, StorageEvent,
};
