//! Core types for folio.

mod event;
mod record;
mod rpc;

pub use event::StorageEvent;
pub use record::{ContentRecord, ExtractionOutcome, RecordUpdate};
pub use rpc::{ReextractRequest, ReextractResponse, RequesterClaims};
