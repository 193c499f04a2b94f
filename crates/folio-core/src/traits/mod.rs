//! Core traits for folio providers.

mod document_store;

pub use document_store::*;
