//! Storage event plumbing
//!
//! This module provides:
//! - Event bus for internal pub/sub of storage notifications
//! - Worker that runs the ingestion trigger for every event

mod bus;
mod worker;

pub use bus::{EventBus, EventSubscriber, DEFAULT_CAPACITY};
pub use worker::TriggerWorker;
