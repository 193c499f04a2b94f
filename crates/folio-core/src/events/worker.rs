//! Background task feeding bus events to the ingestion trigger.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::events::EventSubscriber;
use crate::ingestion::{IngestionTrigger, TriggerOutcome};

/// Dispatches each received storage event to its own task.
pub struct TriggerWorker;

impl TriggerWorker {
    /// Start consuming `subscriber`. The returned task ends when the bus closes;
    /// handlers already spawned run to completion independently.
    pub fn spawn(
        trigger: Arc<IngestionTrigger>,
        mut subscriber: EventSubscriber,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(prefix = trigger.prefix(), "Trigger worker started");
            while let Some(event) = subscriber.recv().await {
                let trigger = Arc::clone(&trigger);
                tokio::spawn(async move {
                    match trigger.handle(&event).await {
                        Ok(TriggerOutcome::Ignored(reason)) => {
                            debug!(?reason, path = ?event.name, "Event ignored");
                        }
                        Ok(outcome) => debug!(?outcome, "Event handled"),
                        Err(e) => error!(
                            path = ?event.name,
                            error = %e,
                            "Failed to persist extraction result"
                        ),
                    }
                });
            }
            info!("Event bus closed, trigger worker stopping");
        })
    }
}
