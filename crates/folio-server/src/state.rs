//! Server state management.

use std::sync::Arc;

use folio_core::{
    DocumentStore, EventBus, FolioConfig, IngestionTrigger, ReextractService, RequesterClaims,
    TriggerWorker,
};
use folio_extractors::ExtractionRouter;
use tokio::task::JoinHandle;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: FolioConfig,
    store: Arc<dyn DocumentStore>,
    bus: EventBus,
    trigger: Arc<IngestionTrigger>,
    reextract: ReextractService,
}

impl AppState {
    /// Wire the trigger, re-extraction service and event bus around one
    /// router and store.
    pub fn new(
        config: FolioConfig,
        router: Arc<ExtractionRouter>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        let trigger = Arc::new(IngestionTrigger::new(
            router.clone(),
            store.clone(),
            config.content_prefix.clone(),
        ));
        let reextract = ReextractService::new(router, store.clone());
        let bus = EventBus::with_capacity(config.events.capacity);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                bus,
                trigger,
                reextract,
            }),
        }
    }

    pub fn config(&self) -> &FolioConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.inner.store
    }

    pub fn bus(&self) -> &EventBus {
        &self.inner.bus
    }

    pub fn trigger(&self) -> &Arc<IngestionTrigger> {
        &self.inner.trigger
    }

    pub fn reextract(&self) -> &ReextractService {
        &self.inner.reextract
    }

    /// Claims for a bearer token.
    pub fn claims_for(&self, token: &str) -> Option<RequesterClaims> {
        self.inner.config.auth.claims_for(token).cloned()
    }

    /// Start the worker that runs the ingestion trigger for bus events.
    pub fn spawn_worker(&self) -> JoinHandle<()> {
        TriggerWorker::spawn(self.inner.trigger.clone(), self.inner.bus.subscribe())
    }
}
