//! Factory for assembling the pipeline from configuration.

use std::sync::Arc;

use folio_core::{create_store, FolioConfig, FolioResult};
use folio_extractors::ExtractorFactory;
use tracing::info;

use crate::state::AppState;

/// Build the record store and extraction router described by `config`.
pub fn create_state(config: FolioConfig) -> FolioResult<AppState> {
    let store = create_store(&config.store)?;
    let router = ExtractorFactory::router(
        &config.blob,
        &config.ocr,
        &config.vision,
        &config.preprocess,
    );

    info!(
        store = store.name(),
        pdf = ?router.pdf_strategies(),
        image = ?router.image_strategies(),
        "Extraction pipeline ready"
    );

    Ok(AppState::new(config, Arc::new(router), store))
}
