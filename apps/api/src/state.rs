use std::sync::Arc;

use crate::config::Config;
use crate::cv::debounce::DraftDebouncers;
use crate::cv::store::CvStore;
use crate::render::export::{ExportCoordinator, ExportPipeline};
use crate::render::pdf::PdfExporter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one document store. Every view (landing, edit, preview) reads the same instance.
    pub store: Arc<CvStore>,
    pub drafts: Arc<DraftDebouncers>,
    pub exports: Arc<ExportCoordinator>,
    /// Pluggable export backend. Default: PdfExporter.
    pub exporter: Arc<dyn ExportPipeline>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_exporter(config, Arc::new(PdfExporter))
    }

    pub fn with_exporter(config: Config, exporter: Arc<dyn ExportPipeline>) -> Self {
        let store = Arc::new(CvStore::new());
        let drafts = Arc::new(DraftDebouncers::new(
            Arc::clone(&store),
            config.draft_debounce,
        ));
        AppState {
            store,
            drafts,
            exports: Arc::new(ExportCoordinator::new()),
            exporter,
            config,
        }
    }
}
