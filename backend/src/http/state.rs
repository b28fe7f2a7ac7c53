//! Application state for the HTTP server.

use std::sync::Arc;

use crate::algorithms::AnalyticsEngine;
use crate::config::AppConfig;
use crate::db::repository::FullRepository;
use crate::services::report::{ReportRenderer, TextReportRenderer};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for database operations
    pub repository: Arc<dyn FullRepository>,
    pub engine: AnalyticsEngine,
    pub renderer: Arc<dyn ReportRenderer>,
    /// Request body limit, uploads included
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create a state with default analytics settings and the text report renderer.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self::from_config(repository, &AppConfig::default())
    }

    pub fn from_config(repository: Arc<dyn FullRepository>, config: &AppConfig) -> Self {
        Self {
            repository,
            engine: config.engine(),
            renderer: Arc::new(TextReportRenderer),
            max_upload_bytes: config.max_upload_bytes(),
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn ReportRenderer>) -> Self {
        self.renderer = renderer;
        self
    }
}
