// Application state
// Immutable handles shared by every request handler

use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::llm::{GeminiClient, GenerativeModel, UpstreamError};
use crate::routing::DocumentRouter;
use crate::services::{BasicTextExtractor, IngestionService, TextExtractor};

/// Shared application state
///
/// Nothing in here is mutated after startup, so handlers receive a cheap clone
/// instead of a lock.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<Config>,
    /// Upstream model; `None` when no API key is configured
    pub model: Option<Arc<dyn GenerativeModel>>,
    /// File ingestion pipeline
    pub ingestion: IngestionService,
}

impl AppState {
    /// Create state from explicit parts
    pub fn new(
        config: Config,
        model: Option<Arc<dyn GenerativeModel>>,
        router: Arc<DocumentRouter>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            model,
            ingestion: IngestionService::new(router, extractor),
        }
    }

    /// Create state with the default router and extractor
    pub fn with_model(config: Config, model: Option<Arc<dyn GenerativeModel>>) -> Self {
        Self::new(
            config,
            model,
            Arc::new(DocumentRouter::default()),
            Arc::new(BasicTextExtractor),
        )
    }

    /// Create state from configuration, building the Gemini client if a key is set
    pub fn from_config(config: Config) -> Result<Self, UpstreamError> {
        let model = GeminiClient::from_config(&config.gemini)?
            .map(|client| Arc::new(client) as Arc<dyn GenerativeModel>);
        if model.is_none() {
            tracing::warn!("GEMINI_API_KEY is not set; chat requests will fail");
        }
        Ok(Self::with_model(config, model))
    }

    /// The configured model, or [`AppError::MissingApiKey`]
    pub fn model(&self) -> Result<&dyn GenerativeModel, AppError> {
        self.model.as_deref().ok_or(AppError::MissingApiKey)
    }
}
