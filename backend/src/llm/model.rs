//! Generative model abstraction
//!
//! Handlers talk to the model through [`GenerativeModel`] so the HTTP client can
//! be swapped for a scripted implementation in tests.

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;

use crate::llm::error::UpstreamError;
use crate::llm::gemini_types::Content;

/// Incremental reply text
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, UpstreamError>> + Send>>;

/// A chat-capable model
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generate a complete reply for `contents`
    ///
    /// A successful call may return an empty string; deciding what an empty
    /// reply means is left to the caller.
    async fn generate(&self, contents: &[Content]) -> Result<String, UpstreamError>;

    /// Open a streaming reply for `contents`
    ///
    /// Errors returned here happen before any text was produced.
    async fn stream(&self, contents: &[Content]) -> Result<TextStream, UpstreamError>;
}
