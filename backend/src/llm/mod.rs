//! Upstream LLM access
//!
//! Gemini HTTP client, the [`GenerativeModel`] seam handlers depend on, and the
//! bounded retry state machine wrapped around every call.

pub mod api_client;
pub mod constants;
pub mod error;
pub mod gemini_types;
pub mod model;
pub mod retry;

pub use api_client::GeminiClient;
pub use error::UpstreamError;
pub use gemini_types::{Content, Part};
pub use model::{GenerativeModel, TextStream};
pub use retry::{generate_with_retry, open_stream_with_retry, Backoff, RetryPolicy};
