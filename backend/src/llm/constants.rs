//! LLM constants
//!
//! Centralized constants used by the Gemini client and the streaming endpoint.

/// SSE stream termination signal
pub const SSE_DONE_SIGNAL: &str = "[DONE]";

/// SSE error prefix
pub const SSE_ERROR_PREFIX: &str = "[ERROR]";

/// SSE data line prefix
pub const SSE_DATA_PREFIX: &str = "data:";

/// The only HTTP status that is retried
pub const RETRYABLE_STATUS: u16 = 503;

/// Non-streaming generation method
pub const GENERATE_METHOD: &str = "generateContent";

/// Streaming generation method
pub const STREAM_METHOD: &str = "streamGenerateContent";

/// Header carrying the Gemini API key
pub const API_KEY_HEADER: &str = "x-goog-api-key";
