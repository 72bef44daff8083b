//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::llm::{Backoff, RetryPolicy};

/// Persona used when `DEFAULT_PERSONA` is not set
pub const DEFAULT_PERSONA: &str = "You are a specialized business intelligence AI assistant. \
Your purpose is to analyze documents and provide detailed, actionable insights based on the content provided.";

/// Default Gemini API base URL
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Upstream LLM configuration
    pub gemini: GeminiConfig,
    /// Retry policy for upstream calls
    pub retry: RetryPolicy,
    /// Chat prompt assembly configuration
    pub chat: ChatConfig,
    /// Upload handling configuration
    pub ingestion: IngestionConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Gemini API configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key; chat requests fail with 500 when absent
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// API base URL (overridable for tests and proxies)
    pub base_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum number of generated tokens
    pub max_output_tokens: u32,
}

// Keeps the key out of logs
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

/// Chat configuration
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Persona preamble placed at the start of every system instruction
    pub default_persona: String,
    /// Optional cap on the injected document context, in characters
    pub context_max_chars: Option<usize>,
}

/// Upload handling configuration
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    /// Maximum accepted request body size in bytes
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backoff = match parse("LLM_BACKOFF").as_deref().map(str::trim) {
            Some("exponential") => Backoff::Exponential,
            _ => Backoff::Linear,
        };

        Self {
            server: ServerConfig {
                port: parsed_or(parse("PORT"), 8080),
                host: parse("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            },
            gemini: GeminiConfig {
                api_key: parse("GEMINI_API_KEY"),
                model: parse("GEMINI_MODEL").unwrap_or_else(|| "gemini-2.5-flash".to_string()),
                base_url: parse("GEMINI_API_BASE_URL")
                    .unwrap_or_else(|| GEMINI_API_BASE_URL.to_string()),
                timeout_secs: parsed_or(parse("GEMINI_TIMEOUT_SECS"), 60),
                temperature: parsed_or(parse("GEMINI_TEMPERATURE"), 0.7),
                max_output_tokens: parsed_or(parse("GEMINI_MAX_OUTPUT_TOKENS"), 1000),
            },
            retry: RetryPolicy {
                max_attempts: parsed_or::<u32>(parse("LLM_MAX_ATTEMPTS"), 3).max(1),
                base_delay: Duration::from_millis(parsed_or(parse("LLM_RETRY_BASE_DELAY_MS"), 1000)),
                backoff,
            },
            chat: ChatConfig {
                default_persona: parse("DEFAULT_PERSONA")
                    .unwrap_or_else(|| DEFAULT_PERSONA.to_string()),
                context_max_chars: parse("CONTEXT_MAX_CHARS").and_then(|v| v.trim().parse().ok()),
            },
            ingestion: IngestionConfig {
                max_upload_bytes: parsed_or(parse("MAX_UPLOAD_BYTES"), 25 * 1024 * 1024),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parsed_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
