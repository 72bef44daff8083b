//! Gemini API client
//!
//! Direct HTTP client for the Gemini `generateContent` and
//! `streamGenerateContent` endpoints.

use std::fmt;
use std::time::Duration;

use async_stream::stream;
use async_trait::async_trait;
use futures_util::StreamExt;

use crate::config::GeminiConfig;
use crate::llm::constants::{API_KEY_HEADER, GENERATE_METHOD, SSE_DATA_PREFIX, STREAM_METHOD};
use crate::llm::error::UpstreamError;
use crate::llm::gemini_types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};
use crate::llm::model::{GenerativeModel, TextStream};

/// HTTP client for one Gemini model
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    generation_config: GenerationConfig,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("generation_config", &self.generation_config)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client sharing `http` (connection pooling)
    pub fn new(http: reqwest::Client, api_key: impl Into<String>, config: &GeminiConfig) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            generation_config: GenerationConfig {
                temperature: config.temperature,
                max_output_tokens: config.max_output_tokens,
            },
        }
    }

    /// Build a client from configuration
    ///
    /// Returns `Ok(None)` when no API key is configured.
    pub fn from_config(config: &GeminiConfig) -> Result<Option<Self>, UpstreamError> {
        let Some(api_key) = config.api_key.as_deref() else {
            return Ok(None);
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Some(Self::new(http, api_key, config)))
    }

    /// Model name this client calls
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, self.model, method)
    }

    /// POST the conversation and return the response if the status is a success
    async fn send(&self, url: &str, contents: &[Content]) -> Result<reqwest::Response, UpstreamError> {
        let request_body = GenerateContentRequest {
            contents: contents.to_vec(),
            generation_config: self.generation_config,
        };

        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::warn!(
                status_code = status_code,
                error_body = %error_body,
                "Gemini API returned error status"
            );

            return Err(UpstreamError::from_status(status_code, error_body));
        }

        Ok(response)
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, contents: &[Content]) -> Result<String, UpstreamError> {
        tracing::debug!(
            model = %self.model,
            turns = contents.len(),
            "Calling Gemini API"
        );

        let response = self.send(&self.endpoint(GENERATE_METHOD), contents).await?;
        let body = response.text().await?;
        let text = parse_reply(&body)?;

        tracing::debug!(response_len = text.len(), "Received response from Gemini API");
        Ok(text)
    }

    async fn stream(&self, contents: &[Content]) -> Result<TextStream, UpstreamError> {
        tracing::debug!(
            model = %self.model,
            turns = contents.len(),
            "Opening Gemini stream"
        );

        let url = format!("{}?alt=sse", self.endpoint(STREAM_METHOD));
        let response = self.send(&url, contents).await?;
        let mut body = Box::pin(response.bytes_stream());

        let chunks = stream! {
            let mut buffer: Vec<u8> = Vec::new();
            let mut finished = false;
            while !finished {
                match body.next().await {
                    Some(Ok(chunk)) => buffer.extend_from_slice(&chunk),
                    Some(Err(e)) => {
                        yield Err(UpstreamError::from(e));
                        return;
                    }
                    None => {
                        // Terminate a last event sent without a trailing newline
                        if !buffer.is_empty() {
                            buffer.push(b'\n');
                        }
                        finished = true;
                    }
                }

                for payload in drain_data_lines(&mut buffer) {
                    match parse_reply(&payload) {
                        Ok(text) if text.is_empty() => {}
                        Ok(text) => yield Ok(text),
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    }
                }
            }
        };

        Ok(Box::pin(chunks))
    }
}

/// Parse a `generateContent` body (or one SSE payload) into its reply text
fn parse_reply(body: &str) -> Result<String, UpstreamError> {
    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| UpstreamError::InvalidResponse(format!("{} - Response body: {}", e, body)))?;

    if let Some(reason) = parsed.block_reason() {
        return Err(UpstreamError::Blocked(reason.to_string()));
    }

    Ok(parsed.text())
}

/// Remove every complete line from `buffer` and return the SSE `data:` payloads
fn drain_data_lines(buffer: &mut Vec<u8>) -> Vec<String> {
    let mut payloads = Vec::new();
    while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
        let line: Vec<u8> = buffer.drain(..=pos).collect();
        let line = String::from_utf8_lossy(&line);
        if let Some(payload) = line.trim().strip_prefix(SSE_DATA_PREFIX) {
            let payload = payload.trim();
            if !payload.is_empty() {
                payloads.push(payload.to_string());
            }
        }
    }
    payloads
}
