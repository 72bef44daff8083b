//! Shared fixtures for API integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use document_insights_backend::llm::{Content, GenerativeModel, TextStream, UpstreamError};
use document_insights_backend::{create_router, AppState, Config};
use futures_util::stream;
use serde_json::Value;
use tower::ServiceExt;

/// Model that replays a fixed script of outcomes and records every call
pub struct ScriptedModel {
    script: Mutex<VecDeque<Result<String, UpstreamError>>>,
    calls: AtomicU32,
    last_contents: Mutex<Vec<Content>>,
}

impl ScriptedModel {
    pub fn new(script: Vec<Result<String, UpstreamError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicU32::new(0),
            last_contents: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_contents(&self) -> Vec<Content> {
        self.last_contents.lock().unwrap().clone()
    }

    fn next_outcome(&self, contents: &[Content]) -> Result<String, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_contents.lock().unwrap() = contents.to_vec();
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(UpstreamError::Network("script exhausted".to_string())))
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(&self, contents: &[Content]) -> Result<String, UpstreamError> {
        self.next_outcome(contents)
    }

    async fn stream(&self, contents: &[Content]) -> Result<TextStream, UpstreamError> {
        let text = self.next_outcome(contents)?;
        let chunks: Vec<Result<String, UpstreamError>> = text
            .split_inclusive(' ')
            .map(|chunk| Ok(chunk.to_string()))
            .collect();
        Ok(Box::pin(stream::iter(chunks)))
    }
}

pub fn unavailable() -> Result<String, UpstreamError> {
    Err(UpstreamError::from_status(503, "The model is overloaded".to_string()))
}

/// Configuration with retries that do not sleep
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.retry.base_delay = Duration::ZERO;
    config
}

pub fn app_with(model: Option<Arc<ScriptedModel>>) -> Router {
    let model = model.map(|m| m as Arc<dyn GenerativeModel>);
    create_router(AppState::with_model(test_config(), model))
}

/// Send a request and return the status and raw body
pub async fn send(app: Router, request: Request<Body>) -> (u16, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

/// Send a request and parse the body as JSON
pub async fn send_json(app: Router, request: Request<Body>) -> (u16, Value) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

pub fn json_request(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub const BOUNDARY: &str = "----insights-test-boundary";

/// A multipart part: (field name, file name, content type, bytes)
pub type Part<'a> = (&'a str, Option<&'a str>, &'a str, &'a [u8]);

pub fn multipart_request(parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for (field, file_name, content_type, bytes) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        let disposition = match file_name {
            Some(file_name) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, file_name
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", field),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/process-files")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header("content-length", body.len())
        .body(Body::from(body))
        .unwrap()
}
