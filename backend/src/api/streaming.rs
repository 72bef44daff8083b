//! Streaming chat over Server-Sent Events (SSE)
//!
//! Frames are `data: {text}` events followed by `data: [DONE]`. A failure after
//! the stream opened is reported in-band as `data: [ERROR] {message}`.

use async_stream::stream;
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use futures_util::{stream::Stream, StreamExt};
use tracing::{info, warn};

use crate::api::chat::prepare_turns;
use crate::chat::ChatRequest;
use crate::error::AppError;
use crate::llm::constants::{SSE_DONE_SIGNAL, SSE_ERROR_PREFIX};
use crate::llm::{open_stream_with_retry, TextStream, UpstreamError};
use crate::state::AppState;

/// Streaming variant of the chat endpoint
///
/// Validation and the retry policy are the same as for `/api/chat`; only
/// failures before the first chunk are retried and reported with a status code.
pub async fn chat_stream(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let contents = prepare_turns(&state.config, payload)?;
    let model = state.model()?;

    let chunks = open_stream_with_retry(model, &contents, &state.config.retry).await?;
    info!("Chat stream opened");

    create_sse_response(chunks)
}

/// Wrap a text stream into an SSE HTTP response
pub fn create_sse_response(chunks: TextStream) -> Result<Response, AppError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::from_stream(sse_events(chunks)))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build SSE response: {}", e)))
}

fn sse_events(mut chunks: TextStream) -> impl Stream<Item = Result<String, std::io::Error>> {
    stream! {
        let mut produced = false;
        let mut failed = false;

        while let Some(chunk) = chunks.next().await {
            match chunk {
                Ok(text) => {
                    produced = true;
                    yield Ok::<_, std::io::Error>(sse_frame(&text));
                }
                Err(e) => {
                    warn!(error = %e, "Chat stream failed");
                    failed = true;
                    yield Ok(sse_frame(&format!("{} {}", SSE_ERROR_PREFIX, e)));
                    break;
                }
            }
        }

        if !failed {
            if produced {
                yield Ok(sse_frame(SSE_DONE_SIGNAL));
            } else {
                warn!("Chat stream ended without text");
                yield Ok(sse_frame(&format!("{} {}", SSE_ERROR_PREFIX, UpstreamError::EmptyReply)));
            }
        }
    }
}

/// One SSE event; embedded newlines become additional `data:` lines
fn sse_frame(text: &str) -> String {
    let mut frame: String = text.split('\n').map(|line| format!("data: {}\n", line)).collect();
    frame.push('\n');
    frame
}
