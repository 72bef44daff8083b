//! Chat API handler
//!
//! Answers questions about previously uploaded documents through the upstream
//! model, retrying while it reports itself unavailable.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::info;

use crate::chat::{
    build_system_instruction, to_contents, AssistantMessage, ChatRequest, ChatResponse,
};
use crate::config::Config;
use crate::error::AppError;
use crate::llm::{generate_with_retry, Content};
use crate::state::AppState;

/// Validate a chat request and assemble the upstream turns
///
/// Validation happens before the API key is looked at, so malformed requests
/// are rejected even when the server is not configured.
pub(crate) fn prepare_turns(
    config: &Config,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Vec<Content>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    let messages = request.conversation()?;

    let system_instruction = build_system_instruction(
        &config.chat.default_persona,
        request.document_context(),
        config.chat.context_max_chars,
    );

    info!(
        messages = messages.len(),
        has_documents = request.document_context().is_some(),
        instruction_len = system_instruction.len(),
        "Prepared chat prompt"
    );

    Ok(to_contents(&system_instruction, &messages))
}

/// Chat about the uploaded documents
///
/// # Errors
/// * `AppError::InvalidRequest` - messages missing, not an array, or empty
/// * `AppError::MissingApiKey` - no upstream credential configured
/// * `AppError::Upstream` - the model failed, stayed unavailable, or returned nothing
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let contents = prepare_turns(&state.config, payload)?;
    let model = state.model()?;

    let reply = generate_with_retry(model, &contents, &state.config.retry).await?;
    info!(reply_len = reply.len(), "Chat reply generated");

    Ok(Json(ChatResponse {
        message: AssistantMessage::new(reply),
    }))
}
