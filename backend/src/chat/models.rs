//! Chat data models
//!
//! Defines the chat request body, conversation messages and the reply.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum MessageRole {
    /// Message from the user
    User,
    /// Message from the assistant/AI
    Assistant,
}

impl MessageRole {
    /// Convert the role to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

impl From<&str> for MessageRole {
    fn from(s: &str) -> Self {
        match s {
            "user" => MessageRole::User,
            _ => MessageRole::Assistant,
        }
    }
}

impl From<String> for MessageRole {
    fn from(s: String) -> Self {
        MessageRole::from(s.as_str())
    }
}

/// A single message of the caller-held conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Message text
    pub content: String,
}

/// Body of `POST /api/chat` and `POST /api/chat/stream`
///
/// Fields are kept loosely typed so that shape errors are reported as 400
/// with a specific message instead of a generic rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Conversation so far, oldest first
    #[serde(default)]
    pub messages: Option<Value>,
    /// The upload response previously returned to the client
    #[serde(default)]
    pub processed_data: Option<Value>,
}

impl ChatRequest {
    /// Validate and decode the conversation
    pub fn conversation(&self) -> Result<Vec<ConversationMessage>, AppError> {
        let messages = match &self.messages {
            Some(Value::Array(messages)) => messages,
            _ => return Err(AppError::InvalidRequest("Messages array required".to_string())),
        };

        if messages.is_empty() {
            return Err(AppError::InvalidRequest(
                "Messages array must not be empty".to_string(),
            ));
        }

        messages
            .iter()
            .enumerate()
            .map(|(index, message)| {
                ConversationMessage::deserialize(message).map_err(|e| {
                    AppError::InvalidRequest(format!("Invalid message at index {}: {}", index, e))
                })
            })
            .collect()
    }

    /// Document context carried in `processedData`, if any
    ///
    /// Reads `documentContext` and falls back to `extractedContent`. Blank
    /// strings count as absent.
    pub fn document_context(&self) -> Option<&str> {
        let data = self.processed_data.as_ref()?;
        ["documentContext", "extractedContent"]
            .iter()
            .filter_map(|key| data.get(*key).and_then(Value::as_str))
            .find(|context| !context.trim().is_empty())
    }
}

/// Assistant message returned to the client
#[derive(Debug, Clone, Serialize)]
pub struct AssistantMessage {
    /// Millisecond timestamp identifier
    pub id: String,
    /// Always `assistant`
    pub role: MessageRole,
    /// Reply text
    pub content: String,
}

impl AssistantMessage {
    /// Wrap reply text, stamping it with the current time
    pub fn new(content: String) -> Self {
        Self {
            id: chrono::Utc::now().timestamp_millis().to_string(),
            role: MessageRole::Assistant,
            content,
        }
    }
}

/// Body of a successful chat response
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    /// The assistant's reply
    pub message: AssistantMessage,
}
