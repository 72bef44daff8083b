//! Gemini API wire types
//!
//! Structs that mirror the `generateContent` request and response JSON.

use serde::{Deserialize, Serialize};

/// Role Gemini uses for user turns
pub const USER_ROLE: &str = "user";

/// Role Gemini uses for model turns
pub const MODEL_ROLE: &str = "model";

/// Request body for `generateContent` and `streamGenerateContent`
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns, oldest first
    pub contents: Vec<Content>,
    /// Sampling parameters
    pub generation_config: GenerationConfig,
}

/// One conversation turn
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Content {
    /// `user` or `model`
    #[serde(default)]
    pub role: String,
    /// Content parts (text only)
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// A single-part text turn
    pub fn text(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// A single text part
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Part {
    /// The text content; non-text parts deserialize to an empty string
    #[serde(default)]
    pub text: String,
}

/// Generation configuration for requests
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum number of generated tokens
    pub max_output_tokens: u32,
}

/// Top-level `generateContent` response (also one SSE chunk of the streaming variant)
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate replies
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Feedback about the prompt (set when it was blocked)
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| c.content.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default()
    }

    /// Block reason reported for the prompt, if any
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }
}

/// A single candidate reply
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Content of the candidate
    #[serde(default)]
    pub content: Content,
    /// Why the model stopped generating
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Feedback about the prompt
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Reason the prompt was blocked
    #[serde(default)]
    pub block_reason: Option<String>,
}
