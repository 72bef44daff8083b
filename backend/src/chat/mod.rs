//! Chat module
//!
//! Request and reply models for document-grounded chat and the prompt
//! assembly that turns them into upstream turns.

pub mod models;
pub mod prompt;

pub use models::{AssistantMessage, ChatRequest, ChatResponse, ConversationMessage, MessageRole};
pub use prompt::{build_system_instruction, to_contents};
