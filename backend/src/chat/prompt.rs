//! Prompt assembly
//!
//! Builds the system instruction and converts the conversation into Gemini
//! turns. The system instruction is sent as the first `user` turn.

use crate::chat::models::{ConversationMessage, MessageRole};
use crate::llm::gemini_types::{Content, MODEL_ROLE, USER_ROLE};

const DOCUMENTS_START: &str = "\n\n--- Start of Documents for Analysis ---\n\n";
const DOCUMENTS_END: &str = "\n\n--- End of Documents for Analysis ---\n\n";
const DOCUMENTS_INSTRUCTION: &str = "\n\nBased on the documents provided, answer the user's questions. \
Be specific and reference the content from the documents directly. \
If the information is not present, state that clearly.";
const NO_DOCUMENTS_INSTRUCTION: &str = "\n\nNo documents have been provided for analysis. \
Respond to general questions as a helpful assistant.";
const TRUNCATION_MARKER: &str = "\n\n[Document context truncated]";

/// Build the system instruction
///
/// `document_context` is injected verbatim unless `max_chars` caps it.
pub fn build_system_instruction(
    persona: &str,
    document_context: Option<&str>,
    max_chars: Option<usize>,
) -> String {
    let mut instruction = persona.to_string();

    match document_context.filter(|c| !c.trim().is_empty()) {
        Some(context) => {
            instruction.push_str(DOCUMENTS_START);
            instruction.push_str(&truncate_context(context, max_chars));
            instruction.push_str(DOCUMENTS_END);
            instruction.push_str(DOCUMENTS_INSTRUCTION);
        }
        None => instruction.push_str(NO_DOCUMENTS_INSTRUCTION),
    }

    instruction
}

fn truncate_context(context: &str, max_chars: Option<usize>) -> String {
    let Some(max_chars) = max_chars else {
        return context.to_string();
    };
    match context.char_indices().nth(max_chars) {
        Some((end, _)) => {
            tracing::debug!(
                context_len = context.len(),
                max_chars,
                "Truncating document context"
            );
            format!("{}{}", &context[..end], TRUNCATION_MARKER)
        }
        None => context.to_string(),
    }
}

/// Convert the conversation into Gemini turns, system instruction first
pub fn to_contents(system_instruction: &str, messages: &[ConversationMessage]) -> Vec<Content> {
    std::iter::once(Content::text(USER_ROLE, system_instruction))
        .chain(messages.iter().map(|message| {
            let role = match message.role {
                MessageRole::User => USER_ROLE,
                MessageRole::Assistant => MODEL_ROLE,
            };
            Content::text(role, message.content.clone())
        }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PERSONA;

    #[test]
    fn test_instruction_with_documents() {
        let instruction = build_system_instruction("Persona.", Some("Document: a.txt"), None);
        assert_eq!(
            instruction,
            "Persona.\n\n--- Start of Documents for Analysis ---\n\nDocument: a.txt\n\n\
             --- End of Documents for Analysis ---\n\n\n\nBased on the documents provided, \
             answer the user's questions. Be specific and reference the content from the \
             documents directly. If the information is not present, state that clearly."
        );
    }

    #[test]
    fn test_instruction_without_documents() {
        for context in [None, Some(""), Some("   \n")] {
            let instruction = build_system_instruction(DEFAULT_PERSONA, context, None);
            assert!(instruction.starts_with(DEFAULT_PERSONA));
            assert!(instruction.ends_with(
                "\n\nNo documents have been provided for analysis. \
                 Respond to general questions as a helpful assistant."
            ));
            assert!(!instruction.contains("Start of Documents"));
        }
    }

    #[test]
    fn test_context_cap() {
        let instruction = build_system_instruction("P", Some("abcdefghij"), Some(4));
        assert!(instruction.contains("abcd\n\n[Document context truncated]"));
        assert!(!instruction.contains("abcde"));

        let instruction = build_system_instruction("P", Some("abc"), Some(4));
        assert!(instruction.contains("\n\nabc\n\n--- End"));
    }

    #[test]
    fn test_contents_prepend_instruction_and_map_roles() {
        let messages = vec![
            ConversationMessage {
                role: MessageRole::User,
                content: "What were sales?".to_string(),
            },
            ConversationMessage {
                role: MessageRole::Assistant,
                content: "Up 12%.".to_string(),
            },
        ];

        let contents = to_contents("SYSTEM", &messages);

        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0], Content::text("user", "SYSTEM"));
        assert_eq!(contents[1], Content::text("user", "What were sales?"));
        assert_eq!(contents[2], Content::text("model", "Up 12%."));
    }
}
