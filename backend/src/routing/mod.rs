//! Document routing
//!
//! Maps an uploaded document to one of the fixed agent labels using ordered
//! keyword rules, and classifies its display type.

pub mod document_type;
pub mod rules;

pub use document_type::classify_document_type;
pub use rules::{AgentAssignment, AgentLabel, DocumentRouter, RoutingRule};
