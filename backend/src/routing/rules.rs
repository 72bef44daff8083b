//! Agent labels and the ordered keyword router
//!
//! Assignment is a pure function of `(file_name, extracted_text)`: rules are
//! evaluated in order and the first rule with a matching keyword wins.

use chrono::{DateTime, Utc};
use std::fmt;

/// Fixed set of agents a document can be routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgentLabel {
    /// Customer relationship data
    Crm,
    /// Sales and revenue data
    Sales,
    /// Marketing campaign data
    Marketing,
    /// Customer feedback and reviews
    Feedback,
    /// Operational process data
    Operations,
    /// Fallback when no rule matches
    General,
}

impl AgentLabel {
    /// All labels, in rule order followed by the fallback
    pub const ALL: [AgentLabel; 6] = [
        AgentLabel::Crm,
        AgentLabel::Sales,
        AgentLabel::Marketing,
        AgentLabel::Feedback,
        AgentLabel::Operations,
        AgentLabel::General,
    ];

    /// Human readable agent name
    pub fn display_name(&self) -> &'static str {
        match self {
            AgentLabel::Crm => "CRM Intelligence Agent",
            AgentLabel::Sales => "Sales Performance Agent",
            AgentLabel::Marketing => "Marketing Campaign Agent",
            AgentLabel::Feedback => "Customer Feedback Agent",
            AgentLabel::Operations => "Operations Intelligence Agent",
            AgentLabel::General => "General Business Agent",
        }
    }

    /// Stable identifier used by clients
    pub fn id(&self) -> &'static str {
        match self {
            AgentLabel::Crm => "crm-agent",
            AgentLabel::Sales => "sales-agent",
            AgentLabel::Marketing => "marketing-agent",
            AgentLabel::Feedback => "feedback-agent",
            AgentLabel::Operations => "operations-agent",
            AgentLabel::General => "general-agent",
        }
    }
}

impl fmt::Display for AgentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One routing rule: any name keyword or any content keyword selects `label`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingRule {
    /// Label returned when the rule matches
    pub label: AgentLabel,
    /// Substrings tested against the lower-cased file name
    pub name_keywords: Vec<String>,
    /// Substrings tested against the lower-cased extracted text
    pub content_keywords: Vec<String>,
}

impl RoutingRule {
    /// Create a rule; keywords are lower-cased so matching is case-insensitive
    pub fn new(label: AgentLabel, name_keywords: &[&str], content_keywords: &[&str]) -> Self {
        Self {
            label,
            name_keywords: lowercase_all(name_keywords),
            content_keywords: lowercase_all(content_keywords),
        }
    }

    fn matches(&self, lower_name: &str, lower_content: &str) -> bool {
        self.name_keywords.iter().any(|k| lower_name.contains(k.as_str()))
            || self
                .content_keywords
                .iter()
                .any(|k| lower_content.contains(k.as_str()))
    }
}

fn lowercase_all(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_lowercase()).collect()
}

/// Result of routing one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentAssignment {
    /// Name of the routed document
    pub document_name: String,
    /// Assigned agent
    pub agent: AgentLabel,
    /// When the assignment was made
    pub assigned_at: DateTime<Utc>,
}

/// Ordered keyword router
#[derive(Debug, Clone)]
pub struct DocumentRouter {
    rules: Vec<RoutingRule>,
    fallback: AgentLabel,
}

impl Default for DocumentRouter {
    fn default() -> Self {
        Self::new(
            vec![
                RoutingRule::new(AgentLabel::Crm, &["crm"], &["crm", "customer"]),
                RoutingRule::new(AgentLabel::Sales, &["sales"], &["sales", "revenue"]),
                RoutingRule::new(
                    AgentLabel::Marketing,
                    &["marketing"],
                    &["marketing", "campaign"],
                ),
                RoutingRule::new(AgentLabel::Feedback, &["feedback"], &["feedback", "review"]),
                RoutingRule::new(
                    AgentLabel::Operations,
                    &["operations"],
                    &["operations", "process"],
                ),
            ],
            AgentLabel::General,
        )
    }
}

impl DocumentRouter {
    /// Create a router from an ordered rule list and a fallback label
    pub fn new(rules: Vec<RoutingRule>, fallback: AgentLabel) -> Self {
        Self { rules, fallback }
    }

    /// The rules in evaluation order
    pub fn rules(&self) -> &[RoutingRule] {
        &self.rules
    }

    /// Assign a label to a document. Never fails.
    pub fn assign(&self, file_name: &str, extracted_text: &str) -> AgentLabel {
        let lower_name = file_name.to_lowercase();
        let lower_content = extracted_text.to_lowercase();

        self.rules
            .iter()
            .find(|rule| rule.matches(&lower_name, &lower_content))
            .map(|rule| rule.label)
            .unwrap_or(self.fallback)
    }

    /// Assign a label and record it as an [`AgentAssignment`]
    pub fn assignment(&self, file_name: &str, extracted_text: &str) -> AgentAssignment {
        AgentAssignment {
            document_name: file_name.to_string(),
            agent: self.assign(file_name, extracted_text),
            assigned_at: Utc::now(),
        }
    }
}
