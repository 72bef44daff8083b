//! Batch ingestion of uploaded files
//!
//! Each file is extracted, routed and summarized on the blocking pool. A
//! failure on one file becomes an in-band placeholder entry; the batch as a
//! whole only fails when it is empty.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::AppError;
use crate::routing::{classify_document_type, DocumentRouter};
use crate::services::analysis::{analyze, AgentAnalysis};
use crate::services::extraction::{failure_placeholder, TextExtractor, UploadedDocument};

/// Characters of extracted text kept in `contentPreview`
pub const PREVIEW_CHARS: usize = 200;

/// Status reported for every entry; failed extractions are signalled only by
/// their placeholder text
pub const PROCESSED_STATUS: &str = "processed";

/// One entry of `processedFiles`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedFile {
    /// Original file name
    pub name: String,
    /// Display document type
    #[serde(rename = "type")]
    pub document_type: String,
    /// Declared MIME type
    pub mime_type: String,
    /// Size in bytes
    pub size: u64,
    /// Display name of the assigned agent
    pub agent: String,
    /// Identifier of the assigned agent
    pub agent_id: String,
    /// Leading part of the extracted text
    pub content_preview: String,
    /// Full extracted text or placeholder
    pub extracted_text: String,
    /// Canned analysis for the assigned agent
    pub agent_analysis: AgentAnalysis,
    /// Always [`PROCESSED_STATUS`]
    pub status: &'static str,
    /// When the file was processed
    pub upload_date: DateTime<Utc>,
}

/// Per-batch agent statistics
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentsSummary {
    /// Number of distinct agents used
    pub total_agents: usize,
    /// Display names of the agents used, in first-use order
    pub agents_used: Vec<String>,
    /// Files per agent id
    pub agent_usage: BTreeMap<String, usize>,
    /// Mean confidence across the batch
    pub average_confidence: f64,
}

/// Response body of a successful upload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedBatch {
    /// Always `true`
    pub success: bool,
    /// One entry per uploaded file, in upload order
    pub processed_files: Vec<ProcessedFile>,
    /// Concatenated context injected into chat prompts
    pub document_context: String,
    /// The analysis of each file, in upload order
    pub agent_results: Vec<AgentAnalysis>,
    /// Number of uploaded files
    pub total_files: usize,
    /// When the batch finished
    pub processing_date: DateTime<Utc>,
    /// Agent statistics
    pub agents_summary: AgentsSummary,
}

/// Runs uploaded files through extraction, routing and analysis
#[derive(Clone)]
pub struct IngestionService {
    router: Arc<DocumentRouter>,
    extractor: Arc<dyn TextExtractor>,
}

impl IngestionService {
    /// Create a service from a router and an extractor
    pub fn new(router: Arc<DocumentRouter>, extractor: Arc<dyn TextExtractor>) -> Self {
        Self { router, extractor }
    }

    /// Process every document concurrently; output order equals input order
    pub async fn process_batch(
        &self,
        documents: Vec<UploadedDocument>,
    ) -> Result<ProcessedBatch, AppError> {
        if documents.is_empty() {
            return Err(AppError::NoFiles);
        }

        let file_count = documents.len();
        info!(file_count, "Processing uploaded files");

        let tasks = documents.into_iter().map(|document| {
            let router = Arc::clone(&self.router);
            let fallback_router = Arc::clone(&self.router);
            let extractor = Arc::clone(&self.extractor);
            let metadata = UploadedDocument {
                name: document.name.clone(),
                mime_type: document.mime_type.clone(),
                size_bytes: document.size_bytes,
                bytes: Vec::new(),
            };

            async move {
                let handle = tokio::task::spawn_blocking(move || {
                    process_document(&router, extractor.as_ref(), &document)
                });
                match handle.await {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!(file = %metadata.name, error = %e, "File processing task failed");
                        let text = failure_placeholder(&metadata);
                        build_entry(&fallback_router, &metadata, text)
                    }
                }
            }
        });

        let processed_files = join_all(tasks).await;
        let batch = assemble_batch(processed_files);

        info!(
            file_count,
            agents = batch.agents_summary.total_agents,
            "Finished processing uploaded files"
        );
        Ok(batch)
    }
}

fn process_document(
    router: &DocumentRouter,
    extractor: &dyn TextExtractor,
    document: &UploadedDocument,
) -> ProcessedFile {
    match extractor.extract(document) {
        Ok(text) => build_entry(router, document, text),
        Err(e) => {
            warn!(file = %document.name, error = %e, "Text extraction failed");
            let text = failure_placeholder(document);
            build_entry(router, document, text)
        }
    }
}

fn build_entry(
    router: &DocumentRouter,
    document: &UploadedDocument,
    extracted_text: String,
) -> ProcessedFile {
    let assignment = router.assignment(&document.name, &extracted_text);
    let label = assignment.agent;

    ProcessedFile {
        name: document.name.clone(),
        document_type: classify_document_type(&document.name, &document.mime_type).to_string(),
        mime_type: document.mime_type.clone(),
        size: document.size_bytes,
        agent: label.display_name().to_string(),
        agent_id: label.id().to_string(),
        content_preview: preview(&extracted_text),
        extracted_text,
        agent_analysis: analyze(label),
        status: PROCESSED_STATUS,
        upload_date: assignment.assigned_at,
    }
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

/// Context block for one file, as injected into the chat prompt
pub fn context_entry(file: &ProcessedFile) -> String {
    format!(
        "Document: {} ({})\nAgent: {}\nAnalysis: {}\nKey Insights: {}\nRecommendations: {}\nContent: {}\n---",
        file.name,
        file.document_type,
        file.agent,
        file.agent_analysis.result,
        file.agent_analysis.insights.join(", "),
        file.agent_analysis.recommendations.join(", "),
        file.extracted_text,
    )
}

fn assemble_batch(processed_files: Vec<ProcessedFile>) -> ProcessedBatch {
    let document_context = processed_files
        .iter()
        .map(context_entry)
        .collect::<Vec<_>>()
        .join("\n\n");

    let agent_results: Vec<AgentAnalysis> = processed_files
        .iter()
        .map(|f| f.agent_analysis.clone())
        .collect();

    let mut agents_used: Vec<String> = Vec::new();
    let mut agent_usage: BTreeMap<String, usize> = BTreeMap::new();
    for file in &processed_files {
        if !agents_used.contains(&file.agent) {
            agents_used.push(file.agent.clone());
        }
        *agent_usage.entry(file.agent_id.clone()).or_insert(0) += 1;
    }

    let average_confidence = if agent_results.is_empty() {
        0.0
    } else {
        agent_results.iter().map(|r| f64::from(r.confidence)).sum::<f64>()
            / agent_results.len() as f64
    };

    ProcessedBatch {
        success: true,
        total_files: processed_files.len(),
        processed_files,
        document_context,
        agent_results,
        processing_date: Utc::now(),
        agents_summary: AgentsSummary {
            total_agents: agent_usage.len(),
            agents_used,
            agent_usage,
            average_confidence,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::extraction::{BasicTextExtractor, ExtractionError};

    fn service() -> IngestionService {
        IngestionService::new(
            Arc::new(DocumentRouter::default()),
            Arc::new(BasicTextExtractor),
        )
    }

    struct PanickingExtractor;

    impl TextExtractor for PanickingExtractor {
        fn extract(&self, document: &UploadedDocument) -> Result<String, ExtractionError> {
            if document.name.contains("boom") {
                panic!("extractor crashed");
            }
            BasicTextExtractor.extract(document)
        }
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected() {
        let result = service().process_batch(Vec::new()).await;
        assert!(matches!(result, Err(AppError::NoFiles)));
    }

    #[tokio::test]
    async fn test_order_and_count_are_preserved() {
        let documents = vec![
            UploadedDocument::new("crm_export.txt", "text/plain", b"accounts".to_vec()),
            UploadedDocument::new("notes.txt", "text/plain", b"Revenue up".to_vec()),
            UploadedDocument::new("deck.pdf", "application/pdf", vec![0u8; 10]),
            UploadedDocument::new("misc.txt", "text/plain", b"nothing".to_vec()),
        ];

        let batch = service().process_batch(documents).await.unwrap();

        let names: Vec<&str> = batch.processed_files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["crm_export.txt", "notes.txt", "deck.pdf", "misc.txt"]);
        assert_eq!(batch.total_files, 4);
        assert_eq!(batch.agent_results.len(), 4);

        let agents: Vec<&str> = batch.processed_files.iter().map(|f| f.agent_id.as_str()).collect();
        assert_eq!(agents, vec!["crm-agent", "sales-agent", "general-agent", "general-agent"]);

        assert_eq!(batch.agents_summary.total_agents, 3);
        assert_eq!(
            batch.agents_summary.agents_used,
            vec![
                "CRM Intelligence Agent".to_string(),
                "Sales Performance Agent".to_string(),
                "General Business Agent".to_string(),
            ]
        );
        assert_eq!(batch.agents_summary.agent_usage["general-agent"], 2);
        assert!((batch.agents_summary.average_confidence - 85.25).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_invalid_utf8_becomes_placeholder() {
        let documents = vec![
            UploadedDocument::new("good.txt", "text/plain", b"fine".to_vec()),
            UploadedDocument::new("bad.txt", "text/plain", vec![0xff, 0xfe]),
        ];

        let batch = service().process_batch(documents).await.unwrap();

        assert_eq!(batch.processed_files[0].extracted_text, "fine");
        let failed = &batch.processed_files[1];
        assert_eq!(failed.status, PROCESSED_STATUS);
        assert_eq!(
            failed.extracted_text,
            "Error processing bad.txt. File type: text/plain, Size: 2 bytes"
        );
    }

    #[tokio::test]
    async fn test_panicking_extractor_is_contained() {
        let service = IngestionService::new(
            Arc::new(DocumentRouter::default()),
            Arc::new(PanickingExtractor),
        );
        let documents = vec![
            UploadedDocument::new("boom_feedback.txt", "text/plain", b"x".to_vec()),
            UploadedDocument::new("after.txt", "text/plain", b"ok".to_vec()),
        ];

        let batch = service.process_batch(documents).await.unwrap();

        assert_eq!(batch.processed_files.len(), 2);
        let crashed = &batch.processed_files[0];
        assert!(crashed.extracted_text.starts_with("Error processing boom_feedback.txt"));
        assert!(crashed.extracted_text.ends_with("Size: 1 bytes"));
        assert_eq!(crashed.agent_id, "feedback-agent");
        assert_eq!(batch.processed_files[1].extracted_text, "ok");
    }

    #[tokio::test]
    async fn test_document_context_format() {
        let documents = vec![
            UploadedDocument::new("a.txt", "text/plain", b"first".to_vec()),
            UploadedDocument::new("b.txt", "text/plain", b"second".to_vec()),
        ];

        let batch = service().process_batch(documents).await.unwrap();
        let entries: Vec<&str> = batch.document_context.split("\n---\n\n").collect();

        assert_eq!(entries.len(), 2);
        assert!(entries[0].starts_with(
            "Document: a.txt (Text Document)\nAgent: General Business Agent\nAnalysis: "
        ));
        assert!(entries[0].contains("\nKey Insights: Document contains valuable business data, "));
        assert!(entries[0].ends_with("\nContent: first"));
        assert!(batch.document_context.ends_with("Content: second\n---"));
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let short = "héllo";
        assert_eq!(preview(short), short);

        let long = "é".repeat(PREVIEW_CHARS + 10);
        let p = preview(&long);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_batch_serializes_camel_case() {
        let entry = build_entry(
            &DocumentRouter::default(),
            &UploadedDocument::new("sales.csv", "text/csv", b"x".to_vec()),
            "x".to_string(),
        );
        let value = serde_json::to_value(assemble_batch(vec![entry])).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["totalFiles"], 1);
        let file = &value["processedFiles"][0];
        assert_eq!(file["type"], "Sales Report");
        assert_eq!(file["mimeType"], "text/csv");
        assert_eq!(file["agentId"], "sales-agent");
        assert_eq!(file["status"], "processed");
        assert!(file["agentAnalysis"]["keyMetrics"].is_object());
        assert_eq!(value["agentsSummary"]["agentUsage"]["sales-agent"], 1);
    }
}
