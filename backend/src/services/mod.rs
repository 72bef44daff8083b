//! Service layer for business logic
//!
//! This module contains service abstractions that separate business logic
//! from HTTP handlers, making the code more modular and testable.

pub mod analysis;
pub mod extraction;
pub mod ingestion;

pub use analysis::{analyze, AgentAnalysis};
pub use extraction::{BasicTextExtractor, ExtractionError, TextExtractor, UploadedDocument};
pub use ingestion::{IngestionService, ProcessedBatch, ProcessedFile};
