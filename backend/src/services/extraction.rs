//! Text extraction for uploaded files
//!
//! Plain text and CSV uploads are decoded; every other format gets a tagged
//! placeholder. Binary parsing belongs to an external extraction service that
//! would plug in behind [`TextExtractor`].

use thiserror::Error;

/// Number of CSV data rows included in the preview
pub const CSV_SAMPLE_ROWS: usize = 5;

/// A single uploaded file, alive for one ingestion pass
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    /// Original file name
    pub name: String,
    /// Declared MIME type (may be empty)
    pub mime_type: String,
    /// Size in bytes
    pub size_bytes: u64,
    /// Raw content
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    /// Create a document; the size is taken from the content
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes: bytes.len() as u64,
            bytes,
        }
    }

    fn has_type(&self, mime: &str, extension: &str) -> bool {
        self.mime_type.to_lowercase().contains(mime)
            || self.name.to_lowercase().ends_with(extension)
    }
}

/// Errors raised while extracting text from one file
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Text content was not valid UTF-8
    #[error("Invalid text encoding in {name}: {reason}")]
    InvalidEncoding {
        /// File name
        name: String,
        /// Decoder message
        reason: String,
    },
}

/// Turns an uploaded file into plain text
///
/// Implementations return best-effort text or a clearly tagged placeholder and
/// only fail on content they claim to support.
pub trait TextExtractor: Send + Sync {
    /// Extract text from `document`
    fn extract(&self, document: &UploadedDocument) -> Result<String, ExtractionError>;
}

/// Built-in extractor: text and CSV are read, everything else is a placeholder
#[derive(Debug, Clone, Default)]
pub struct BasicTextExtractor;

impl TextExtractor for BasicTextExtractor {
    fn extract(&self, document: &UploadedDocument) -> Result<String, ExtractionError> {
        if document.has_type("text/plain", ".txt") {
            return decode_utf8(document);
        }

        if document.has_type("text/csv", ".csv") {
            let text = decode_utf8(document)?;
            return Ok(summarize_csv(&text));
        }

        Ok(unsupported_placeholder(document))
    }
}

fn decode_utf8(document: &UploadedDocument) -> Result<String, ExtractionError> {
    String::from_utf8(document.bytes.clone()).map_err(|e| ExtractionError::InvalidEncoding {
        name: document.name.clone(),
        reason: e.to_string(),
    })
}

/// Summarize CSV text as its header, a few sample rows and the row count
pub fn summarize_csv(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').map(|l| l.trim_end_matches('\r')).collect();
    let headers: Vec<&str> = lines
        .first()
        .map(|h| h.split(',').map(str::trim).collect())
        .unwrap_or_default();

    let mut summary = format!(
        "CSV Data Analysis:\nHeaders: {}\n\nSample Data:\n",
        headers.join(", ")
    );
    for (index, row) in lines.iter().skip(1).take(CSV_SAMPLE_ROWS).enumerate() {
        if !row.trim().is_empty() {
            summary.push_str(&format!("Row {}: {}\n", index + 1, row));
        }
    }
    summary.push_str(&format!("\nTotal rows: {}", lines.len().saturating_sub(1)));
    summary
}

/// Placeholder text for formats that are not parsed
pub fn unsupported_placeholder(document: &UploadedDocument) -> String {
    let mime = if document.mime_type.is_empty() {
        "Unknown"
    } else {
        document.mime_type.as_str()
    };
    format!(
        "[Placeholder] Content extraction for {} ({}, {:.2} KB) is not implemented; \
         only file metadata is available.",
        document.name,
        mime,
        document.size_bytes as f64 / 1024.0
    )
}

/// In-band text used when extraction of a file failed
pub fn failure_placeholder(document: &UploadedDocument) -> String {
    format!(
        "Error processing {}. File type: {}, Size: {} bytes",
        document.name, document.mime_type, document.size_bytes
    )
}
