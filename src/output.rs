//! Input and output types for report generation.

use crate::error::DocumentError;
use crate::pipeline::classify::Category;
use serde::{Deserialize, Serialize};

/// One uploaded PDF, as handed to the pipeline.
///
/// The pipeline receives bytes, never paths — upload storage and template
/// discovery stay outside the core.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    /// Original file name, used in logs, error placeholders, and audit
    /// artifact names.
    pub name: String,
    /// Raw PDF bytes.
    pub bytes: Vec<u8>,
}

impl DocumentInput {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Per-document outcome: what one PDF contributed to the corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// 1-based upload ordinal.
    pub index: usize,
    /// Original file name.
    pub name: String,
    /// Size of the uploaded PDF in bytes.
    pub size_bytes: usize,
    /// Specialty this document was classified into.
    pub category: Category,
    /// Cleaned text that entered the corpus (placeholder text when
    /// extraction failed).
    pub cleaned: String,
    /// Set when extraction failed and `cleaned` holds the placeholder.
    pub error: Option<DocumentError>,
}

impl DocumentRecord {
    /// File name for the optional per-document audit artifact,
    /// e.g. `03_LABORATORIO.txt`.
    pub fn audit_file_name(&self) -> String {
        format!("{:02}_{}.txt", self.index, self.category)
    }
}

/// Result of a report-generation batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOutput {
    /// Final narrative body, ready for the document filler.
    pub body: String,
    /// The rendered corpus (insumo) the body was produced from. Kept for
    /// auditing; the filler only consumes `body`.
    pub corpus: String,
    /// Per-document records in upload order.
    pub documents: Vec<DocumentRecord>,
    /// Batch-level statistics.
    pub stats: BatchStats,
}

/// Statistics for one batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchStats {
    /// Documents in the batch.
    pub total_documents: usize,
    /// Documents whose text extracted successfully.
    pub extracted_documents: usize,
    /// Documents that fell back to a placeholder.
    pub failed_documents: usize,
    /// Distinct categories present in the corpus, in first-seen order.
    pub categories: Vec<Category>,
    /// Whether the LLM path produced the body (false = local fallback).
    pub used_llm: bool,
    /// Total uploaded bytes across the batch.
    pub total_input_bytes: usize,
    /// Wall-clock duration of the whole batch in milliseconds.
    pub total_duration_ms: u64,
    /// Time spent extracting, cleaning, and classifying.
    pub pipeline_duration_ms: u64,
    /// Time spent in summarization (LLM call or local fallback).
    pub summary_duration_ms: u64,
}
