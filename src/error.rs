//! Error types for the vipreport library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`VipReportError`] — **Fatal**: the batch cannot produce a report body at
//!   all (no usable text in any PDF, missing API credential, summarizer
//!   failure). Returned as `Err(VipReportError)` from the top-level
//!   `generate*` functions.
//!
//! * [`DocumentError`] — **Non-fatal**: a single uploaded PDF could not be
//!   read (corrupt file, encrypted, not a PDF) but the rest of the batch is
//!   fine. Stored inside [`crate::output::DocumentRecord`]; the pipeline
//!   substitutes a placeholder text for that document and keeps going.
//!
//! The separation encodes the degradation policy directly in the types: a
//! bad file never aborts the batch, but a failed summarization always does —
//! the core never hands a partial or empty body to the document filler.

use thiserror::Error;

/// All fatal errors returned by the vipreport library.
///
/// Per-file failures use [`DocumentError`] and are stored in
/// [`crate::output::DocumentRecord`] rather than propagated here.
#[derive(Debug, Error)]
pub enum VipReportError {
    /// The batch contained no documents at all.
    #[error("No PDF documents were provided.\nAttach at least one PDF to the batch.")]
    EmptyBatch,

    /// Every document in the batch extracted to empty text.
    ///
    /// Rendering the corpus would produce an empty string, so there is
    /// nothing to summarize. Usually means the PDFs are scanned images with
    /// no text layer.
    #[error(
        "No usable text could be extracted from any PDF in the batch.\n\
         Scanned/image-only PDFs have no text layer; OCR is not supported."
    )]
    EmptyCorpus,

    /// The LLM path was selected but no API credential is configured.
    ///
    /// Deliberately fatal rather than degrading to the local summary: once
    /// the LLM path was expected, silently producing a lower-quality report
    /// would be worse than failing.
    #[error("No API credential configured for the summarizer.\n{hint}")]
    MissingCredential { hint: String },

    /// The external summarizer call failed (network, auth, quota, or an
    /// empty response). Not retried here — retry is a caller-level policy.
    #[error("Summarization failed: {detail}")]
    Summarization { detail: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single uploaded document.
///
/// Stored alongside [`crate::output::DocumentRecord`] when extraction fails.
/// The batch continues with a placeholder text for the affected file.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum DocumentError {
    /// The PDF could not be opened or parsed.
    #[error("'{name}': extraction failed: {detail}")]
    ExtractionFailed { name: String, detail: String },
}

impl DocumentError {
    /// The placeholder text substituted into the pipeline for this document,
    /// so downstream stages still see an entry for it.
    pub fn placeholder(&self) -> String {
        match self {
            DocumentError::ExtractionFailed { name, detail } => {
                format!("[ERROR leyendo {name}: {detail}]")
            }
        }
    }
}
