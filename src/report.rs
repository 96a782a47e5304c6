//! Batch orchestration: PDFs in, report body out.
//!
//! [`generate`] runs the full pipeline over one batch: per-document
//! extraction, cleaning, and classification, then corpus rendering and the
//! summarization-path decision. Per-document failures degrade to placeholder
//! text; batch-level failures (empty batch, empty corpus, missing
//! credential, summarizer failure) abort with a [`VipReportError`].
//!
//! [`generate_sync`] wraps the async entry point for callers without a
//! runtime.

use crate::config::ReportConfig;
use crate::error::VipReportError;
use crate::output::{BatchStats, DocumentInput, DocumentRecord, ReportOutput};
use crate::pipeline::classify::classify;
use crate::pipeline::clean::clean_text;
use crate::pipeline::corpus::Corpus;
use crate::pipeline::extract::extract_text;
use crate::pipeline::summarize::{choose_path, llm_summary, local_summary, SummaryPath};
use crate::summarizer::ChatSummarizer;
use std::time::Instant;
use tracing::{info, warn};

/// Prefix on the body when the batch size forced the local path.
const LLM_SKIPPED_NOTICE: &str = "(Se omitió IA por carga alta)";

/// Generate the VIP-report body for one batch of PDFs.
///
/// Documents are processed in the given order; that order fixes the corpus
/// group order and the 1-based indices in the per-document records.
///
/// # Errors
///
/// * [`VipReportError::EmptyBatch`] — `documents` is empty.
/// * [`VipReportError::EmptyCorpus`] — no document contributed any text.
/// * [`VipReportError::MissingCredential`] — LLM path with no credential
///   and no injected summarizer.
/// * [`VipReportError::Summarization`] — the summarizer call failed or
///   returned an empty narrative.
pub async fn generate(
    documents: &[DocumentInput],
    config: &ReportConfig,
) -> Result<ReportOutput, VipReportError> {
    if documents.is_empty() {
        return Err(VipReportError::EmptyBatch);
    }

    let batch_start = Instant::now();
    info!("Processing batch of {} documents", documents.len());

    let mut corpus = Corpus::new();
    let mut records = Vec::with_capacity(documents.len());
    let mut failed = 0usize;
    let mut total_input_bytes = 0usize;

    for (i, doc) in documents.iter().enumerate() {
        total_input_bytes += doc.bytes.len();

        let (text, error) = match extract_text(&doc.name, &doc.bytes) {
            Ok(t) => (t, None),
            Err(e) => {
                warn!("'{}' could not be read, continuing with placeholder: {e}", doc.name);
                failed += 1;
                (e.placeholder(), Some(e))
            }
        };

        let cleaned = clean_text(&text);
        let category = classify(&cleaned);
        corpus.push(category, cleaned.clone());

        records.push(DocumentRecord {
            index: i + 1,
            name: doc.name.clone(),
            size_bytes: doc.bytes.len(),
            category,
            cleaned,
            error,
        });
    }

    let corpus_text = corpus.render()?;
    let pipeline_duration_ms = batch_start.elapsed().as_millis() as u64;

    let summary_start = Instant::now();
    let path = if config.force_local {
        info!("Local summary forced by configuration");
        SummaryPath::Local
    } else {
        choose_path(documents.len(), config)
    };
    let (body, used_llm) = match path {
        SummaryPath::Local => {
            let summary = local_summary(&corpus);
            // The notice explains an over-threshold degradation; a forced
            // local run was the caller's choice and carries none.
            let body = if config.force_local {
                summary
            } else {
                format!("{LLM_SKIPPED_NOTICE}\n\n{summary}")
            };
            (body, false)
        }
        SummaryPath::Llm => {
            let body = match &config.summarizer {
                Some(summarizer) => llm_summary(summarizer.as_ref(), &corpus_text, config).await?,
                None => {
                    let summarizer = ChatSummarizer::from_config(config)?;
                    llm_summary(&summarizer, &corpus_text, config).await?
                }
            };
            (body, true)
        }
    };
    let summary_duration_ms = summary_start.elapsed().as_millis() as u64;

    let stats = BatchStats {
        total_documents: documents.len(),
        extracted_documents: documents.len() - failed,
        failed_documents: failed,
        categories: corpus.categories(),
        used_llm,
        total_input_bytes,
        total_duration_ms: batch_start.elapsed().as_millis() as u64,
        pipeline_duration_ms,
        summary_duration_ms,
    };

    info!(
        "Batch done in {} ms ({} categories, llm: {used_llm})",
        stats.total_duration_ms,
        stats.categories.len()
    );

    Ok(ReportOutput {
        body,
        corpus: corpus_text,
        documents: records,
        stats,
    })
}

/// Blocking wrapper around [`generate`] for synchronous callers.
///
/// Creates a throwaway tokio runtime; do not call from inside an async
/// context.
pub fn generate_sync(
    documents: &[DocumentInput],
    config: &ReportConfig,
) -> Result<ReportOutput, VipReportError> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| VipReportError::Internal(format!("failed to create tokio runtime: {e}")))?;
    runtime.block_on(generate(documents, config))
}
