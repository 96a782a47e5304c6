//! Summarization policy: LLM narrative or local extractive fallback.
//!
//! The path is chosen once per batch and never switched mid-batch:
//!
//! * **Local** when the batch exceeds the configured document threshold —
//!   large corpora have caused request timeouts and memory pressure, so this
//!   degradation is unconditional and silent-by-design.
//! * **LLM** otherwise. A missing credential on this path is fatal
//!   (the caller expected an LLM-quality report), and so is any failure from
//!   the provider — retrying a paid, slow call is a caller-level decision,
//!   not something this stage does behind the caller's back.

use crate::config::ReportConfig;
use crate::error::VipReportError;
use crate::pipeline::corpus::Corpus;
use crate::prompts;
use crate::summarizer::Summarizer;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

/// Maximum characters per category snippet on the local path.
const LOCAL_SNIPPET_CHARS: usize = 500;

/// Lines kept per category on the local path.
const LOCAL_SNIPPET_LINES: usize = 3;

/// Which summarization path a batch takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryPath {
    /// Send the corpus to the external summarizer.
    Llm,
    /// Produce a local extractive summary, no external calls.
    Local,
}

/// Decide the path for a batch of `doc_count` documents.
///
/// A batch of exactly `max_docs_for_llm` documents still uses the LLM;
/// one more tips over to the local path.
pub fn choose_path(doc_count: usize, config: &ReportConfig) -> SummaryPath {
    if doc_count > config.max_docs_for_llm {
        info!(
            "Batch of {doc_count} documents exceeds LLM threshold {}; using local summary",
            config.max_docs_for_llm
        );
        SummaryPath::Local
    } else {
        SummaryPath::Llm
    }
}

// ── Local path ───────────────────────────────────────────────────────────

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Deterministic extractive summary: per category, the first few lines of
/// its joined text, whitespace-collapsed and truncated.
///
/// Never fails; an empty corpus renders the pending-content marker.
pub fn local_summary(corpus: &Corpus) -> String {
    let parts: Vec<String> = corpus
        .iter()
        .map(|(category, texts)| {
            let joined = texts.join("\n");
            let head: Vec<&str> = joined.lines().take(LOCAL_SNIPPET_LINES).collect();
            let head_joined = head.join("\n");
            let snippet = RE_WHITESPACE.replace_all(head_joined.trim(), " ");
            format!("{}: {}", category, truncate_chars(&snippet, LOCAL_SNIPPET_CHARS))
        })
        .collect();

    if parts.is_empty() {
        "(Contenido pendiente)".to_string()
    } else {
        parts.join("\n\n")
    }
}

// ── LLM path ─────────────────────────────────────────────────────────────

/// Run the LLM path: truncate the corpus to the configured character
/// budget, call the summarizer, post-process the narrative.
///
/// Fails with [`VipReportError::Summarization`] on any provider failure,
/// including an empty response — the core never hands an empty body
/// downstream.
pub async fn llm_summary(
    summarizer: &dyn Summarizer,
    corpus_text: &str,
    config: &ReportConfig,
) -> Result<String, VipReportError> {
    let truncated = truncate_chars(corpus_text, config.max_corpus_chars);
    if truncated.len() < corpus_text.len() {
        debug!(
            "Corpus truncated from {} to {} bytes before summarization",
            corpus_text.len(),
            truncated.len()
        );
    }

    let instructions = config
        .system_prompt
        .as_deref()
        .unwrap_or(prompts::DEFAULT_SYSTEM_PROMPT);
    let prompt = prompts::task_prompt(truncated);

    let narrative = summarizer
        .summarize(instructions, &prompt)
        .await
        .map_err(|e| VipReportError::Summarization { detail: e.to_string() })?;

    let body = postprocess_narrative(&narrative);
    if body.is_empty() {
        return Err(VipReportError::Summarization {
            detail: "summarizer returned an empty narrative".into(),
        });
    }
    Ok(body)
}

/// Normalize the raw LLM narrative.
///
/// The line that opens the recommendations section (any casing, any
/// decoration after the word) is re-emitted as a canonical
/// `Recomendaciones:` header. Before that section, stray bullet and dash
/// markers are stripped from line starts — the body is prose; only the
/// recommendations keep their bullets.
pub fn postprocess_narrative(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut in_recommendations = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.to_lowercase().starts_with("recomendaciones") {
            in_recommendations = true;
            lines.push("Recomendaciones:".to_string());
            continue;
        }
        if !in_recommendations && (trimmed.starts_with('•') || trimmed.starts_with("- ")) {
            lines.push(trimmed.trim_start_matches(['•', '-', ' ']).trim().to_string());
            continue;
        }
        lines.push(line.to_string());
    }

    lines.join("\n").trim().to_string()
}

/// Truncate on a char boundary, never mid-UTF-8-sequence.
fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::classify::Category;
    use crate::summarizer::SummarizeError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn config_with_threshold(max: usize) -> ReportConfig {
        ReportConfig::builder().max_docs_for_llm(max).build().unwrap()
    }

    /// Fake that records the prompt it received and returns a canned body.
    struct RecordingSummarizer {
        received: Mutex<Option<String>>,
        body: &'static str,
    }

    #[async_trait]
    impl Summarizer for RecordingSummarizer {
        async fn summarize(&self, _: &str, corpus: &str) -> Result<String, SummarizeError> {
            *self.received.lock().unwrap() = Some(corpus.to_string());
            Ok(self.body.to_string())
        }
    }

    #[test]
    fn threshold_boundary_exactly_at_max_uses_llm() {
        let config = config_with_threshold(13);
        assert_eq!(choose_path(13, &config), SummaryPath::Llm);
    }

    #[test]
    fn threshold_boundary_one_over_max_uses_local() {
        let config = config_with_threshold(13);
        assert_eq!(choose_path(14, &config), SummaryPath::Local);
    }

    #[test]
    fn local_summary_takes_first_three_lines() {
        let mut corpus = Corpus::new();
        let ten_lines: String = (1..=10).map(|i| format!("linea {i}\n")).collect();
        corpus.push(Category::Laboratorio, ten_lines);

        let summary = local_summary(&corpus);
        assert_eq!(summary, "LABORATORIO: linea 1 linea 2 linea 3");
    }

    #[test]
    fn local_summary_truncates_at_500_chars() {
        let mut corpus = Corpus::new();
        corpus.push(Category::Otros, "x".repeat(2000));

        let summary = local_summary(&corpus);
        // "OTROS: " prefix plus exactly 500 snippet chars.
        assert_eq!(summary.chars().count(), "OTROS: ".chars().count() + 500);
    }

    #[test]
    fn local_summary_joins_categories_with_blank_lines() {
        let mut corpus = Corpus::new();
        corpus.push(Category::Laboratorio, "hemograma".into());
        corpus.push(Category::Cardiologia, "ekg".into());

        let summary = local_summary(&corpus);
        assert_eq!(summary, "LABORATORIO: hemograma\n\nCARDIOLOGIA: ekg");
    }

    #[test]
    fn local_summary_of_empty_corpus_is_pending_marker() {
        assert_eq!(local_summary(&Corpus::new()), "(Contenido pendiente)");
    }

    #[test]
    fn narrative_recommendations_header_is_canonicalised() {
        let raw = "Párrafo uno.\n\nRECOMENDACIONES GENERALES\n- Caminar 30 minutos.\n- Hidratarse.";
        let out = postprocess_narrative(raw);
        assert!(out.contains("Recomendaciones:"));
        assert!(!out.contains("RECOMENDACIONES GENERALES"));
        // Bullets inside the section survive.
        assert!(out.contains("- Caminar 30 minutos."));
    }

    #[test]
    fn narrative_bullets_outside_recommendations_are_stripped(){
        let raw = "- Hallazgo uno.\n• Hallazgo dos.\n\nRecomendaciones:\n- Dormir bien.";
        let out = postprocess_narrative(raw);
        assert!(out.starts_with("Hallazgo uno."));
        assert!(out.contains("Hallazgo dos."));
        assert!(out.contains("- Dormir bien."));
    }

    #[tokio::test]
    async fn whitespace_only_narrative_is_a_summarization_failure() {
        let summarizer = RecordingSummarizer {
            received: Mutex::new(None),
            body: "  \n ",
        };
        let config = ReportConfig::default();

        let err = llm_summary(&summarizer, "### LABORATORIO\nHemograma normal", &config)
            .await
            .unwrap_err();
        assert!(matches!(err, VipReportError::Summarization { .. }), "got: {err}");
    }

    #[tokio::test]
    async fn corpus_is_truncated_to_the_character_budget_before_the_call() {
        let summarizer = RecordingSummarizer {
            received: Mutex::new(None),
            body: "cuerpo",
        };
        let config = ReportConfig::builder().max_corpus_chars(50).build().unwrap();
        let corpus = format!("### LABORATORIO\n{}", "x".repeat(500));

        llm_summary(&summarizer, &corpus, &config).await.unwrap();

        let prompt = summarizer.received.lock().unwrap().take().unwrap();
        let budgeted: String = corpus.chars().take(50).collect();
        assert!(prompt.contains(&budgeted));
        // The 51st corpus character never reaches the summarizer.
        let over_budget: String = corpus.chars().take(51).collect();
        assert!(!prompt.contains(&over_budget));
    }

    #[test]
    fn truncate_chars_respects_utf8_boundaries() {
        let s = "ñandú ñandú";
        let t = truncate_chars(s, 7);
        assert_eq!(t, "ñandú ñ");
    }
}
