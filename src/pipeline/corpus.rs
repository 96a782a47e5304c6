//! Corpus assembly: category-grouped consolidation of cleaned texts.
//!
//! The corpus (insumo) is the single text handed to summarization. Groups
//! appear in first-seen category order and texts keep their upload order
//! within a group, so the rendering is deterministic for a given batch.
//! Empty cleaned texts are dropped at insertion — a document with nothing to
//! say contributes no group, and a batch where every document is empty
//! renders nothing and fails instead of producing a headers-only corpus.

use crate::error::VipReportError;
use crate::pipeline::classify::Category;

/// Category-grouped cleaned texts, insertion-ordered both across and within
/// groups.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    groups: Vec<(Category, Vec<String>)>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one cleaned text under its category. Empty (whitespace-only)
    /// texts are ignored.
    pub fn push(&mut self, category: Category, cleaned: String) {
        if cleaned.trim().is_empty() {
            return;
        }
        match self.groups.iter_mut().find(|(c, _)| *c == category) {
            Some((_, texts)) => texts.push(cleaned),
            None => self.groups.push((category, vec![cleaned])),
        }
    }

    /// True when no document contributed any text.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Categories present, in first-seen order.
    pub fn categories(&self) -> Vec<Category> {
        self.groups.iter().map(|(c, _)| *c).collect()
    }

    /// Iterate groups in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> {
        self.groups.iter().map(|(c, texts)| (*c, texts.as_slice()))
    }

    /// Render the consolidated corpus: one `### <CATEGORY>` block per group,
    /// texts newline-joined within a block, blocks separated by a blank
    /// line.
    ///
    /// Fails with [`VipReportError::EmptyCorpus`] when there is nothing to
    /// render — the caller must surface this as a precondition failure, not
    /// pass an empty corpus downstream.
    pub fn render(&self) -> Result<String, VipReportError> {
        if self.is_empty() {
            return Err(VipReportError::EmptyCorpus);
        }
        let blocks: Vec<String> = self
            .groups
            .iter()
            .map(|(category, texts)| format!("### {}\n{}", category, texts.join("\n")))
            .collect();
        let rendered = blocks.join("\n\n").trim().to_string();
        if rendered.is_empty() {
            return Err(VipReportError::EmptyCorpus);
        }
        Ok(rendered)
    }
}
