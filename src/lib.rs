//! # vipreport
//!
//! Turn a batch of occupational-health PDFs into the narrative body of a
//! "VIP report": extract each PDF's text layer, strip administrative
//! boilerplate, classify every document into a medical specialty, group the
//! cleaned texts into a consolidated corpus, and summarize that corpus into
//! Spanish prose — via an LLM for normal batches, or a deterministic local
//! fallback when the batch is too large.
//!
//! ## Pipeline
//!
//! ```text
//! PDFs ──▶ extract ──▶ clean ──▶ classify ──▶ corpus ──▶ summarize ──▶ body
//!           (lopdf)    (regex)   (triggers)   (### CAT)  (LLM | local)
//! ```
//!
//! Per-document failures degrade: an unreadable PDF contributes a
//! placeholder text and the batch continues. Batch-level failures abort:
//! an empty batch, a corpus with no usable text, a missing credential on
//! the LLM path, or a failed summarizer call all return an error instead of
//! a hollow report.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use vipreport::{generate_sync, DocumentInput, ReportConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let docs = vec![
//!         DocumentInput::new("laboratorio.pdf", std::fs::read("laboratorio.pdf")?),
//!         DocumentInput::new("ekg.pdf", std::fs::read("ekg.pdf")?),
//!     ];
//!     let config = ReportConfig::from_env();
//!     let report = generate_sync(&docs, &config)?;
//!     println!("{}", report.body);
//!     Ok(())
//! }
//! ```
//!
//! Tests (and embedders with their own LLM plumbing) inject a
//! [`Summarizer`] through [`ReportConfig::builder`], which bypasses
//! provider construction and the credential check entirely.

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod summarizer;

pub use config::{ReportConfig, ReportConfigBuilder};
pub use error::{DocumentError, VipReportError};
pub use output::{BatchStats, DocumentInput, DocumentRecord, ReportOutput};
pub use pipeline::classify::{classify, Category};
pub use pipeline::clean::clean_text;
pub use pipeline::corpus::Corpus;
pub use report::{generate, generate_sync};
pub use summarizer::{ChatSummarizer, SummarizeError, Summarizer};
