//! CLI binary for vipreport.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ReportConfig`, reads the PDFs, and prints the report body.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vipreport::{generate, DocumentInput, ReportConfig};

const AFTER_HELP: &str = r#"EXAMPLES:
  # Generate a report body from a batch of exam PDFs (stdout)
  vipreport laboratorio.pdf ekg.pdf espirometria.pdf

  # Write the body to a file
  vipreport exams/*.pdf -o cuerpo.txt

  # Keep per-document audit artifacts (01_LABORATORIO.txt, …)
  vipreport exams/*.pdf --audit-dir ./audit

  # Force the local extractive summary (no API key needed)
  vipreport exams/*.pdf --local

  # Structured JSON output (body, corpus, per-document records, stats)
  vipreport exams/*.pdf --json > report.json

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          API credential for the summarizer
  OPENAI_MODEL            Model ID (default: gpt-4o-mini)
  OPENAI_REQUEST_TIMEOUT  Per-call timeout in seconds (default: 60)
  MAX_PDFS_IA             Largest batch still sent to the LLM (default: 13)
  MAX_CHARS_GPT           Corpus character budget for the LLM (default: 12000)

SETUP:
  1. Set API key:     export OPENAI_API_KEY=sk-...
  2. Generate:        vipreport exams/*.pdf -o cuerpo.txt
"#;

/// Generate the narrative body of a VIP occupational-health report.
#[derive(Parser, Debug)]
#[command(
    name = "vipreport",
    version,
    about = "Generate the narrative body of a VIP occupational-health report from exam PDFs",
    long_about = "Extracts the text layer of each exam PDF, strips administrative boilerplate, \
classifies every document into a medical specialty, consolidates the cleaned texts into a \
corpus, and summarizes it into Spanish prose via an LLM (or a local extractive fallback for \
oversized batches).",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Exam PDF files, in the order they should appear in the corpus.
    pdfs: Vec<PathBuf>,

    /// Write the report body to this file instead of stdout.
    #[arg(short, long, env = "VIPREPORT_OUTPUT")]
    output: Option<PathBuf>,

    /// Write per-document audit artifacts (NN_CATEGORY.txt) to this directory.
    #[arg(long, env = "VIPREPORT_AUDIT_DIR")]
    audit_dir: Option<PathBuf>,

    /// LLM model ID (e.g. gpt-4o-mini).
    #[arg(long, env = "OPENAI_MODEL")]
    model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama.
    #[arg(long, env = "VIPREPORT_PROVIDER")]
    provider: Option<String>,

    /// Largest batch still sent to the LLM.
    #[arg(long, env = "MAX_PDFS_IA")]
    max_docs: Option<usize>,

    /// Corpus character budget for the LLM call.
    #[arg(long, env = "MAX_CHARS_GPT")]
    max_chars: Option<usize>,

    /// Force the local extractive summary (no LLM call, no API key needed).
    #[arg(long)]
    local: bool,

    /// Output structured JSON (body, corpus, records, stats) instead of text.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "VIPREPORT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "VIPREPORT_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Read inputs ──────────────────────────────────────────────────────
    let mut documents = Vec::with_capacity(cli.pdfs.len());
    for path in &cli.pdfs {
        let is_pdf = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if !is_pdf {
            eprintln!("Skipping {} (not a .pdf file)", path.display());
            continue;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        documents.push(DocumentInput::new(name, bytes));
    }

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli)?;

    // ── Generate ─────────────────────────────────────────────────────────
    let report = generate(&documents, &config)
        .await
        .context("Report generation failed")?;

    if let Some(ref dir) = cli.audit_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create audit directory {}", dir.display()))?;
        for record in &report.documents {
            let path = dir.join(record.audit_file_name());
            std::fs::write(&path, &record.cleaned)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        if !cli.quiet {
            eprintln!(
                "Wrote {} audit files to {}",
                report.documents.len(),
                dir.display()
            );
        }
    }

    // ── Output ───────────────────────────────────────────────────────────
    let rendered = if cli.json {
        serde_json::to_string_pretty(&report).context("Failed to serialise output")?
    } else {
        report.body.clone()
    };

    if let Some(ref path) = cli.output {
        std::fs::write(path, &rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if !cli.quiet {
            eprintln!(
                "{} documents ({} categories, llm: {}) → {}",
                report.stats.total_documents,
                report.stats.categories.len(),
                report.stats.used_llm,
                path.display()
            );
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(rendered.as_bytes())
            .context("Failed to write to stdout")?;
        if !rendered.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
        if !cli.quiet && !cli.json {
            eprintln!(
                "{} documents in {}ms (llm: {})",
                report.stats.total_documents,
                report.stats.total_duration_ms,
                report.stats.used_llm
            );
        }
    }

    Ok(())
}

/// Map CLI args to `ReportConfig`.
fn build_config(cli: &Cli) -> Result<ReportConfig> {
    let mut config = ReportConfig::from_env();

    if let Some(n) = cli.max_docs {
        config.max_docs_for_llm = n;
    }
    if let Some(n) = cli.max_chars {
        config.max_corpus_chars = n;
    }
    if cli.model.is_some() {
        config.model = cli.model.clone();
    }
    if cli.provider.is_some() {
        config.provider_name = cli.provider.clone();
    }
    if cli.local {
        config.force_local = true;
    }

    Ok(config)
}
