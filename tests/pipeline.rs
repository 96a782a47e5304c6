//! End-to-end pipeline tests over generated PDFs.
//!
//! Fixtures are built in memory with `lopdf`, so the suite needs no binary
//! files and no network. The summarizer is replaced by deterministic fakes
//! injected through `ReportConfig`; only the credential-failure test runs
//! without one.

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::sync::Arc;
use vipreport::{
    generate, Category, DocumentInput, ReportConfig, SummarizeError, Summarizer, VipReportError,
};

/// Build a single-page PDF whose text layer holds `text` (one Tj per line).
fn make_pdf(text: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("Td", vec![50.into(), 700.into()]),
    ];
    for line in text.lines() {
        operations.push(Operation::new("Tj", vec![Object::string_literal(line)]));
        operations.push(Operation::new("Td", vec![0.into(), (-14).into()]));
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("content encodes"),
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("pdf serialises");
    buf
}

/// Summarizer that returns a canned narrative.
struct FakeSummarizer {
    body: &'static str,
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, _: &str, _: &str) -> Result<String, SummarizeError> {
        Ok(self.body.to_string())
    }
}

/// Summarizer that always fails, like an exhausted quota.
struct FailingSummarizer;

#[async_trait]
impl Summarizer for FailingSummarizer {
    async fn summarize(&self, _: &str, _: &str) -> Result<String, SummarizeError> {
        Err(SummarizeError("HTTP 429: rate limit".into()))
    }
}

fn config_with_fake(body: &'static str) -> ReportConfig {
    ReportConfig::builder()
        .summarizer(Arc::new(FakeSummarizer { body }))
        .build()
        .unwrap()
}

#[tokio::test]
async fn mixed_batch_classifies_and_orders_the_corpus() {
    let docs = [
        DocumentInput::new("lab.pdf", make_pdf("INFORME DE LABORATORIO\nHEMOGRAMA normal")),
        DocumentInput::new("ekg.pdf", make_pdf("ELECTROCARDIOGRAFIA en reposo: ritmo sinusal")),
        DocumentInput::new("memo.pdf", make_pdf("Constancia de asistencia del trabajador")),
    ];
    let config = config_with_fake("Usted presenta valores dentro de rangos normales.");

    let report = generate(&docs, &config).await.unwrap();

    assert_eq!(
        report.stats.categories,
        vec![Category::Laboratorio, Category::Cardiologia, Category::Otros]
    );
    let lab = report.corpus.find("### LABORATORIO").unwrap();
    let cardio = report.corpus.find("### CARDIOLOGIA").unwrap();
    let otros = report.corpus.find("### OTROS").unwrap();
    assert!(lab < cardio && cardio < otros, "corpus: {}", report.corpus);

    assert!(report.stats.used_llm);
    assert_eq!(report.body, "Usted presenta valores dentro de rangos normales.");
    assert_eq!(report.documents.len(), 3);
    assert_eq!(report.documents[0].category, Category::Laboratorio);
    assert_eq!(report.documents[2].category, Category::Otros);
}

#[tokio::test]
async fn unreadable_file_degrades_to_placeholder_and_batch_continues() {
    let docs = [
        DocumentInput::new("lab.pdf", make_pdf("HEMOGRAMA normal")),
        DocumentInput::new("roto.pdf", b"this is not a pdf at all".to_vec()),
    ];
    let config = config_with_fake("Cuerpo generado.");

    let report = generate(&docs, &config).await.unwrap();

    assert_eq!(report.stats.failed_documents, 1);
    assert_eq!(report.stats.extracted_documents, 1);

    let broken = &report.documents[1];
    assert!(broken.error.is_some());
    assert!(broken.cleaned.starts_with("[ERROR leyendo roto.pdf"), "got: {}", broken.cleaned);
    // The placeholder enters the corpus like any other text.
    assert!(report.corpus.contains("[ERROR leyendo roto.pdf"));
}

#[tokio::test]
async fn batch_at_threshold_uses_llm() {
    let docs: Vec<DocumentInput> = (0..13)
        .map(|i| DocumentInput::new(format!("doc{i}.pdf"), make_pdf("HEMOGRAMA normal")))
        .collect();
    let config = config_with_fake("Narrativa del informe.");

    let report = generate(&docs, &config).await.unwrap();
    assert!(report.stats.used_llm);
    assert_eq!(report.body, "Narrativa del informe.");
}

#[tokio::test]
async fn batch_over_threshold_uses_local_summary() {
    let docs: Vec<DocumentInput> = (0..14)
        .map(|i| DocumentInput::new(format!("doc{i}.pdf"), make_pdf("HEMOGRAMA normal")))
        .collect();
    // A fake is injected but must not be called.
    let config = config_with_fake("NO DEBE APARECER");

    let report = generate(&docs, &config).await.unwrap();
    assert!(!report.stats.used_llm);
    assert!(report.body.starts_with("(Se omitió IA por carga alta)"), "got: {}", report.body);
    assert!(report.body.contains("LABORATORIO:"));
    assert!(!report.body.contains("NO DEBE APARECER"));
}

#[tokio::test]
async fn forced_local_run_carries_no_over_threshold_notice() {
    let docs = [DocumentInput::new("lab.pdf", make_pdf("HEMOGRAMA normal"))];
    // A fake is injected but must not be called.
    let config = ReportConfig::builder()
        .summarizer(Arc::new(FakeSummarizer { body: "NO DEBE APARECER" }))
        .force_local(true)
        .build()
        .unwrap();

    let report = generate(&docs, &config).await.unwrap();
    assert!(!report.stats.used_llm);
    assert!(report.body.starts_with("LABORATORIO:"), "got: {}", report.body);
    assert!(!report.body.contains("(Se omitió IA por carga alta)"));
    assert!(!report.body.contains("NO DEBE APARECER"));
}

#[tokio::test]
async fn llm_path_without_credential_fails() {
    let docs = [DocumentInput::new("lab.pdf", make_pdf("HEMOGRAMA normal"))];
    let config = ReportConfig::builder().build().unwrap();

    let err = generate(&docs, &config).await.unwrap_err();
    assert!(matches!(err, VipReportError::MissingCredential { .. }), "got: {err}");
}

#[tokio::test]
async fn summarizer_failure_aborts_the_batch() {
    let docs = [DocumentInput::new("lab.pdf", make_pdf("HEMOGRAMA normal"))];
    let config = ReportConfig::builder()
        .summarizer(Arc::new(FailingSummarizer))
        .build()
        .unwrap();

    let err = generate(&docs, &config).await.unwrap_err();
    match err {
        VipReportError::Summarization { detail } => assert!(detail.contains("429")),
        other => panic!("expected Summarization, got {other}"),
    }
}

#[tokio::test]
async fn batch_with_no_usable_text_fails_with_empty_corpus() {
    let docs = [
        DocumentInput::new("blanco1.pdf", make_pdf("")),
        DocumentInput::new("blanco2.pdf", make_pdf("")),
    ];
    let config = config_with_fake("no llega aquí");

    let err = generate(&docs, &config).await.unwrap_err();
    assert!(matches!(err, VipReportError::EmptyCorpus), "got: {err}");
}

#[tokio::test]
async fn empty_batch_is_rejected() {
    let config = config_with_fake("no llega aquí");
    let err = generate(&[], &config).await.unwrap_err();
    assert!(matches!(err, VipReportError::EmptyBatch));
}

#[tokio::test]
async fn audit_artifacts_follow_index_and_category() {
    let docs = [
        DocumentInput::new("a.pdf", make_pdf("HEMOGRAMA normal")),
        DocumentInput::new("b.pdf", make_pdf("ECOGRAFIA ABDOMINAL sin hallazgos")),
    ];
    let config = config_with_fake("cuerpo");

    let report = generate(&docs, &config).await.unwrap();
    assert_eq!(report.documents[0].audit_file_name(), "01_LABORATORIO.txt");
    assert_eq!(report.documents[1].audit_file_name(), "02_ECOGRAFIA ABDOMINAL.txt");

    // Writing the artifacts (what the CLI does with --audit-dir).
    let dir = tempfile::tempdir().unwrap();
    for record in &report.documents {
        std::fs::write(dir.path().join(record.audit_file_name()), &record.cleaned).unwrap();
    }
    let written = std::fs::read_to_string(dir.path().join("01_LABORATORIO.txt")).unwrap();
    assert!(written.contains("HEMOGRAMA"));
}

#[test]
fn generate_sync_runs_without_an_ambient_runtime() {
    let docs = [DocumentInput::new("lab.pdf", make_pdf("HEMOGRAMA normal"))];
    let config = config_with_fake("Cuerpo síncrono.");

    let report = vipreport::generate_sync(&docs, &config).unwrap();
    assert_eq!(report.body, "Cuerpo síncrono.");
    assert!(report.stats.used_llm);
}

#[tokio::test]
async fn boilerplate_never_reaches_the_corpus() {
    let raw = "EXAMEN DE LABORATORIO\n=== Página 1 de 2 ===\nGlucosa 92 mg/dL\nFirma y Sello Dr. Quispe";
    let docs = [DocumentInput::new("lab.pdf", make_pdf(raw))];
    let config = config_with_fake("cuerpo");

    let report = generate(&docs, &config).await.unwrap();
    assert!(report.corpus.contains("Glucosa 92 mg/dL"));
    assert!(!report.corpus.contains("Página"));
    assert!(!report.corpus.contains("Firma"));
}
