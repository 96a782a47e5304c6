//! Text cleaning: deterministic removal of boilerplate and noise.
//!
//! Occupational-health PDFs drown their findings in administrative clutter —
//! print URLs, page-break banners, timestamps, signature blocks, registry
//! footers. This module applies an ordered, fixed list of removal rules
//! followed by whitespace normalization and paragraph-break insertion around
//! the section keywords (CONCLUSIONES / RECOMENDACIONES / DIAGNÓSTICO).
//!
//! ## Rule Order
//!
//! Order matters: the whitespace-collapse rule runs after the removals so it
//! also cleans up the holes they leave behind, and keyword paragraph breaks
//! are inserted after horizontal whitespace is normalized so re-cleaning an
//! already-clean text reproduces it byte for byte (`clean_text` is
//! idempotent — see the tests).

use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered removal rules, each replacing its matches with the empty string.
///
/// All case-insensitive. `.` does not cross newlines, so the `.*` rules eat
/// the rest of the line only.
static REMOVAL_RULES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // 1. URLs
        r"(?i)https?://\S+",
        // 2. Page-break banners: === Página N de M ===
        r"(?i)===\s*Página.*?===",
        // 3. Timestamps: dd/mm/yy, h:mm a.m./p.m.
        r"(?i)\d{2}/\d{2}/\d{2},\s*\d{1,2}:\d{2}\s*(a|p)\.m\.",
        // 4. Modified-data annotation
        r"(?i)\(\*\)\s*Dato\s*Modificado",
        // 5. Signature-block lines
        r"(?i)Firma y Sello.*",
        r"(?i)Nombre,?\s*Firma.*",
        // 6. Print-format marker
        r"(?i)Formato de Impresion",
        // 7. Registry/revision footers
        r"(?i)Fecha de (Registro|Revisión).*",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("removal rule must compile"))
    .collect()
});

// 8. Runs of 2+ horizontal whitespace are removed outright (aggressive, as
// the source documents pad columns with huge space runs). Newline runs are
// handled separately so paragraph structure survives.
static RE_HSPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\S\n]{2,}").unwrap());

// Spaces hugging a newline belong to the newline.
static RE_SPACE_AROUND_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]*\n[ \t]*").unwrap());

// Any surviving horizontal run collapses to a single space.
static RE_HSPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

// Section keywords get a blank line before and a line break after, forcing
// a paragraph break. Adjacent whitespace is consumed by the match so the
// replacement is stable under re-application.
static RE_SECTION_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*\b(CONCLUSIONES|RECOMENDACIONES|DIAGN[ÓO]STICOS?)\b\s*").unwrap());

// 3+ consecutive newlines collapse to exactly 2 (one blank line).
static RE_NEWLINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Apply the full cleaning rule set to raw extracted text.
///
/// Pure and total: never fails, returns an empty string for empty input.
/// The output never contains a run of 3+ newlines, never has leading or
/// trailing whitespace, and cleaning it again changes nothing.
pub fn clean_text(raw: &str) -> String {
    let mut text = raw.to_string();
    for rule in REMOVAL_RULES.iter() {
        text = rule.replace_all(&text, "").into_owned();
    }
    let text = RE_HSPACE_RUN.replace_all(&text, "");
    let text = RE_SPACE_AROUND_NEWLINE.replace_all(&text, "\n");
    let text = RE_HSPACE.replace_all(&text, " ");
    let text = RE_SECTION_KEYWORD.replace_all(&text, "\n\n$1\n");
    let text = RE_NEWLINE_RUN.replace_all(&text, "\n\n");
    text.trim().to_string()
}
