//! Text extraction: PDF bytes to raw page text.
//!
//! Uses `lopdf` to pull the text layer page by page. Pages with no
//! extractable text are skipped outright — they are not represented by empty
//! placeholders — and the remaining pages are joined with a blank line in
//! document order. A PDF with no text layer at all yields an empty string,
//! which is a valid (non-error) result; the corpus builder decides later
//! whether the batch as a whole had anything usable.
//!
//! Failure here is strictly per-file: the caller substitutes a placeholder
//! and the batch continues (see [`crate::error::DocumentError`]).

use crate::error::DocumentError;
use lopdf::Document;
use tracing::debug;

/// Extract the concatenated page text of one PDF.
///
/// `name` identifies the file in the error; it is not used for I/O.
pub fn extract_text(name: &str, bytes: &[u8]) -> Result<String, DocumentError> {
    let doc = Document::load_mem(bytes).map_err(|e| DocumentError::ExtractionFailed {
        name: name.to_string(),
        detail: e.to_string(),
    })?;

    let mut parts: Vec<String> = Vec::new();
    for page_num in doc.get_pages().keys() {
        // A page that fails to decode is treated the same as a page with no
        // text layer: skipped, without failing the file.
        let text = match doc.extract_text(&[*page_num]) {
            Ok(t) => t,
            Err(e) => {
                debug!("'{name}' page {page_num}: no extractable text ({e})");
                continue;
            }
        };
        let text = text.trim();
        if !text.is_empty() {
            parts.push(text.to_string());
        }
    }

    debug!(
        "'{name}': {} of {} pages had extractable text",
        parts.len(),
        doc.get_pages().len()
    );

    Ok(parts.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_with_file_name() {
        let err = extract_text("roto.pdf", b"definitely not a pdf").unwrap_err();
        let DocumentError::ExtractionFailed { name, .. } = err;
        assert_eq!(name, "roto.pdf");
    }

    #[test]
    fn empty_bytes_fail() {
        assert!(extract_text("vacio.pdf", &[]).is_err());
    }
}
