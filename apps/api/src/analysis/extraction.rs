//! PDF text extraction.
//!
//! The document is opened with `lopdf` and every page is checked for
//! structural damage first: content streams must resolve and decode, and
//! `Resources` must be a dictionary. Damaged pages are skipped and reported
//! as warnings. Text for the remaining pages comes from `pdf_extract`, which
//! can panic on malformed input and is wrapped in `catch_unwind`; when it
//! fails, `lopdf` extracts the healthy pages one at a time.

use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};

use lopdf::{Document, Object, ObjectId, Stream};
use thiserror::Error;
use tracing::{debug, warn};

const PREVIEW_CHARS: usize = 1000;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Error reading PDF: {0}")]
    Unreadable(String),
}

/// Text pulled out of an uploaded resume.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedText {
    /// Readable page texts in document order, each followed by a newline.
    pub text: String,
    /// Pages in the document, skipped ones included.
    pub page_count: usize,
    /// One entry per skipped page, in page order.
    pub warnings: Vec<String>,
}

impl ExtractedText {
    pub fn has_readable_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// CPU-bound; call from `spawn_blocking` when on the async runtime.
pub fn extract_resume_text(data: &[u8]) -> Result<ExtractedText, ExtractionError> {
    let doc = Document::load_mem(data).map_err(|e| ExtractionError::Unreadable(e.to_string()))?;

    // keyed by 1-based page number, already in order
    let pages: Vec<(u32, ObjectId)> = doc.get_pages().into_iter().collect();

    let mut skipped = BTreeSet::new();
    for &(page_num, page_id) in &pages {
        if let Err(reason) = check_page(&doc, page_id) {
            warn!("Skipping page {page_num}: {reason}");
            skipped.insert(page_num);
        }
    }
    let readable: Vec<u32> = pages
        .iter()
        .map(|&(page_num, _)| page_num)
        .filter(|page_num| !skipped.contains(page_num))
        .collect();

    let texts = match extract_with_pdf_extract(data) {
        Ok(all) if all.len() == pages.len() => {
            debug!("pdf-extract read {} page(s)", all.len());
            pages
                .iter()
                .zip(all)
                .filter(|((page_num, _), _)| !skipped.contains(page_num))
                .map(|(_, text)| text)
                .collect()
        }
        Ok(all) => {
            warn!(
                "pdf-extract returned {} page(s) for a {}-page document; extracting page by page",
                all.len(),
                pages.len()
            );
            extract_with_lopdf(&doc, &readable, &mut skipped)
        }
        Err(primary) => {
            warn!("pdf-extract failed ({primary}); extracting page by page");
            extract_with_lopdf(&doc, &readable, &mut skipped)
        }
    };

    Ok(ExtractedText {
        text: join_pages(texts),
        page_count: pages.len(),
        warnings: skipped.into_iter().map(page_warning).collect(),
    })
}

fn extract_with_pdf_extract(data: &[u8]) -> Result<Vec<String>, String> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(data)
    }));
    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("extraction panicked (malformed document)".to_string()),
    }
}

/// Extracts each listed page on its own. A page that errors or panics joins `skipped`.
fn extract_with_lopdf(
    doc: &Document,
    page_numbers: &[u32],
    skipped: &mut BTreeSet<u32>,
) -> Vec<String> {
    let mut texts = Vec::with_capacity(page_numbers.len());
    for &page_num in page_numbers {
        let result = panic::catch_unwind(AssertUnwindSafe(|| doc.extract_text(&[page_num])));
        match result {
            Ok(Ok(text)) => texts.push(text),
            Ok(Err(e)) => {
                warn!("Skipping page {page_num}: {e}");
                skipped.insert(page_num);
            }
            Err(_) => {
                warn!("Skipping page {page_num}: extraction panicked");
                skipped.insert(page_num);
            }
        }
    }
    texts
}

/// A page is readable when its `Resources` (if present) is a dictionary and every
/// content stream resolves and decodes. A page without `Contents` is blank, not broken.
fn check_page(doc: &Document, page_id: ObjectId) -> Result<(), String> {
    let page = doc.get_dictionary(page_id).map_err(|e| e.to_string())?;

    if let Ok(resources) = page.get(b"Resources") {
        resolve(doc, resources)?
            .as_dict()
            .map_err(|_| "Resources is not a dictionary".to_string())?;
    }

    let Ok(contents) = page.get(b"Contents") else {
        return Ok(());
    };
    match resolve(doc, contents)? {
        Object::Stream(stream) => check_stream(stream),
        Object::Array(parts) => parts.iter().try_for_each(|part| match resolve(doc, part)? {
            Object::Stream(stream) => check_stream(stream),
            _ => Err("Contents array holds a non-stream object".to_string()),
        }),
        _ => Err("Contents is not a stream".to_string()),
    }
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Result<&'a Object, String> {
    match object {
        Object::Reference(id) => doc
            .get_object(*id)
            .map_err(|e| format!("object {} {} cannot be resolved: {e}", id.0, id.1)),
        other => Ok(other),
    }
}

fn check_stream(stream: &Stream) -> Result<(), String> {
    // unfiltered streams are plain bytes
    if !stream.dict.has(b"Filter") {
        return Ok(());
    }
    stream
        .decompressed_content()
        .map(|_| ())
        .map_err(|e| format!("content stream cannot be decoded: {e}"))
}

fn page_warning(page_num: u32) -> String {
    format!("Warning: Could not extract text from page {page_num}")
}

fn join_pages(pages: Vec<String>) -> String {
    let mut text = String::with_capacity(pages.iter().map(|p| p.len() + 1).sum());
    for page in pages {
        text.push_str(&page);
        text.push('\n');
    }
    text
}

/// First 1000 characters of the extracted text, with `...` appended when truncated.
pub fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::{build_pdf, build_pdf_with_defect, PageDefect};

    const THREE_PAGES: [&str; 3] = ["Rustacean", "Kubernetes", "Terraform"];

    fn assert_second_page_skipped(defect: PageDefect) {
        let pdf = build_pdf_with_defect(&THREE_PAGES, 1, defect);
        let extracted = extract_resume_text(&pdf).unwrap();

        assert_eq!(extracted.page_count, 3);
        assert_eq!(
            extracted.warnings,
            vec!["Warning: Could not extract text from page 2".to_string()]
        );
        let first = extracted.text.find("Rustacean").unwrap();
        let third = extracted.text.find("Terraform").unwrap();
        assert!(first < third);
        assert!(!extracted.text.contains("Kubernetes"));
    }

    #[test]
    fn test_extracts_text_from_every_page() {
        let pdf = build_pdf(&["Rustacean", "Kubernetes"]);
        let extracted = extract_resume_text(&pdf).unwrap();
        assert_eq!(extracted.page_count, 2);
        assert!(extracted.warnings.is_empty());
        let first = extracted.text.find("Rustacean").unwrap();
        let second = extracted.text.find("Kubernetes").unwrap();
        assert!(first < second);
        assert!(extracted.has_readable_text());
    }

    #[test]
    fn test_corrupt_flate_page_is_skipped_with_warning() {
        assert_second_page_skipped(PageDefect::CorruptFlate);
    }

    #[test]
    fn test_dangling_contents_page_is_skipped_with_warning() {
        assert_second_page_skipped(PageDefect::DanglingContents);
    }

    #[test]
    fn test_non_dictionary_resources_page_is_skipped_with_warning() {
        assert_second_page_skipped(PageDefect::ResourcesNotDictionary);
    }

    #[test]
    fn test_lopdf_extraction_reads_pages_in_order() {
        let pdf = build_pdf(&["Rustacean", "Kubernetes"]);
        let doc = Document::load_mem(&pdf).unwrap();
        let mut skipped = BTreeSet::new();
        let texts = extract_with_lopdf(&doc, &[1, 2], &mut skipped);
        assert!(skipped.is_empty());
        assert_eq!(texts.len(), 2);
        assert!(texts[0].contains("Rustacean"));
        assert!(texts[1].contains("Kubernetes"));
    }

    #[test]
    fn test_clean_pages_pass_structure_check() {
        let pdf = build_pdf(&["Rustacean"]);
        let doc = Document::load_mem(&pdf).unwrap();
        let page_id = doc.get_pages()[&1];
        assert!(check_page(&doc, page_id).is_ok());
    }

    #[test]
    fn test_garbage_is_unreadable() {
        let result = extract_resume_text(b"not a pdf at all");
        assert!(matches!(result, Err(ExtractionError::Unreadable(_))));
    }

    #[test]
    fn test_bare_header_is_unreadable() {
        let result = extract_resume_text(b"%PDF-1.4\n%%EOF\n");
        assert!(matches!(result, Err(ExtractionError::Unreadable(_))));
    }

    #[test]
    fn test_join_pages_appends_newline_per_page() {
        let joined = join_pages(vec!["a".to_string(), String::new(), "b".to_string()]);
        assert_eq!(joined, "a\n\nb\n");
    }

    #[test]
    fn test_whitespace_only_text_is_not_readable() {
        let extracted = ExtractedText {
            text: join_pages(vec!["  ".to_string(), "\t".to_string()]),
            page_count: 2,
            warnings: vec![],
        };
        assert!(!extracted.has_readable_text());
    }

    #[test]
    fn test_preview_short_text_untouched() {
        assert_eq!(preview("short resume"), "short resume");
    }

    #[test]
    fn test_preview_exactly_limit_untouched() {
        let text = "x".repeat(1000);
        assert_eq!(preview(&text), text);
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let text = "é".repeat(1200);
        let p = preview(&text);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), 1003);
    }
}
