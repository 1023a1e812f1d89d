use tracing::debug;

use super::document::PdfDocument;

const PAGE_SEPARATOR: &str = "\n\n";

/// Text read from the leading pages of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextExtraction {
    pub text: String,
    /// Pages visited, blank ones included.
    pub pages_read: usize,
}

impl TextExtraction {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Join the non-blank text of the first `max_pages` pages.
///
/// Encrypted documents yield no text. A page whose content stream cannot be decoded
/// counts as blank.
pub fn extract_text_from(document: &dyn PdfDocument, max_pages: usize) -> TextExtraction {
    if document.is_encrypted() {
        return TextExtraction::default();
    }

    let pages_read = document.page_count().min(max_pages);
    let mut chunks = Vec::with_capacity(pages_read);
    for index in 0..pages_read {
        match document.page_text(index) {
            Ok(text) if !text.trim().is_empty() => chunks.push(text.trim().to_string()),
            Ok(_) => {}
            Err(err) => debug!(page = index + 1, "skipping unreadable page: {err}"),
        }
    }

    TextExtraction {
        text: chunks.join(PAGE_SEPARATOR),
        pages_read,
    }
}
