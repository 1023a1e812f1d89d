//! Embedded properties and page text of a single PDF.

pub mod document;
pub mod info;
pub mod text;

use std::path::Path;

use docinfer_core::EmbeddedMetadata;
use tracing::debug;

pub use document::{LopdfDocument, PdfDocument};
pub use info::{InfoSources, lookup_text, parse_pdf_date};
pub use text::{TextExtraction, extract_text_from};

use crate::error::{ExtractError, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddedExtraction {
    pub metadata: EmbeddedMetadata,
    pub page_count: usize,
    pub warnings: Vec<String>,
}

/// Read the information dictionary and page count of an opened document.
pub fn extract_embedded_from(document: &dyn PdfDocument) -> Result<EmbeddedExtraction> {
    if document.is_encrypted() {
        return Err(ExtractError::Encrypted);
    }

    let mut warnings = Vec::new();
    let sources = InfoSources {
        properties: document.properties(),
        info: document.info(),
    };
    let metadata = info::read_embedded(sources, &mut warnings);
    Ok(EmbeddedExtraction {
        metadata,
        page_count: document.page_count(),
        warnings,
    })
}

pub fn extract_embedded(path: &Path) -> Result<EmbeddedExtraction> {
    let document = LopdfDocument::open(path)?;
    let extraction = extract_embedded_from(&document)?;
    debug!(
        path = %path.display(),
        pages = extraction.page_count,
        "read embedded metadata"
    );
    Ok(extraction)
}

/// Text of the first `max_pages` pages. Encrypted files give empty text rather than
/// an error; every other open failure propagates.
pub fn extract_text(path: &Path, max_pages: usize) -> Result<TextExtraction> {
    match LopdfDocument::open(path) {
        Ok(document) => Ok(extract_text_from(&document, max_pages)),
        Err(ExtractError::Encrypted) => Ok(TextExtraction::default()),
        Err(err) => Err(err),
    }
}
