//! docinfer extract: embedded PDF properties, page text, and the pipeline that
//! reconciles them with AI-generated metadata.

pub mod discovery;
pub mod enrichment;
pub mod error;
pub mod pdf;

#[cfg(test)]
pub(crate) mod test_support;

pub use discovery::find_pdfs;
pub use enrichment::{
    AiRoute, EnrichmentPipeline, FileMetadataExtractor, FilenameHints, NoProgress,
    ProgressObserver, merge, parse_suggested_filename,
};
pub use error::{ExtractError, Result};
pub use pdf::{EmbeddedExtraction, TextExtraction, extract_embedded, extract_text};
