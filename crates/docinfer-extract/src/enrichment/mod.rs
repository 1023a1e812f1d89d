pub mod merge;
pub mod pipeline;

pub use merge::{FilenameHints, merge, parse_suggested_filename};
pub use pipeline::{
    AI_FAILED_WARNING, AiRoute, EnrichmentPipeline, FileMetadataExtractor, NO_TEXT_WARNING,
    NoProgress, ProgressObserver, unavailable_warning,
};
