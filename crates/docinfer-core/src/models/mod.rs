pub mod ai;
pub mod embedded;
pub mod result;

pub use ai::AiMetadata;
pub use embedded::EmbeddedMetadata;
pub use result::{BatchError, BatchResult, MetadataResult};
