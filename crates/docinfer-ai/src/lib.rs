//! docinfer AI: Ollama availability probe, structured-output provider,
//! prompt contract and post-processing of generated metadata.

pub mod analyzer;
pub mod error;
pub mod normalize;
pub mod probe;
pub mod prompts;
pub mod provider;
pub mod schema;

pub use analyzer::MetadataAnalyzer;
pub use error::{AiError, Result};
pub use probe::{BackendProbe, OllamaProbe};
pub use prompts::PromptSet;
pub use provider::{ChatMessage, MetadataGenerator, OllamaProvider, StructuredRequest};
