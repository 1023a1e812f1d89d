//! docinfer core: metadata records, configuration and shared errors.

pub mod config;
pub mod error;
pub mod models;

pub use config::{DocinferConfig, ExtractionConfig, OllamaConfig, OutputConfig, PromptConfig};
pub use error::{CoreError, ExitCode, Result};
pub use models::*;
