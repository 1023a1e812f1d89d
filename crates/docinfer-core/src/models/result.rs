use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ai::AiMetadata;
use super::embedded::EmbeddedMetadata;

/// Everything known about one processed PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataResult {
    pub file_path: PathBuf,
    pub file_name: String,
    pub page_count: usize,
    pub pages_analyzed: usize,
    pub embedded: EmbeddedMetadata,
    pub ai_generated: Option<AiMetadata>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl MetadataResult {
    pub fn new(
        file_path: &Path,
        page_count: usize,
        embedded: EmbeddedMetadata,
        warnings: Vec<String>,
    ) -> Self {
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            file_path: file_path.to_path_buf(),
            file_name,
            page_count,
            pages_analyzed: 0,
            embedded,
            ai_generated: None,
            warnings,
        }
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

/// A file that could not be processed during a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchError {
    pub file: String,
    pub error: String,
}

/// Outcome of processing every PDF in a directory.
///
/// `successful + failed == total_files` always holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub directory: PathBuf,
    pub total_files: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<MetadataResult>,
    pub errors: Vec<BatchError>,
}

impl BatchResult {
    /// Build the final summary; counts are derived from the lists themselves.
    pub fn new(
        directory: &Path,
        results: Vec<MetadataResult>,
        errors: Vec<BatchError>,
    ) -> Self {
        Self {
            directory: directory.to_path_buf(),
            total_files: results.len() + errors.len(),
            successful: results.len(),
            failed: errors.len(),
            results,
            errors,
        }
    }
}
