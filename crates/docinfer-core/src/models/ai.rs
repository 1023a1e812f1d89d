use serde::{Deserialize, Serialize};

/// Metadata generated by the language model from the document text.
///
/// Once normalized, every keyword is `#`-prefixed and lowercase and the suggested
/// filename ends in `.pdf` using only `[a-z0-9-.[]()]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiMetadata {
    pub summary: String,
    pub keywords: Vec<String>,
    pub category: String,
    pub suggested_filename: String,
}
