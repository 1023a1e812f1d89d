//! JSON schema for the model's answer and the validation that maps it onto [`AiMetadata`].

use docinfer_core::AiMetadata;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{AiError, Result};

pub const MIN_KEYWORDS: usize = 3;
pub const MAX_KEYWORDS: usize = 7;

/// Schema handed to the backend as the structured-output target.
pub fn metadata_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "summary": {
                "type": "string",
                "description": "A concise 2-3 sentence summary of the document"
            },
            "keywords": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": MIN_KEYWORDS,
                "maxItems": MAX_KEYWORDS,
                "description": "3-7 hashtag keywords, lowercase with # prefix"
            },
            "category": {
                "type": "string",
                "description": "Single category or subject area"
            },
            "suggested_filename": {
                "type": "string",
                "description": "Filename following topic-title-[author]-[year].pdf"
            }
        },
        "required": ["summary", "keywords", "category", "suggested_filename"]
    })
}

#[derive(Deserialize)]
struct RawMetadata {
    summary: String,
    keywords: Vec<String>,
    category: String,
    suggested_filename: String,
}

/// Map backend output into the record shape, rejecting anything off-contract.
pub fn validate(value: Value) -> Result<AiMetadata> {
    let raw: RawMetadata = serde_json::from_value(value)
        .map_err(|err| AiError::InvalidOutput(err.to_string()))?;

    let summary = required_text("summary", &raw.summary)?;
    let category = required_text("category", &raw.category)?;
    let suggested_filename = required_text("suggested_filename", &raw.suggested_filename)?;

    let keywords: Vec<String> = raw
        .keywords
        .iter()
        .map(|keyword| keyword.trim())
        .filter(|keyword| !keyword.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    if !(MIN_KEYWORDS..=MAX_KEYWORDS).contains(&keywords.len()) {
        return Err(AiError::InvalidOutput(format!(
            "expected {MIN_KEYWORDS}-{MAX_KEYWORDS} keywords, got {}",
            keywords.len()
        )));
    }

    Ok(AiMetadata {
        summary,
        keywords,
        category,
        suggested_filename,
    })
}

fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AiError::InvalidOutput(format!("{field} is empty")));
    }
    Ok(trimmed.to_string())
}
