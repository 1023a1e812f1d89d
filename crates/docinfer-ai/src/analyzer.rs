use std::sync::Arc;

use docinfer_core::{AiMetadata, ExtractionConfig};
use tracing::{debug, warn};

use crate::error::Result;
use crate::normalize::normalize;
use crate::prompts::PromptSet;
use crate::provider::{ChatMessage, MetadataGenerator, StructuredRequest};
use crate::schema::{metadata_schema, validate};

/// Character budget for the document text embedded in the prompt.
pub const MAX_PROMPT_CHARS: usize = 8000;
pub const TRUNCATION_MARKER: &str = "\n\n[Text truncated...]";

/// Turns extracted document text into normalized [`AiMetadata`].
///
/// Failures come back as `Err` with a diagnostic; callers degrade to embedded-only
/// metadata instead of aborting.
#[derive(Clone)]
pub struct MetadataAnalyzer {
    generator: Arc<dyn MetadataGenerator>,
    prompts: PromptSet,
    model: String,
    temperature: f32,
}

impl MetadataAnalyzer {
    pub fn new(
        generator: Arc<dyn MetadataGenerator>,
        prompts: PromptSet,
        config: &ExtractionConfig,
    ) -> Self {
        Self {
            generator,
            prompts,
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn analyze(&self, text: &str) -> Result<AiMetadata> {
        let result = self.run(text);
        if let Err(err) = &result {
            warn!(model = %self.model, "AI analysis error: {err}");
        }
        result
    }

    fn run(&self, text: &str) -> Result<AiMetadata> {
        let request = self.build_request(text);
        let value = self.generator.generate(&request)?;
        let metadata = normalize(validate(value)?);
        debug!(
            category = %metadata.category,
            filename = %metadata.suggested_filename,
            "AI metadata generated"
        );
        Ok(metadata)
    }

    fn build_request(&self, text: &str) -> StructuredRequest {
        let text = truncate_text(text, MAX_PROMPT_CHARS);
        StructuredRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(self.prompts.system.clone()),
                ChatMessage::user(self.prompts.render_user(&text)),
            ],
            schema: metadata_schema(),
            temperature: self.temperature,
        }
    }
}

/// Keep the first `max_chars` characters, marking the cut.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &text[..cut]),
        None => text.to_string(),
    }
}
