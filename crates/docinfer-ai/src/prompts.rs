use docinfer_core::PromptConfig;

pub const SYSTEM_PROMPT: &str = r#"You are a document metadata analyst. Your task is to analyze document text and extract structured metadata.

You will receive the text from the first pages of a PDF document. Based on this text, you must extract:

1. **Summary**: A concise 2-3 sentence summary describing what the document is about. Focus on the main topic, purpose, and key themes.

2. **Keywords**: 3-7 relevant hashtag-style keywords that categorize the document. Format as lowercase with # prefix (e.g., #datascience, #machinelearning, #bayesian). Choose keywords that would help someone searching for this type of content.

3. **Category**: A single category/subject area that best describes the document (e.g., statistics, programming, machine-learning, data-science, bayesian-statistics, deep-learning, software-engineering).

4. **Suggested Filename**: A standardized filename following this pattern: topic-title-[author]-[year].pdf
   - Use lowercase with hyphens between words
   - Include author's last name if identifiable
   - Include year if mentioned in the document
   - Use "unknown" for author/year if not determinable
   - Example: bayesian-data-analysis-gelman-2013.pdf

Be accurate and concise. Focus on factual information from the text."#;

pub const USER_PROMPT_TEMPLATE: &str = r##"Analyze the following document text and extract metadata:

---
{text}
---

Extract the following in a structured format:
- summary: 2-3 sentences about what this document is about
- keywords: 3-7 hashtag keywords (e.g., ["#datascience", "#python"])
- category: single category string
- suggested_filename: following pattern topic-title-[author]-[year].pdf

If author or year cannot be determined, use "unknown" in the filename."##;

const TEXT_PLACEHOLDER: &str = "{text}";

/// The prompt contract handed to the model. Built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    pub system: String,
    pub user_template: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            system: SYSTEM_PROMPT.to_string(),
            user_template: USER_PROMPT_TEMPLATE.to_string(),
        }
    }
}

impl PromptSet {
    /// Built-in prompts with any overrides from the config file applied.
    pub fn from_config(config: &PromptConfig) -> Self {
        let defaults = Self::default();
        Self {
            system: config.system.clone().unwrap_or(defaults.system),
            user_template: config.user_template.clone().unwrap_or(defaults.user_template),
        }
    }

    pub fn render_user(&self, text: &str) -> String {
        self.user_template.replace(TEXT_PLACEHOLDER, text)
    }
}
