use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{AiError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// One structured-output call: messages plus the JSON schema the answer must follow.
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub schema: Value,
    pub temperature: f32,
}

/// Backend seam for `generate_metadata(prompt) -> structured result | failure`.
pub trait MetadataGenerator: Send + Sync {
    fn generate(&self, request: &StructuredRequest) -> Result<Value>;
}

/// Ollama chat API with JSON-schema constrained output.
pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    format: &'a Value,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: ChatMessage,
}

impl OllamaProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("docinfer/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub async fn chat(&self, request: &StructuredRequest) -> Result<Value> {
        let url = format!("{}/api/chat", self.base_url);
        let body = OllamaChatRequest {
            model: &request.model,
            messages: &request.messages,
            stream: false,
            format: &request.schema,
            options: OllamaOptions {
                temperature: request.temperature,
            },
        };

        debug!(model = %request.model, "sending structured request to Ollama");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| self.map_transport_error(err))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(AiError::ApiError(
                url,
                format!("HTTP {}: {error_body}", status.as_u16()),
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|err| self.map_transport_error(err))?;
        let chat: OllamaChatResponse = serde_json::from_str(&text)
            .map_err(|err| AiError::InvalidOutput(format!("unexpected chat response: {err}")))?;

        serde_json::from_str(chat.message.content.trim())
            .map_err(|err| AiError::InvalidOutput(format!("model did not return JSON: {err}")))
    }

    fn map_transport_error(&self, err: reqwest::Error) -> AiError {
        if err.is_timeout() {
            AiError::Timeout(self.timeout)
        } else {
            AiError::Http(err)
        }
    }
}

impl MetadataGenerator for OllamaProvider {
    /// Blocking entry point for the synchronous pipeline.
    fn generate(&self, request: &StructuredRequest) -> Result<Value> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| AiError::Runtime(err.to_string()))?;
        runtime.block_on(self.chat(request))
    }
}
