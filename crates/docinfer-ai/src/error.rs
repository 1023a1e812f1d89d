use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error from {0}: {1}")]
    ApiError(String, String),

    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("invalid structured output: {0}")]
    InvalidOutput(String),

    #[error("failed to start async runtime: {0}")]
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, AiError>;
