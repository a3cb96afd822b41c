//! Error types for screen-assist operations

use async_openai::error::OpenAIError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistError {
    #[error("Completion request failed: {0}")]
    Api(#[from] OpenAIError),

    #[error("Completion returned no usable text")]
    EmptyResponse,

    #[error("No element found with identifier: {0}")]
    ElementNotFound(String),

    #[error("Multiple elements found with identifier: {0}")]
    AmbiguousIdentifier(String),

    #[error("Element has no press handler: {0}")]
    NotInteractive(String),

    #[error("Element is no longer in the rendered tree: {0}")]
    StaleElement(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AssistError>;
