//! Errors from the Gemini client and the operations built on it.

use thiserror::Error;

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key could be resolved.
    #[error("Missing Gemini API key. Set VITE_GEMINI_API_KEY, GEMINI_API_KEY or API_KEY")]
    MissingApiKey,

    /// Failed to reach the API.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The API rejected the request.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Reply was not valid JSON or did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for LlmError {
    fn from(e: serde_json::Error) -> Self {
        LlmError::Parse(e.to_string())
    }
}

impl LlmError {
    /// Whether this is a configuration problem rather than a runtime failure.
    pub fn is_configuration(&self) -> bool {
        matches!(self, LlmError::MissingApiKey)
    }
}
