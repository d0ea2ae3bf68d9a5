//! LLM integration for letter summarization and metadata extraction.
//!
//! Uses Google Gemini's `generateContent` API.

mod client;
mod error;
pub mod types;

pub use client::{ContentGenerator, GeminiClient};
pub use error::LlmError;
pub use types::{GenerateContentRequest, GenerateContentResponse, Part, Schema};
