//! suratai - letter summarization and metadata extraction via Google Gemini.
//!
//! Core library used by the `surat` binary.

// Model types use `from_str` methods that return Option<Self>,
// not Result<Self, Error> as std::str::FromStr requires.
#![allow(clippy::should_implement_trait)]

pub mod config;
pub mod letter;
pub mod llm;

pub use config::GeminiConfig;
pub use letter::{DocumentMetadata, LetterAssistant, LetterCategory, LetterMetadata};
pub use llm::{ContentGenerator, GeminiClient, LlmError};
