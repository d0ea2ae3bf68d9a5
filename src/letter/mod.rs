//! Letter (surat) analysis: summaries and structured metadata.

mod assistant;
mod category;
mod metadata;
pub mod prompts;

pub use assistant::{
    detect_mime_type, encode_document, LetterAssistant, SUMMARY_EMPTY, SUMMARY_FAILED,
};
pub use category::LetterCategory;
pub use metadata::{DocumentMetadata, LetterMetadata};
