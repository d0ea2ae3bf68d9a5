//! Structured fields extracted from letters.
//!
//! Values are kept exactly as the model returned them. Fields the model
//! left out stay `None` and are skipped again on serialization, so a
//! round trip reproduces the received mapping.

use serde::{Deserialize, Serialize};

use super::category::LetterCategory;

/// Fields extracted from letter text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterMetadata {
    /// Letter number (nomor surat)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    /// Subject or short title (perihal)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Category name as returned; see [`LetterMetadata::category_kind`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl LetterMetadata {
    /// Field names, in prompt order.
    pub const FIELDS: [&'static str; 5] = ["number", "sender", "receiver", "title", "category"];

    /// True when the model returned none of the fields.
    pub fn is_empty(&self) -> bool {
        self.number.is_none()
            && self.sender.is_none()
            && self.receiver.is_none()
            && self.title.is_none()
            && self.category.is_none()
    }

    pub fn category_kind(&self) -> Option<LetterCategory> {
        self.category.as_deref().and_then(LetterCategory::from_str)
    }
}

/// Fields extracted from a scanned letter image or document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    /// Letter date, requested as YYYY-MM-DD (not validated)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Full transcript of the text in the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl DocumentMetadata {
    pub const FIELDS: [&'static str; 7] = [
        "number", "title", "sender", "receiver", "date", "category", "content",
    ];

    pub fn is_empty(&self) -> bool {
        self.number.is_none()
            && self.title.is_none()
            && self.sender.is_none()
            && self.receiver.is_none()
            && self.date.is_none()
            && self.category.is_none()
            && self.content.is_none()
    }

    pub fn category_kind(&self) -> Option<LetterCategory> {
        self.category.as_deref().and_then(LetterCategory::from_str)
    }
}
