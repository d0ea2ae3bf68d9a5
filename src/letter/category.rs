//! Letter categories.

use serde::{Deserialize, Serialize};

/// Fixed set of letter classes the model is asked to choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterCategory {
    /// Official/agency correspondence.
    Dinas,
    /// Personal letter.
    Pribadi,
    /// Invitation.
    Undangan,
    /// Notice or announcement.
    Pemberitahuan,
    /// Confidential.
    Rahasia,
    /// Commercial.
    Niaga,
    /// Anything else.
    Lainnya,
}

impl LetterCategory {
    pub const ALL: [LetterCategory; 7] = [
        LetterCategory::Dinas,
        LetterCategory::Pribadi,
        LetterCategory::Undangan,
        LetterCategory::Pemberitahuan,
        LetterCategory::Rahasia,
        LetterCategory::Niaga,
        LetterCategory::Lainnya,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterCategory::Dinas => "Dinas",
            LetterCategory::Pribadi => "Pribadi",
            LetterCategory::Undangan => "Undangan",
            LetterCategory::Pemberitahuan => "Pemberitahuan",
            LetterCategory::Rahasia => "Rahasia",
            LetterCategory::Niaga => "Niaga",
            LetterCategory::Lainnya => "Lainnya",
        }
    }

    /// Case-insensitive lookup; unknown names yield `None`.
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
    }

    /// Names joined for use in prompts, e.g. "Dinas, Pribadi, ..., Lainnya".
    pub fn prompt_list() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for LetterCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
