//! Raw answers submitted during a conversation turn.

use serde::{Deserialize, Serialize};

/// An answer as submitted, before shape validation against the question
/// that prompted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Answer {
    /// A single option picked from a closed list.
    Choice { value: String },
    /// Several options picked from a closed list.
    MultiChoice { values: Vec<String> },
    /// Free-form text.
    Text { value: String },
    /// A numeric rating.
    Scale { value: u8 },
}

impl Answer {
    pub fn choice(value: impl Into<String>) -> Self {
        Self::Choice {
            value: value.into(),
        }
    }

    pub fn multi_choice(values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::MultiChoice {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    pub fn scale(value: u8) -> Self {
        Self::Scale { value }
    }

    /// A short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Choice { .. } => "choice",
            Self::MultiChoice { .. } => "multi_choice",
            Self::Text { .. } => "text",
            Self::Scale { .. } => "scale",
        }
    }
}
