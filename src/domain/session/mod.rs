//! Conversation session module.
//!
//! A session is one business owner's assessment conversation: its
//! lifecycle status, stage, append-only answer log, TTL, and the profile
//! accumulated along the way.

mod aggregate;
mod answer;
mod status;

pub use aggregate::{AnswerRecord, ConversationSession, DEFAULT_TTL_MINUTES};
pub use answer::Answer;
pub use status::SessionStatus;
