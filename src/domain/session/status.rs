//! Session lifecycle status.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Lifecycle status of a conversation session.
///
/// Distinct from [`crate::domain::flow::Stage`]: the stage tracks where in
/// the assessment the conversation is; the status tracks whether the
/// session as a resource is live, presenting results, or closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Collecting answers.
    #[default]
    Active,
    /// Scoring has run; awaiting the owner's archetype selection.
    Recommending,
    /// Owner confirmed a selection; session is read-only.
    Completed,
    /// TTL expired before completion; session is read-only.
    Abandoned,
}

impl SessionStatus {
    /// Returns true if the session can still accept turns.
    pub fn accepts_turns(&self) -> bool {
        matches!(self, Self::Active | Self::Recommending)
    }

    /// Returns true if the session reached a closed state.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Completed | Self::Abandoned)
    }
}

impl StateMachine for SessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStatus::*;
        matches!(
            (self, target),
            (Active, Recommending)
                | (Active, Abandoned)
                | (Recommending, Completed)
                | (Recommending, Abandoned)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionStatus::*;
        match self {
            Active => vec![Recommending, Abandoned],
            Recommending => vec![Completed, Abandoned],
            Completed | Abandoned => vec![],
        }
    }
}
