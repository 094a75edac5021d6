//! Assessment stages.
//!
//! The stage machine drives the conversational assessment: topic stages in
//! a fixed order, then an automatic recommendation stage, a confirmation
//! stage, and terminal completion. Abandonment is reachable from any
//! non-terminal stage on TTL expiry.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;
use crate::domain::profile::AttributeKey;

/// A stage in the assessment conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Session created, greeting turn.
    #[default]
    Init,
    /// What the business is and who it serves.
    BusinessClassification,
    /// Customer pain points and buying journey.
    CustomerInsight,
    /// What makes the business different.
    ValueProposition,
    /// Platform and technical comfort.
    TechnicalCapability,
    /// Scoring runs automatically; no question of its own.
    Recommend,
    /// Business owner picks one recommended archetype.
    Confirm,
    /// Assessment finished with a selection.
    Done,
    /// TTL expired before completion.
    Abandoned,
}

impl Stage {
    /// The topic stages that ask questions, in assessment order.
    pub fn question_stages() -> &'static [Stage] {
        &[
            Stage::BusinessClassification,
            Stage::CustomerInsight,
            Stage::ValueProposition,
            Stage::TechnicalCapability,
        ]
    }

    /// Returns true if this stage owns a question list.
    pub fn asks_questions(&self) -> bool {
        Self::question_stages().contains(self)
    }

    /// Returns true if the assessment can still progress.
    pub fn is_active(&self) -> bool {
        !matches!(self, Stage::Done | Stage::Abandoned)
    }

    /// The stage that follows this one in the normal flow.
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Init => Some(Stage::BusinessClassification),
            Stage::BusinessClassification => Some(Stage::CustomerInsight),
            Stage::CustomerInsight => Some(Stage::ValueProposition),
            Stage::ValueProposition => Some(Stage::TechnicalCapability),
            Stage::TechnicalCapability => Some(Stage::Recommend),
            Stage::Recommend => Some(Stage::Confirm),
            Stage::Confirm => Some(Stage::Done),
            Stage::Done | Stage::Abandoned => None,
        }
    }

    /// The primary attribute focus of a question stage, used for logging.
    pub fn focus(&self) -> Option<AttributeKey> {
        match self {
            Stage::BusinessClassification => Some(AttributeKey::Industry),
            Stage::CustomerInsight => Some(AttributeKey::PainPoints),
            Stage::ValueProposition => Some(AttributeKey::Usps),
            Stage::TechnicalCapability => Some(AttributeKey::TechCapability),
            _ => None,
        }
    }
}

impl StateMachine for Stage {
    fn can_transition_to(&self, target: &Self) -> bool {
        // Forward progression plus abandonment from any non-terminal stage.
        if *target == Stage::Abandoned {
            return self.is_active();
        }
        self.next() == Some(*target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        let mut targets = Vec::new();
        if let Some(next) = self.next() {
            targets.push(next);
        }
        if self.is_active() {
            targets.push(Stage::Abandoned);
        }
        targets
    }
}
