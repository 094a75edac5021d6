//! Conversation session aggregate.
//!
//! The session is the unit of persistence for an assessment conversation.
//! It owns the evolving [`BusinessProfile`], an append-only log of every
//! accepted answer, and the flow position. All mutation goes through
//! methods that enforce the status machine and the TTL.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ArchetypeId, BusinessId, DomainError, QuestionId, SessionId, StateMachine, Timestamp,
};
use crate::domain::profile::{AttributeKey, AttributeValue, BusinessProfile, ProfileSnapshot};
use crate::domain::scoring::ScoreResult;

use super::{Answer, SessionStatus};
use crate::domain::flow::Stage;

/// Default session lifetime in minutes.
pub const DEFAULT_TTL_MINUTES: i64 = 30;

/// One accepted answer, as recorded in the session log.
///
/// The log is append-only: corrections are recorded as new entries, and
/// the profile applies them last-write-wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub answer: Answer,
    pub recorded_at: Timestamp,
}

/// An in-progress (or finished) assessment conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSession {
    id: SessionId,
    business_id: BusinessId,
    status: SessionStatus,
    stage: Stage,
    profile: BusinessProfile,
    answer_log: Vec<AnswerRecord>,
    turns_used: u32,
    recommendation: Option<Vec<ScoreResult>>,
    selected_archetype: Option<ArchetypeId>,
    created_at: Timestamp,
    updated_at: Timestamp,
    expires_at: Timestamp,
}

impl ConversationSession {
    /// Opens a new session for the given business with the default TTL.
    pub fn new(business_id: BusinessId) -> Self {
        Self::with_ttl(business_id, DEFAULT_TTL_MINUTES)
    }

    /// Opens a new session with an explicit TTL in minutes.
    pub fn with_ttl(business_id: BusinessId, ttl_minutes: i64) -> Self {
        let now = Timestamp::now();
        Self {
            id: SessionId::new(),
            business_id,
            status: SessionStatus::Active,
            stage: Stage::Init,
            profile: BusinessProfile::new(),
            answer_log: Vec::new(),
            turns_used: 0,
            recommendation: None,
            selected_archetype: None,
            created_at: now,
            updated_at: now,
            expires_at: now.add_minutes(ttl_minutes),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn business_id(&self) -> &BusinessId {
        &self.business_id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn turns_used(&self) -> u32 {
        self.turns_used
    }

    pub fn answer_log(&self) -> &[AnswerRecord] {
        &self.answer_log
    }

    pub fn recommendation(&self) -> Option<&[ScoreResult]> {
        self.recommendation.as_deref()
    }

    pub fn selected_archetype(&self) -> Option<&ArchetypeId> {
        self.selected_archetype.as_ref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// Returns true if the TTL has elapsed.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_past()
    }

    /// Returns true if the given question already has an entry in the log.
    pub fn has_answered(&self, question_id: &QuestionId) -> bool {
        self.answer_log
            .iter()
            .any(|record| &record.question_id == question_id)
    }

    /// Read access to the evolving profile.
    pub fn profile(&self) -> &BusinessProfile {
        &self.profile
    }

    /// Takes an immutable snapshot of the profile for scoring.
    pub fn profile_snapshot(&self) -> ProfileSnapshot {
        self.profile.snapshot()
    }

    /// Appends an accepted answer to the log and counts the turn.
    ///
    /// Re-prompts after a rejected answer are not recorded here and do
    /// not consume the turn budget.
    ///
    /// # Errors
    ///
    /// Fails if the session is closed or expired.
    pub fn record_answer(
        &mut self,
        question_id: QuestionId,
        answer: Answer,
    ) -> Result<(), DomainError> {
        self.ensure_open()?;
        self.answer_log.push(AnswerRecord {
            question_id,
            answer,
            recorded_at: Timestamp::now(),
        });
        self.turns_used += 1;
        self.touch();
        Ok(())
    }

    /// Writes an attribute derived from an accepted answer, last-write-wins.
    ///
    /// # Errors
    ///
    /// Fails if the session is closed or expired.
    pub fn set_attribute(
        &mut self,
        key: AttributeKey,
        value: AttributeValue,
    ) -> Result<(), DomainError> {
        self.ensure_open()?;
        self.profile.set(key, value);
        self.touch();
        Ok(())
    }

    /// Moves the flow to the next stage.
    ///
    /// # Errors
    ///
    /// Fails if the transition is not permitted by the stage machine.
    pub fn advance_stage(&mut self, target: Stage) -> Result<(), DomainError> {
        self.ensure_open()?;
        self.stage = self
            .stage
            .transition_to(target)
            .map_err(DomainError::invalid_transition)?;
        self.touch();
        Ok(())
    }

    /// Stores the scoring outcome and moves the session to `Recommending`.
    ///
    /// # Errors
    ///
    /// Fails if the session is not `Active` or has expired.
    pub fn begin_recommending(&mut self, results: Vec<ScoreResult>) -> Result<(), DomainError> {
        self.ensure_not_expired()?;
        self.status = self
            .status
            .transition_to(SessionStatus::Recommending)
            .map_err(DomainError::invalid_transition)?;
        self.recommendation = Some(results);
        self.touch();
        Ok(())
    }

    /// Records the owner's archetype selection and closes the session.
    ///
    /// # Errors
    ///
    /// Fails if the session is not `Recommending` or has expired.
    pub fn complete(&mut self, selected: ArchetypeId) -> Result<(), DomainError> {
        self.ensure_not_expired()?;
        self.status = self
            .status
            .transition_to(SessionStatus::Completed)
            .map_err(DomainError::invalid_transition)?;
        self.selected_archetype = Some(selected);
        if self.stage.can_transition_to(&Stage::Done) {
            self.stage = Stage::Done;
        }
        self.touch();
        Ok(())
    }

    /// Closes the session without a selection.
    ///
    /// Idempotent on already-abandoned sessions.
    ///
    /// # Errors
    ///
    /// Fails if the session already completed.
    pub fn abandon(&mut self) -> Result<(), DomainError> {
        if self.status == SessionStatus::Abandoned {
            return Ok(());
        }
        self.status = self
            .status
            .transition_to(SessionStatus::Abandoned)
            .map_err(DomainError::invalid_transition)?;
        if self.stage.can_transition_to(&Stage::Abandoned) {
            self.stage = Stage::Abandoned;
        }
        self.touch();
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), DomainError> {
        if self.status.is_closed() {
            return Err(DomainError::session_completed(&self.id));
        }
        self.ensure_not_expired()
    }

    fn ensure_not_expired(&self) -> Result<(), DomainError> {
        if self.is_expired() {
            return Err(DomainError::session_expired(&self.id));
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
