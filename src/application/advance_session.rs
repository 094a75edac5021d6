//! The conversation turn handler.
//!
//! Owns the turn lifecycle around the flow engine: loads the session from
//! the store, serializes concurrent turns per session id, persists after
//! every completed turn, and substitutes the configured default archetype
//! when scoring produces an empty recommendation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use crate::domain::catalog::ArchetypeCatalog;
use crate::domain::flow::{AdvanceOutcome, AssessmentScript, FlowEngine};
use crate::domain::foundation::{
    ArchetypeId, BusinessId, DomainError, ErrorCode, SessionId,
};
use crate::domain::scoring::{ScoreResult, DEFAULT_TOP_N};
use crate::domain::session::{Answer, ConversationSession, DEFAULT_TTL_MINUTES};
use crate::ports::SessionStore;

/// Drives assessment conversations against a session store.
///
/// Turns for the same session are serialized with a per-session lock; a
/// turn arriving while another is in flight fails fast with `Busy` so the
/// caller retries instead of queueing behind a slow generation call.
pub struct AdvanceSessionHandler {
    store: Arc<dyn SessionStore>,
    script: AssessmentScript,
    catalog: ArchetypeCatalog,
    default_archetype: ArchetypeId,
    top_n: usize,
    session_ttl_minutes: i64,
    locks: Mutex<HashMap<SessionId, Arc<tokio::sync::Mutex<()>>>>,
}

impl std::fmt::Debug for AdvanceSessionHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvanceSessionHandler")
            .field("default_archetype", &self.default_archetype)
            .field("top_n", &self.top_n)
            .field("session_ttl_minutes", &self.session_ttl_minutes)
            .finish_non_exhaustive()
    }
}

impl AdvanceSessionHandler {
    /// Builds a handler.
    ///
    /// # Errors
    ///
    /// `ConfigurationError` if the default archetype is not in the catalog.
    pub fn new(
        store: Arc<dyn SessionStore>,
        script: AssessmentScript,
        catalog: ArchetypeCatalog,
        default_archetype: ArchetypeId,
    ) -> Result<Self, DomainError> {
        if catalog.archetype(&default_archetype).is_none() {
            return Err(DomainError::new(
                ErrorCode::ConfigurationError,
                format!(
                    "Default archetype '{}' has no catalog entry",
                    default_archetype
                ),
            )
            .with_detail("archetype_id", default_archetype.as_str()));
        }
        Ok(Self {
            store,
            script,
            catalog,
            default_archetype,
            top_n: DEFAULT_TOP_N,
            session_ttl_minutes: DEFAULT_TTL_MINUTES,
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// Overrides how many recommendations are surfaced.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Overrides the session TTL.
    pub fn with_session_ttl(mut self, minutes: i64) -> Self {
        self.session_ttl_minutes = minutes;
        self
    }

    /// Opens a new session for a business and returns the first prompt.
    ///
    /// # Errors
    ///
    /// Storage failures; the session is not retained on error.
    pub async fn start_session(
        &self,
        business_id: BusinessId,
    ) -> Result<(SessionId, AdvanceOutcome), DomainError> {
        let mut session = ConversationSession::with_ttl(business_id, self.session_ttl_minutes);
        let engine = FlowEngine::new(&self.script, &self.catalog).with_top_n(self.top_n);
        let outcome = engine.begin(&mut session)?;
        self.store.put(&session).await?;
        info!(session_id = %session.id(), business_id = %business_id, "session opened");
        Ok((*session.id(), outcome))
    }

    /// Processes one turn for an existing session.
    ///
    /// The session is persisted after the turn whether it progressed,
    /// re-prompted, or closed. An empty recommendation comes back holding
    /// the configured default archetype instead.
    ///
    /// # Errors
    ///
    /// - `Busy` if another turn for this session is in flight
    /// - `SessionNotFound` if the id has never been stored
    /// - `SessionCompleted` for turns after the session closed
    pub async fn advance(
        &self,
        session_id: &SessionId,
        answer: Answer,
    ) -> Result<AdvanceOutcome, DomainError> {
        let _guard = self.acquire(session_id)?;

        let mut session = self.store.get(session_id).await?;
        let engine = FlowEngine::new(&self.script, &self.catalog).with_top_n(self.top_n);
        let result = engine.advance(&mut session, answer);
        // persist even when the turn closed or abandoned the session
        self.store.put(&session).await?;

        let outcome = result?;
        if session.status().is_closed() {
            self.release(session_id);
        }
        match outcome {
            AdvanceOutcome::Recommendation { results } if results.is_empty() => {
                debug!(
                    session_id = %session_id,
                    default = %self.default_archetype,
                    "no archetype qualified, offering the default"
                );
                Ok(AdvanceOutcome::Recommendation {
                    results: vec![self.default_result()],
                })
            }
            other => Ok(other),
        }
    }

    /// Reads a session without taking a turn.
    ///
    /// # Errors
    ///
    /// `SessionNotFound` if the id has never been stored.
    pub async fn session(&self, session_id: &SessionId) -> Result<ConversationSession, DomainError> {
        Ok(self.store.get(session_id).await?)
    }

    /// A zero-confidence stand-in offered when nothing qualified.
    fn default_result(&self) -> ScoreResult {
        ScoreResult {
            archetype_id: self.default_archetype.clone(),
            raw_score: 0.0,
            confidence: 0.0,
            matched: Vec::new(),
            missing_required: Vec::new(),
        }
    }

    /// Takes the per-session lock, failing fast on contention.
    fn acquire(
        &self,
        session_id: &SessionId,
    ) -> Result<tokio::sync::OwnedMutexGuard<()>, DomainError> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // an in-flight turn holds an owned guard and therefore a second
            // Arc reference; entries at one reference are idle and safe to
            // drop, so expired sessions never accumulate in the map
            locks.retain(|_, entry| Arc::strong_count(entry) > 1);
            Arc::clone(
                locks
                    .entry(*session_id)
                    .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
            )
        };
        lock.try_lock_owned().map_err(|_| {
            DomainError::new(
                ErrorCode::Busy,
                format!("Session {} has a turn in flight", session_id),
            )
            .with_detail("session_id", session_id.to_string())
        })
    }

    /// Drops the lock entry for a closed session.
    fn release(&self, session_id: &SessionId) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.remove(session_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::catalog::builtin_catalog;
    use crate::domain::flow::Stage;
    use crate::domain::session::SessionStatus;

    fn handler() -> AdvanceSessionHandler {
        let store = Arc::new(InMemorySessionStore::new());
        AdvanceSessionHandler::new(
            store,
            AssessmentScript::default(),
            builtin_catalog(),
            ArchetypeId::new("interactive_quiz").unwrap(),
        )
        .unwrap()
    }

    fn canned_answer(question_id: &str) -> Answer {
        match question_id {
            "business_name" => Answer::text("Acme Web Studio"),
            "business_type" => Answer::choice("web_design"),
            "business_size" => Answer::choice("micro"),
            "language_variant" => Answer::choice("en-US"),
            "target_audience" => Answer::choice("b2b_small"),
            "customer_pain_points" => Answer::multi_choice(["knowledge", "complexity"]),
            "sales_cycle_length" => Answer::scale(3),
            "unique_value" => Answer::multi_choice(["expertise", "service"]),
            "marketing_goals" => Answer::multi_choice(["leads", "authority"]),
            "tech_comfort" => Answer::choice("medium"),
            other => panic!("no canned answer for {}", other),
        }
    }

    async fn run_to_recommendation(
        handler: &AdvanceSessionHandler,
        session_id: &SessionId,
        mut outcome: AdvanceOutcome,
    ) -> Vec<ScoreResult> {
        loop {
            match outcome {
                AdvanceOutcome::NextPrompt { question } => {
                    outcome = handler
                        .advance(session_id, canned_answer(question.id.as_str()))
                        .await
                        .unwrap();
                }
                AdvanceOutcome::Recommendation { results } => return results,
                other => panic!("unexpected outcome {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn unknown_default_archetype_is_rejected() {
        let store = Arc::new(InMemorySessionStore::new());
        let err = AdvanceSessionHandler::new(
            store,
            AssessmentScript::default(),
            builtin_catalog(),
            ArchetypeId::new("no_such_archetype").unwrap(),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigurationError);
    }

    #[tokio::test]
    async fn start_session_persists_and_prompts() {
        let handler = handler();
        let (session_id, outcome) = handler.start_session(BusinessId::new()).await.unwrap();

        match outcome {
            AdvanceOutcome::NextPrompt { question } => {
                assert_eq!(question.id.as_str(), "business_name");
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        let session = handler.session(&session_id).await.unwrap();
        assert_eq!(session.stage(), Stage::BusinessClassification);
    }

    #[tokio::test]
    async fn advance_on_unknown_session_fails() {
        let handler = handler();
        let err = handler
            .advance(&SessionId::new(), Answer::text("hello"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionNotFound);
    }

    #[tokio::test]
    async fn full_conversation_completes_and_persists() {
        let handler = handler();
        let (session_id, first) = handler.start_session(BusinessId::new()).await.unwrap();
        let results = run_to_recommendation(&handler, &session_id, first).await;
        assert!(!results.is_empty());

        let pick = results[0].archetype_id.as_str().to_string();
        let outcome = handler
            .advance(&session_id, Answer::choice(&pick))
            .await
            .unwrap();
        match outcome {
            AdvanceOutcome::Completed { selected } => assert_eq!(selected.as_str(), pick),
            other => panic!("unexpected outcome {:?}", other),
        }

        let session = handler.session(&session_id).await.unwrap();
        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(
            session.selected_archetype().map(|id| id.as_str()),
            Some(pick.as_str())
        );
    }

    #[tokio::test]
    async fn turn_after_completion_is_rejected() {
        let handler = handler();
        let (session_id, first) = handler.start_session(BusinessId::new()).await.unwrap();
        let results = run_to_recommendation(&handler, &session_id, first).await;
        let pick = results[0].archetype_id.as_str().to_string();
        handler
            .advance(&session_id, Answer::choice(&pick))
            .await
            .unwrap();

        let err = handler
            .advance(&session_id, Answer::choice(&pick))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionCompleted);
    }

    #[tokio::test]
    async fn concurrent_turn_is_busy() {
        let handler = handler();
        let (session_id, _) = handler.start_session(BusinessId::new()).await.unwrap();

        let _held = handler.acquire(&session_id).unwrap();
        let err = handler
            .advance(&session_id, Answer::text("Acme"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Busy);
        assert_eq!(
            err.details.get("session_id"),
            Some(&session_id.to_string())
        );
    }

    #[tokio::test]
    async fn released_lock_allows_the_retry() {
        let handler = handler();
        let (session_id, _) = handler.start_session(BusinessId::new()).await.unwrap();

        {
            let _held = handler.acquire(&session_id).unwrap();
        }
        let outcome = handler
            .advance(&session_id, Answer::text("Acme Web Studio"))
            .await
            .unwrap();
        assert!(matches!(outcome, AdvanceOutcome::NextPrompt { .. }));
    }

    #[tokio::test]
    async fn idle_lock_entries_are_swept_on_the_next_acquire() {
        let handler = handler();
        let (first, _) = handler.start_session(BusinessId::new()).await.unwrap();
        let (second, _) = handler.start_session(BusinessId::new()).await.unwrap();

        handler
            .advance(&first, Answer::text("Acme Web Studio"))
            .await
            .unwrap();
        {
            let locks = handler.locks.lock().unwrap();
            assert!(locks.contains_key(&first));
        }

        // a turn on any other session prunes entries with no turn in flight
        handler
            .advance(&second, Answer::text("Bravo Consulting"))
            .await
            .unwrap();
        let locks = handler.locks.lock().unwrap();
        assert!(!locks.contains_key(&first));
        assert!(locks.contains_key(&second));
    }

    #[tokio::test]
    async fn empty_recommendation_offers_the_default_archetype() {
        // a name alone carries no scoring tags, so nothing qualifies
        let name_only = AssessmentScript::new(
            AssessmentScript::default()
                .questions()
                .iter()
                .filter(|q| q.id.as_str() == "business_name")
                .cloned()
                .collect(),
            crate::domain::flow::DEFAULT_TURN_BUDGET,
        )
        .unwrap();
        let handler = AdvanceSessionHandler::new(
            Arc::new(InMemorySessionStore::new()),
            name_only,
            builtin_catalog(),
            ArchetypeId::new("value_calculator").unwrap(),
        )
        .unwrap();

        let (session_id, _) = handler.start_session(BusinessId::new()).await.unwrap();
        let outcome = handler
            .advance(&session_id, Answer::text("Acme Web Studio"))
            .await
            .unwrap();
        match outcome {
            AdvanceOutcome::Recommendation { results } => {
                assert_eq!(results.len(), 1);
                assert_eq!(results[0].archetype_id.as_str(), "value_calculator");
                assert_eq!(results[0].confidence, 0.0);
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        // confirming the default closes the session
        let outcome = handler
            .advance(&session_id, Answer::choice("value_calculator"))
            .await
            .unwrap();
        assert!(matches!(outcome, AdvanceOutcome::Completed { .. }));
    }

    #[tokio::test]
    async fn expired_session_is_abandoned_and_persisted() {
        let store = Arc::new(InMemorySessionStore::new());
        let session = ConversationSession::with_ttl(BusinessId::new(), -1);
        let session_id = *session.id();
        store.put(&session).await.unwrap();
        let handler = AdvanceSessionHandler::new(
            store,
            AssessmentScript::default(),
            builtin_catalog(),
            ArchetypeId::new("interactive_quiz").unwrap(),
        )
        .unwrap();

        let outcome = handler
            .advance(&session_id, Answer::text("too late"))
            .await
            .unwrap();
        assert_eq!(outcome, AdvanceOutcome::Abandoned);
        let session = handler.session(&session_id).await.unwrap();
        assert_eq!(session.status(), SessionStatus::Abandoned);
    }
}
