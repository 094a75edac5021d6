//! The question flow engine.
//!
//! Drives a session through the stage machine: validates answer shapes,
//! applies trigger predicates and the turn budget, invokes scoring when
//! the questions run out, and closes the session on confirmation.

use tracing::{debug, info, warn};

use crate::domain::catalog::ArchetypeCatalog;
use crate::domain::foundation::{ArchetypeId, DomainError, ErrorCode, QuestionId};
use crate::domain::scoring::{ScoreResult, ScoringEngine, DEFAULT_TOP_N};
use crate::domain::session::{Answer, ConversationSession};

use super::{AssessmentScript, QuestionDefinition, Stage};

/// What the caller should do after a turn.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// Present this question next.
    NextPrompt { question: QuestionDefinition },
    /// The answer was rejected; re-present the previous prompt with this
    /// reason. Nothing was recorded and no turn was consumed.
    Reprompt { reason: String },
    /// The questions are done; present these ranked recommendations and
    /// collect an archetype selection. An empty list means no archetype
    /// qualified and the caller applies its configured default.
    Recommendation { results: Vec<ScoreResult> },
    /// The owner confirmed a selection; the session is closed.
    Completed { selected: ArchetypeId },
    /// The TTL expired; the session is closed without a selection.
    Abandoned,
}

/// Stateless driver over a script and a catalog.
#[derive(Debug, Clone)]
pub struct FlowEngine<'a> {
    script: &'a AssessmentScript,
    catalog: &'a ArchetypeCatalog,
    top_n: usize,
}

impl<'a> FlowEngine<'a> {
    pub fn new(script: &'a AssessmentScript, catalog: &'a ArchetypeCatalog) -> Self {
        Self {
            script,
            catalog,
            top_n: DEFAULT_TOP_N,
        }
    }

    /// Overrides how many recommendations are surfaced.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Opens the conversation: moves the session out of `Init` and returns
    /// the first prompt.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidStateTransition` if the session already began.
    pub fn begin(&self, session: &mut ConversationSession) -> Result<AdvanceOutcome, DomainError> {
        if self.expire_if_due(session)? {
            return Ok(AdvanceOutcome::Abandoned);
        }
        if session.stage() != Stage::Init {
            return Err(DomainError::invalid_transition(format!(
                "session already began, stage is {:?}",
                session.stage()
            )));
        }
        session.advance_stage(Stage::BusinessClassification)?;
        info!(session_id = %session.id(), "assessment started");
        self.prompt_or_progress(session)
    }

    /// Processes one turn.
    ///
    /// # Errors
    ///
    /// Fails with `SessionCompleted` on closed sessions and
    /// `InvalidStateTransition` if `begin` was never called. Shape
    /// violations are not errors; they come back as `Reprompt`.
    pub fn advance(
        &self,
        session: &mut ConversationSession,
        answer: Answer,
    ) -> Result<AdvanceOutcome, DomainError> {
        if self.expire_if_due(session)? {
            return Ok(AdvanceOutcome::Abandoned);
        }
        match session.stage() {
            Stage::Init => Err(DomainError::invalid_transition(
                "session has not begun; open it first",
            )),
            Stage::Done | Stage::Abandoned => Err(DomainError::session_completed(session.id())),
            Stage::Confirm => self.confirm(session, answer),
            stage if stage.asks_questions() => self.answer_question(session, answer),
            stage => Err(DomainError::new(
                ErrorCode::InternalError,
                format!("no turn is expected in stage {:?}", stage),
            )),
        }
    }

    fn answer_question(
        &self,
        session: &mut ConversationSession,
        answer: Answer,
    ) -> Result<AdvanceOutcome, DomainError> {
        let answered = answered_ids(session);
        let pending = self
            .script
            .next_question(session.stage(), &answered, session.profile());
        let question = match pending {
            Some(question) => question.clone(),
            // no pending question, the stray answer carries nothing to record
            None => return self.prompt_or_progress(session),
        };

        match question.accept(&answer) {
            Err(err) => {
                debug!(
                    session_id = %session.id(),
                    question_id = %question.id,
                    reason = %err.message,
                    "answer rejected, re-prompting"
                );
                Ok(AdvanceOutcome::Reprompt {
                    reason: err.message,
                })
            }
            Ok(value) => {
                session.record_answer(question.id.clone(), answer)?;
                session.set_attribute(question.target, value)?;
                debug!(
                    session_id = %session.id(),
                    question_id = %question.id,
                    turns_used = session.turns_used(),
                    "answer recorded"
                );
                self.prompt_or_progress(session)
            }
        }
    }

    /// Finds the next prompt, transitioning through exhausted stages and
    /// into scoring when the questions run out.
    fn prompt_or_progress(
        &self,
        session: &mut ConversationSession,
    ) -> Result<AdvanceOutcome, DomainError> {
        loop {
            let stage = session.stage();
            if stage.asks_questions() {
                if session.turns_used() < self.script.turn_budget() {
                    let answered = answered_ids(session);
                    if let Some(question) =
                        self.script.next_question(stage, &answered, session.profile())
                    {
                        return Ok(AdvanceOutcome::NextPrompt {
                            question: question.clone(),
                        });
                    }
                } else {
                    warn!(
                        session_id = %session.id(),
                        turns_used = session.turns_used(),
                        "turn budget exhausted, skipping to recommendation"
                    );
                }
                let next = stage.next().ok_or_else(|| {
                    DomainError::new(
                        ErrorCode::InternalError,
                        format!("stage {:?} has no successor", stage),
                    )
                })?;
                session.advance_stage(next)?;
                continue;
            }

            if stage == Stage::Recommend {
                let snapshot = session.profile_snapshot();
                let results = ScoringEngine::new(self.catalog)
                    .with_top_n(self.top_n)
                    .score(&snapshot);
                info!(
                    session_id = %session.id(),
                    qualified = results.len(),
                    "assessment scored"
                );
                session.begin_recommending(results.clone())?;
                session.advance_stage(Stage::Confirm)?;
                return Ok(AdvanceOutcome::Recommendation { results });
            }

            return Err(DomainError::new(
                ErrorCode::InternalError,
                format!("flow cannot progress from stage {:?}", stage),
            ));
        }
    }

    fn confirm(
        &self,
        session: &mut ConversationSession,
        answer: Answer,
    ) -> Result<AdvanceOutcome, DomainError> {
        let value = match answer {
            Answer::Choice { value } => value,
            other => {
                return Ok(AdvanceOutcome::Reprompt {
                    reason: format!(
                        "pick one recommended option, a {} answer does not fit",
                        other.kind()
                    ),
                })
            }
        };
        let id = match ArchetypeId::new(&value) {
            Ok(id) => id,
            Err(_) => {
                return Ok(AdvanceOutcome::Reprompt {
                    reason: "pick one of the recommended options".to_string(),
                })
            }
        };

        let recommended = session.recommendation().unwrap_or(&[]);
        let allowed = if recommended.is_empty() {
            // nothing qualified; the caller supplied its default archetype
            self.catalog.archetype(&id).is_some()
        } else {
            recommended.iter().any(|r| r.archetype_id == id)
        };
        if !allowed {
            return Ok(AdvanceOutcome::Reprompt {
                reason: format!("'{}' is not one of the recommended options", value),
            });
        }

        session.complete(id.clone())?;
        info!(session_id = %session.id(), archetype = %id, "assessment completed");
        Ok(AdvanceOutcome::Completed { selected: id })
    }

    /// Abandons the session if its TTL elapsed, returning whether it did.
    fn expire_if_due(&self, session: &mut ConversationSession) -> Result<bool, DomainError> {
        if session.is_expired() && !session.status().is_closed() {
            warn!(session_id = %session.id(), "session TTL expired, abandoning");
            session.abandon()?;
            return Ok(true);
        }
        Ok(false)
    }
}

fn answered_ids(session: &ConversationSession) -> Vec<QuestionId> {
    session
        .answer_log()
        .iter()
        .map(|record| record.question_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::builtin_catalog;
    use crate::domain::foundation::BusinessId;
    use crate::domain::profile::AttributeKey;
    use crate::domain::session::SessionStatus;

    fn canned_answer(question_id: &str) -> Answer {
        match question_id {
            "business_name" => Answer::text("Acme Web Studio"),
            "business_type" => Answer::choice("web_design"),
            "business_size" => Answer::choice("micro"),
            "language_variant" => Answer::choice("en-GB"),
            "target_audience" => Answer::choice("b2b_small"),
            "customer_pain_points" => Answer::multi_choice(["knowledge", "complexity"]),
            "sales_cycle_length" => Answer::scale(3),
            "unique_value" => Answer::multi_choice(["expertise", "service"]),
            "marketing_goals" => Answer::multi_choice(["leads", "authority"]),
            "tech_comfort" => Answer::choice("medium"),
            other => panic!("no canned answer for {}", other),
        }
    }

    /// Answers prompts until the engine stops prompting.
    fn run_to_recommendation(
        engine: &FlowEngine<'_>,
        session: &mut ConversationSession,
    ) -> Vec<ScoreResult> {
        let mut outcome = engine.begin(session).unwrap();
        loop {
            match outcome {
                AdvanceOutcome::NextPrompt { question } => {
                    outcome = engine
                        .advance(session, canned_answer(question.id.as_str()))
                        .unwrap();
                }
                AdvanceOutcome::Recommendation { results } => return results,
                other => panic!("unexpected outcome {:?}", other),
            }
        }
    }

    #[test]
    fn begin_returns_first_prompt() {
        let script = AssessmentScript::default();
        let catalog = builtin_catalog();
        let engine = FlowEngine::new(&script, &catalog);
        let mut session = ConversationSession::new(BusinessId::new());

        let outcome = engine.begin(&mut session).unwrap();
        match outcome {
            AdvanceOutcome::NextPrompt { question } => {
                assert_eq!(question.id.as_str(), "business_name");
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(session.stage(), Stage::BusinessClassification);
    }

    #[test]
    fn begin_twice_is_rejected() {
        let script = AssessmentScript::default();
        let catalog = builtin_catalog();
        let engine = FlowEngine::new(&script, &catalog);
        let mut session = ConversationSession::new(BusinessId::new());

        engine.begin(&mut session).unwrap();
        let err = engine.begin(&mut session).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn advance_before_begin_is_rejected() {
        let script = AssessmentScript::default();
        let catalog = builtin_catalog();
        let engine = FlowEngine::new(&script, &catalog);
        let mut session = ConversationSession::new(BusinessId::new());

        let err = engine
            .advance(&mut session, Answer::text("hello"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn full_assessment_reaches_a_recommendation() {
        let script = AssessmentScript::default();
        let catalog = builtin_catalog();
        let engine = FlowEngine::new(&script, &catalog);
        let mut session = ConversationSession::new(BusinessId::new());

        let results = run_to_recommendation(&engine, &mut session);
        assert!(!results.is_empty());
        assert_eq!(session.status(), SessionStatus::Recommending);
        assert_eq!(session.stage(), Stage::Confirm);
        assert!(session.profile().contains(AttributeKey::Industry));
        assert!(session.profile().contains(AttributeKey::TechCapability));
    }

    #[test]
    fn confirming_a_recommendation_completes_the_session() {
        let script = AssessmentScript::default();
        let catalog = builtin_catalog();
        let engine = FlowEngine::new(&script, &catalog);
        let mut session = ConversationSession::new(BusinessId::new());

        let results = run_to_recommendation(&engine, &mut session);
        let pick = results[0].archetype_id.as_str().to_string();
        let outcome = engine.advance(&mut session, Answer::choice(&pick)).unwrap();

        match outcome {
            AdvanceOutcome::Completed { selected } => assert_eq!(selected.as_str(), pick),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.stage(), Stage::Done);
    }

    #[test]
    fn confirm_rejects_an_unrecommended_archetype() {
        let script = AssessmentScript::default();
        let catalog = builtin_catalog();
        let engine = FlowEngine::new(&script, &catalog).with_top_n(1);
        let mut session = ConversationSession::new(BusinessId::new());

        let results = run_to_recommendation(&engine, &mut session);
        assert_eq!(results.len(), 1);
        let outcome = engine
            .advance(&mut session, Answer::choice("value_calculator"))
            .unwrap();
        assert!(matches!(outcome, AdvanceOutcome::Reprompt { .. }));
        assert_eq!(session.status(), SessionStatus::Recommending);
    }

    #[test]
    fn rejected_answer_reprompts_without_consuming_a_turn() {
        let script = AssessmentScript::default();
        let catalog = builtin_catalog();
        let engine = FlowEngine::new(&script, &catalog);
        let mut session = ConversationSession::new(BusinessId::new());

        engine.begin(&mut session).unwrap();
        // business_name expects free text
        let outcome = engine.advance(&mut session, Answer::scale(3)).unwrap();
        assert!(matches!(outcome, AdvanceOutcome::Reprompt { .. }));
        assert_eq!(session.turns_used(), 0);
        assert!(session.answer_log().is_empty());
        assert_eq!(session.stage(), Stage::BusinessClassification);
    }

    #[test]
    fn trigger_skips_sales_cycle_for_consumer_audience() {
        let script = AssessmentScript::default();
        let catalog = builtin_catalog();
        let engine = FlowEngine::new(&script, &catalog);
        let mut session = ConversationSession::new(BusinessId::new());

        let mut outcome = engine.begin(&mut session).unwrap();
        loop {
            match outcome {
                AdvanceOutcome::NextPrompt { question } => {
                    assert_ne!(question.id.as_str(), "sales_cycle_length");
                    let answer = if question.id.as_str() == "target_audience" {
                        Answer::choice("b2c")
                    } else {
                        canned_answer(question.id.as_str())
                    };
                    outcome = engine.advance(&mut session, answer).unwrap();
                }
                AdvanceOutcome::Recommendation { .. } => break,
                other => panic!("unexpected outcome {:?}", other),
            }
        }
    }

    #[test]
    fn exhausted_turn_budget_skips_to_recommendation() {
        let tight = AssessmentScript::new(
            AssessmentScript::default().questions().to_vec(),
            2,
        )
        .unwrap();
        let catalog = builtin_catalog();
        let engine = FlowEngine::new(&tight, &catalog);
        let mut session = ConversationSession::new(BusinessId::new());

        let mut outcome = engine.begin(&mut session).unwrap();
        let mut prompts = 0;
        loop {
            match outcome {
                AdvanceOutcome::NextPrompt { question } => {
                    prompts += 1;
                    outcome = engine
                        .advance(&mut session, canned_answer(question.id.as_str()))
                        .unwrap();
                }
                AdvanceOutcome::Recommendation { .. } => break,
                other => panic!("unexpected outcome {:?}", other),
            }
        }
        // unanswered attributes simply stay absent
        assert_eq!(prompts, 2);
        assert!(!session.profile().contains(AttributeKey::TechCapability));
    }

    #[test]
    fn expired_session_is_abandoned_on_advance() {
        let script = AssessmentScript::default();
        let catalog = builtin_catalog();
        let engine = FlowEngine::new(&script, &catalog);
        let mut session = ConversationSession::with_ttl(BusinessId::new(), -1);

        let outcome = engine
            .advance(&mut session, Answer::text("too late"))
            .unwrap();
        assert_eq!(outcome, AdvanceOutcome::Abandoned);
        assert_eq!(session.status(), SessionStatus::Abandoned);
        assert_eq!(session.stage(), Stage::Abandoned);
    }
}
