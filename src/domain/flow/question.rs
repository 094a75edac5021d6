//! Question definitions.
//!
//! Questions are data: a shape contract for the answer, a trigger predicate
//! deciding whether the question applies to this business, and the profile
//! attribute the accepted answer writes.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, QuestionId};
use crate::domain::profile::{AttributeKey, AttributeValue, BusinessProfile};
use crate::domain::session::Answer;

use super::Stage;

/// One selectable option in a closed-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Stable tag stored in the profile and matched by weight tables.
    pub tag: String,
    /// Human-readable label shown in the prompt.
    pub label: String,
}

impl ChoiceOption {
    pub fn new(tag: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            label: label.into(),
        }
    }
}

/// The shape an answer must satisfy to be accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerShape {
    /// Exactly one option from a closed list.
    Choice { options: Vec<ChoiceOption> },
    /// Up to `max` options from a closed list, order significant.
    MultiChoice { options: Vec<ChoiceOption>, max: usize },
    /// Free text up to `max_len` characters.
    FreeText { max_len: usize },
    /// An integer reading within `[min, max]`.
    Scale { min: i32, max: i32 },
}

/// Predicate over already-collected profile attributes.
///
/// Triggers keep branching data-driven: whether a question applies is
/// declared in the script, not coded in the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trigger {
    /// Always ask.
    Always,
    /// Ask only if the key has been collected.
    HasAttribute { key: AttributeKey },
    /// Ask only if the key has not been collected.
    AttributeMissing { key: AttributeKey },
    /// Ask only if the key's value matches the tag.
    AttributeEquals { key: AttributeKey, tag: String },
    /// Ask only if the key's value matches any of the tags.
    AttributeOneOf { key: AttributeKey, tags: Vec<String> },
}

impl Trigger {
    /// Evaluates the predicate against the collected profile.
    pub fn is_met(&self, profile: &BusinessProfile) -> bool {
        match self {
            Trigger::Always => true,
            Trigger::HasAttribute { key } => profile.contains(*key),
            Trigger::AttributeMissing { key } => !profile.contains(*key),
            Trigger::AttributeEquals { key, tag } => profile
                .get(*key)
                .map(|value| value.match_tags().iter().any(|t| t == tag))
                .unwrap_or(false),
            Trigger::AttributeOneOf { key, tags } => profile
                .get(*key)
                .map(|value| {
                    value
                        .match_tags()
                        .iter()
                        .any(|t| tags.iter().any(|candidate| candidate == t))
                })
                .unwrap_or(false),
        }
    }
}

/// A question as declared in the assessment script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    pub id: QuestionId,
    /// The topic stage this question belongs to.
    pub stage: Stage,
    /// Prompt text shown to the business owner.
    pub text: String,
    pub shape: AnswerShape,
    /// The profile attribute an accepted answer writes.
    pub target: AttributeKey,
    pub trigger: Trigger,
    /// Required questions gate stage completion; optional ones are asked
    /// when budget allows but never block a transition.
    pub required: bool,
}

impl QuestionDefinition {
    /// Validates an answer against this question's shape and maps it to
    /// the profile value it writes.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` when the answer does not satisfy the shape. The
    /// failure is local: the caller re-prompts without advancing.
    pub fn accept(&self, answer: &Answer) -> Result<AttributeValue, DomainError> {
        match (&self.shape, answer) {
            (AnswerShape::Choice { options }, Answer::Choice { value }) => {
                if options.iter().any(|o| &o.tag == value) {
                    Ok(AttributeValue::tag(value.clone()))
                } else {
                    Err(self.reject(format!("'{}' is not one of the offered options", value)))
                }
            }
            (AnswerShape::MultiChoice { options, max }, Answer::MultiChoice { values }) => {
                if values.is_empty() {
                    return Err(self.reject("pick at least one option"));
                }
                if values.len() > *max {
                    return Err(self.reject(format!("pick at most {} options", max)));
                }
                for value in values {
                    if !options.iter().any(|o| &o.tag == value) {
                        return Err(
                            self.reject(format!("'{}' is not one of the offered options", value))
                        );
                    }
                }
                Ok(AttributeValue::tags(values.clone()))
            }
            (AnswerShape::FreeText { max_len }, Answer::Text { value }) => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(self.reject("an empty answer cannot be recorded"));
                }
                if trimmed.chars().count() > *max_len {
                    return Err(self.reject(format!("keep it under {} characters", max_len)));
                }
                Ok(AttributeValue::text(trimmed))
            }
            (AnswerShape::Scale { min, max }, Answer::Scale { value }) => {
                let value = i32::from(*value);
                if value < *min || value > *max {
                    return Err(self.reject(format!("answer must be between {} and {}", min, max)));
                }
                Ok(AttributeValue::Scale(value))
            }
            (_, answer) => Err(self.reject(format!(
                "a {} answer does not fit this question",
                answer.kind()
            ))),
        }
    }

    fn reject(&self, reason: impl Into<String>) -> DomainError {
        DomainError::validation(self.id.as_str(), reason.into())
            .with_detail("question_id", self.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice_question() -> QuestionDefinition {
        QuestionDefinition {
            id: QuestionId::new("business_type").unwrap(),
            stage: Stage::BusinessClassification,
            text: "What kind of business do you run?".to_string(),
            shape: AnswerShape::Choice {
                options: vec![
                    ChoiceOption::new("saas", "Software as a service"),
                    ChoiceOption::new("ecommerce", "Online store"),
                ],
            },
            target: AttributeKey::Industry,
            trigger: Trigger::Always,
            required: true,
        }
    }

    fn scale_question() -> QuestionDefinition {
        QuestionDefinition {
            id: QuestionId::new("sales_cycle_length").unwrap(),
            stage: Stage::CustomerInsight,
            text: "How long is your typical sales cycle?".to_string(),
            shape: AnswerShape::Scale { min: 1, max: 5 },
            target: AttributeKey::SalesCycle,
            trigger: Trigger::Always,
            required: false,
        }
    }

    mod shape_validation {
        use super::*;

        #[test]
        fn accepts_listed_choice() {
            let value = choice_question().accept(&Answer::choice("saas")).unwrap();
            assert_eq!(value, AttributeValue::tag("saas"));
        }

        #[test]
        fn rejects_unlisted_choice() {
            let err = choice_question()
                .accept(&Answer::choice("bakery"))
                .unwrap_err();
            assert_eq!(
                err.code,
                crate::domain::foundation::ErrorCode::ValidationFailed
            );
            assert_eq!(
                err.details.get("question_id"),
                Some(&"business_type".to_string())
            );
        }

        #[test]
        fn rejects_wrong_answer_kind() {
            let err = choice_question().accept(&Answer::scale(3)).unwrap_err();
            assert!(err.message.contains("scale"));
        }

        #[test]
        fn scale_enforces_range() {
            assert!(scale_question().accept(&Answer::scale(5)).is_ok());
            assert!(scale_question().accept(&Answer::scale(9)).is_err());
            assert!(scale_question().accept(&Answer::scale(0)).is_err());
        }

        #[test]
        fn multi_choice_enforces_cap_and_membership() {
            let question = QuestionDefinition {
                id: QuestionId::new("customer_pain_points").unwrap(),
                stage: Stage::CustomerInsight,
                text: "Pick your customers' top struggles.".to_string(),
                shape: AnswerShape::MultiChoice {
                    options: vec![
                        ChoiceOption::new("time", "Lack of time"),
                        ChoiceOption::new("cost", "High costs"),
                        ChoiceOption::new("knowledge", "Lack of expertise"),
                    ],
                    max: 2,
                },
                target: AttributeKey::PainPoints,
                trigger: Trigger::Always,
                required: true,
            };

            assert_eq!(
                question
                    .accept(&Answer::multi_choice(["time", "cost"]))
                    .unwrap(),
                AttributeValue::tags(["time", "cost"])
            );
            assert!(question
                .accept(&Answer::multi_choice(["time", "cost", "knowledge"]))
                .is_err());
            assert!(question.accept(&Answer::multi_choice(["quality"])).is_err());
            assert!(question
                .accept(&Answer::multi_choice(Vec::<String>::new()))
                .is_err());
        }

        #[test]
        fn free_text_trims_and_caps_length() {
            let question = QuestionDefinition {
                id: QuestionId::new("business_name").unwrap(),
                stage: Stage::BusinessClassification,
                text: "What is your business called?".to_string(),
                shape: AnswerShape::FreeText { max_len: 10 },
                target: AttributeKey::BusinessName,
                trigger: Trigger::Always,
                required: true,
            };

            assert_eq!(
                question.accept(&Answer::text("  Acme Co  ")).unwrap(),
                AttributeValue::text("Acme Co")
            );
            assert!(question.accept(&Answer::text("   ")).is_err());
            assert!(question
                .accept(&Answer::text("A name well past ten characters"))
                .is_err());
        }
    }

    mod triggers {
        use super::*;

        #[test]
        fn always_fires() {
            assert!(Trigger::Always.is_met(&BusinessProfile::new()));
        }

        #[test]
        fn has_and_missing_are_complementary() {
            let mut profile = BusinessProfile::new();
            profile.set(AttributeKey::Industry, AttributeValue::tag("saas"));

            let has = Trigger::HasAttribute {
                key: AttributeKey::Industry,
            };
            let missing = Trigger::AttributeMissing {
                key: AttributeKey::Industry,
            };
            assert!(has.is_met(&profile));
            assert!(!missing.is_met(&profile));
            assert!(!has.is_met(&BusinessProfile::new()));
            assert!(missing.is_met(&BusinessProfile::new()));
        }

        #[test]
        fn equals_matches_value_tags() {
            let mut profile = BusinessProfile::new();
            profile.set(
                AttributeKey::PainPoints,
                AttributeValue::tags(["time", "cost"]),
            );

            let on_cost = Trigger::AttributeEquals {
                key: AttributeKey::PainPoints,
                tag: "cost".to_string(),
            };
            let on_quality = Trigger::AttributeEquals {
                key: AttributeKey::PainPoints,
                tag: "quality".to_string(),
            };
            assert!(on_cost.is_met(&profile));
            assert!(!on_quality.is_met(&profile));
        }

        #[test]
        fn one_of_matches_any_listed_tag() {
            let mut profile = BusinessProfile::new();
            profile.set(AttributeKey::Audience, AttributeValue::tag("b2b_small"));

            let b2b = Trigger::AttributeOneOf {
                key: AttributeKey::Audience,
                tags: vec!["b2b_small".to_string(), "b2b_enterprise".to_string()],
            };
            assert!(b2b.is_met(&profile));

            profile.set(AttributeKey::Audience, AttributeValue::tag("b2c"));
            assert!(!b2b.is_met(&profile));
        }

        #[test]
        fn predicates_over_absent_keys_do_not_fire() {
            let equals = Trigger::AttributeEquals {
                key: AttributeKey::Audience,
                tag: "b2c".to_string(),
            };
            assert!(!equals.is_met(&BusinessProfile::new()));
        }
    }
}
