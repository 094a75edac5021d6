//! The assessment script.
//!
//! The script is the data the flow engine runs: ordered questions per
//! topic stage, each with a trigger predicate and a target attribute. The
//! default script mirrors the standard onboarding questionnaire; bespoke
//! deployments construct their own.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{QuestionId, ValidationError};
use crate::domain::profile::{AttributeKey, BusinessProfile};

use super::{AnswerShape, ChoiceOption, QuestionDefinition, Stage, Trigger};

/// Soft turn budget for a whole assessment, roughly five to seven minutes
/// of discrete-turn interaction.
pub const DEFAULT_TURN_BUDGET: u32 = 18;

/// An ordered, validated set of assessment questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentScript {
    questions: Vec<QuestionDefinition>,
    turn_budget: u32,
}

impl AssessmentScript {
    /// Builds a script from an ordered question list.
    ///
    /// # Errors
    ///
    /// `InvalidFormat` if a question id repeats or a question is assigned
    /// to a stage that asks no questions.
    pub fn new(questions: Vec<QuestionDefinition>, turn_budget: u32) -> Result<Self, ValidationError> {
        let mut seen: Vec<&QuestionId> = Vec::with_capacity(questions.len());
        for question in &questions {
            if !question.stage.asks_questions() {
                return Err(ValidationError::invalid_format(
                    "questions",
                    format!(
                        "Question '{}' is assigned to non-question stage {:?}",
                        question.id, question.stage
                    ),
                ));
            }
            if seen.contains(&&question.id) {
                return Err(ValidationError::invalid_format(
                    "questions",
                    format!("Duplicate question id '{}'", question.id),
                ));
            }
            seen.push(&question.id);
        }
        Ok(Self {
            questions,
            turn_budget,
        })
    }

    pub fn turn_budget(&self) -> u32 {
        self.turn_budget
    }

    /// All questions, in script order.
    pub fn questions(&self) -> &[QuestionDefinition] {
        &self.questions
    }

    /// Looks up a question by id.
    pub fn question(&self, id: &QuestionId) -> Option<&QuestionDefinition> {
        self.questions.iter().find(|q| &q.id == id)
    }

    /// Questions belonging to a stage, in script order.
    pub fn questions_for(&self, stage: Stage) -> impl Iterator<Item = &QuestionDefinition> {
        self.questions.iter().filter(move |q| q.stage == stage)
    }

    /// The next askable question in a stage: not yet answered, trigger met.
    ///
    /// Returns `None` once the stage is exhausted, which is the engine's
    /// signal to transition.
    pub fn next_question(
        &self,
        stage: Stage,
        answered: &[QuestionId],
        profile: &BusinessProfile,
    ) -> Option<&QuestionDefinition> {
        self.questions_for(stage)
            .find(|q| !answered.contains(&q.id) && q.trigger.is_met(profile))
    }
}

impl Default for AssessmentScript {
    fn default() -> Self {
        default_script()
    }
}

fn choice(options: &[(&str, &str)]) -> AnswerShape {
    AnswerShape::Choice {
        options: options
            .iter()
            .map(|(tag, label)| ChoiceOption::new(*tag, *label))
            .collect(),
    }
}

fn multi_choice(options: &[(&str, &str)], max: usize) -> AnswerShape {
    AnswerShape::MultiChoice {
        options: options
            .iter()
            .map(|(tag, label)| ChoiceOption::new(*tag, *label))
            .collect(),
        max,
    }
}

fn question(
    id: &str,
    stage: Stage,
    text: &str,
    shape: AnswerShape,
    target: AttributeKey,
    trigger: Trigger,
    required: bool,
) -> QuestionDefinition {
    QuestionDefinition {
        id: QuestionId::new(id).expect("script question id"),
        stage,
        text: text.to_string(),
        shape,
        target,
        trigger,
        required,
    }
}

/// The standard onboarding questionnaire.
pub fn default_script() -> AssessmentScript {
    let questions = vec![
        question(
            "business_name",
            Stage::BusinessClassification,
            "What is your business called?",
            AnswerShape::FreeText { max_len: 80 },
            AttributeKey::BusinessName,
            Trigger::Always,
            true,
        ),
        question(
            "business_type",
            Stage::BusinessClassification,
            "What kind of business do you run?",
            choice(&[
                ("web_design", "Web design or development"),
                ("marketing_agency", "Marketing agency"),
                ("saas", "Software as a service"),
                ("ecommerce", "Online store"),
                ("consulting", "Consulting or coaching"),
                ("local_service", "Local service business"),
                ("other", "Something else"),
            ]),
            AttributeKey::Industry,
            Trigger::Always,
            true,
        ),
        question(
            "business_size",
            Stage::BusinessClassification,
            "How big is your team?",
            choice(&[
                ("solo", "Just me"),
                ("micro", "2-5 people"),
                ("small", "6-20 people"),
                ("medium", "21-100 people"),
                ("large", "More than 100 people"),
            ]),
            AttributeKey::BusinessSize,
            Trigger::Always,
            true,
        ),
        question(
            "language_variant",
            Stage::BusinessClassification,
            "Which English variant should your lead magnet use?",
            choice(&[
                ("en-US", "American English"),
                ("en-GB", "British English"),
                ("en-AU", "Australian English"),
                ("en-PH", "Philippine English"),
            ]),
            AttributeKey::LanguageVariant,
            Trigger::Always,
            false,
        ),
        question(
            "target_audience",
            Stage::CustomerInsight,
            "Who are your customers, mostly?",
            choice(&[
                ("b2b_small", "Small businesses"),
                ("b2b_enterprise", "Larger companies"),
                ("b2c", "Consumers"),
                ("local", "Local customers"),
                ("mixed", "A mix"),
            ]),
            AttributeKey::Audience,
            Trigger::Always,
            true,
        ),
        question(
            "customer_pain_points",
            Stage::CustomerInsight,
            "What do your customers struggle with most? Pick up to three, most important first.",
            multi_choice(
                &[
                    ("time", "Not enough time"),
                    ("knowledge", "Lack of expertise"),
                    ("cost", "High costs"),
                    ("complexity", "Too many confusing options"),
                    ("quality", "Finding reliable quality"),
                    ("access", "Hard to access the right help"),
                    ("risk", "Fear of making the wrong choice"),
                    ("support", "Lack of ongoing support"),
                ],
                3,
            ),
            AttributeKey::PainPoints,
            Trigger::Always,
            true,
        ),
        // sales cycle only matters for business buyers
        question(
            "sales_cycle_length",
            Stage::CustomerInsight,
            "How long is your typical sales cycle, from first contact to close? 1 is same-day, 5 is months.",
            AnswerShape::Scale { min: 1, max: 5 },
            AttributeKey::SalesCycle,
            Trigger::AttributeOneOf {
                key: AttributeKey::Audience,
                tags: vec!["b2b_small".to_string(), "b2b_enterprise".to_string()],
            },
            false,
        ),
        question(
            "unique_value",
            Stage::ValueProposition,
            "What sets you apart from competitors? Pick up to three.",
            multi_choice(
                &[
                    ("expertise", "Deep expertise"),
                    ("speed", "Fast turnaround"),
                    ("price", "Better pricing"),
                    ("quality", "Higher quality"),
                    ("service", "Personal service"),
                    ("innovation", "Innovative approach"),
                ],
                3,
            ),
            AttributeKey::Usps,
            Trigger::Always,
            true,
        ),
        question(
            "marketing_goals",
            Stage::ValueProposition,
            "What should this lead magnet achieve for you? Pick up to two.",
            multi_choice(
                &[
                    ("leads", "Capture more leads"),
                    ("authority", "Build authority"),
                    ("engagement", "Engage visitors"),
                    ("conversion", "Convert more visitors"),
                    ("education", "Educate my market"),
                ],
                2,
            ),
            AttributeKey::MarketingGoals,
            Trigger::Always,
            false,
        ),
        question(
            "tech_comfort",
            Stage::TechnicalCapability,
            "How comfortable are you with web tools and embeds?",
            choice(&[
                ("low", "I prefer things done for me"),
                ("medium", "I can follow instructions"),
                ("high", "Very comfortable, I build things"),
            ]),
            AttributeKey::TechCapability,
            Trigger::Always,
            true,
        ),
    ];

    AssessmentScript::new(questions, DEFAULT_TURN_BUDGET).expect("default script is valid")
}
