//! Question flow module.
//!
//! A finite-state conversation driver: topic stages own ordered question
//! lists with data-driven trigger predicates, and the engine decides what
//! to ask next, when to skip, and when to hand over to scoring.

mod engine;
mod question;
mod script;
mod stage;

pub use engine::{AdvanceOutcome, FlowEngine};
pub use question::{AnswerShape, ChoiceOption, QuestionDefinition, Trigger};
pub use script::{AssessmentScript, DEFAULT_TURN_BUDGET};
pub use stage::Stage;
