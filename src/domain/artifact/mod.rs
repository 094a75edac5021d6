//! Artifact module.
//!
//! The artifact descriptor is the compiler's output: resolved components,
//! an embedded runtime rule set, and a validation status. Descriptors are
//! immutable; refinement produces a new version in the append-only
//! history.

mod descriptor;
mod history;
mod rules;
mod validator;

pub use descriptor::{ArtifactDescriptor, ResolvedComponent, ValidationStatus};
pub use history::ArtifactHistory;
pub use rules::{
    evaluate_rules, EndUserInput, InputValue, PersonalizationRule, PersonalizationRuleSet,
    RuleAction, RuleCondition, RuleOutcome,
};
pub use validator::{ArtifactValidator, ValidationResult, Violation};
