//! Customer-tier personalization rules.
//!
//! Tier 2 of the personalization model: an ordered rule set embedded in
//! the artifact, evaluated per end-user session by the serving runtime.
//! Rules select among already-materialized content fragments or adjust a
//! running score; they never trigger new generation and never mutate the
//! artifact.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// A value supplied by an end user while interacting with the artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Number(f64),
    Text(String),
}

impl InputValue {
    fn as_number(&self) -> Option<f64> {
        match self {
            InputValue::Number(n) => Some(*n),
            InputValue::Text(s) => s.trim().parse().ok(),
        }
    }

    fn as_text(&self) -> String {
        match self {
            InputValue::Number(n) => n.to_string(),
            InputValue::Text(s) => s.clone(),
        }
    }
}

/// End-user input collected by the artifact's components at runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndUserInput {
    fields: BTreeMap<String, InputValue>,
}

impl EndUserInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields
            .insert(field.into(), InputValue::Text(value.into()));
        self
    }

    pub fn with_number(mut self, field: impl Into<String>, value: f64) -> Self {
        self.fields.insert(field.into(), InputValue::Number(value));
        self
    }

    pub fn get(&self, field: &str) -> Option<&InputValue> {
        self.fields.get(field)
    }
}

/// Condition over one end-user input field.
///
/// A condition over an absent field never matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleCondition {
    Equals { field: String, value: String },
    OneOf { field: String, values: Vec<String> },
    GreaterThan { field: String, threshold: f64 },
    LessThan { field: String, threshold: f64 },
}

impl RuleCondition {
    /// The input field this condition reads.
    pub fn field(&self) -> &str {
        match self {
            RuleCondition::Equals { field, .. }
            | RuleCondition::OneOf { field, .. }
            | RuleCondition::GreaterThan { field, .. }
            | RuleCondition::LessThan { field, .. } => field,
        }
    }

    /// Evaluates the condition against one end user's input.
    pub fn matches(&self, input: &EndUserInput) -> bool {
        match self {
            RuleCondition::Equals { field, value } => input
                .get(field)
                .map(|v| v.as_text() == *value)
                .unwrap_or(false),
            RuleCondition::OneOf { field, values } => input
                .get(field)
                .map(|v| values.contains(&v.as_text()))
                .unwrap_or(false),
            RuleCondition::GreaterThan { field, threshold } => input
                .get(field)
                .and_then(InputValue::as_number)
                .map(|n| n > *threshold)
                .unwrap_or(false),
            RuleCondition::LessThan { field, threshold } => input
                .get(field)
                .and_then(InputValue::as_number)
                .map(|n| n < *threshold)
                .unwrap_or(false),
        }
    }
}

/// What happens when a rule's condition matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleAction {
    /// Surface a pre-materialized content fragment.
    ShowContent { fragment: String },
    /// Adjust the running result score.
    AdjustScore { delta: f64 },
}

/// One condition/action pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizationRule {
    pub condition: RuleCondition,
    pub action: RuleAction,
}

impl PersonalizationRule {
    pub fn new(condition: RuleCondition, action: RuleAction) -> Self {
        Self { condition, action }
    }
}

/// Ordered rule set embedded in an artifact, evaluated per end user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalizationRuleSet {
    rules: Vec<PersonalizationRule>,
}

impl PersonalizationRuleSet {
    pub fn new(rules: Vec<PersonalizationRule>) -> Self {
        Self { rules }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> &[PersonalizationRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Every input field any rule reads.
    pub fn referenced_fields(&self) -> BTreeSet<&str> {
        self.rules
            .iter()
            .map(|rule| rule.condition.field())
            .collect()
    }
}

/// Result of evaluating a rule set for one end user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    /// Content fragments to surface, in rule order.
    pub fragments: Vec<String>,
    /// Net score adjustment.
    pub score_delta: f64,
}

/// Evaluates a rule set against one end user's input.
///
/// Pure: same rules and input always produce the same outcome, and the
/// rule set is never modified. The serving runtime calls this once per
/// end-user session.
pub fn evaluate_rules(rules: &PersonalizationRuleSet, input: &EndUserInput) -> RuleOutcome {
    let mut outcome = RuleOutcome::default();
    for rule in rules.rules() {
        if !rule.condition.matches(input) {
            continue;
        }
        match &rule.action {
            RuleAction::ShowContent { fragment } => outcome.fragments.push(fragment.clone()),
            RuleAction::AdjustScore { delta } => outcome.score_delta += delta,
        }
    }
    outcome
}
