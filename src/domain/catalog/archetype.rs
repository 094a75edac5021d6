//! Archetype definitions.
//!
//! An archetype is a catalogued lead-magnet type (quiz, calculator,
//! diagnostic, assessment) with declared scoring weights, required profile
//! attributes, component references, and a minimum confidence threshold.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{ArchetypeId, ComponentId, ValidationError};
use crate::domain::profile::AttributeKey;

/// Complexity tier of an archetype or component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityTier {
    /// Static content with light branching.
    Basic,
    /// Branching logic and computed results.
    Standard,
    /// Multi-step tools with runtime computation.
    Advanced,
}

/// Weight contributions per attribute value tag.
///
/// Keys are attribute keys; inner keys are value tags as produced by
/// [`crate::domain::profile::AttributeValue::match_tags`]. Weights are
/// strictly positive; absence of a tag simply contributes nothing.
pub type WeightTable = BTreeMap<AttributeKey, BTreeMap<String, f64>>;

/// A lead-magnet archetype as declared in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeDefinition {
    /// Catalog identifier, e.g. "website_performance_quiz".
    pub id: ArchetypeId,
    /// Display name.
    pub name: String,
    /// What this lead magnet is, shown alongside the recommendation.
    pub description: String,
    /// Example instance of this archetype, shown to the business owner.
    pub example: String,
    /// Complexity tier.
    pub tier: ComplexityTier,
    /// Profile attributes this archetype needs for a confident match.
    pub required_attributes: Vec<AttributeKey>,
    /// Scoring weight table.
    pub weights: WeightTable,
    /// Components assembled into an artifact of this archetype.
    pub components: Vec<ComponentId>,
    /// Minimum confidence for this archetype to qualify in results.
    pub min_confidence: f64,
    /// Static fallback copy per generated insertion point, used when the
    /// content-generation collaborator is unavailable.
    pub fallback_content: BTreeMap<String, String>,
}

impl ArchetypeDefinition {
    /// Validates threshold range and weight positivity.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if `min_confidence` is outside [0, 1]
    /// - `InvalidFormat` if any weight is not strictly positive
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ValidationError::invalid_format(
                "min_confidence",
                format!("must be within [0, 1], got {}", self.min_confidence),
            ));
        }
        for (key, tags) in &self.weights {
            for (tag, weight) in tags {
                if *weight <= 0.0 {
                    return Err(ValidationError::invalid_format(
                        "weights",
                        format!("weight for {}:{} must be positive, got {}", key, tag, weight),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Maximum achievable raw score: the sum of every declared weight.
    pub fn max_score(&self) -> f64 {
        self.weights
            .values()
            .flat_map(|tags| tags.values())
            .sum()
    }

    /// Weight contribution for one attribute value tag, zero if undeclared.
    pub fn weight_for(&self, key: AttributeKey, tag: &str) -> f64 {
        self.weights
            .get(&key)
            .and_then(|tags| tags.get(tag))
            .copied()
            .unwrap_or(0.0)
    }
}
