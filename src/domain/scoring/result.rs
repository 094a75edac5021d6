//! Scoring output types.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ArchetypeId;
use crate::domain::profile::AttributeKey;

/// One attribute value tag that hit an archetype's weight table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedPair {
    pub key: AttributeKey,
    pub tag: String,
    pub weight: f64,
}

/// One archetype's score against a profile snapshot.
///
/// Produced fresh per scoring call, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub archetype_id: ArchetypeId,
    /// Sum of matched weight contributions.
    pub raw_score: f64,
    /// Raw score normalized by the archetype's maximum achievable score.
    pub confidence: f64,
    /// Weight-table hits, in stable attribute order.
    pub matched: Vec<MatchedPair>,
    /// Required attributes the profile has not collected.
    pub missing_required: Vec<AttributeKey>,
}

impl ScoreResult {
    /// Returns true if every required attribute was collected.
    pub fn is_complete(&self) -> bool {
        self.missing_required.is_empty()
    }
}
