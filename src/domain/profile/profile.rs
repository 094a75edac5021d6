//! Business profile accumulator and its scoring snapshot.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{AttributeKey, AttributeValue};

/// Mutable aggregate built incrementally from assessment answers.
///
/// # Invariants
///
/// - One value per key; a later write for the same key replaces the
///   earlier one (last write wins).
/// - Scoring never reads the accumulator directly; it reads an immutable
///   [`ProfileSnapshot`] taken via [`BusinessProfile::snapshot`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfile {
    attributes: BTreeMap<AttributeKey, AttributeValue>,
}

impl BusinessProfile {
    /// Creates an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute, replacing any previous value for the key.
    pub fn set(&mut self, key: AttributeKey, value: AttributeValue) {
        self.attributes.insert(key, value);
    }

    /// Returns the value for a key, if collected.
    pub fn get(&self, key: AttributeKey) -> Option<&AttributeValue> {
        self.attributes.get(&key)
    }

    /// Returns true if the key has been collected.
    pub fn contains(&self, key: AttributeKey) -> bool {
        self.attributes.contains_key(&key)
    }

    /// Number of collected attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns true if nothing has been collected yet.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Takes an immutable snapshot for scoring and assembly.
    pub fn snapshot(&self) -> ProfileSnapshot {
        ProfileSnapshot {
            attributes: self.attributes.clone(),
        }
    }
}

/// Immutable view of a profile at a point in time.
///
/// The scoring engine and the personalization compiler only ever see
/// snapshots, so concurrent mutation of the live accumulator can never
/// race a scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    attributes: BTreeMap<AttributeKey, AttributeValue>,
}

impl ProfileSnapshot {
    /// An empty snapshot, useful as a scoring edge case.
    pub fn empty() -> Self {
        Self {
            attributes: BTreeMap::new(),
        }
    }

    /// Returns the value for a key, if present.
    pub fn get(&self, key: AttributeKey) -> Option<&AttributeValue> {
        self.attributes.get(&key)
    }

    /// Returns true if the key is present.
    pub fn contains(&self, key: AttributeKey) -> bool {
        self.attributes.contains_key(&key)
    }

    /// Iterates over (key, value) pairs in stable key order.
    pub fn iter(&self) -> impl Iterator<Item = (&AttributeKey, &AttributeValue)> {
        self.attributes.iter()
    }

    /// Returns true if the snapshot holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// A canonical string form of the snapshot, used as a cache key for
    /// generated content. Stable for identical attribute sets because the
    /// underlying map is ordered.
    pub fn normalized_key(&self) -> String {
        let mut parts = Vec::with_capacity(self.attributes.len());
        for (key, value) in &self.attributes {
            let tags = value.match_tags();
            if tags.is_empty() {
                parts.push(format!("{}={}", key, value.display_text()));
            } else {
                parts.push(format!("{}={}", key, tags.join("+")));
            }
        }
        parts.join("|")
    }
}
