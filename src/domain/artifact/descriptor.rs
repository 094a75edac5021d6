//! The artifact descriptor.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::foundation::{ArchetypeId, ArtifactId, BusinessId, ComponentId, Timestamp};

use super::PersonalizationRuleSet;

/// A component after business-tier substitution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedComponent {
    pub id: ComponentId,
    /// Skeleton with every insertion point substituted and the language
    /// variant lexicon applied.
    pub content: String,
    /// Runtime input fields this component collects from end users.
    pub input_fields: Vec<String>,
}

/// Where the descriptor stands with the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    /// Assembled, not yet validated.
    #[default]
    Pending,
    /// Passed validation; deployable.
    Valid,
    /// Failed validation; must not reach deployment.
    Invalid,
}

/// One assembled version of a business's lead magnet.
///
/// Immutable once validated; refinement passes produce a new descriptor
/// with a higher version number (see [`super::ArtifactHistory`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    pub artifact_id: ArtifactId,
    pub archetype_id: ArchetypeId,
    pub business_id: BusinessId,
    /// 1-based version within the artifact's history.
    pub version: u32,
    pub components: Vec<ResolvedComponent>,
    /// Embedded customer-tier rules, unevaluated at assembly time.
    pub rules: PersonalizationRuleSet,
    /// True if any generated insertion point fell back to catalog static
    /// content because the generation collaborator stayed unavailable.
    pub degraded: bool,
    pub validation: ValidationStatus,
    pub assembled_at: Timestamp,
}

impl ArtifactDescriptor {
    /// Runtime input fields collected across all resolved components.
    pub fn collected_fields(&self) -> BTreeSet<&str> {
        self.components
            .iter()
            .flat_map(|c| c.input_fields.iter().map(String::as_str))
            .collect()
    }

    /// Returns true if the validator approved this descriptor.
    pub fn is_deployable(&self) -> bool {
        self.validation == ValidationStatus::Valid
    }

    /// A copy with the validation verdict applied. The original is left
    /// untouched; validation never mutates in place.
    pub fn with_validation(&self, validation: ValidationStatus) -> Self {
        Self {
            validation,
            ..self.clone()
        }
    }

    /// A copy carrying a new version number, for history appends.
    pub fn with_version(&self, version: u32) -> Self {
        Self {
            version,
            ..self.clone()
        }
    }
}
