//! Append-only artifact version history.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ArchetypeId, BusinessId};

use super::ArtifactDescriptor;

/// All versions of one business's artifact for one archetype.
///
/// Versions are appended, never replaced; earlier versions stay readable
/// for rollback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactHistory {
    business_id: BusinessId,
    archetype_id: ArchetypeId,
    versions: Vec<ArtifactDescriptor>,
}

impl ArtifactHistory {
    pub fn new(business_id: BusinessId, archetype_id: ArchetypeId) -> Self {
        Self {
            business_id,
            archetype_id,
            versions: Vec::new(),
        }
    }

    pub fn business_id(&self) -> &BusinessId {
        &self.business_id
    }

    pub fn archetype_id(&self) -> &ArchetypeId {
        &self.archetype_id
    }

    /// The version number the next append will receive.
    pub fn next_version(&self) -> u32 {
        self.versions.len() as u32 + 1
    }

    /// Appends a descriptor, stamping it with the next version number.
    /// Returns a reference to the stored version.
    pub fn append(&mut self, descriptor: ArtifactDescriptor) -> &ArtifactDescriptor {
        let stamped = descriptor.with_version(self.next_version());
        self.versions.push(stamped);
        self.versions.last().expect("just pushed")
    }

    /// The most recent version, if any.
    pub fn latest(&self) -> Option<&ArtifactDescriptor> {
        self.versions.last()
    }

    /// A specific version for rollback reads. Versions are 1-based.
    pub fn version(&self, version: u32) -> Option<&ArtifactDescriptor> {
        if version == 0 {
            return None;
        }
        self.versions.get(version as usize - 1)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}
