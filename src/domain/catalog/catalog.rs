//! The archetype catalog registry.
//!
//! Declaration order is significant: it is the final tie-breaker in
//! recommendation ordering, so the registry preserves it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{ArchetypeId, ComponentId, ValidationError};

use super::{ArchetypeDefinition, ComponentTemplate};

/// Read-only registry of archetypes and component templates.
///
/// Safe for concurrent readers; constructed once at startup (built-in
/// defaults or a YAML file) and swapped wholesale on out-of-band reload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeCatalog {
    archetypes: Vec<ArchetypeDefinition>,
    components: BTreeMap<ComponentId, ComponentTemplate>,
}

impl ArchetypeCatalog {
    /// Builds a catalog, validating every definition and reference.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` for duplicate archetype ids, invalid definitions,
    ///   or archetype component references with no registered template
    pub fn new(
        archetypes: Vec<ArchetypeDefinition>,
        components: Vec<ComponentTemplate>,
    ) -> Result<Self, ValidationError> {
        let mut component_map = BTreeMap::new();
        for component in components {
            if component_map.insert(component.id.clone(), component).is_some() {
                return Err(ValidationError::invalid_format(
                    "components",
                    "Duplicate component id in catalog",
                ));
            }
        }

        let mut seen = Vec::with_capacity(archetypes.len());
        for archetype in &archetypes {
            archetype.validate()?;
            if seen.contains(&&archetype.id) {
                return Err(ValidationError::invalid_format(
                    "archetypes",
                    format!("Duplicate archetype id '{}'", archetype.id),
                ));
            }
            seen.push(&archetype.id);
            for component_id in &archetype.components {
                if !component_map.contains_key(component_id) {
                    return Err(ValidationError::invalid_format(
                        "archetypes",
                        format!(
                            "Archetype '{}' references unknown component '{}'",
                            archetype.id, component_id
                        ),
                    ));
                }
            }
        }

        Ok(Self {
            archetypes,
            components: component_map,
        })
    }

    /// Archetypes in declaration order.
    pub fn archetypes(&self) -> &[ArchetypeDefinition] {
        &self.archetypes
    }

    /// Looks up an archetype by id.
    pub fn archetype(&self, id: &ArchetypeId) -> Option<&ArchetypeDefinition> {
        self.archetypes.iter().find(|a| &a.id == id)
    }

    /// Declaration index of an archetype, used for tie-breaking.
    pub fn declaration_index(&self, id: &ArchetypeId) -> Option<usize> {
        self.archetypes.iter().position(|a| &a.id == id)
    }

    /// Looks up a component template by id.
    pub fn component(&self, id: &ComponentId) -> Option<&ComponentTemplate> {
        self.components.get(id)
    }

    /// Number of registered archetypes.
    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    /// Returns true if no archetypes are registered.
    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }
}
