//! The artifact validator.
//!
//! The deployability gate: a descriptor that fails any check is never
//! handed to the deployment collaborator. Validation is pure and
//! idempotent, safe to re-run after every compiler pass.

use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::catalog::ArchetypeCatalog;
use crate::domain::foundation::ComponentId;

use super::ArtifactDescriptor;

/// One reason a descriptor is not deployable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The archetype declares a component the descriptor does not carry.
    MissingComponent { component_id: ComponentId },
    /// A resolved component still contains a placeholder token.
    UnresolvedPlaceholder {
        component_id: ComponentId,
        token: String,
    },
    /// A personalization rule reads a field no component collects.
    UnknownRuleField { field: String },
    /// The same component appears twice.
    DuplicateComponent { component_id: ComponentId },
    /// The descriptor's archetype has no catalog entry.
    UnknownArchetype,
}

/// Outcome of a validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

/// Validates assembled descriptors against the catalog.
#[derive(Debug, Clone)]
pub struct ArtifactValidator<'a> {
    catalog: &'a ArchetypeCatalog,
}

impl<'a> ArtifactValidator<'a> {
    pub fn new(catalog: &'a ArchetypeCatalog) -> Self {
        Self { catalog }
    }

    /// Runs every check, in order, collecting all violations.
    ///
    /// Checks: required components present, no residual placeholder
    /// tokens, rule fields all collected, no duplicate component ids.
    /// Never mutates the descriptor.
    pub fn validate(&self, artifact: &ArtifactDescriptor) -> ValidationResult {
        let mut violations = Vec::new();

        match self.catalog.archetype(&artifact.archetype_id) {
            Some(archetype) => {
                for component_id in &archetype.components {
                    if !artifact.components.iter().any(|c| &c.id == component_id) {
                        violations.push(Violation::MissingComponent {
                            component_id: component_id.clone(),
                        });
                    }
                }
            }
            None => violations.push(Violation::UnknownArchetype),
        }

        for component in &artifact.components {
            for token in placeholder_tokens(&component.content) {
                violations.push(Violation::UnresolvedPlaceholder {
                    component_id: component.id.clone(),
                    token,
                });
            }
        }

        let collected = artifact.collected_fields();
        for field in artifact.rules.referenced_fields() {
            if !collected.contains(field) {
                violations.push(Violation::UnknownRuleField {
                    field: field.to_string(),
                });
            }
        }

        let mut seen: BTreeSet<&ComponentId> = BTreeSet::new();
        for component in &artifact.components {
            if !seen.insert(&component.id) {
                violations.push(Violation::DuplicateComponent {
                    component_id: component.id.clone(),
                });
            }
        }

        debug!(
            artifact_id = %artifact.artifact_id,
            violations = violations.len(),
            "artifact validated"
        );
        ValidationResult { violations }
    }
}

/// Finds residual `{placeholder}` tokens in resolved content.
///
/// A token is a brace pair around a non-empty name with no spaces or
/// nested braces, the same form insertion points use in skeletons.
fn placeholder_tokens(content: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut rest = content;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find(['{', '}']) {
            Some(close) if after.as_bytes()[close] == b'}' => {
                let name = &after[..close];
                if !name.is_empty() && !name.contains(char::is_whitespace) {
                    tokens.push(name.to_string());
                }
                rest = &after[close + 1..];
            }
            Some(next_open) => rest = &after[next_open..],
            None => break,
        }
    }
    tokens
}
