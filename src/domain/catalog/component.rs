//! Component templates.
//!
//! A component is a static skeleton with named insertion points filled at
//! business-tier assembly, plus declared runtime input fields collected
//! from end users when the artifact is served.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ComponentId, ValidationError};

use super::ComplexityTier;

/// A named insertion point in a component skeleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertionPoint {
    /// Placeholder name as it appears in the skeleton, without braces.
    pub name: String,
    /// Whether this point wants generated copy (falls back to the
    /// archetype's static default when generation is unavailable).
    #[serde(default)]
    pub generated: bool,
}

impl InsertionPoint {
    /// A point filled from business customizations.
    pub fn static_point(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generated: false,
        }
    }

    /// A point filled with generated copy.
    pub fn generated_point(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generated: true,
        }
    }

    /// The placeholder token as it appears in skeleton text.
    pub fn token(&self) -> String {
        format!("{{{}}}", self.name)
    }
}

/// Static component template from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentTemplate {
    /// Catalog identifier.
    pub id: ComponentId,
    /// Complexity tier this component belongs to.
    pub tier: ComplexityTier,
    /// Skeleton text containing `{placeholder}` tokens.
    pub skeleton: String,
    /// Insertion points the skeleton declares. Every declared point must
    /// be resolved at assembly or the assembly fails.
    pub insertion_points: Vec<InsertionPoint>,
    /// End-user input fields this component collects at runtime.
    /// Personalization rules may only reference these.
    pub input_fields: Vec<String>,
}

impl ComponentTemplate {
    /// Creates a component template.
    ///
    /// # Errors
    ///
    /// `InvalidFormat` if a declared insertion point does not appear in
    /// the skeleton; a point that cannot be substituted would make
    /// `MissingSubstitution` unreachable and residual-token detection
    /// meaningless.
    pub fn new(
        id: ComponentId,
        tier: ComplexityTier,
        skeleton: impl Into<String>,
        insertion_points: Vec<InsertionPoint>,
        input_fields: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let skeleton = skeleton.into();
        for point in &insertion_points {
            if !skeleton.contains(&point.token()) {
                return Err(ValidationError::invalid_format(
                    "insertion_points",
                    format!("Declared point '{}' not found in skeleton", point.name),
                ));
            }
        }
        Ok(Self {
            id,
            tier,
            skeleton,
            insertion_points,
            input_fields,
        })
    }

    /// Returns the insertion points that want generated copy.
    pub fn generated_points(&self) -> impl Iterator<Item = &InsertionPoint> {
        self.insertion_points.iter().filter(|p| p.generated)
    }

    /// Returns true if this component collects the named runtime field.
    pub fn collects_field(&self, field: &str) -> bool {
        self.input_fields.iter().any(|f| f == field)
    }
}
