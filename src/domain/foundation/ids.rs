//! Strongly-typed identifier value objects.
//!
//! Session, business and artifact identifiers are random UUIDs. Catalog
//! identifiers (archetypes, components, questions) are human-readable
//! strings declared in catalog data, so they are validated non-empty
//! strings instead.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for an assessment conversation session.
    SessionId
);

uuid_id!(
    /// Unique identifier for a business (tenant) being assessed.
    BusinessId
);

uuid_id!(
    /// Unique identifier for an assembled artifact lineage.
    ArtifactId
);

macro_rules! catalog_id {
    ($(#[$doc:meta])* $name:ident, $field:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning an error if empty.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::empty_field($field));
                }
                Ok(Self(id))
            }

            /// Returns the inner string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

catalog_id!(
    /// Identifier of a lead-magnet archetype in the catalog.
    ArchetypeId,
    "archetype_id"
);

catalog_id!(
    /// Identifier of a component template in the catalog.
    ComponentId,
    "component_id"
);

catalog_id!(
    /// Identifier of a question in the assessment script.
    QuestionId,
    "question_id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_generates_unique_values() {
        let id1 = SessionId::new();
        let id2 = SessionId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn session_id_parses_from_valid_string() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: SessionId = uuid_str.parse().unwrap();
        assert_eq!(id.to_string(), uuid_str);
    }

    #[test]
    fn session_id_serializes_to_json() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: SessionId = uuid_str.parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid_str));
    }

    #[test]
    fn business_id_from_uuid_preserves_value() {
        let uuid = Uuid::new_v4();
        let id = BusinessId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), &uuid);
    }

    #[test]
    fn artifact_id_generates_unique_values() {
        let id1 = ArtifactId::new();
        let id2 = ArtifactId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn archetype_id_accepts_non_empty_string() {
        let id = ArchetypeId::new("website_performance_quiz").unwrap();
        assert_eq!(id.as_str(), "website_performance_quiz");
    }

    #[test]
    fn archetype_id_rejects_empty_string() {
        let result = ArchetypeId::new("");
        match result {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "archetype_id"),
            other => panic!("Expected EmptyField error, got {:?}", other),
        }
    }

    #[test]
    fn archetype_id_rejects_whitespace_string() {
        assert!(ArchetypeId::new("   ").is_err());
    }

    #[test]
    fn component_id_serializes_transparently() {
        let id = ComponentId::new("quiz_question_block").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"quiz_question_block\"");
    }

    #[test]
    fn question_id_displays_inner_value() {
        let id = QuestionId::new("business_type").unwrap();
        assert_eq!(format!("{}", id), "business_type");
    }
}
