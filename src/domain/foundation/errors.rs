//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i32,
        max: i32,
        actual: i32,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i32, max: i32, actual: i32) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes organized by category.
///
/// The assessment taxonomy distinguishes recoverable turn-level problems
/// (`ValidationFailed` produces a re-prompt) from assembly preconditions
/// (`MissingSubstitution`, `InvalidRule`, `UnsupportedVariant`) which are
/// fatal to that assembly attempt, and from contained external failures
/// (`GenerationTimeout` degrades, never aborts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Turn-level input problems (recoverable; caller re-prompts)
    ValidationFailed,
    EmptyField,
    OutOfRange,
    InvalidFormat,

    // Not found errors
    SessionNotFound,
    ProfileNotFound,
    ArtifactNotFound,

    // Session state errors
    InvalidStateTransition,
    SessionExpired,
    SessionCompleted,

    // Concurrent-turn contention; caller should retry, not abandon
    Busy,

    // Compiler preconditions (fatal to the assembly attempt)
    MissingSubstitution,
    InvalidRule,
    UnsupportedVariant,

    // Recommendation referenced an archetype outside the catalog
    ConfigurationError,

    // External content generation (degrades to static fallback)
    GenerationTimeout,
    GenerationFailed,

    // Infrastructure errors
    StorageError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::OutOfRange => "OUT_OF_RANGE",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::SessionNotFound => "SESSION_NOT_FOUND",
            ErrorCode::ProfileNotFound => "PROFILE_NOT_FOUND",
            ErrorCode::ArtifactNotFound => "ARTIFACT_NOT_FOUND",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::SessionExpired => "SESSION_EXPIRED",
            ErrorCode::SessionCompleted => "SESSION_COMPLETED",
            ErrorCode::Busy => "BUSY",
            ErrorCode::MissingSubstitution => "MISSING_SUBSTITUTION",
            ErrorCode::InvalidRule => "INVALID_RULE",
            ErrorCode::UnsupportedVariant => "UNSUPPORTED_VARIANT",
            ErrorCode::ConfigurationError => "CONFIGURATION_ERROR",
            ErrorCode::GenerationTimeout => "GENERATION_TIMEOUT",
            ErrorCode::GenerationFailed => "GENERATION_FAILED",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            details: HashMap::new(),
        }
        .with_detail("field", field.into())
    }

    /// Creates a missing-substitution error naming the unresolved point.
    pub fn missing_substitution(point: impl Into<String>) -> Self {
        let point = point.into();
        Self::new(
            ErrorCode::MissingSubstitution,
            format!("Insertion point '{}' has no substitution", point),
        )
        .with_detail("insertion_point", point)
    }

    /// Creates an invalid-rule error naming the uncollected field.
    pub fn invalid_rule(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(
            ErrorCode::InvalidRule,
            format!("Rule references field '{}' which the artifact does not collect", field),
        )
        .with_detail("field", field)
    }

    /// Creates an invalid-state-transition error from a rejected transition.
    pub fn invalid_transition(detail: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InvalidStateTransition, detail.to_string())
    }

    /// Creates a session-expired error for the given session.
    pub fn session_expired(id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::SessionExpired,
            format!("Session {} has expired", id),
        )
        .with_detail("session_id", id.to_string())
    }

    /// Creates an error for turns arriving after a session closed.
    pub fn session_completed(id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::SessionCompleted,
            format!("Session {} is closed and read-only", id),
        )
        .with_detail("session_id", id.to_string())
    }

    /// Creates an unsupported-variant error.
    pub fn unsupported_variant(variant: impl Into<String>) -> Self {
        let variant = variant.into();
        Self::new(
            ErrorCode::UnsupportedVariant,
            format!("Language variant '{}' is not supported", variant),
        )
        .with_detail("variant", variant)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let code = match err {
            ValidationError::EmptyField { .. } => ErrorCode::EmptyField,
            ValidationError::OutOfRange { .. } => ErrorCode::OutOfRange,
            ValidationError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
        };
        DomainError::new(code, err.to_string())
    }
}
