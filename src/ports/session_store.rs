//! Session storage port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::session::ConversationSession;

/// Errors surfaced by a session storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session {0} not found")]
    NotFound(SessionId),

    #[error("storage backend failure: {reason}")]
    Backend { reason: String },

    #[error("session serialization failure: {reason}")]
    Serialization { reason: String },
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::NotFound(id) => {
                DomainError::new(ErrorCode::SessionNotFound, err.to_string())
                    .with_detail("session_id", id.to_string())
            }
            _ => DomainError::new(ErrorCode::StorageError, err.to_string()),
        }
    }
}

/// Key-value session persistence.
///
/// Durable but not assumed transactional across keys; the application
/// layer persists a session once per completed turn.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads a session by id.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id has never been stored or was deleted.
    async fn get(&self, id: &SessionId) -> Result<ConversationSession, StoreError>;

    /// Stores a session, replacing any previous value for its id.
    async fn put(&self, session: &ConversationSession) -> Result<(), StoreError>;

    /// Removes a session. Removing an absent session is not an error.
    async fn delete(&self, id: &SessionId) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_session_not_found() {
        let id = SessionId::new();
        let err: DomainError = StoreError::NotFound(id).into();
        assert_eq!(err.code, ErrorCode::SessionNotFound);
        assert_eq!(err.details.get("session_id"), Some(&id.to_string()));
    }

    #[test]
    fn backend_failure_maps_to_storage_error() {
        let err: DomainError = StoreError::Backend {
            reason: "disk full".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::StorageError);
    }
}
