//! File-backed session store.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::domain::foundation::SessionId;
use crate::domain::session::ConversationSession;
use crate::ports::{SessionStore, StoreError};

/// Stores each session as one JSON file under a directory.
///
/// Good enough for single-node durability across restarts; writes go
/// through a temporary file and an atomic rename so a crash mid-write
/// never leaves a truncated session on disk.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// `Backend` if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|err| StoreError::Backend {
                reason: format!("cannot create {}: {}", dir.display(), err),
            })?;
        Ok(Self { dir })
    }

    fn path_for(&self, id: &SessionId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, id: &SessionId) -> Result<ConversationSession, StoreError> {
        let path = self.path_for(id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(*id))
            }
            Err(err) => {
                return Err(StoreError::Backend {
                    reason: format!("cannot read {}: {}", path.display(), err),
                })
            }
        };
        serde_json::from_slice(&bytes).map_err(|err| StoreError::Serialization {
            reason: err.to_string(),
        })
    }

    async fn put(&self, session: &ConversationSession) -> Result<(), StoreError> {
        let bytes =
            serde_json::to_vec_pretty(session).map_err(|err| StoreError::Serialization {
                reason: err.to_string(),
            })?;
        let path = self.path_for(session.id());
        let tmp = path.with_extension("json.tmp");

        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|err| StoreError::Backend {
                reason: format!("cannot write {}: {}", tmp.display(), err),
            })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|err| StoreError::Backend {
                reason: format!("cannot rename into {}: {}", path.display(), err),
            })
    }

    async fn delete(&self, id: &SessionId) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path_for(id)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Backend {
                reason: err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::BusinessId;
    use crate::domain::profile::{AttributeKey, AttributeValue};

    #[tokio::test]
    async fn round_trips_a_session_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::open(dir.path()).await.unwrap();

        let mut session = ConversationSession::new(BusinessId::new());
        session
            .set_attribute(AttributeKey::Industry, AttributeValue::tag("web_design"))
            .unwrap();
        store.put(&session).await.unwrap();

        let loaded = store.get(session.id()).await.unwrap();
        assert_eq!(loaded.id(), session.id());
        assert_eq!(
            loaded.profile().get(AttributeKey::Industry),
            Some(&AttributeValue::tag("web_design"))
        );
    }

    #[tokio::test]
    async fn survives_reopening_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let session = ConversationSession::new(BusinessId::new());

        {
            let store = FileSessionStore::open(dir.path()).await.unwrap();
            store.put(&session).await.unwrap();
        }

        let reopened = FileSessionStore::open(dir.path()).await.unwrap();
        assert!(reopened.get(session.id()).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::open(dir.path()).await.unwrap();
        assert!(matches!(
            store.get(&SessionId::new()).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_removes_the_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::open(dir.path()).await.unwrap();
        let session = ConversationSession::new(BusinessId::new());
        store.put(&session).await.unwrap();

        store.delete(session.id()).await.unwrap();
        store.delete(session.id()).await.unwrap();
        assert!(matches!(
            store.get(session.id()).await,
            Err(StoreError::NotFound(_))
        ));
    }
}
