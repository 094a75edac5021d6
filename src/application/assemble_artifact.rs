//! The artifact assembly handler.
//!
//! Runs the compiler and the validator back to back. Only descriptors
//! that pass validation are appended to the per-business version history
//! and handed back as deployable; a failing descriptor surfaces its
//! violations as an error and leaves the history untouched.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::artifact::{ArtifactDescriptor, ArtifactHistory, ArtifactValidator, ValidationStatus};
use crate::domain::catalog::ArchetypeCatalog;
use crate::domain::compiler::{BusinessCustomizations, PersonalizationCompiler};
use crate::domain::foundation::{ArchetypeId, BusinessId, DomainError, ErrorCode, SessionId};
use crate::domain::profile::ProfileSnapshot;
use crate::domain::session::SessionStatus;
use crate::ports::{ContentGenerator, SessionStore};

/// Assembles, validates, and versions artifacts.
pub struct AssembleArtifactHandler {
    store: Arc<dyn SessionStore>,
    catalog: ArchetypeCatalog,
    generator: Arc<dyn ContentGenerator>,
    histories: tokio::sync::Mutex<HashMap<(BusinessId, ArchetypeId), ArtifactHistory>>,
}

impl AssembleArtifactHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        catalog: ArchetypeCatalog,
        generator: Arc<dyn ContentGenerator>,
    ) -> Self {
        Self {
            store,
            catalog,
            generator,
            histories: tokio::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Assembles an artifact from a completed session's confirmed
    /// selection and profile.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the id has never been stored
    /// - `InvalidStateTransition` if the session has no confirmed
    ///   selection yet
    /// - any assembly or validation error from [`Self::assemble`]
    pub async fn assemble_for_session(
        &self,
        session_id: &SessionId,
        customizations: &BusinessCustomizations,
    ) -> Result<ArtifactDescriptor, DomainError> {
        let session = self.store.get(session_id).await?;
        if session.status() != SessionStatus::Completed {
            return Err(DomainError::invalid_transition(format!(
                "session {} has not confirmed a selection",
                session_id
            )));
        }
        let archetype_id = session.selected_archetype().cloned().ok_or_else(|| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("completed session {} carries no selection", session_id),
            )
        })?;
        self.assemble(
            *session.business_id(),
            &session.profile_snapshot(),
            &archetype_id,
            customizations,
        )
        .await
    }

    /// Assembles one new artifact version for a business.
    ///
    /// # Errors
    ///
    /// - `ConfigurationError` if the archetype is not in the catalog,
    ///   checked before any compilation work starts
    /// - compiler precondition failures (`MissingSubstitution`,
    ///   `InvalidRule`, `UnsupportedVariant`)
    /// - `ValidationFailed` carrying the violations if the assembled
    ///   descriptor is not deployable
    pub async fn assemble(
        &self,
        business_id: BusinessId,
        snapshot: &ProfileSnapshot,
        archetype_id: &ArchetypeId,
        customizations: &BusinessCustomizations,
    ) -> Result<ArtifactDescriptor, DomainError> {
        if self.catalog.archetype(archetype_id).is_none() {
            return Err(DomainError::new(
                ErrorCode::ConfigurationError,
                format!("Archetype '{}' has no catalog entry", archetype_id),
            )
            .with_detail("archetype_id", archetype_id.as_str()));
        }

        let compiler = PersonalizationCompiler::new(&self.catalog, self.generator.as_ref());
        let descriptor = compiler
            .assemble(business_id, snapshot, archetype_id, customizations)
            .await?;

        let result = ArtifactValidator::new(&self.catalog).validate(&descriptor);
        if !result.is_ok() {
            warn!(
                archetype_id = %archetype_id,
                violations = result.violations().len(),
                "assembled artifact failed validation"
            );
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                format!(
                    "Artifact failed validation with {} violation(s)",
                    result.violations().len()
                ),
            )
            .with_detail("violations", format!("{:?}", result.violations())));
        }

        let validated = descriptor.with_validation(ValidationStatus::Valid);
        let mut histories = self.histories.lock().await;
        let history = histories
            .entry((business_id, archetype_id.clone()))
            .or_insert_with(|| ArtifactHistory::new(business_id, archetype_id.clone()));
        let stored = history.append(validated).clone();
        info!(
            business_id = %business_id,
            archetype_id = %archetype_id,
            version = stored.version,
            degraded = stored.degraded,
            "artifact version stored"
        );
        Ok(stored)
    }

    /// The stored version history for one business and archetype.
    pub async fn history(
        &self,
        business_id: &BusinessId,
        archetype_id: &ArchetypeId,
    ) -> Option<ArtifactHistory> {
        let histories = self.histories.lock().await;
        histories
            .get(&(*business_id, archetype_id.clone()))
            .cloned()
    }
}
