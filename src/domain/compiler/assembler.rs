//! Business-tier assembly.

use tracing::{info, warn};

use crate::domain::artifact::{ArtifactDescriptor, ResolvedComponent, ValidationStatus};
use crate::domain::catalog::{
    ArchetypeCatalog, ArchetypeDefinition, ComponentTemplate, InsertionPoint, LanguageVariant,
};
use crate::domain::foundation::{
    ArchetypeId, ArtifactId, BusinessId, DomainError, ErrorCode, Timestamp,
};
use crate::domain::profile::{AttributeKey, ProfileSnapshot};
use crate::ports::{ContentGenerator, GenerationRequest};

use super::BusinessCustomizations;

/// Compiles an archetype plus a business profile into an artifact
/// descriptor.
///
/// Generation latency and failures are the adapter's problem; by the time
/// an error reaches the compiler the retries are spent, and the compiler
/// degrades to the archetype's static fallback copy instead of failing
/// the assembly.
pub struct PersonalizationCompiler<'a> {
    catalog: &'a ArchetypeCatalog,
    generator: &'a dyn ContentGenerator,
}

impl<'a> PersonalizationCompiler<'a> {
    pub fn new(catalog: &'a ArchetypeCatalog, generator: &'a dyn ContentGenerator) -> Self {
        Self { catalog, generator }
    }

    /// Assembles one artifact version.
    ///
    /// # Errors
    ///
    /// - `ConfigurationError` if the archetype has no catalog entry
    /// - `UnsupportedVariant` if the profile declares an unknown variant
    /// - `MissingSubstitution` if a declared static insertion point has
    ///   no supplied value
    /// - `InvalidRule` if a rule references an uncollected input field
    pub async fn assemble(
        &self,
        business_id: BusinessId,
        snapshot: &ProfileSnapshot,
        archetype_id: &ArchetypeId,
        customizations: &BusinessCustomizations,
    ) -> Result<ArtifactDescriptor, DomainError> {
        let archetype = self.catalog.archetype(archetype_id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::ConfigurationError,
                format!("Archetype '{}' has no catalog entry", archetype_id),
            )
            .with_detail("archetype_id", archetype_id.as_str())
        })?;
        let variant = declared_variant(snapshot)?;

        let mut components = Vec::with_capacity(archetype.components.len());
        let mut degraded = false;
        for component_id in &archetype.components {
            let template = self.catalog.component(component_id).ok_or_else(|| {
                DomainError::new(
                    ErrorCode::ConfigurationError,
                    format!("Component '{}' has no catalog entry", component_id),
                )
            })?;
            let (resolved, used_fallback) = self
                .resolve_component(archetype, template, snapshot, customizations, variant)
                .await?;
            degraded |= used_fallback;
            components.push(resolved);
        }

        // Tier 2 is emitted unevaluated, but every field a rule reads
        // must be one the artifact actually collects.
        let collected: Vec<&str> = components
            .iter()
            .flat_map(|c| c.input_fields.iter().map(String::as_str))
            .collect();
        for field in customizations.rules().referenced_fields() {
            if !collected.contains(&field) {
                return Err(DomainError::invalid_rule(field));
            }
        }

        info!(
            archetype_id = %archetype_id,
            components = components.len(),
            degraded,
            "artifact assembled"
        );
        Ok(ArtifactDescriptor {
            artifact_id: ArtifactId::new(),
            archetype_id: archetype_id.clone(),
            business_id,
            version: 1,
            components,
            rules: customizations.rules().clone(),
            degraded,
            validation: ValidationStatus::Pending,
            assembled_at: Timestamp::now(),
        })
    }

    async fn resolve_component(
        &self,
        archetype: &ArchetypeDefinition,
        template: &ComponentTemplate,
        snapshot: &ProfileSnapshot,
        customizations: &BusinessCustomizations,
        variant: LanguageVariant,
    ) -> Result<(ResolvedComponent, bool), DomainError> {
        let mut content = template.skeleton.clone();
        let mut used_fallback = false;

        for point in &template.insertion_points {
            let (value, fallback) = self
                .resolve_point(archetype, point, snapshot, customizations, variant)
                .await?;
            used_fallback |= fallback;
            content = content.replace(&point.token(), &value);
        }

        Ok((
            ResolvedComponent {
                id: template.id.clone(),
                content: variant.localize(&content),
                input_fields: template.input_fields.clone(),
            },
            used_fallback,
        ))
    }

    /// Resolves one insertion point: business copy first, then the
    /// business name from the profile, then generation for generated
    /// points. Returns the text and whether fallback copy was used.
    async fn resolve_point(
        &self,
        archetype: &ArchetypeDefinition,
        point: &InsertionPoint,
        snapshot: &ProfileSnapshot,
        customizations: &BusinessCustomizations,
        variant: LanguageVariant,
    ) -> Result<(String, bool), DomainError> {
        if let Some(text) = customizations.substitution(&point.name) {
            return Ok((text.to_string(), false));
        }
        if point.name == "business_name" {
            if let Some(name) = snapshot.get(AttributeKey::BusinessName) {
                return Ok((name.display_text(), false));
            }
        }
        if !point.generated {
            return Err(DomainError::missing_substitution(&point.name));
        }

        let request = generation_request(archetype, point, snapshot, variant);
        match self.generator.generate(&request).await {
            Ok(text) => Ok((text, false)),
            Err(err) => {
                let fallback = archetype
                    .fallback_content
                    .get(&point.name)
                    .cloned()
                    .ok_or_else(|| DomainError::missing_substitution(&point.name))?;
                warn!(
                    archetype_id = %archetype.id,
                    point = %point.name,
                    error = %err,
                    "generation unavailable, using static fallback copy"
                );
                Ok((fallback, true))
            }
        }
    }
}

/// The variant the profile declares, defaulting to American English when
/// the question went unanswered.
fn declared_variant(snapshot: &ProfileSnapshot) -> Result<LanguageVariant, DomainError> {
    match snapshot.get(AttributeKey::LanguageVariant) {
        Some(value) => LanguageVariant::parse(&value.display_text()),
        None => Ok(LanguageVariant::EnUs),
    }
}

/// Builds a deterministic generation request for one insertion point.
///
/// Determinism matters: the prompt doubles as the generation cache key,
/// so identical (archetype, normalized profile) inputs produce identical
/// prompts and hit the cache instead of the backend.
fn generation_request(
    archetype: &ArchetypeDefinition,
    point: &InsertionPoint,
    snapshot: &ProfileSnapshot,
    variant: LanguageVariant,
) -> GenerationRequest {
    let business = snapshot
        .get(AttributeKey::BusinessName)
        .map(|v| v.display_text())
        .unwrap_or_else(|| "the business".to_string());
    GenerationRequest::new(format!(
        "Write the {} for a {} lead magnet offered by {}. Business profile: {}.",
        point.name,
        archetype.name,
        business,
        snapshot.normalized_key()
    ))
    .with_constraint("keep it under 80 words")
    .with_constraint(format!("write in {}", variant.tag()))
}
