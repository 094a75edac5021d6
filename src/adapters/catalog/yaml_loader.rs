//! YAML catalog loader.
//!
//! Deployments with their own archetypes load them from a YAML file at
//! startup; the out-of-band reload boundary re-runs this loader and swaps
//! the catalog wholesale. Every invariant the built-in catalog enforces
//! is re-checked here, so a hand-edited file cannot smuggle in a broken
//! definition.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::domain::catalog::{
    ArchetypeCatalog, ArchetypeDefinition, ComplexityTier, ComponentTemplate, InsertionPoint,
};
use crate::domain::foundation::{ComponentId, ValidationError};

/// Errors from loading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("cannot read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse catalog file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("catalog is invalid: {0}")]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    archetypes: Vec<ArchetypeDefinition>,
    components: Vec<ComponentEntry>,
}

/// Component as written in the file; rebuilt through
/// [`ComponentTemplate::new`] so skeleton/point consistency is enforced.
#[derive(Debug, Deserialize)]
struct ComponentEntry {
    id: ComponentId,
    tier: ComplexityTier,
    skeleton: String,
    #[serde(default)]
    insertion_points: Vec<InsertionPoint>,
    #[serde(default)]
    input_fields: Vec<String>,
}

/// Loads and validates a catalog from a YAML file.
///
/// # Errors
///
/// I/O, parse, or any catalog invariant violation.
pub fn load_catalog_from_yaml(path: impl AsRef<Path>) -> Result<ArchetypeCatalog, CatalogLoadError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    let catalog = load_catalog_from_str(&raw)?;
    info!(
        path = %path.display(),
        archetypes = catalog.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Parses and validates catalog YAML.
///
/// # Errors
///
/// Parse errors or any catalog invariant violation.
pub fn load_catalog_from_str(raw: &str) -> Result<ArchetypeCatalog, CatalogLoadError> {
    let file: CatalogFile = serde_yaml::from_str(raw)?;
    let mut components = Vec::with_capacity(file.components.len());
    for entry in file.components {
        components.push(ComponentTemplate::new(
            entry.id,
            entry.tier,
            entry.skeleton,
            entry.insertion_points,
            entry.input_fields,
        )?);
    }
    Ok(ArchetypeCatalog::new(file.archetypes, components)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ArchetypeId;
    use std::io::Write;

    const VALID_CATALOG: &str = r#"
archetypes:
  - id: website_performance_quiz
    name: Website Performance Quiz
    description: Scores a visitor's website speed.
    example: A loading-speed quiz with improvement tips.
    tier: standard
    required_attributes: [industry, pain_points]
    weights:
      pain_points:
        slow_site: 5.0
        low_conversion: 5.0
    components: [quiz_intro]
    min_confidence: 0.2
    fallback_content:
      intro_copy: Take our two-minute performance quiz.
components:
  - id: quiz_intro
    tier: basic
    skeleton: "Welcome to {business_name}. {intro_copy}"
    insertion_points:
      - name: business_name
      - name: intro_copy
        generated: true
    input_fields: [email]
"#;

    #[test]
    fn parses_a_valid_catalog() {
        let catalog = load_catalog_from_str(VALID_CATALOG).unwrap();
        assert_eq!(catalog.len(), 1);
        let quiz = catalog
            .archetype(&ArchetypeId::new("website_performance_quiz").unwrap())
            .unwrap();
        assert_eq!(quiz.weights.len(), 1);
        assert_eq!(quiz.min_confidence, 0.2);
    }

    #[test]
    fn rejects_point_missing_from_skeleton() {
        let broken = VALID_CATALOG.replace("{intro_copy}", "");
        assert!(matches!(
            load_catalog_from_str(&broken),
            Err(CatalogLoadError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_unknown_component_reference() {
        let broken = VALID_CATALOG.replace("components: [quiz_intro]", "components: [missing]");
        assert!(matches!(
            load_catalog_from_str(&broken),
            Err(CatalogLoadError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_malformed_yaml() {
        assert!(matches!(
            load_catalog_from_str("archetypes: ["),
            Err(CatalogLoadError::Parse(_))
        ));
    }

    #[test]
    fn loads_from_a_file_on_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(VALID_CATALOG.as_bytes()).unwrap();

        let catalog = load_catalog_from_yaml(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            load_catalog_from_yaml("/nonexistent/catalog.yaml"),
            Err(CatalogLoadError::Io(_))
        ));
    }
}
