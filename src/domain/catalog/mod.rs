//! Archetype catalog module.
//!
//! The catalog is the static registry of lead-magnet archetypes and the
//! component templates they are assembled from. It is loaded at process
//! start and read-only on the hot path; reloads happen out of band.

mod archetype;
mod catalog;
mod component;
mod defaults;
mod language;

pub use archetype::{ArchetypeDefinition, ComplexityTier, WeightTable};
pub use catalog::ArchetypeCatalog;
pub use component::{ComponentTemplate, InsertionPoint};
pub use defaults::builtin_catalog;
pub use language::LanguageVariant;
