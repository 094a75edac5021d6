//! Catalog loading adapters.

mod yaml_loader;

pub use yaml_loader::{load_catalog_from_str, load_catalog_from_yaml, CatalogLoadError};
