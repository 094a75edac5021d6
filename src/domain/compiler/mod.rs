//! Personalization compiler module.
//!
//! Tier 1 happens here: catalog components are resolved for one business,
//! insertion points substituted, copy localized and generated. Tier 2 is
//! emitted unevaluated as the artifact's rule set.

mod assembler;
mod customizations;

pub use assembler::PersonalizationCompiler;
pub use customizations::{Branding, BusinessCustomizations};
