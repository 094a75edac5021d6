//! Business profile module.
//!
//! The profile is the mutable aggregate built incrementally from answers
//! during the assessment, and the immutable snapshot handed to scoring.

mod attribute;
mod profile;

pub use attribute::{AttributeKey, AttributeValue};
pub use profile::{BusinessProfile, ProfileSnapshot};
