//! Ports - interfaces to external collaborators.
//!
//! The core talks to the outside world through these traits: a content
//! generation service for business-tier copy and a key-value store for
//! sessions. Adapters provide the concrete implementations.

mod content_generator;
mod session_store;

pub use content_generator::{ContentGenerator, GenerationError, GenerationRequest};
pub use session_store::{SessionStore, StoreError};
