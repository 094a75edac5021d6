//! Domain layer - the core assessment, scoring and assembly logic.

pub mod artifact;
pub mod catalog;
pub mod compiler;
pub mod flow;
pub mod foundation;
pub mod profile;
pub mod scoring;
pub mod session;
