//! Application layer: use-case handlers wiring the domain to the ports.

pub mod advance_session;
pub mod assemble_artifact;

pub use advance_session::AdvanceSessionHandler;
pub use assemble_artifact::AssembleArtifactHandler;
