//! Decision/scoring engine.
//!
//! Pure, deterministic mapping from a profile snapshot to a ranked list of
//! archetype recommendations with normalized confidence.

mod engine;
mod result;

pub use engine::{ScoringEngine, DEFAULT_TOP_N};
pub use result::{MatchedPair, ScoreResult};
