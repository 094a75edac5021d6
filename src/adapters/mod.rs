//! Adapters - concrete implementations of the ports.

pub mod catalog;
pub mod generation;
pub mod storage;
