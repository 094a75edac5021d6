//! Leadforge - Lead Magnet Assessment and Assembly Engine
//!
//! This crate implements the pipeline that turns a conversational business
//! assessment into a scored archetype recommendation and a two-tier
//! personalized lead-magnet artifact.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
