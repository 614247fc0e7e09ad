//! Shared test fixtures and utilities for wayfinder crates.
//!
//! Provides a scripted simulator and path follower that stand in for the
//! real navigation backend, plus deterministic RNG setup.

pub mod mocks;
pub mod rng;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use mocks::{ScriptedFollower, ScriptedSimulator, StepScript};
pub use rng::{random_action_indices, random_distances, seeded_rng};
