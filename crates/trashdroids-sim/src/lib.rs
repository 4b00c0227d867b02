//! Simulation engine for Trashdroids.
//!
//! Owns the entity registry and the physics world, runs the match systems
//! at a fixed tick rate, and produces GameStateSnapshots for a frontend.

pub mod engine;
pub mod fragmentation;
pub mod guidance;
pub mod placement;
pub mod registry;
pub mod scoring;
pub mod session;
pub mod systems;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use trashdroids_core as core;

#[cfg(test)]
mod tests;
