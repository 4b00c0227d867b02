//! Trashdroids headless runner.
//!
//! Wires the simulation engine to a paced game loop thread and a scripted
//! pilot, for soak runs and replays from the command line.

pub mod autopilot;
pub mod game_loop;
pub mod state;

pub use trashdroids_core as core;
