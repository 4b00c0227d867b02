//! Fundamental identifier and timing types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Session-unique identifier of a gameplay entity.
///
/// Physics contact events reference bodies by tag. Tags are allocated
/// monotonically and never reused within a match session, so a tag held
/// across a flush either resolves to the same entity or to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityTag(pub u64);

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Non-owning handle to a body inside the physics world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}

/// Format a duration the way the end-of-match screen shows it: `MM:SS:CC`
/// (minutes, seconds, hundredths).
pub fn format_match_time(secs: f64) -> String {
    let total_centis = (secs.max(0.0) * 100.0).floor() as u64;
    let minutes = total_centis / 6000;
    let seconds = (total_centis / 100) % 60;
    let centis = total_centis % 100;
    format!("{minutes:02}:{seconds:02}:{centis:02}")
}
