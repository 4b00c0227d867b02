//! Player commands sent from the frontend to the simulation.
//!
//! Commands are queued and processed at the next tick boundary, before any
//! system runs.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Discrete player actions (input edge events).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Navigation ---
    /// Activate the highlighted menu item, skip the intro, or leave postgame.
    Confirm,
    /// Abandon the match, or request exit from the intro and menu.
    Back,
    MenuUp,
    MenuDown,

    // --- Match parameters (menu only) ---
    /// Grow or shrink the universe by `steps` radius increments.
    AdjustUniverseRadius { steps: i32 },
    /// Add or remove `steps` initial asteroids.
    AdjustAsteroidCount { steps: i32 },
    ToggleStreamMode,
    /// Enabling spread mode also enables stream mode.
    ToggleSpreadMode,
    ToggleDestructible,
    ToggleMoveable,

    // --- Flight ---
    /// Replace the sampled control state of a player.
    SetControls {
        slot: PlayerSlot,
        controls: ControlState,
    },
}

/// Continuous flight input for one craft, sampled every tick.
///
/// Axes are in [-1, 1]. Thrust is along the craft's forward axis, strafe
/// along its right axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlState {
    pub thrust: f64,
    pub strafe: f64,
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
    pub brake: bool,
    pub fire: bool,
}
