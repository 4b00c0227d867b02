//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{BodyHandle, EntityTag};

/// A player-controlled droid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Craft {
    pub slot: PlayerSlot,
    /// Lives left. Zero means eliminated; the craft stays in the world
    /// until the match is reset.
    pub lives_remaining: u32,
    /// Seconds of damage immunity left. Counts down every tick.
    pub invincibility_secs: f64,
    /// Whether the craft is drawn this tick (blinks while invincible).
    pub visible: bool,
    /// Set by the radar powerup.
    pub has_radar: bool,
    /// Homing strength of missiles fired by this craft.
    pub heat_seek_strength: f64,
    /// Match time of the last missile launch.
    pub last_fire_secs: Option<f64>,
    /// Which side the next missile leaves from.
    pub fire_from_left: bool,
}

/// A missile. Owner and target are weak references resolved through the
/// registry on every use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub owner: EntityTag,
    pub target: Option<EntityTag>,
    /// Forward speed the missile never drops below.
    pub base_speed: f64,
    /// Owner's heat-seek strength captured at launch, used once the owner
    /// is gone.
    pub launch_strength: f64,
}

/// A floating piece of trash.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Asteroid {
    pub size: AsteroidSize,
}

/// The singleton powerup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PickupKind,
    /// Speed the pickup keeps for its whole life.
    pub cruise_speed: f64,
}

/// Marks the universe shell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StaticBoundary;

/// Physics body backing an entity (non-owning).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body(pub BodyHandle);
