//! Events emitted by the simulation for audio, effects and UI feedback.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityTag;

/// Gameplay notifications produced during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Visual explosion at a world position.
    Explosion {
        size: ExplosionSize,
        position: DVec3,
    },
    /// A projectile hit something and is gone.
    ProjectileDetonated {
        projectile: EntityTag,
        position: DVec3,
    },
    /// An asteroid was destroyed, leaving `children` smaller pieces.
    AsteroidFragmented {
        asteroid: EntityTag,
        size: AsteroidSize,
        children: u32,
    },
    PickupSpawned {
        pickup: EntityTag,
        kind: PickupKind,
        position: DVec3,
    },
    PickupCollected {
        pickup: EntityTag,
        craft: EntityTag,
        kind: PickupKind,
    },
    CraftDamaged {
        craft: EntityTag,
        slot: PlayerSlot,
        lives_remaining: u32,
    },
    CraftEliminated {
        craft: EntityTag,
        slot: PlayerSlot,
    },
    MissileLaunched {
        projectile: EntityTag,
        owner: EntityTag,
    },
    MatchEnded {
        result: MatchResult,
    },
}

/// Audio cues for the frontend sound system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioEvent {
    /// Missile leaves the launcher.
    Launch,
    SmallExplosion,
    LargeExplosion,
    /// A craft took damage.
    Crash,
    PickupCollected,
}
