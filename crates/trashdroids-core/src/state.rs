//! Game state snapshot: the read-only view handed to rendering, audio and
//! HUD collaborators after each tick.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{AudioEvent, GameEvent};
use crate::types::{EntityTag, SimTime};

/// Complete visible state after a tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub menu: MenuView,
    pub entities: Vec<EntityView>,
    /// Present while a match is live.
    pub hud: Option<HudView>,
    pub events: Vec<GameEvent>,
    pub audio_events: Vec<AudioEvent>,
    /// Result of the last finished match.
    pub summary: Option<MatchSummary>,
    /// Why the last match setup was aborted, if it was.
    pub last_error: Option<String>,
    pub exit_requested: bool,
}

/// A drawable entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityView {
    pub tag: EntityTag,
    pub kind: EntityKind,
    pub position: DVec3,
    pub orientation: DQuat,
    pub visible: bool,
    pub asteroid_size: Option<AsteroidSize>,
    pub pickup_kind: Option<PickupKind>,
    /// Seat of a craft, or of the craft that fired a projectile.
    pub slot: Option<PlayerSlot>,
}

/// Heads-up display values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HudView {
    pub mode: MatchMode,
    pub score: u32,
    pub target_score: u32,
    /// Score as a percentage of the target, capped at 100.
    pub progress_pct: f64,
    pub elapsed_secs: f64,
    /// Elapsed time as `MM:SS:CC`.
    pub clock: String,
    pub craft: Vec<CraftHud>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CraftHud {
    pub tag: EntityTag,
    pub slot: PlayerSlot,
    pub lives_remaining: u32,
    pub invincibility_secs: f64,
    /// Draw the opponent through geometry.
    pub radar_reveal: bool,
    pub heat_seek_strength: f64,
}

/// Menu cursor and the match parameters of the highlighted mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuView {
    pub selected: MenuItem,
    pub universe_radius: f64,
    pub asteroid_count: u32,
    pub stream_mode: bool,
    pub spread_mode: bool,
    pub destructible: bool,
    pub moveable: bool,
}

/// End-of-match record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub mode: MatchMode,
    pub result: MatchResult,
    pub duration_secs: f64,
    /// Duration as `MM:SS:CC`.
    pub clock: String,
    pub score: u32,
    pub target_score: u32,
    /// Lives left per seat, indexed by `PlayerSlot::index`.
    pub lives_remaining: Vec<u32>,
}
