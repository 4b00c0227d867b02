//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Gameplay entity variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// A player-controlled droid.
    Craft,
    /// A missile fired by a craft.
    Projectile,
    /// A floating piece of trash that fragments when shot.
    Asteroid,
    /// The single powerup that may exist in a versus match.
    Pickup,
    /// The universe shell enclosing the play area.
    StaticBoundary,
}

/// Asteroid size class. Fragmentation always moves strictly down this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AsteroidSize {
    Small,
    Medium,
    Large,
}

impl AsteroidSize {
    /// Size of the two children produced when this asteroid breaks apart,
    /// or `None` for the terminal size.
    pub fn fragment_size(self) -> Option<AsteroidSize> {
        match self {
            AsteroidSize::Large => Some(AsteroidSize::Medium),
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Small => None,
        }
    }

    /// Collider radius. Mass equals radius for moveable asteroids.
    pub fn radius(self) -> f64 {
        match self {
            AsteroidSize::Small => ASTEROID_RADIUS_SMALL,
            AsteroidSize::Medium => ASTEROID_RADIUS_MEDIUM,
            AsteroidSize::Large => ASTEROID_RADIUS_LARGE,
        }
    }
}

/// Powerup variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Lets the collector see the opponent through geometry.
    RadarReveal,
    /// Strengthens the homing of the collector's missiles.
    HeatSeekBoost,
}

/// Player slot (split-screen seat).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    /// Array index of this slot.
    pub fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }

    /// The other seat.
    pub fn opponent(self) -> PlayerSlot {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }
}

/// Kind of match being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    /// One craft clearing asteroids against a score target.
    SinglePlayer,
    /// Two craft fighting until one runs out of lives.
    Versus,
}

/// How a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    SinglePlayerWin,
    SinglePlayerFail,
    PlayerOneWins,
    PlayerTwoWins,
}

/// Top-level game state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Intro,
    Menu,
    SinglePlayerMatch,
    MultiplayerMatch,
    Postgame(MatchResult),
}

impl GamePhase {
    /// Whether a match session is live in this phase.
    pub fn in_match(self) -> bool {
        matches!(self, GamePhase::SinglePlayerMatch | GamePhase::MultiplayerMatch)
    }
}

/// Main menu entries, top to bottom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuItem {
    #[default]
    SinglePlayer,
    Multiplayer,
    ReplayIntro,
    ExitGame,
}

impl MenuItem {
    /// Entry above this one, clamped at the top.
    pub fn previous(self) -> MenuItem {
        match self {
            MenuItem::SinglePlayer | MenuItem::Multiplayer => MenuItem::SinglePlayer,
            MenuItem::ReplayIntro => MenuItem::Multiplayer,
            MenuItem::ExitGame => MenuItem::ReplayIntro,
        }
    }

    /// Entry below this one, clamped at the bottom.
    pub fn next(self) -> MenuItem {
        match self {
            MenuItem::SinglePlayer => MenuItem::Multiplayer,
            MenuItem::Multiplayer => MenuItem::ReplayIntro,
            MenuItem::ReplayIntro | MenuItem::ExitGame => MenuItem::ExitGame,
        }
    }
}

/// Explosion magnitude, used to pick the visual and audio cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionSize {
    Small,
    Large,
}
