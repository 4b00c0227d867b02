//! Match Session: everything that lives exactly as long as one match.

use log::info;

use trashdroids_core::components::Craft;
use trashdroids_core::config::MatchConfig;
use trashdroids_core::enums::*;
use trashdroids_core::error::SimError;
use trashdroids_core::state::MatchSummary;
use trashdroids_core::types::{format_match_time, EntityTag};
use trashdroids_physics::PhysicsWorld;

use crate::registry::{EntityRegistry, KindFilter};
use crate::scoring;

pub struct MatchSession {
    pub mode: MatchMode,
    /// Frozen copy of the parameters the match started with.
    pub config: MatchConfig,
    pub registry: EntityRegistry,
    /// Craft tags indexed by `PlayerSlot::index`.
    pub crafts: Vec<EntityTag>,
    pub boundary: Option<EntityTag>,
    /// The singleton pickup, set as soon as its creation is queued.
    pub pickup: Option<EntityTag>,
    pub score: u32,
    pub target_score: u32,
    pub elapsed_secs: f64,
}

impl MatchSession {
    pub fn new(mode: MatchMode, config: MatchConfig) -> Self {
        let target_score = match mode {
            MatchMode::SinglePlayer => {
                scoring::target_score(config.asteroids.count, config.asteroids.pct_to_destroy)
            }
            MatchMode::Versus => 0,
        };
        Self {
            mode,
            config,
            registry: EntityRegistry::new(),
            crafts: Vec::new(),
            boundary: None,
            pickup: None,
            score: 0,
            target_score,
            elapsed_secs: 0.0,
        }
    }

    pub fn is_versus(&self) -> bool {
        self.mode == MatchMode::Versus
    }

    pub fn craft_tag(&self, slot: PlayerSlot) -> Option<EntityTag> {
        self.crafts.get(slot.index()).copied()
    }

    /// Seat of a craft tag.
    pub fn slot_of(&self, tag: EntityTag) -> Option<PlayerSlot> {
        self.registry.get::<Craft>(tag).map(|c| c.slot)
    }

    /// Lives of the craft in `slot`, zero if there is none.
    pub fn lives(&self, slot: PlayerSlot) -> u32 {
        self.craft_tag(slot)
            .and_then(|tag| self.registry.get::<Craft>(tag).map(|c| c.lives_remaining))
            .unwrap_or(0)
    }

    /// Termination predicate for the current tick.
    pub fn outcome(&self) -> Option<MatchResult> {
        match self.mode {
            MatchMode::SinglePlayer => scoring::single_player_outcome(
                self.score,
                self.target_score,
                self.lives(PlayerSlot::One),
            ),
            MatchMode::Versus => {
                scoring::versus_outcome(self.lives(PlayerSlot::One), self.lives(PlayerSlot::Two))
            }
        }
    }

    pub fn summary(&self, result: MatchResult) -> MatchSummary {
        MatchSummary {
            mode: self.mode,
            result,
            duration_secs: self.elapsed_secs,
            clock: format_match_time(self.elapsed_secs),
            score: self.score,
            target_score: self.target_score,
            lives_remaining: [PlayerSlot::One, PlayerSlot::Two]
                .into_iter()
                .take(self.crafts.len())
                .map(|slot| self.lives(slot))
                .collect(),
        }
    }

    /// Destroy every entity and detach every body.
    pub fn teardown(&mut self, physics: &mut dyn PhysicsWorld) {
        let count = self.registry.len();
        self.registry.clear(physics);
        self.crafts.clear();
        self.boundary = None;
        self.pickup = None;
        info!("match session torn down ({count} entities removed)");
    }

    /// Structural invariants that must hold after every flush.
    pub fn check_invariants(&self, physics: &dyn PhysicsWorld) -> Result<(), SimError> {
        let pickups = self.registry.count(EntityKind::Pickup)
            + self.registry.pending_creates(EntityKind::Pickup);
        if pickups > 1 {
            return Err(SimError::InvariantViolation(format!(
                "{pickups} pickups in one session"
            )));
        }
        if self.pickup.is_some() != (pickups == 1) {
            return Err(SimError::InvariantViolation(format!(
                "pickup slot {:?} disagrees with {pickups} pickup entities",
                self.pickup
            )));
        }
        self.registry.check_bodies(physics)?;
        let bodies = physics.body_count();
        let entities = self.registry.count(KindFilter::All);
        if bodies != entities {
            return Err(SimError::InvariantViolation(format!(
                "{bodies} physics bodies for {entities} entities"
            )));
        }
        Ok(())
    }
}
