//! Scripted pilot used by the headless runner.
//!
//! Reads only the published snapshot, the way a frontend would, and turns
//! each craft toward its opponent (versus) or the nearest asteroid.

use glam::DVec3;

use trashdroids_core::commands::ControlState;
use trashdroids_core::enums::{EntityKind, PlayerSlot};
use trashdroids_core::state::{EntityView, GameStateSnapshot};

/// Local-frame offset that saturates the turn inputs.
const TURN_GAIN: f64 = 0.2;
/// Fire when the target is within this cone around the nose.
const FIRE_CONE_COS: f64 = 0.95;
/// Close in until this distance, brake inside it.
const STANDOFF: f64 = 15.0;
const CRUISE_THRUST: f64 = 0.3;

#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    slot: PlayerSlot,
}

impl Autopilot {
    pub fn new(slot: PlayerSlot) -> Self {
        Self { slot }
    }

    pub fn slot(&self) -> PlayerSlot {
        self.slot
    }

    /// Controls for this tick. Neutral if the craft is not in the world.
    pub fn controls(&self, snapshot: &GameStateSnapshot) -> ControlState {
        let Some(own) = snapshot
            .entities
            .iter()
            .find(|e| e.kind == EntityKind::Craft && e.slot == Some(self.slot))
        else {
            return ControlState::default();
        };
        let Some(target) = self.pick_target(snapshot, own) else {
            return ControlState::default();
        };

        // forward = -Z, up = +Y, right = +X
        let local = own.orientation.inverse() * (target - own.position);
        let distance = local.length();
        let ahead = distance > 0.0 && -local.z / distance > FIRE_CONE_COS;

        ControlState {
            thrust: if distance > STANDOFF { CRUISE_THRUST } else { 0.0 },
            strafe: 0.0,
            pitch: (-local.y * TURN_GAIN).clamp(-1.0, 1.0),
            roll: 0.0,
            yaw: (-local.x * TURN_GAIN).clamp(-1.0, 1.0),
            brake: distance <= STANDOFF,
            fire: ahead,
        }
    }

    fn pick_target(&self, snapshot: &GameStateSnapshot, own: &EntityView) -> Option<DVec3> {
        let opponent = snapshot.entities.iter().find(|e| {
            e.kind == EntityKind::Craft && e.slot == Some(self.slot.opponent())
        });
        if let Some(opponent) = opponent {
            return Some(opponent.position);
        }
        snapshot
            .entities
            .iter()
            .filter(|e| e.kind == EntityKind::Asteroid)
            .map(|e| e.position)
            .min_by(|a, b| {
                a.distance_squared(own.position)
                    .total_cmp(&b.distance_squared(own.position))
            })
    }
}
