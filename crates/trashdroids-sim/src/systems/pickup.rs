//! Pickup upkeep and spawning.

use log::info;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use trashdroids_core::components::Pickup;
use trashdroids_core::events::GameEvent;
use trashdroids_physics::PhysicsWorld;

use crate::session::MatchSession;
use crate::world_setup;

/// Keep the live pickup moving at its spawn speed.
pub fn retain_speed(session: &MatchSession, physics: &mut dyn PhysicsWorld) {
    let Some(tag) = session.pickup.filter(|t| session.registry.is_live(*t)) else {
        return;
    };
    let Some(speed) = session.registry.get::<Pickup>(tag).map(|p| p.cruise_speed) else {
        return;
    };
    if let Some(body) = session.registry.body(tag).and_then(|h| physics.body_mut(h)) {
        body.linear_velocity = body.linear_velocity.normalize_or_zero() * speed;
    }
}

/// Versus only: roll for a new pickup while none exists.
pub fn spawn_roll(session: &mut MatchSession, rng: &mut ChaCha8Rng, events: &mut Vec<GameEvent>) {
    if !session.is_versus() || session.pickup.is_some() {
        return;
    }
    if !rng.gen_bool(session.config.pickup.spawn_chance) {
        return;
    }
    let (pickup, kind, position) = world_setup::spawn_pickup(session, rng);
    info!("pickup {pickup} ({kind:?}) spawned");
    events.push(GameEvent::PickupSpawned {
        pickup,
        kind,
        position,
    });
}
