//! Homing and speed floor for projectiles.

use glam::DVec3;

use trashdroids_core::components::{Craft, Projectile};
use trashdroids_core::enums::EntityKind;
use trashdroids_physics::PhysicsWorld;

use crate::guidance;
use crate::session::MatchSession;

/// Steer projectiles that hold a target, then re-impose every projectile's
/// speed floor along its nose.
pub fn run(session: &MatchSession, physics: &mut dyn PhysicsWorld) {
    let registry = &session.registry;
    let projectiles: Vec<_> = registry.iter(EntityKind::Projectile).collect();

    for tag in projectiles {
        let Some(handle) = registry.body(tag) else {
            continue;
        };
        let Some((target, base_speed, strength)) = registry.get::<Projectile>(tag).map(|p| {
            // Boosts collected after launch still apply while the owner lives.
            let strength = if registry.is_live(p.owner) {
                registry
                    .get::<Craft>(p.owner)
                    .map_or(p.launch_strength, |c| c.heat_seek_strength)
            } else {
                p.launch_strength
            };
            (p.target, p.base_speed, strength)
        }) else {
            continue;
        };

        // A dead target means aim at the universe center.
        let aim = target.map(|target| {
            registry
                .is_live(target)
                .then(|| registry.body(target))
                .flatten()
                .and_then(|h| physics.body(h))
                .map_or(DVec3::ZERO, |b| b.position)
        });

        let Some(body) = physics.body_mut(handle) else {
            continue;
        };
        if let Some(aim) = aim {
            let momentum =
                guidance::angular_momentum(body.orientation, body.position, aim, strength);
            body.set_angular_momentum(momentum);
        }
        body.linear_velocity = guidance::clamp_speed(body.up(), body.linear_velocity, base_speed);
    }
}
