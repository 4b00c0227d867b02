//! Craft control: invincibility countdown, blink, flight impulses and fire.

use glam::DVec3;
use log::debug;

use trashdroids_core::commands::ControlState;
use trashdroids_core::components::Craft;
use trashdroids_core::enums::PlayerSlot;
use trashdroids_core::events::{AudioEvent, GameEvent};
use trashdroids_physics::PhysicsWorld;

use crate::session::MatchSession;
use crate::world_setup::{self, Launch};

/// Apply one tick of sampled input to every craft.
pub fn run(
    session: &mut MatchSession,
    physics: &mut dyn PhysicsWorld,
    controls: &[ControlState; 2],
    dt: f64,
    events: &mut Vec<GameEvent>,
    audio_events: &mut Vec<AudioEvent>,
) {
    let elapsed = session.elapsed_secs;
    let ship = session.config.ship.clone();
    let fire_interval = session.config.missile.fire_interval_secs();

    for slot in [PlayerSlot::One, PlayerSlot::Two] {
        let Some(tag) = session.craft_tag(slot) else {
            continue;
        };
        if !session.registry.is_live(tag) {
            continue;
        }
        let Some(handle) = session.registry.body(tag) else {
            continue;
        };
        let input = clamp_input(&controls[slot.index()]);

        // 1. Timers and blink
        let (wants_fire, from_left, strength) = {
            let Some(mut craft) = session.registry.get_mut::<Craft>(tag) else {
                continue;
            };
            if craft.invincibility_secs > 0.0 {
                craft.invincibility_secs = (craft.invincibility_secs - dt).max(0.0);
            }
            craft.visible =
                craft.invincibility_secs % ship.blink_period_secs <= ship.blink_period_secs / 2.0;
            let ready = craft
                .last_fire_secs
                .map_or(true, |last| elapsed > last + fire_interval);
            (input.fire && ready, craft.fire_from_left, craft.heat_seek_strength)
        };

        // 2. Flight impulses, rotated into the world frame
        let Some(body) = physics.body_mut(handle) else {
            continue;
        };
        let q = body.orientation;
        let linear_impulse =
            q * (DVec3::NEG_Z * ship.thrust_multiplier * input.thrust + DVec3::X * input.strafe);
        let angular_impulse =
            q * (DVec3::NEG_X * input.pitch + DVec3::NEG_Z * input.roll + DVec3::Y * input.yaw);

        let mut linear = body.linear_momentum() * ship.linear_drag;
        let mut angular = body.angular_momentum() * ship.angular_drag;
        if input.brake {
            linear *= ship.linear_braking;
            angular *= ship.angular_braking;
        }
        body.set_linear_momentum(linear + linear_impulse * ship.linear_accel);
        body.set_angular_momentum(angular + angular_impulse * ship.angular_accel);

        // 3. Fire
        if !wants_fire {
            continue;
        }
        let body = body.clone();
        let target = if session.is_versus() {
            session.craft_tag(slot.opponent())
        } else {
            None
        };
        let launch = Launch {
            owner: tag,
            body: &body,
            target,
            heat_seek_strength: strength,
            from_left,
        };
        let missiles = world_setup::spawn_missiles(&mut session.registry, &session.config, &launch);
        if let Some(mut craft) = session.registry.get_mut::<Craft>(tag) {
            craft.last_fire_secs = Some(elapsed);
            craft.fire_from_left = !from_left;
        }
        debug!("craft {tag} fired {} missile(s)", missiles.len());
        events.extend(missiles.into_iter().map(|projectile| GameEvent::MissileLaunched {
            projectile,
            owner: tag,
        }));
        audio_events.push(AudioEvent::Launch);
    }
}

fn clamp_input(input: &ControlState) -> ControlState {
    ControlState {
        thrust: input.thrust.clamp(-1.0, 1.0),
        strafe: input.strafe.clamp(-1.0, 1.0),
        pitch: input.pitch.clamp(-1.0, 1.0),
        roll: input.roll.clamp(-1.0, 1.0),
        yaw: input.yaw.clamp(-1.0, 1.0),
        ..*input
    }
}
