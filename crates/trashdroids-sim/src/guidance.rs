//! Guidance Controller for homing projectiles.
//!
//! A pure sign controller on the two lateral axes of the projectile's body
//! frame. The projectile flies along its local up axis (+Y), so the lateral
//! axes are local X and Z. No integral or derivative terms: the angular
//! momentum is replaced every tick, never accumulated.

use glam::{DQuat, DVec3};

fn axis_sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Body-frame angular momentum that turns the nose toward `local_aim`.
///
/// Aim to the right (+X) turns about -Z, aim to the back (+Z) turns
/// about +X. A zero coordinate leaves that axis alone.
pub fn steering_correction(local_aim: DVec3, strength: f64) -> DVec3 {
    DVec3::new(
        axis_sign(local_aim.z) * strength,
        0.0,
        -axis_sign(local_aim.x) * strength,
    )
}

/// World-frame angular momentum for a projectile at `position` with
/// `orientation` aiming at the world point `aim`.
pub fn angular_momentum(orientation: DQuat, position: DVec3, aim: DVec3, strength: f64) -> DVec3 {
    let local_aim = orientation.inverse() * (aim - position);
    orientation * steering_correction(local_aim, strength)
}

/// Velocity along `up` at no less than `base_speed`.
pub fn clamp_speed(up: DVec3, velocity: DVec3, base_speed: f64) -> DVec3 {
    up * base_speed.max(velocity.length())
}
