//! Entity spawn factories and initial match population.
//!
//! Factories only queue creations on the registry; bodies appear at the
//! next flush.

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::{DQuat, DVec3, EulerRot};
use log::{debug, info};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use trashdroids_core::components::*;
use trashdroids_core::config::MatchConfig;
use trashdroids_core::enums::*;
use trashdroids_core::error::SimError;
use trashdroids_core::types::EntityTag;
use trashdroids_physics::{BodyDesc, BodyState, Shape};

use crate::fragmentation::FragmentSpec;
use crate::placement;
use crate::registry::{EntityRegistry, EntitySpawn};
use crate::session::MatchSession;

/// Launch point offsets in the craft's frame.
const MISSILE_FORWARD_OFFSET: f64 = 2.0;
const MISSILE_UP_DIVISOR: f64 = 2.35;
const MISSILE_SIDE_DIVISOR: f64 = 3.0;

/// Uniformly random orientation built from three random Euler angles.
pub fn random_orientation(rng: &mut ChaCha8Rng) -> DQuat {
    DQuat::from_euler(
        EulerRot::YXZ,
        rng.gen_range(0.0..TAU),
        rng.gen_range(0.0..TAU),
        rng.gen_range(0.0..TAU),
    )
}

/// Each axis uniform in `(-max, max)`.
pub fn random_vector(rng: &mut ChaCha8Rng, max: f64) -> DVec3 {
    if max <= 0.0 {
        return DVec3::ZERO;
    }
    DVec3::new(
        rng.gen_range(-max..max),
        rng.gen_range(-max..max),
        rng.gen_range(-max..max),
    )
}

/// The universe shell.
pub fn spawn_boundary(session: &mut MatchSession) -> EntityTag {
    let body = BodyDesc::new(
        Shape::Shell {
            radius: session.config.universe.radius,
        },
        DVec3::ZERO,
        None,
    );
    let tag = session.registry.create(EntitySpawn::Boundary { body });
    session.boundary = Some(tag);
    tag
}

pub fn spawn_craft(session: &mut MatchSession, slot: PlayerSlot, position: DVec3) -> EntityTag {
    let ship = &session.config.ship;
    let craft = Craft {
        slot,
        lives_remaining: ship.starting_lives,
        invincibility_secs: 0.0,
        visible: true,
        has_radar: false,
        heat_seek_strength: session.config.missile.initial_heat_seek,
        last_fire_secs: None,
        fire_from_left: true,
    };
    let body = BodyDesc::new(Shape::Sphere { radius: ship.radius }, position, Some(ship.mass));
    let tag = session.registry.create(EntitySpawn::Craft { craft, body });
    if session.crafts.len() <= slot.index() {
        session.crafts.resize(slot.index() + 1, tag);
    }
    session.crafts[slot.index()] = tag;
    debug!("craft {tag} ({slot:?}) queued at {position:?}");
    tag
}

/// Asteroid with construction-time randomness. `linear` and `angular`
/// override the random velocity and spin when given.
fn asteroid_spawn(
    config: &MatchConfig,
    rng: &mut ChaCha8Rng,
    size: AsteroidSize,
    position: DVec3,
    linear: Option<DVec3>,
    angular: Option<DVec3>,
) -> EntitySpawn {
    let radius = size.radius();
    let moveable = config.asteroids.moveable;
    let orientation = random_orientation(rng);
    let spin = random_vector(rng, config.asteroids.max_spin);
    let velocity = if moveable {
        random_vector(rng, config.asteroids.max_speed)
    } else {
        DVec3::ZERO
    };
    let body = BodyDesc::new(
        Shape::Sphere { radius },
        position,
        moveable.then_some(radius),
    )
    .with_orientation(orientation)
    .with_velocity(linear.unwrap_or(velocity), angular.unwrap_or(spin));
    EntitySpawn::Asteroid {
        asteroid: Asteroid { size },
        body,
    }
}

pub fn spawn_asteroid(
    registry: &mut EntityRegistry,
    config: &MatchConfig,
    rng: &mut ChaCha8Rng,
    size: AsteroidSize,
    position: DVec3,
) -> EntityTag {
    registry.create(asteroid_spawn(config, rng, size, position, None, None))
}

/// A child asteroid at the parent's position.
pub fn spawn_fragment(
    registry: &mut EntityRegistry,
    config: &MatchConfig,
    rng: &mut ChaCha8Rng,
    spec: &FragmentSpec,
    position: DVec3,
) -> EntityTag {
    registry.create(asteroid_spawn(
        config,
        rng,
        spec.size,
        position,
        Some(spec.linear_velocity),
        spec.angular_velocity,
    ))
}

/// What a craft needs to know to fire.
pub struct Launch<'a> {
    pub owner: EntityTag,
    pub body: &'a BodyState,
    pub target: Option<EntityTag>,
    pub heat_seek_strength: f64,
    pub from_left: bool,
}

/// Queue one shot: a single missile, or a spread salvo.
pub fn spawn_missiles(
    registry: &mut EntityRegistry,
    config: &MatchConfig,
    launch: &Launch<'_>,
) -> Vec<EntityTag> {
    let missile = &config.missile;
    let craft = launch.body;
    let side = if launch.from_left {
        -craft.right()
    } else {
        craft.right()
    };
    let position = craft.position
        + craft.forward() * MISSILE_FORWARD_OFFSET
        + craft.up() / MISSILE_UP_DIVISOR
        + side / MISSILE_SIDE_DIVISOR;
    // Pitch so the missile's local up axis is the craft's forward axis.
    let orientation = craft.orientation * DQuat::from_rotation_x(-FRAC_PI_2);
    let velocity = orientation * DVec3::Y * missile.launch_speed;

    (0..missile.missiles_per_shot())
        .map(|_| {
            let body = BodyDesc::new(
                Shape::Capsule {
                    half_length: missile.half_length,
                    radius: missile.radius,
                },
                position,
                Some(missile.mass),
            )
            .with_orientation(orientation)
            .with_velocity(velocity, DVec3::ZERO)
            .with_linear_damping(missile.linear_damping);
            registry.create(EntitySpawn::Projectile {
                projectile: Projectile {
                    owner: launch.owner,
                    target: launch.target,
                    base_speed: missile.base_speed,
                    launch_strength: launch.heat_seek_strength,
                },
                body,
            })
        })
        .collect()
}

/// Queue the singleton pickup at a random point of the placement cube.
pub fn spawn_pickup(session: &mut MatchSession, rng: &mut ChaCha8Rng) -> (EntityTag, PickupKind, DVec3) {
    let config = &session.config;
    let kind = if rng.gen_bool(0.5) {
        PickupKind::RadarReveal
    } else {
        PickupKind::HeatSeekBoost
    };
    let position = placement::sample_cube(
        rng,
        config.placement.cube_fraction * config.universe.radius,
    );
    let orientation = random_orientation(rng);
    let spin = random_vector(rng, config.pickup.max_spin);
    let velocity = random_vector(rng, config.pickup.max_speed);
    let body = BodyDesc::new(
        Shape::Sphere {
            radius: config.pickup.radius,
        },
        position,
        Some(config.pickup.mass),
    )
    .with_orientation(orientation)
    .with_velocity(velocity, spin);
    let pickup = Pickup {
        kind,
        cruise_speed: velocity.length(),
    };
    let tag = session.registry.create(EntitySpawn::Pickup { pickup, body });
    session.pickup = Some(tag);
    debug!("pickup {tag} ({kind:?}) queued at {position:?}");
    (tag, kind, position)
}

/// Initial population: boundary, craft, and Large asteroids placed away
/// from the origin and from every craft.
///
/// Fails with `PlacementExhausted` if placement cannot succeed even after
/// the configured relaxation steps.
pub fn populate_match(session: &mut MatchSession, rng: &mut ChaCha8Rng) -> Result<(), SimError> {
    spawn_boundary(session);

    let radius = session.config.universe.radius;
    let craft_positions = match session.mode {
        MatchMode::SinglePlayer => {
            spawn_craft(session, PlayerSlot::One, DVec3::ZERO);
            Vec::new()
        }
        MatchMode::Versus => {
            let half_extent = session.config.placement.cube_fraction * radius;
            let mut positions = Vec::with_capacity(2);
            for slot in [PlayerSlot::One, PlayerSlot::Two] {
                let position = placement::sample_cube(rng, half_extent);
                spawn_craft(session, slot, position);
                positions.push(position);
            }
            positions
        }
    };

    let placement_config = session.config.placement.clone();
    let mut clearance = placement_config.clearance;
    for _ in 0..session.config.asteroids.count {
        let position =
            placement::place_relaxed(rng, radius, &craft_positions, &placement_config, &mut clearance)?;
        spawn_asteroid(
            &mut session.registry,
            &session.config,
            rng,
            AsteroidSize::Large,
            position,
        );
    }

    info!(
        "{:?} match populated: {} asteroids, universe radius {radius}, clearance {clearance:.2}",
        session.mode, session.config.asteroids.count
    );
    Ok(())
}
