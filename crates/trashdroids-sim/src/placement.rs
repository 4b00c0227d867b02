//! Spawn Placement.
//!
//! Rejection sampling inside a cube of half-extent `cube_fraction * radius`
//! (a cube, not a sphere). A point is accepted once it is farther than the
//! clearance from the universe center and from every exclusion center.

use glam::DVec3;
use log::warn;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use trashdroids_core::config::PlacementConfig;
use trashdroids_core::error::SimError;

/// A keep-out sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exclusion {
    pub center: DVec3,
    pub min_distance: f64,
}

/// Uniform point in the axis-aligned cube `[-half_extent, half_extent]^3`.
pub fn sample_cube(rng: &mut ChaCha8Rng, half_extent: f64) -> DVec3 {
    if half_extent <= 0.0 {
        return DVec3::ZERO;
    }
    DVec3::new(
        rng.gen_range(-half_extent..half_extent),
        rng.gen_range(-half_extent..half_extent),
        rng.gen_range(-half_extent..half_extent),
    )
}

/// Draw a point more than `config.clearance` from the origin and more than
/// `min_distance` from every exclusion, giving up after
/// `config.max_attempts` draws.
pub fn place(
    rng: &mut ChaCha8Rng,
    universe_radius: f64,
    exclusions: &[Exclusion],
    config: &PlacementConfig,
) -> Result<DVec3, SimError> {
    let half_extent = config.cube_fraction * universe_radius;
    for _ in 0..config.max_attempts {
        let point = sample_cube(rng, half_extent);
        if point.length() > config.clearance
            && exclusions
                .iter()
                .all(|e| point.distance(e.center) > e.min_distance)
        {
            return Ok(point);
        }
    }
    Err(SimError::PlacementExhausted {
        attempts: config.max_attempts,
        clearance: config.clearance,
    })
}

/// Placement with the setup fallback: on exhaustion halve the clearance
/// (around the origin and every center) and retry, at most
/// `config.relax_steps` times.
///
/// `clearance` carries the current clearance between calls, so once a
/// population has been relaxed the rest of it is placed at the relaxed value.
pub fn place_relaxed(
    rng: &mut ChaCha8Rng,
    universe_radius: f64,
    centers: &[DVec3],
    config: &PlacementConfig,
    clearance: &mut f64,
) -> Result<DVec3, SimError> {
    let mut relaxations = 0;
    loop {
        let attempt = PlacementConfig {
            clearance: *clearance,
            ..config.clone()
        };
        let exclusions: Vec<Exclusion> = centers
            .iter()
            .map(|&center| Exclusion {
                center,
                min_distance: *clearance,
            })
            .collect();
        match place(rng, universe_radius, &exclusions, &attempt) {
            Ok(point) => return Ok(point),
            Err(err) if relaxations < config.relax_steps => {
                relaxations += 1;
                *clearance /= 2.0;
                warn!("{err}; relaxing spawn clearance to {:.2}", *clearance);
            }
            Err(err) => return Err(err),
        }
    }
}
