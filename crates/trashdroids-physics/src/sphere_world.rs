//! Reference physics backend.
//!
//! Every collider is treated as its bounding sphere, except the universe
//! shell which contains bodies instead of repelling them. Good enough to
//! drive gameplay and tests; not meant to be physically accurate.

use std::collections::{BTreeMap, BTreeSet};

use glam::{DQuat, DVec3};
use log::trace;
use trashdroids_core::types::{BodyHandle, EntityTag};

use crate::body::{BodyDesc, BodyState, ContactEvent, Shape};
use crate::world::PhysicsWorld;

/// Fraction of approach speed kept after two bodies bounce.
const RESTITUTION: f64 = 0.5;

#[derive(Debug, Default)]
pub struct SphereWorld {
    bodies: BTreeMap<BodyHandle, BodyState>,
    next_handle: u32,
    /// Pairs overlapping at the end of the previous step, smaller handle first.
    touching: BTreeSet<(BodyHandle, BodyHandle)>,
}

impl SphereWorld {
    pub fn new() -> Self {
        Self::default()
    }

    fn integrate(&mut self, dt: f64) {
        for body in self.bodies.values_mut().filter(|b| !b.is_static()) {
            let damping = body.linear_damping.clamp(0.0, 1.0);
            if damping > 0.0 {
                body.linear_velocity *= (1.0 - damping).powf(dt);
            }
            body.position += body.linear_velocity * dt;
            let rotation = body.angular_velocity * dt;
            if rotation.length_squared() > 0.0 {
                body.orientation =
                    (DQuat::from_scaled_axis(rotation) * body.orientation).normalize();
            }
        }
    }

    /// Pairs whose colliders overlap right now.
    fn overlapping_pairs(&self) -> BTreeSet<(BodyHandle, BodyHandle)> {
        let mut pairs = BTreeSet::new();
        let bodies: Vec<(&BodyHandle, &BodyState)> = self.bodies.iter().collect();
        for (i, (ha, a)) in bodies.iter().enumerate() {
            for (hb, b) in bodies.iter().skip(i + 1) {
                if a.is_static() && b.is_static() {
                    continue;
                }
                if overlaps(a, b) {
                    pairs.insert((**ha, **hb));
                }
            }
        }
        pairs
    }

    /// Push overlapping pairs apart and bounce them.
    fn resolve(&mut self, pairs: &BTreeSet<(BodyHandle, BodyHandle)>) {
        for &(ha, hb) in pairs {
            let (Some(a), Some(b)) = (self.bodies.get(&ha), self.bodies.get(&hb)) else {
                continue;
            };
            let (a, b) = (a.clone(), b.clone());
            let corrections = match (a.shape, b.shape) {
                (Shape::Shell { radius }, _) => {
                    contain(&a.position, radius, &b).map(|c| (None, Some(c)))
                }
                (_, Shape::Shell { radius }) => {
                    contain(&b.position, radius, &a).map(|c| (Some(c), None))
                }
                _ => separate(&a, &b),
            };
            let Some((fix_a, fix_b)) = corrections else {
                continue;
            };
            for (handle, fix) in [(ha, fix_a), (hb, fix_b)] {
                if let (Some(body), Some((position, velocity))) =
                    (self.bodies.get_mut(&handle), fix)
                {
                    body.position = position;
                    body.linear_velocity = velocity;
                }
            }
        }
    }
}

/// Position and velocity after a correction.
type Correction = (DVec3, DVec3);

fn overlaps(a: &BodyState, b: &BodyState) -> bool {
    match (a.shape, b.shape) {
        (Shape::Shell { .. }, Shape::Shell { .. }) => false,
        (Shape::Shell { radius }, other) => {
            b.position.distance(a.position) + other.bounding_radius() >= radius
        }
        (other, Shape::Shell { radius }) => {
            a.position.distance(b.position) + other.bounding_radius() >= radius
        }
        (sa, sb) => a.position.distance(b.position) < sa.bounding_radius() + sb.bounding_radius(),
    }
}

/// Keep a dynamic body inside a shell centered at `center`.
fn contain(center: &DVec3, shell_radius: f64, body: &BodyState) -> Option<Correction> {
    if body.is_static() {
        return None;
    }
    let r = body.shape.bounding_radius();
    let offset = body.position - *center;
    let dist = offset.length();
    if dist + r < shell_radius || dist <= f64::EPSILON {
        return None;
    }
    let normal = offset / dist;
    let position = *center + normal * (shell_radius - r).max(0.0);
    let outward = body.linear_velocity.dot(normal);
    let velocity = if outward > 0.0 {
        body.linear_velocity - normal * (2.0 * outward)
    } else {
        body.linear_velocity
    };
    Some((position, velocity))
}

/// Separate two solid bodies along the line between their centers.
///
/// Coincident centers (split fragments, spread salvos) are pushed apart
/// along +X, the body with the larger handle moving to +X.
fn separate(a: &BodyState, b: &BodyState) -> Option<(Option<Correction>, Option<Correction>)> {
    let delta = b.position - a.position;
    let dist = delta.length();
    let penetration = a.shape.bounding_radius() + b.shape.bounding_radius() - dist;
    if penetration <= 0.0 {
        return None;
    }
    let normal = if dist <= f64::EPSILON {
        DVec3::X
    } else {
        delta / dist
    };
    let inv_a = a.mass.map_or(0.0, |m| 1.0 / m);
    let inv_b = b.mass.map_or(0.0, |m| 1.0 / m);
    let inv_sum = inv_a + inv_b;
    if inv_sum <= 0.0 {
        return None;
    }

    let closing = (b.linear_velocity - a.linear_velocity).dot(normal);
    let impulse = if closing < 0.0 {
        -(1.0 + RESTITUTION) * closing / inv_sum
    } else {
        0.0
    };

    let fix_a = (inv_a > 0.0).then(|| {
        (
            a.position - normal * penetration * (inv_a / inv_sum),
            a.linear_velocity - normal * impulse * inv_a,
        )
    });
    let fix_b = (inv_b > 0.0).then(|| {
        (
            b.position + normal * penetration * (inv_b / inv_sum),
            b.linear_velocity + normal * impulse * inv_b,
        )
    });
    Some((fix_a, fix_b))
}

impl PhysicsWorld for SphereWorld {
    fn add_body(&mut self, tag: EntityTag, desc: &BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        self.bodies.insert(handle, BodyState::from_desc(tag, desc));
        handle
    }

    fn remove_body(&mut self, handle: BodyHandle) -> bool {
        let removed = self.bodies.remove(&handle).is_some();
        if removed {
            self.touching.retain(|&(a, b)| a != handle && b != handle);
        }
        removed
    }

    fn step(&mut self, dt: f64) -> Vec<ContactEvent> {
        self.integrate(dt);
        let pairs = self.overlapping_pairs();
        self.resolve(&pairs);

        let mut events = Vec::new();
        for pair in pairs.difference(&self.touching) {
            if let (Some(a), Some(b)) = (self.bodies.get(&pair.0), self.bodies.get(&pair.1)) {
                events.push(ContactEvent { a: a.tag, b: b.tag });
            }
        }
        self.touching = pairs;
        if !events.is_empty() {
            trace!("physics step: {} new contacts", events.len());
        }
        events
    }

    fn body(&self, handle: BodyHandle) -> Option<&BodyState> {
        self.bodies.get(&handle)
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut BodyState> {
        self.bodies.get_mut(&handle)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}
