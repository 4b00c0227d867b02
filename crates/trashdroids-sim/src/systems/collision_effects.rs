//! Collision Effect Pipeline.
//!
//! Consumes the first-contact events of one physics step, strictly after the
//! step, and turns them into gameplay effects. All structural changes go
//! through the registry's deferred API. Events naming an entity that is no
//! longer live (already destroyed, or marked earlier this tick) are dropped,
//! which makes re-delivery of a resolved event a no-op.

use glam::DVec3;
use log::{debug, trace};
use rand_chacha::ChaCha8Rng;

use trashdroids_core::components::{Asteroid, Craft, Pickup, Projectile};
use trashdroids_core::enums::*;
use trashdroids_core::events::{AudioEvent, GameEvent};
use trashdroids_core::types::EntityTag;
use trashdroids_physics::{ContactEvent, PhysicsWorld};

use crate::fragmentation;
use crate::session::MatchSession;
use crate::world_setup;

/// Outcome counts of one pipeline pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub applied: usize,
    pub stale: usize,
}

/// Apply every contact in order.
pub fn run(
    session: &mut MatchSession,
    physics: &dyn PhysicsWorld,
    rng: &mut ChaCha8Rng,
    contacts: &[ContactEvent],
    events: &mut Vec<GameEvent>,
    audio_events: &mut Vec<AudioEvent>,
) -> PipelineReport {
    let mut report = PipelineReport::default();
    for contact in contacts {
        let kinds = (
            session.registry.resolve(contact.a),
            session.registry.resolve(contact.b),
        );
        let (Ok(kind_a), Ok(kind_b)) = kinds else {
            trace!("dropping stale contact {} x {}", contact.a, contact.b);
            report.stale += 1;
            continue;
        };
        let mut ctx = EffectContext {
            session: &mut *session,
            physics,
            rng: &mut *rng,
            events: &mut *events,
            audio_events: &mut *audio_events,
        };
        ctx.apply((contact.a, kind_a), (contact.b, kind_b));
        report.applied += 1;
    }
    report
}

struct EffectContext<'a> {
    session: &'a mut MatchSession,
    physics: &'a dyn PhysicsWorld,
    rng: &'a mut ChaCha8Rng,
    events: &'a mut Vec<GameEvent>,
    audio_events: &'a mut Vec<AudioEvent>,
}

type Party = (EntityTag, EntityKind);

/// Order a pair so the first party has kind `first`.
fn match_pair(
    a: Party,
    b: Party,
    first: EntityKind,
    second: EntityKind,
) -> Option<(EntityTag, EntityTag)> {
    if a.1 == first && b.1 == second {
        Some((a.0, b.0))
    } else if b.1 == first && a.1 == second {
        Some((b.0, a.0))
    } else {
        None
    }
}

impl EffectContext<'_> {
    fn apply(&mut self, a: Party, b: Party) {
        // Generic rule first: a projectile touching anything but another
        // projectile detonates. Projectile pairs pass through each other.
        for (this, other) in [(a, b), (b, a)] {
            if this.1 == EntityKind::Projectile && other.1 != EntityKind::Projectile {
                self.detonate(this.0);
            }
        }

        if let Some((craft, projectile)) =
            match_pair(a, b, EntityKind::Craft, EntityKind::Projectile)
        {
            let owner = self
                .session
                .registry
                .get::<Projectile>(projectile)
                .map(|p| p.owner);
            if owner != Some(craft) {
                self.damage(craft);
            }
        }

        let versus = self.session.is_versus();
        if a.1 == EntityKind::Craft && b.1 == EntityKind::Craft && !versus {
            self.damage(a.0);
            self.damage(b.0);
        }

        for hazard in [EntityKind::Asteroid, EntityKind::StaticBoundary] {
            if let Some((craft, _)) = match_pair(a, b, EntityKind::Craft, hazard) {
                if !versus {
                    self.damage(craft);
                }
            }
        }

        if let Some((craft, pickup)) = match_pair(a, b, EntityKind::Craft, EntityKind::Pickup) {
            self.collect(craft, pickup);
        }

        if let Some((_, asteroid)) =
            match_pair(a, b, EntityKind::Projectile, EntityKind::Asteroid)
        {
            if self.session.config.asteroids.destructible {
                self.shatter(asteroid);
            }
        }
    }

    fn position(&self, tag: EntityTag) -> DVec3 {
        self.session
            .registry
            .body(tag)
            .and_then(|h| self.physics.body(h))
            .map_or(DVec3::ZERO, |b| b.position)
    }

    fn detonate(&mut self, projectile: EntityTag) {
        if !self.session.registry.mark_for_destroy(projectile) {
            return;
        }
        let position = self.position(projectile);
        self.events.push(GameEvent::ProjectileDetonated {
            projectile,
            position,
        });
        self.events.push(GameEvent::Explosion {
            size: ExplosionSize::Small,
            position,
        });
        self.audio_events.push(AudioEvent::SmallExplosion);
    }

    /// Lose a life unless invincible or already eliminated.
    fn damage(&mut self, tag: EntityTag) {
        let invincibility = self.session.config.ship.invincibility_secs;
        let Some(mut craft) = self.session.registry.get_mut::<Craft>(tag) else {
            return;
        };
        if craft.invincibility_secs > 0.0 || craft.lives_remaining == 0 {
            return;
        }
        craft.lives_remaining -= 1;
        craft.invincibility_secs = invincibility;
        let (slot, lives_remaining) = (craft.slot, craft.lives_remaining);
        drop(craft);

        debug!("craft {tag} ({slot:?}) hit, {lives_remaining} lives left");
        self.events.push(GameEvent::CraftDamaged {
            craft: tag,
            slot,
            lives_remaining,
        });
        self.audio_events.push(AudioEvent::Crash);
        if lives_remaining == 0 {
            self.events.push(GameEvent::CraftEliminated { craft: tag, slot });
        }
    }

    fn collect(&mut self, craft: EntityTag, pickup: EntityTag) {
        let boost = self.session.config.missile.heat_seek_boost;
        let Some(kind) = self.session.registry.get::<Pickup>(pickup).map(|p| p.kind) else {
            return;
        };
        if !self.session.registry.mark_for_destroy(pickup) {
            return;
        }
        if self.session.pickup == Some(pickup) {
            self.session.pickup = None;
        }
        if let Some(mut c) = self.session.registry.get_mut::<Craft>(craft) {
            match kind {
                PickupKind::RadarReveal => c.has_radar = true,
                PickupKind::HeatSeekBoost => c.heat_seek_strength += boost,
            }
        }
        debug!("craft {craft} collected {kind:?}");
        self.events.push(GameEvent::PickupCollected {
            pickup,
            craft,
            kind,
        });
        self.audio_events.push(AudioEvent::PickupCollected);
    }

    /// Destroy an asteroid, queue its fragments and score it.
    fn shatter(&mut self, asteroid: EntityTag) {
        let Some(size) = self.session.registry.get::<Asteroid>(asteroid).map(|a| a.size) else {
            return;
        };
        let Some(body) = self
            .session
            .registry
            .body(asteroid)
            .and_then(|h| self.physics.body(h))
        else {
            return;
        };
        let (position, linear, angular) =
            (body.position, body.linear_velocity, body.angular_velocity);
        if !self.session.registry.mark_for_destroy(asteroid) {
            return;
        }

        let children = fragmentation::fragment(size, linear, angular);
        for spec in &children {
            world_setup::spawn_fragment(
                &mut self.session.registry,
                &self.session.config,
                self.rng,
                spec,
                position,
            );
        }
        self.session.score += 1;
        debug!(
            "asteroid {asteroid} ({size:?}) shattered into {} pieces, score {}",
            children.len(),
            self.session.score
        );
        self.events.push(GameEvent::AsteroidFragmented {
            asteroid,
            size,
            children: children.len() as u32,
        });
        self.events.push(GameEvent::Explosion {
            size: ExplosionSize::Large,
            position,
        });
        self.audio_events.push(AudioEvent::LargeExplosion);
    }
}
