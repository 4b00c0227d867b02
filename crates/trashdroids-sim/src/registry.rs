//! Entity Registry: owns every gameplay entity of a match session.
//!
//! Creation and destruction are deferred. `create` and `mark_for_destroy`
//! only queue work; `flush_pending` applies it in one step, attaching or
//! detaching the physics body of each entity as it goes. Between flushes
//! the set of live entities is stable, so systems can iterate it and queue
//! changes without invalidating the iteration.

use std::collections::{BTreeMap, BTreeSet};

use hecs::{Component, Entity, World};
use log::{debug, error};

use trashdroids_core::components::*;
use trashdroids_core::enums::EntityKind;
use trashdroids_core::error::SimError;
use trashdroids_core::types::{BodyHandle, EntityTag};
use trashdroids_physics::{BodyDesc, PhysicsWorld};

/// Everything needed to bring an entity to life at the next flush.
#[derive(Debug, Clone)]
pub enum EntitySpawn {
    Craft { craft: Craft, body: BodyDesc },
    Projectile { projectile: Projectile, body: BodyDesc },
    Asteroid { asteroid: Asteroid, body: BodyDesc },
    Pickup { pickup: Pickup, body: BodyDesc },
    Boundary { body: BodyDesc },
}

impl EntitySpawn {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntitySpawn::Craft { .. } => EntityKind::Craft,
            EntitySpawn::Projectile { .. } => EntityKind::Projectile,
            EntitySpawn::Asteroid { .. } => EntityKind::Asteroid,
            EntitySpawn::Pickup { .. } => EntityKind::Pickup,
            EntitySpawn::Boundary { .. } => EntityKind::StaticBoundary,
        }
    }

    pub fn body_desc(&self) -> &BodyDesc {
        match self {
            EntitySpawn::Craft { body, .. }
            | EntitySpawn::Projectile { body, .. }
            | EntitySpawn::Asteroid { body, .. }
            | EntitySpawn::Pickup { body, .. }
            | EntitySpawn::Boundary { body } => body,
        }
    }
}

/// Which entities `iter` and `count` visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindFilter {
    All,
    Only(EntityKind),
}

impl KindFilter {
    fn matches(self, kind: EntityKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Only(k) => k == kind,
        }
    }
}

impl From<EntityKind> for KindFilter {
    fn from(kind: EntityKind) -> Self {
        KindFilter::Only(kind)
    }
}

/// What a flush did, in application order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub destroyed: Vec<(EntityTag, EntityKind)>,
    pub created: Vec<(EntityTag, EntityKind)>,
}

impl FlushReport {
    pub fn is_empty(&self) -> bool {
        self.destroyed.is_empty() && self.created.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    entity: Entity,
    kind: EntityKind,
}

/// Tag-addressed entity storage backed by a hecs world.
pub struct EntityRegistry {
    world: World,
    slots: BTreeMap<EntityTag, Slot>,
    pending_create: Vec<(EntityTag, EntitySpawn)>,
    pending_destroy: BTreeSet<EntityTag>,
    next_tag: u64,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            slots: BTreeMap::new(),
            pending_create: Vec::new(),
            pending_destroy: BTreeSet::new(),
            next_tag: 1,
        }
    }

    /// Queue an entity for creation. The tag is reserved immediately and
    /// becomes live at the next flush.
    pub fn create(&mut self, spawn: EntitySpawn) -> EntityTag {
        let tag = EntityTag(self.next_tag);
        self.next_tag += 1;
        self.pending_create.push((tag, spawn));
        tag
    }

    /// Queue an entity for destruction. Cancels a pending creation of the
    /// same tag. Returns `false` for unknown or already-marked tags.
    pub fn mark_for_destroy(&mut self, tag: EntityTag) -> bool {
        if self.slots.contains_key(&tag) {
            return self.pending_destroy.insert(tag);
        }
        let before = self.pending_create.len();
        self.pending_create.retain(|(t, _)| *t != tag);
        before != self.pending_create.len()
    }

    /// Live and not marked for destruction.
    pub fn is_live(&self, tag: EntityTag) -> bool {
        self.slots.contains_key(&tag) && !self.pending_destroy.contains(&tag)
    }

    /// Resolve a weak reference, failing with `StaleReference` if the
    /// entity is gone or going.
    pub fn resolve(&self, tag: EntityTag) -> Result<EntityKind, SimError> {
        match self.slots.get(&tag) {
            Some(slot) if !self.pending_destroy.contains(&tag) => Ok(slot.kind),
            _ => Err(SimError::StaleReference(tag)),
        }
    }

    /// Kind of a live entity.
    pub fn kind(&self, tag: EntityTag) -> Option<EntityKind> {
        self.resolve(tag).ok()
    }

    /// Lazy sequence over live entities in tag order. Pending creations and
    /// entities marked for destruction are skipped. Call again to restart.
    pub fn iter(&self, filter: impl Into<KindFilter>) -> impl Iterator<Item = EntityTag> + '_ {
        let filter = filter.into();
        self.slots
            .iter()
            .filter(move |(tag, slot)| {
                filter.matches(slot.kind) && !self.pending_destroy.contains(*tag)
            })
            .map(|(tag, _)| *tag)
    }

    pub fn count(&self, filter: impl Into<KindFilter>) -> usize {
        self.iter(filter).count()
    }

    /// Creations queued for the next flush.
    pub fn pending_creates(&self, filter: impl Into<KindFilter>) -> usize {
        let filter = filter.into();
        self.pending_create
            .iter()
            .filter(|(_, spawn)| filter.matches(spawn.kind()))
            .count()
    }

    /// Entities in storage, including ones marked for destruction.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending_create.is_empty() || !self.pending_destroy.is_empty()
    }

    /// Component of an entity still in storage (live or marked).
    pub fn get<T: Component>(&self, tag: EntityTag) -> Option<hecs::Ref<'_, T>> {
        let slot = self.slots.get(&tag)?;
        self.world.get::<&T>(slot.entity).ok()
    }

    pub fn get_mut<T: Component>(&mut self, tag: EntityTag) -> Option<hecs::RefMut<'_, T>> {
        let slot = self.slots.get(&tag)?;
        self.world.get::<&mut T>(slot.entity).ok()
    }

    /// Physics handle backing an entity.
    pub fn body(&self, tag: EntityTag) -> Option<BodyHandle> {
        self.get::<Body>(tag).map(|b| b.0)
    }

    /// Apply every queued destruction, then every queued creation.
    ///
    /// Destruction detaches the body from `physics` in the same step, so no
    /// body outlives its entity.
    pub fn flush_pending(&mut self, physics: &mut dyn PhysicsWorld) -> FlushReport {
        let mut report = FlushReport::default();

        for tag in std::mem::take(&mut self.pending_destroy) {
            if let Some(slot) = self.slots.remove(&tag) {
                self.on_destroy(tag, slot, physics);
                report.destroyed.push((tag, slot.kind));
            }
        }

        for (tag, spawn) in std::mem::take(&mut self.pending_create) {
            let kind = spawn.kind();
            self.on_create(tag, spawn, physics);
            report.created.push((tag, kind));
        }

        if !report.is_empty() {
            debug!(
                "registry flush: {} destroyed, {} created, {} live",
                report.destroyed.len(),
                report.created.len(),
                self.slots.len()
            );
        }
        report
    }

    /// Destroy everything, pending work included. Tags keep counting up.
    pub fn clear(&mut self, physics: &mut dyn PhysicsWorld) {
        self.pending_create.clear();
        self.pending_destroy.clear();
        for (tag, slot) in std::mem::take(&mut self.slots) {
            self.on_destroy(tag, slot, physics);
        }
        self.world.clear();
    }

    /// Every live entity has exactly one body, and that body reports the
    /// entity's tag.
    pub fn check_bodies(&self, physics: &dyn PhysicsWorld) -> Result<(), SimError> {
        for (tag, slot) in &self.slots {
            let handle = self
                .world
                .get::<&Body>(slot.entity)
                .map(|b| b.0)
                .map_err(|_| SimError::InvariantViolation(format!("entity {tag} has no body")))?;
            match physics.body(handle) {
                Some(body) if body.tag == *tag => {}
                Some(body) => {
                    return Err(SimError::InvariantViolation(format!(
                        "entity {tag} is backed by a body tagged {}",
                        body.tag
                    )))
                }
                None => {
                    return Err(SimError::InvariantViolation(format!(
                        "entity {tag} points at a missing body"
                    )))
                }
            }
        }
        Ok(())
    }

    fn on_destroy(&mut self, tag: EntityTag, slot: Slot, physics: &mut dyn PhysicsWorld) {
        if let Ok(body) = self.world.get::<&Body>(slot.entity).map(|b| b.0) {
            if !physics.remove_body(body) {
                error!("entity {tag} had no physics body to remove");
            }
        }
        let _ = self.world.despawn(slot.entity);
    }

    fn on_create(&mut self, tag: EntityTag, spawn: EntitySpawn, physics: &mut dyn PhysicsWorld) {
        let kind = spawn.kind();
        let body = Body(physics.add_body(tag, spawn.body_desc()));
        let entity = match spawn {
            EntitySpawn::Craft { craft, .. } => self.world.spawn((tag, body, craft)),
            EntitySpawn::Projectile { projectile, .. } => self.world.spawn((tag, body, projectile)),
            EntitySpawn::Asteroid { asteroid, .. } => self.world.spawn((tag, body, asteroid)),
            EntitySpawn::Pickup { pickup, .. } => self.world.spawn((tag, body, pickup)),
            EntitySpawn::Boundary { .. } => self.world.spawn((tag, body, StaticBoundary)),
        };
        self.slots.insert(tag, Slot { entity, kind });
    }
}
