//! The physics collaborator interface.

use trashdroids_core::types::{BodyHandle, EntityTag};

use crate::body::{BodyDesc, BodyState, ContactEvent};

/// A rigid-body world the orchestration core can drive.
///
/// `step` is blocking and returns the first-contact events of that step.
/// Implementations must never report a pair that was already touching on
/// the previous step.
pub trait PhysicsWorld {
    /// Create a body that reports contacts under `tag`.
    fn add_body(&mut self, tag: EntityTag, desc: &BodyDesc) -> BodyHandle;

    /// Returns `false` if the handle was unknown.
    fn remove_body(&mut self, handle: BodyHandle) -> bool;

    fn step(&mut self, dt: f64) -> Vec<ContactEvent>;

    fn body(&self, handle: BodyHandle) -> Option<&BodyState>;

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut BodyState>;

    fn body_count(&self) -> usize;

    fn contains(&self, handle: BodyHandle) -> bool {
        self.body(handle).is_some()
    }
}
