//! Per-tick systems of a running match.
//!
//! Systems are free functions over the match session and the physics world.
//! They read the registry's live set, collect what must change, then apply
//! it, queuing creations and destructions for the next flush.

pub mod collision_effects;
pub mod craft_control;
pub mod homing;
pub mod pickup;
pub mod snapshot;
