//! Physics World seam for the Trashdroids simulation.
//!
//! The orchestration core only talks to physics through [`PhysicsWorld`]:
//! add and remove bodies, advance one fixed step, and read or write body
//! state. [`SphereWorld`] is a small reference backend that approximates
//! every collider by a sphere. It is what the engine runs on by default.

pub mod body;
pub mod sphere_world;
pub mod world;

pub use body::{BodyDesc, BodyState, ContactEvent, Shape};
pub use sphere_world::SphereWorld;
pub use world::PhysicsWorld;
