//! Body descriptors, body state and contact events.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};
use trashdroids_core::types::EntityTag;

/// Collider shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Sphere { radius: f64 },
    /// Capsule along the body's local up axis.
    Capsule { half_length: f64, radius: f64 },
    /// Inside of a sphere. Dynamic bodies are kept within it.
    Shell { radius: f64 },
}

impl Shape {
    /// Radius of the sphere that encloses the collider.
    pub fn bounding_radius(&self) -> f64 {
        match *self {
            Shape::Sphere { radius } | Shape::Shell { radius } => radius,
            Shape::Capsule {
                half_length,
                radius,
            } => half_length + radius,
        }
    }
}

/// Everything needed to create a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub shape: Shape,
    pub position: DVec3,
    pub orientation: DQuat,
    pub linear_velocity: DVec3,
    pub angular_velocity: DVec3,
    /// `None` for static bodies, which never move.
    pub mass: Option<f64>,
    /// Fraction of linear velocity lost per second.
    pub linear_damping: f64,
}

impl BodyDesc {
    /// A motionless body at `position`.
    pub fn new(shape: Shape, position: DVec3, mass: Option<f64>) -> Self {
        Self {
            shape,
            position,
            orientation: DQuat::IDENTITY,
            linear_velocity: DVec3::ZERO,
            angular_velocity: DVec3::ZERO,
            mass,
            linear_damping: 0.0,
        }
    }

    pub fn with_orientation(mut self, orientation: DQuat) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_velocity(mut self, linear: DVec3, angular: DVec3) -> Self {
        self.linear_velocity = linear;
        self.angular_velocity = angular;
        self
    }

    pub fn with_linear_damping(mut self, damping: f64) -> Self {
        self.linear_damping = damping;
        self
    }
}

/// Live state of a body. Local frame: forward is -Z, up is +Y, right is +X.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
    pub tag: EntityTag,
    pub shape: Shape,
    pub position: DVec3,
    pub orientation: DQuat,
    pub linear_velocity: DVec3,
    pub angular_velocity: DVec3,
    pub mass: Option<f64>,
    pub linear_damping: f64,
}

impl BodyState {
    pub fn from_desc(tag: EntityTag, desc: &BodyDesc) -> Self {
        Self {
            tag,
            shape: desc.shape,
            position: desc.position,
            orientation: desc.orientation,
            linear_velocity: desc.linear_velocity,
            angular_velocity: desc.angular_velocity,
            mass: desc.mass,
            linear_damping: desc.linear_damping,
        }
    }

    pub fn is_static(&self) -> bool {
        self.mass.is_none()
    }

    pub fn forward(&self) -> DVec3 {
        self.orientation * DVec3::NEG_Z
    }

    pub fn up(&self) -> DVec3 {
        self.orientation * DVec3::Y
    }

    pub fn right(&self) -> DVec3 {
        self.orientation * DVec3::X
    }

    /// A world-space point expressed in this body's local frame.
    pub fn to_local(&self, world_point: DVec3) -> DVec3 {
        self.orientation.inverse() * (world_point - self.position)
    }

    pub fn linear_momentum(&self) -> DVec3 {
        self.mass.map_or(DVec3::ZERO, |m| self.linear_velocity * m)
    }

    /// Ignored for static bodies.
    pub fn set_linear_momentum(&mut self, momentum: DVec3) {
        if let Some(m) = self.mass {
            self.linear_velocity = momentum / m;
        }
    }

    /// Scalar moment of inertia derived from shape and mass. `None` for
    /// static bodies.
    pub fn moment_of_inertia(&self) -> Option<f64> {
        let m = self.mass?;
        let inertia = match self.shape {
            Shape::Sphere { radius } => 0.4 * m * radius * radius,
            Shape::Capsule {
                half_length,
                radius,
            } => {
                let length = 2.0 * half_length;
                m * (3.0 * radius * radius + length * length) / 12.0
            }
            Shape::Shell { radius } => 2.0 / 3.0 * m * radius * radius,
        };
        Some(inertia.max(f64::EPSILON))
    }

    pub fn angular_momentum(&self) -> DVec3 {
        self.moment_of_inertia()
            .map_or(DVec3::ZERO, |i| self.angular_velocity * i)
    }

    /// Ignored for static bodies.
    pub fn set_angular_momentum(&mut self, momentum: DVec3) {
        if let Some(i) = self.moment_of_inertia() {
            self.angular_velocity = momentum / i;
        }
    }
}

/// Two bodies started touching this step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContactEvent {
    pub a: EntityTag,
    pub b: EntityTag,
}
