//! Fragmentation Policy.
//!
//! Large breaks into two Medium that keep the parent's linear velocity but
//! get fresh spin. Medium breaks into two Small that keep both linear and
//! angular velocity. Small is terminal.

use glam::DVec3;

use trashdroids_core::enums::AsteroidSize;

/// Children produced per fragmentation.
pub const FRAGMENT_COUNT: usize = 2;

/// One child asteroid to spawn at the parent's position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentSpec {
    pub size: AsteroidSize,
    pub linear_velocity: DVec3,
    /// `None` means the child gets a randomized spin at construction.
    pub angular_velocity: Option<DVec3>,
}

pub fn fragment(
    size: AsteroidSize,
    linear_velocity: DVec3,
    angular_velocity: DVec3,
) -> Vec<FragmentSpec> {
    let (child, inherited_spin) = match size {
        AsteroidSize::Large => (AsteroidSize::Medium, None),
        AsteroidSize::Medium => (AsteroidSize::Small, Some(angular_velocity)),
        AsteroidSize::Small => return Vec::new(),
    };
    vec![
        FragmentSpec {
            size: child,
            linear_velocity,
            angular_velocity: inherited_spin,
        };
        FRAGMENT_COUNT
    ]
}
