//! Match configuration.
//!
//! One immutable `MatchConfig` is cloned into each match session at start.
//! The menu edits a pending copy held by the engine; a running match never
//! sees those edits.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    pub radius: f64,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            radius: UNIVERSE_RADIUS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidConfig {
    /// Large asteroids in the initial population.
    pub count: u32,
    /// Fraction of the total yield needed to win single player.
    pub pct_to_destroy: f64,
    /// Asteroids drift and tumble. Static bodies otherwise.
    pub moveable: bool,
    /// Projectiles break asteroids apart.
    pub destructible: bool,
    pub max_spin: f64,
    pub max_speed: f64,
}

impl Default for AsteroidConfig {
    fn default() -> Self {
        Self {
            count: ASTEROIDS_NUM,
            pct_to_destroy: ASTEROIDS_PCT_TO_DESTROY,
            moveable: true,
            destructible: true,
            max_spin: ASTEROID_MAX_SPIN,
            max_speed: ASTEROID_MAX_SPEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    pub starting_lives: u32,
    pub invincibility_secs: f64,
    pub blink_period_secs: f64,
    pub radius: f64,
    pub mass: f64,
    pub thrust_multiplier: f64,
    pub linear_accel: f64,
    pub angular_accel: f64,
    pub linear_drag: f64,
    pub angular_drag: f64,
    pub linear_braking: f64,
    pub angular_braking: f64,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            starting_lives: STARTING_LIVES,
            invincibility_secs: INVINCIBILITY_SECS,
            blink_period_secs: BLINK_PERIOD_SECS,
            radius: SHIP_RADIUS,
            mass: SHIP_MASS,
            thrust_multiplier: SHIP_THRUST_MULTIPLIER,
            linear_accel: SHIP_LINEAR_ACCEL,
            angular_accel: SHIP_ANGULAR_ACCEL,
            linear_drag: SHIP_LINEAR_DRAG,
            angular_drag: SHIP_ANGULAR_DRAG,
            linear_braking: SHIP_LINEAR_BRAKING,
            angular_braking: SHIP_ANGULAR_BRAKING,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissileConfig {
    pub missiles_per_sec: f64,
    /// Triple fire rate.
    pub stream_mode: bool,
    /// Fire `spread_count` missiles per shot.
    pub spread_mode: bool,
    pub spread_count: u32,
    pub base_speed: f64,
    pub launch_speed: f64,
    pub linear_damping: f64,
    pub half_length: f64,
    pub radius: f64,
    pub mass: f64,
    pub initial_heat_seek: f64,
    pub heat_seek_boost: f64,
}

impl Default for MissileConfig {
    fn default() -> Self {
        Self {
            missiles_per_sec: MISSILES_PER_SEC,
            stream_mode: false,
            spread_mode: false,
            spread_count: SPREAD_COUNT,
            base_speed: MISSILE_BASE_SPEED,
            launch_speed: MISSILE_LAUNCH_SPEED,
            linear_damping: MISSILE_LINEAR_DAMPING,
            half_length: MISSILE_HALF_LENGTH,
            radius: MISSILE_RADIUS,
            mass: MISSILE_MASS,
            initial_heat_seek: HEAT_SEEK_INITIAL,
            heat_seek_boost: HEAT_SEEK_BOOST,
        }
    }
}

impl MissileConfig {
    /// Minimum seconds between shots.
    pub fn fire_interval_secs(&self) -> f64 {
        let multiplier = if self.stream_mode {
            STREAM_RATE_MULTIPLIER
        } else {
            1.0
        };
        1.0 / (self.missiles_per_sec * multiplier)
    }

    /// Missiles launched per trigger pull.
    pub fn missiles_per_shot(&self) -> u32 {
        if self.spread_mode {
            self.spread_count.max(1)
        } else {
            1
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    pub spawn_chance: f64,
    pub radius: f64,
    pub mass: f64,
    pub max_speed: f64,
    pub max_spin: f64,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            spawn_chance: PICKUP_SPAWN_CHANCE,
            radius: PICKUP_RADIUS,
            mass: PICKUP_MASS,
            max_speed: PICKUP_MAX_SPEED,
            max_spin: PICKUP_MAX_SPIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Minimum distance from the origin and from every exclusion center.
    pub clearance: f64,
    /// Sampling cube half-extent as a fraction of the universe radius.
    pub cube_fraction: f64,
    pub max_attempts: u32,
    pub relax_steps: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            clearance: SPAWN_CLEARANCE,
            cube_fraction: PLACEMENT_CUBE_FRACTION,
            max_attempts: PLACEMENT_MAX_ATTEMPTS,
            relax_steps: PLACEMENT_RELAX_STEPS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub tick_rate: u32,
    pub intro_secs: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            intro_secs: INTRO_SECS,
        }
    }
}

impl TimingConfig {
    pub fn dt(&self) -> f64 {
        1.0 / self.tick_rate as f64
    }
}

/// Every tunable of a match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub universe: UniverseConfig,
    pub asteroids: AsteroidConfig,
    pub ship: ShipConfig,
    pub missile: MissileConfig,
    pub pickup: PickupConfig,
    pub placement: PlacementConfig,
    pub timing: TimingConfig,
}

impl MatchConfig {
    /// Parameters the multiplayer menu starts from: a larger universe packed
    /// with static, indestructible asteroids and stream fire.
    pub fn versus_preset() -> Self {
        let mut config = Self::default();
        config.universe.radius = VERSUS_UNIVERSE_RADIUS;
        config.asteroids.count = VERSUS_ASTEROIDS_NUM;
        config.asteroids.moveable = false;
        config.asteroids.destructible = false;
        config.missile.stream_mode = true;
        config
    }

    /// Parse from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.universe.radius.is_finite() || self.universe.radius <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "universe.radius must be positive, got {}",
                self.universe.radius
            )));
        }
        if self.asteroids.count == 0 || self.asteroids.count > ASTEROIDS_NUM_MAX {
            return Err(ConfigError::Invalid(format!(
                "asteroids.count must be within [1, {ASTEROIDS_NUM_MAX}], got {}",
                self.asteroids.count
            )));
        }
        if !(0.0..=1.0).contains(&self.asteroids.pct_to_destroy) {
            return Err(ConfigError::Invalid(format!(
                "asteroids.pct_to_destroy must be within [0, 1], got {}",
                self.asteroids.pct_to_destroy
            )));
        }
        if !(0.0..=1.0).contains(&self.pickup.spawn_chance) {
            return Err(ConfigError::Invalid(format!(
                "pickup.spawn_chance must be within [0, 1], got {}",
                self.pickup.spawn_chance
            )));
        }
        if self.placement.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "placement.max_attempts must be at least 1".into(),
            ));
        }
        if !self.missile.missiles_per_sec.is_finite() || self.missile.missiles_per_sec <= 0.0 {
            return Err(ConfigError::Invalid(
                "missile.missiles_per_sec must be positive".into(),
            ));
        }
        if self.timing.tick_rate == 0 {
            return Err(ConfigError::Invalid("timing.tick_rate must be at least 1".into()));
        }
        Ok(())
    }
}
