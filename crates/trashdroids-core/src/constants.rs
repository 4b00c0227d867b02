//! Simulation constants and tuning defaults.
//!
//! These seed `MatchConfig::default()`. Systems read the session's config,
//! never these values directly, except for the fixed tick rate.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Universe ---

/// Radius of the universe shell in single player.
pub const UNIVERSE_RADIUS: f64 = 40.0;

/// Menu bounds for the universe radius.
pub const UNIVERSE_RADIUS_MIN: f64 = 40.0;
pub const UNIVERSE_RADIUS_MAX: f64 = 500.0;

/// Radius change per menu step.
pub const UNIVERSE_RADIUS_STEP: f64 = 5.0;

// --- Asteroids ---

/// Initial Large asteroids in single player.
pub const ASTEROIDS_NUM: u32 = 20;

/// Fraction of the total asteroid yield the player must destroy to win.
pub const ASTEROIDS_PCT_TO_DESTROY: f64 = 0.5;

/// Asteroids destroyed when a Large asteroid is fully cleared
/// (1 Large + 2 Medium + 4 Small).
pub const ASTEROID_YIELD_PER_LARGE: u32 = 7;

/// Menu bounds for the asteroid count.
pub const ASTEROIDS_NUM_MIN: u32 = 2;
pub const ASTEROIDS_NUM_MAX: u32 = 500;

/// Collider radius per size class. Mass equals radius.
pub const ASTEROID_RADIUS_SMALL: f64 = 1.0;
pub const ASTEROID_RADIUS_MEDIUM: f64 = 2.0;
pub const ASTEROID_RADIUS_LARGE: f64 = 4.0;

/// Per-axis bound of randomized asteroid spin (rad/s).
pub const ASTEROID_MAX_SPIN: f64 = 1.0;

/// Per-axis bound of randomized asteroid velocity.
pub const ASTEROID_MAX_SPEED: f64 = 18.0;

// --- Ship ---

pub const STARTING_LIVES: u32 = 3;

/// Damage immunity after a hit (seconds).
pub const INVINCIBILITY_SECS: f64 = 3.0;

/// Blink cycle while invincible. Hidden during the second half.
pub const BLINK_PERIOD_SECS: f64 = 0.25;

pub const SHIP_RADIUS: f64 = 0.8;
pub const SHIP_MASS: f64 = 10.0;

/// Thrust axis multiplier relative to strafe.
pub const SHIP_THRUST_MULTIPLIER: f64 = 5.0;

pub const SHIP_LINEAR_ACCEL: f64 = 3.0;
pub const SHIP_ANGULAR_ACCEL: f64 = 0.6;
pub const SHIP_LINEAR_DRAG: f64 = 0.97;
pub const SHIP_ANGULAR_DRAG: f64 = 0.97;
pub const SHIP_LINEAR_BRAKING: f64 = 0.95;
pub const SHIP_ANGULAR_BRAKING: f64 = 0.95;

/// Asteroid-free radius around the origin and around each craft.
pub const SPAWN_CLEARANCE: f64 = 25.0;

// --- Missiles ---

pub const MISSILES_PER_SEC: f64 = 0.5;

/// Fire-rate multiplier in stream mode.
pub const STREAM_RATE_MULTIPLIER: f64 = 3.0;

/// Missiles per shot in spread mode.
pub const SPREAD_COUNT: u32 = 10;

/// Forward speed floor.
pub const MISSILE_BASE_SPEED: f64 = 20.0;

/// Speed at launch.
pub const MISSILE_LAUNCH_SPEED: f64 = 200.0;

/// Linear damping (fraction of velocity lost per second).
pub const MISSILE_LINEAR_DAMPING: f64 = 0.8;

pub const MISSILE_HALF_LENGTH: f64 = 0.375;
pub const MISSILE_RADIUS: f64 = 0.05;
pub const MISSILE_MASS: f64 = 1.0;

/// Homing strength every craft starts with.
pub const HEAT_SEEK_INITIAL: f64 = 0.005;

/// Homing strength added by a HeatSeekBoost pickup.
pub const HEAT_SEEK_BOOST: f64 = 0.01;

// --- Pickups ---

/// Per-tick spawn probability while no pickup exists (versus only).
pub const PICKUP_SPAWN_CHANCE: f64 = 0.001;

pub const PICKUP_RADIUS: f64 = 1.0;
pub const PICKUP_MASS: f64 = 1.0;
pub const PICKUP_MAX_SPEED: f64 = 6.0;
pub const PICKUP_MAX_SPIN: f64 = 1.0;

// --- Placement ---

/// Half-extent of the sampling cube as a fraction of the universe radius.
pub const PLACEMENT_CUBE_FRACTION: f64 = 0.9;

/// Rejection-sampling attempts before giving up.
pub const PLACEMENT_MAX_ATTEMPTS: u32 = 10_000;

/// Times setup halves the clearance before aborting the match.
pub const PLACEMENT_RELAX_STEPS: u32 = 3;

// --- Versus preset ---

pub const VERSUS_UNIVERSE_RADIUS: f64 = 75.0;
pub const VERSUS_ASTEROIDS_NUM: u32 = 150;

// --- Timing ---

/// Intro length before it advances to the menu on its own.
pub const INTRO_SECS: f64 = 10.0;
