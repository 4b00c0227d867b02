//! Error taxonomy for the simulation core.

use thiserror::Error;

use crate::types::EntityTag;

/// Errors surfaced by the orchestration core.
#[derive(Debug, Error)]
pub enum SimError {
    /// An effect targeted an entity that is no longer live. Recovered
    /// locally as a no-op.
    #[error("stale reference to entity {0}")]
    StaleReference(EntityTag),

    /// Spawn placement ran out of attempts.
    #[error("placement exhausted after {attempts} attempts (clearance {clearance})")]
    PlacementExhausted { attempts: u32, clearance: f64 },

    /// A structural invariant does not hold. Indicates a bug.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
