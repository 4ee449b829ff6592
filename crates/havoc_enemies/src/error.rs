//! Error types for the enemy roster

use havoc_combat::CombatError;
use thiserror::Error;

/// Roster and configuration errors
#[derive(Debug, Error)]
pub enum RosterError {
    /// Spawn or table entry named an archetype that does not exist
    #[error("Unknown archetype: {0:?}")]
    UnknownArchetype(String),

    /// A stat outside its valid range
    #[error("Invalid value for {archetype}.{field}: {value}")]
    InvalidStat {
        archetype: String,
        field: &'static str,
        value: f32,
    },

    /// Bad drop entry
    #[error(transparent)]
    Combat(#[from] CombatError),

    /// Malformed JSON
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// Config file could not be read
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for roster operations
pub type Result<T> = std::result::Result<T, RosterError>;
