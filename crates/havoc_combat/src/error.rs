//! Error types for the combat crate

use thiserror::Error;

/// Combat configuration errors
#[derive(Debug, Error)]
pub enum CombatError {
    /// A drop identifier that is not `health`, `armor`, `ammo_<type>` or `weapon_<type>`
    #[error("Invalid drop identifier: {0:?}")]
    InvalidDrop(String),

    /// A weapon name not present in the arsenal
    #[error("Unknown weapon: {0}")]
    UnknownWeapon(String),
}

/// Result type for combat operations
pub type Result<T> = std::result::Result<T, CombatError>;
