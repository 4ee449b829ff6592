//! Combat configuration

use crate::error::Result;
use havoc_ai::Tuning;
use havoc_combat::BlastScaling;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Distances, timers and scales used when resolving combat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Dead enemies stay this long before removal
    pub grace_delay_ms: u64,
    /// Shots start this far above the enemy's position
    pub muzzle_height: f32,
    /// Enemy hitscan reach
    pub hitscan_range: f32,
    /// Enemy projectiles retire after travelling this far
    pub projectile_max_travel: f32,
    /// Player projectiles retire after this long
    pub player_projectile_lifetime_ms: u64,
    /// Loot is placed at this height
    pub drop_height: f32,
    pub nova_radius: f32,
    /// Nova damage as a multiple of the boss's damage stat
    pub nova_damage_factor: f32,
    pub blast: BlastScaling,
    pub ai: Tuning,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            grace_delay_ms: 1000,
            muzzle_height: 1.5,
            hitscan_range: 100.0,
            projectile_max_travel: 100.0,
            player_projectile_lifetime_ms: 5000,
            drop_height: 0.5,
            nova_radius: 15.0,
            nova_damage_factor: 2.0,
            blast: BlastScaling::default(),
            ai: Tuning::default(),
        }
    }
}

impl CombatConfig {
    /// Parse from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serialize to pretty JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
