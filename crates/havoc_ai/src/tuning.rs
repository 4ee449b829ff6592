//! AI tuning constants

use serde::{Deserialize, Serialize};

/// Distances and timers shared by every behavior kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Patrol points are picked within this radius of the current position
    pub patrol_radius: f32,
    /// A patrol target closer than this counts as reached
    pub arrive_threshold: f32,
    /// Facing only updates when the horizontal distance exceeds this
    pub facing_epsilon: f32,
    /// Fraction of the engagement range inside which enemies stop and shoot
    pub attack_band: f32,
    /// Base enemies back away when closer than this
    pub backup_distance: f32,
    /// Minimum time between heavy fan specials
    pub heavy_special_interval_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            patrol_radius: 10.0,
            arrive_threshold: 1.0,
            facing_epsilon: 0.1,
            attack_band: 0.7,
            backup_distance: 5.0,
            heavy_special_interval_ms: 5000,
        }
    }
}
