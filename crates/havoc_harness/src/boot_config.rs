//! Harness configuration
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables: `HAVOC_CONFIG`, `HAVOC_ARCHETYPES`, `HAVOC_SEED`,
//!    `HAVOC_FRAMES`
//! 2. Defaults
//!
//! `HAVOC_CONFIG` names a JSON file with [`CombatConfig`] fields, e.g.
//!
//! ```json
//! { "grace_delay_ms": 1500, "blast": { "friendly_fire": 0.25 } }
//! ```
//!
//! `HAVOC_ARCHETYPES` names a JSON file of archetype stat overrides.

use havoc_enemies::{ArchetypeTable, CombatConfig};
use serde::{Deserialize, Serialize};

/// Everything the harness needs before the first frame
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub combat: CombatConfig,
    pub archetypes: ArchetypeTable,
    pub run: RunSettings,
    /// Where `combat` came from, if not defaults
    pub config_path: Option<String>,
    pub archetypes_path: Option<String>,
}

/// Length and determinism of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    pub seed: u64,
    /// Frames to simulate before giving up
    pub max_frames: u32,
    /// Seconds per frame
    pub frame_time: f32,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            seed: 1,
            max_frames: 60 * 120,
            frame_time: 1.0 / 60.0,
        }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            archetypes: ArchetypeTable::standard(),
            run: RunSettings::default(),
            config_path: None,
            archetypes_path: None,
        }
    }
}

impl HarnessConfig {
    /// Build from the environment. Unreadable files are logged and skipped.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("HAVOC_CONFIG") {
            match CombatConfig::load(&path) {
                Ok(combat) => {
                    log::info!("Loaded combat config from {}", path);
                    config.combat = combat;
                    config.config_path = Some(path);
                }
                Err(e) => log::warn!("Ignoring combat config {}: {}", path, e),
            }
        }

        if let Ok(path) = std::env::var("HAVOC_ARCHETYPES") {
            match ArchetypeTable::load(&path) {
                Ok(table) => {
                    log::info!("Loaded archetype overrides from {}", path);
                    config.archetypes = table;
                    config.archetypes_path = Some(path);
                }
                Err(e) => log::warn!("Ignoring archetype overrides {}: {}", path, e),
            }
        }

        if let Ok(seed) = std::env::var("HAVOC_SEED") {
            match seed.parse() {
                Ok(seed) => config.run.seed = seed,
                Err(_) => log::warn!("HAVOC_SEED is not a number: {:?}", seed),
            }
        }

        if let Ok(frames) = std::env::var("HAVOC_FRAMES") {
            match frames.parse() {
                Ok(frames) => config.run.max_frames = frames,
                Err(_) => log::warn!("HAVOC_FRAMES is not a number: {:?}", frames),
            }
        }

        config
    }

    pub fn print_summary(&self) {
        log::info!("=== Havoc Harness ===");
        log::info!(
            "Combat config: {}",
            self.config_path.as_deref().unwrap_or("defaults")
        );
        log::info!(
            "Archetypes:    {}",
            self.archetypes_path.as_deref().unwrap_or("shipped")
        );
        log::info!("Seed:          {}", self.run.seed);
        log::info!(
            "Frames:        {} x {:.4}s",
            self.run.max_frames,
            self.run.frame_time
        );
        for archetype in self.archetypes.iter() {
            log::debug!(
                "  {:<8} hp {:>6.0} speed {:>4.1} dmg {:>4.0} rate {:>4.2} range {:>4.0} drop {:.0}%",
                archetype.name,
                archetype.health,
                archetype.speed,
                archetype.damage,
                archetype.fire_rate,
                archetype.range,
                archetype.loot.drop_chance * 100.0
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.run.seed, 1);
        assert!(config.config_path.is_none());
        assert_eq!(config.combat, CombatConfig::default());
    }

    #[test]
    fn test_run_settings_from_json() {
        let run: RunSettings = serde_json::from_str(r#"{"max_frames": 10}"#).unwrap();
        assert_eq!(run.max_frames, 10);
        assert_eq!(run.seed, 1);
    }
}
