//! Havoc Enemies - Archetypes, Attacks, Lifecycle and Roster
//!
//! Ties the AI and combat crates together into a single deterministic
//! simulation of every enemy and projectile in a level.
//!
//! # Features
//!
//! - Four archetypes (grunt, enforcer, heavy, boss) with JSON stat overrides
//! - Hitscan and projectile primary attacks, heavy fan and boss specials
//! - One-time death sequence with loot roll and grace-delayed removal
//! - Splash damage with friendly-fire and self-damage scaling
//! - Seedable roster tick for reproducible encounters
//!
//! # Example
//!
//! ```ignore
//! use havoc_enemies::prelude::*;
//!
//! let mut roster = Roster::with_seed(7).with_config(CombatConfig::load("havoc.json")?);
//! let grunt = roster.spawn("grunt", Vec3::new(0.0, 0.0, 12.0))?;
//!
//! // Once per frame
//! let report = roster.tick(dt, player_position, &world, &mut host);
//! if report.level_completed {
//!     // load the next level
//! }
//! ```

pub mod archetype;
pub mod attack;
pub mod config;
pub mod enemy;
pub mod error;
pub mod lifecycle;
pub mod roster;

pub mod prelude {
    pub use crate::archetype::{Archetype, ArchetypeId, ArchetypeTable, AttackMode};
    pub use crate::attack::{resolve_hitscan, resolve_primary, resolve_special, Shooter};
    pub use crate::config::CombatConfig;
    pub use crate::enemy::EnemyInstance;
    pub use crate::error::RosterError;
    pub use crate::lifecycle::{DamageOutcome, KillReport};
    pub use crate::roster::{Roster, RosterStats, TickReport};
    pub use glam::Vec3;
}

pub use prelude::*;
