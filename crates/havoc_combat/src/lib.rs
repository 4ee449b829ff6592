//! Havoc Combat - Vitals, Damage, Projectiles and Loot
//!
//! The building blocks shared by enemy attacks and the player's weapons.
//!
//! # Features
//!
//! - Vitals with clamped health and an irreversible alive flag
//! - Straight-line projectiles with swept collision and single resolution
//! - Linear explosion falloff with friendly-fire and self-damage scaling
//! - Uniform loot tables over `health`/`armor`/`ammo_*`/`weapon_*` entries
//! - Host hooks for player damage, effects, sounds and item placement
//! - The player arsenal (seven weapons, ammo, switching, spread)
//!
//! # Example
//!
//! ```ignore
//! use havoc_combat::prelude::*;
//!
//! let mut vitals = Vitals::new(50.0);
//! let result = vitals.apply_damage(&DamageInfo::direct(60.0));
//! assert!(result.died);
//!
//! let table = LootTable::parse(0.5, &["health", "ammo_shells"])?;
//! let drop = table.roll(position, &mut rng);
//! ```

pub mod arsenal;
pub mod damage;
pub mod error;
pub mod explosion;
pub mod health;
pub mod hooks;
pub mod loot;
pub mod projectile;

pub mod prelude {
    pub use crate::arsenal::{scatter, Arsenal, HitscanRay, Volley, WeaponKind, WeaponSlot, WeaponSpec};
    pub use crate::damage::DamageInfo;
    pub use crate::error::CombatError;
    pub use crate::explosion::{falloff, Blast, BlastScaling};
    pub use crate::health::{DamageResult, Vitals};
    pub use crate::hooks::{CombatHost, Effect, EventLog, HostEvent, ImpactKind, NullHost, Sound};
    pub use crate::loot::{DropKind, LootDrop, LootTable, Pickup};
    pub use crate::projectile::{Allegiance, Projectile, ProjectileSpawn, ProjectileStep, ProjectileTier};
}

pub use prelude::*;
