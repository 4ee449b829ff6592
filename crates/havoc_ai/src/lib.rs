//! Havoc AI - Enemy Decision Making
//!
//! Per-tick decision functions for the three enemy behavior kinds, plus the
//! collision-aware movement they share.
//!
//! # Features
//!
//! - Base behavior: patrol, chase, hold-and-shoot, back away when crowded
//! - Heavy behavior: base plus a periodic projectile fan
//! - Boss behavior: three health-driven phases with their own cadence,
//!   movement bands and specials
//! - Slide movement: blocked displacement is projected onto the hit surface
//! - Tunable distances and timers (serde)
//!
//! # Example
//!
//! ```ignore
//! use havoc_ai::prelude::*;
//!
//! let mut agent = Agent::new(spawn_position, now_ms);
//! let situation = Situation { player, now_ms, dt, health_fraction: 1.0, profile, me };
//! let intents = decide(BehaviorKind::Base, &mut agent, &situation, &Tuning::default(), &world, &mut rng);
//! ```

pub mod agent;
pub mod behavior;
pub mod patrol;
pub mod state;
pub mod steering;
pub mod tuning;

pub mod prelude {
    pub use crate::agent::Agent;
    pub use crate::behavior::{decide, EngagementProfile, Situation};
    pub use crate::state::{AttackIntent, BehaviorKind, BehaviorState, BossPhase, SpecialAttack};
    pub use crate::steering::{move_with_slide, slide};
    pub use crate::tuning::Tuning;
}

pub use prelude::*;
