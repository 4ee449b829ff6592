//! Host collaborator interface
//!
//! The combat core never renders, plays audio or places items itself. It
//! reports those side effects through [`CombatHost`]. Every method has a no-op
//! default, so a host that has no audio system (for example) simply does not
//! override `play_sound`.

use crate::arsenal::WeaponKind;
use crate::loot::LootDrop;
use crate::projectile::ProjectileTier;
use glam::Vec3;
use havoc_world::ProjectileId;
use std::fmt;

/// Surface reaction for an impact effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImpactKind {
    /// Sparks/dust on geometry
    Standard,
    /// Hit on a living body
    Blood,
}

/// Fire-and-forget visual effect requests
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Muzzle flash at a firing origin
    MuzzleFlash {
        position: Vec3,
        weapon: &'static str,
    },
    /// Surface impact decal/particles
    Impact {
        position: Vec3,
        normal: Vec3,
        kind: ImpactKind,
    },
    /// Explosion sphere
    Explosion {
        position: Vec3,
        radius: f32,
        tier: ProjectileTier,
    },
    /// Trail attached to a live projectile
    Trail {
        projectile: ProjectileId,
        tier: ProjectileTier,
    },
}

/// Fixed sound vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    EnemyAttack,
    BossAttack,
    HeavySpecial,
    BossSpecial,
    Explosion,
    Impact,
    BossExplosion,
    EnemyHit,
    EnemyDeath,
    BossDeath,
    WeaponFire(WeaponKind),
    Empty,
    WeaponSwitch,
    Pickup,
}

impl fmt::Display for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sound::EnemyAttack => "enemy_attack",
            Sound::BossAttack => "boss_attack",
            Sound::HeavySpecial => "heavy_special",
            Sound::BossSpecial => "boss_special",
            Sound::Explosion => "explosion",
            Sound::Impact => "impact",
            Sound::BossExplosion => "boss_explosion",
            Sound::EnemyHit => "enemy_hit",
            Sound::EnemyDeath => "enemy_death",
            Sound::BossDeath => "boss_death",
            Sound::WeaponFire(kind) => return write!(f, "{}_fire", kind.name()),
            Sound::Empty => "empty",
            Sound::WeaponSwitch => "weapon_switch",
            Sound::Pickup => "pickup",
        };
        f.write_str(name)
    }
}

/// Side effects the core requests from the embedding game
pub trait CombatHost {
    /// Apply damage to the player
    fn damage_player(&mut self, _amount: f32) {}

    /// Spawn a visual effect
    fn trigger_effect(&mut self, _effect: Effect) {}

    /// Play a named sound
    fn play_sound(&mut self, _sound: Sound) {}

    /// Place a loot pickup in the level
    fn place_item(&mut self, _drop: &LootDrop) {}

    /// The top-tier enemy died
    fn level_completed(&mut self) {}
}

/// Host that ignores every side effect
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl CombatHost for NullHost {}

/// One recorded host call
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    PlayerDamaged(f32),
    Effect(Effect),
    Sound(Sound),
    ItemPlaced(LootDrop),
    LevelCompleted,
}

/// Host that records every call in order
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    /// Recorded calls, oldest first
    pub events: Vec<HostEvent>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all recorded events
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Sum of all player damage
    pub fn player_damage(&self) -> f32 {
        self.events
            .iter()
            .filter_map(|e| match e {
                HostEvent::PlayerDamaged(amount) => Some(*amount),
                _ => None,
            })
            .sum()
    }

    /// Recorded effects
    pub fn effects(&self) -> impl Iterator<Item = &Effect> {
        self.events.iter().filter_map(|e| match e {
            HostEvent::Effect(effect) => Some(effect),
            _ => None,
        })
    }

    /// Recorded sounds
    pub fn sounds(&self) -> impl Iterator<Item = Sound> + '_ {
        self.events.iter().filter_map(|e| match e {
            HostEvent::Sound(sound) => Some(*sound),
            _ => None,
        })
    }

    /// Number of times `sound` was played
    pub fn count_sound(&self, sound: Sound) -> usize {
        self.sounds().filter(|s| *s == sound).count()
    }

    /// Impact effects only
    pub fn impacts(&self) -> impl Iterator<Item = &Effect> {
        self.effects().filter(|e| matches!(e, Effect::Impact { .. }))
    }

    /// Placed loot
    pub fn drops(&self) -> impl Iterator<Item = &LootDrop> {
        self.events.iter().filter_map(|e| match e {
            HostEvent::ItemPlaced(drop) => Some(drop),
            _ => None,
        })
    }

    /// Whether a level completion was signalled
    pub fn level_was_completed(&self) -> bool {
        self.events.iter().any(|e| matches!(e, HostEvent::LevelCompleted))
    }
}

impl CombatHost for EventLog {
    fn damage_player(&mut self, amount: f32) {
        self.events.push(HostEvent::PlayerDamaged(amount));
    }

    fn trigger_effect(&mut self, effect: Effect) {
        self.events.push(HostEvent::Effect(effect));
    }

    fn play_sound(&mut self, sound: Sound) {
        self.events.push(HostEvent::Sound(sound));
    }

    fn place_item(&mut self, drop: &LootDrop) {
        self.events.push(HostEvent::ItemPlaced(drop.clone()));
    }

    fn level_completed(&mut self) {
        self.events.push(HostEvent::LevelCompleted);
    }
}
