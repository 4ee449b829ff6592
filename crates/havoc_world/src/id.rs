//! Entity identifiers

use core::fmt;
use serde::{Deserialize, Serialize};

/// Identifier of a spawned enemy instance
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnemyId(u64);

impl EnemyId {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnemyId({})", self.0)
    }
}

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enemy#{}", self.0)
    }
}

/// Identifier of an in-flight projectile
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectileId(u64);

impl ProjectileId {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProjectileId({})", self.0)
    }
}

/// What a spatial query hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    /// The player body
    Player,
    /// A live or dying enemy body
    Enemy(EnemyId),
    /// Level geometry, tagged by the host
    Static(u32),
}

impl EntityRef {
    /// Whether this reference points at an enemy
    #[inline]
    pub fn is_enemy(&self) -> bool {
        matches!(self, EntityRef::Enemy(_))
    }
}

/// Monotonic id source. Ids are never reused within one generator.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    fn bump(&mut self) -> u64 {
        let raw = self.next;
        self.next += 1;
        raw
    }

    /// Next enemy id
    pub fn next_enemy(&mut self) -> EnemyId {
        EnemyId(self.bump())
    }

    /// Next projectile id
    pub fn next_projectile(&mut self) -> ProjectileId {
        ProjectileId(self.bump())
    }
}
