//! Loot drops
//!
//! A kill rolls once against the archetype's drop chance, then picks one entry
//! uniformly from its drop list. Duplicate entries are kept, so listing
//! `health` twice makes health twice as likely.

use crate::error::{CombatError, Result};
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A parsed drop identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DropKind {
    /// `health`
    Health,
    /// `armor`
    Armor,
    /// `ammo_<type>`
    Ammo(String),
    /// `weapon_<type>`
    Weapon(String),
}

impl FromStr for DropKind {
    type Err = CombatError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CombatError::InvalidDrop(s.to_string());
        match s {
            "health" => Ok(DropKind::Health),
            "armor" => Ok(DropKind::Armor),
            _ => {
                if let Some(ammo) = s.strip_prefix("ammo_") {
                    if ammo.is_empty() {
                        return Err(invalid());
                    }
                    Ok(DropKind::Ammo(ammo.to_string()))
                } else if let Some(weapon) = s.strip_prefix("weapon_") {
                    if weapon.is_empty() {
                        return Err(invalid());
                    }
                    Ok(DropKind::Weapon(weapon.to_string()))
                } else {
                    Err(invalid())
                }
            }
        }
    }
}

impl TryFrom<String> for DropKind {
    type Error = CombatError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for DropKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropKind::Health => f.write_str("health"),
            DropKind::Armor => f.write_str("armor"),
            DropKind::Ammo(ammo) => write!(f, "ammo_{ammo}"),
            DropKind::Weapon(weapon) => write!(f, "weapon_{weapon}"),
        }
    }
}

impl From<DropKind> for String {
    fn from(kind: DropKind) -> Self {
        kind.to_string()
    }
}

/// What the player picks up
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pickup {
    Health(u32),
    Armor(u32),
    Ammo { ammo: String, amount: u32 },
    Weapon(String),
}

/// Request to place a pickup in the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootDrop {
    pub pickup: Pickup,
    pub position: Vec3,
}

/// Drop chance plus the uniform drop list of one archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootTable {
    /// Probability (0.0 - 1.0) that a kill yields anything
    pub drop_chance: f32,
    pub entries: Vec<DropKind>,
}

impl LootTable {
    /// Create a loot table
    pub fn new(drop_chance: f32, entries: Vec<DropKind>) -> Self {
        Self { drop_chance, entries }
    }

    /// Parse identifiers such as `["health", "ammo_shells"]`
    pub fn parse<S: AsRef<str>>(drop_chance: f32, ids: &[S]) -> Result<Self> {
        let entries = ids
            .iter()
            .map(|id| id.as_ref().parse())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(drop_chance, entries))
    }

    /// Roll the drop chance, then pick an entry
    pub fn roll<R: Rng + ?Sized>(&self, position: Vec3, rng: &mut R) -> Option<LootDrop> {
        if self.entries.is_empty() {
            return None;
        }
        if rng.gen::<f32>() >= self.drop_chance {
            return None;
        }
        self.pick(position, rng)
    }

    /// Uniform pick ignoring the drop chance. `None` only for an empty list.
    pub fn pick<R: Rng + ?Sized>(&self, position: Vec3, rng: &mut R) -> Option<LootDrop> {
        if self.entries.is_empty() {
            return None;
        }
        let entry = &self.entries[rng.gen_range(0..self.entries.len())];

        let pickup = match entry {
            DropKind::Health => Pickup::Health(15 + (rng.gen::<f32>() * 15.0).floor() as u32),
            DropKind::Armor => Pickup::Armor(15 + (rng.gen::<f32>() * 15.0).floor() as u32),
            DropKind::Ammo(ammo) => Pickup::Ammo {
                ammo: ammo.clone(),
                amount: 10 + (rng.gen::<f32>() * 20.0).floor() as u32,
            },
            DropKind::Weapon(weapon) => Pickup::Weapon(weapon.clone()),
        };

        Some(LootDrop { pickup, position })
    }
}
