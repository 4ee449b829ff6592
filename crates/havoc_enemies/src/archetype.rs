//! Enemy archetypes
//!
//! The four archetypes are a closed set. Their stats can be overridden from
//! JSON, but behavior kind, attack mode, inaccuracy, muzzle class and sounds
//! are fixed per archetype.

use crate::error::{Result, RosterError};
use havoc_ai::{BehaviorKind, EngagementProfile};
use havoc_combat::{LootTable, Sound};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Archetype identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchetypeId {
    Grunt,
    Enforcer,
    Heavy,
    Boss,
}

/// How an archetype's primary attack travels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackMode {
    /// Instant line check
    Hitscan,
    /// Standard-tier projectile
    Projectile,
}

impl ArchetypeId {
    pub const ALL: [ArchetypeId; 4] = [
        ArchetypeId::Grunt,
        ArchetypeId::Enforcer,
        ArchetypeId::Heavy,
        ArchetypeId::Boss,
    ];

    /// Lowercase identifier
    pub fn name(&self) -> &'static str {
        match self {
            ArchetypeId::Grunt => "grunt",
            ArchetypeId::Enforcer => "enforcer",
            ArchetypeId::Heavy => "heavy",
            ArchetypeId::Boss => "boss",
        }
    }

    fn index(&self) -> usize {
        match self {
            ArchetypeId::Grunt => 0,
            ArchetypeId::Enforcer => 1,
            ArchetypeId::Heavy => 2,
            ArchetypeId::Boss => 3,
        }
    }

    pub fn behavior(&self) -> BehaviorKind {
        match self {
            ArchetypeId::Grunt | ArchetypeId::Enforcer => BehaviorKind::Base,
            ArchetypeId::Heavy => BehaviorKind::Heavy,
            ArchetypeId::Boss => BehaviorKind::Boss,
        }
    }

    pub fn attack_mode(&self) -> AttackMode {
        match self {
            ArchetypeId::Grunt | ArchetypeId::Enforcer => AttackMode::Hitscan,
            ArchetypeId::Heavy | ArchetypeId::Boss => AttackMode::Projectile,
        }
    }

    /// Per-axis aim jitter; lower is more accurate
    pub fn inaccuracy(&self) -> f32 {
        match self {
            ArchetypeId::Grunt => 0.2,
            ArchetypeId::Enforcer => 0.1,
            ArchetypeId::Heavy => 0.15,
            ArchetypeId::Boss => 0.05,
        }
    }

    /// Weapon class shown in the muzzle flash
    pub fn muzzle_class(&self) -> &'static str {
        match self {
            ArchetypeId::Grunt => "pistol",
            ArchetypeId::Enforcer => "rifle",
            ArchetypeId::Heavy => "plasma",
            ArchetypeId::Boss => "bfg",
        }
    }

    pub fn attack_sound(&self) -> Sound {
        match self {
            ArchetypeId::Boss => Sound::BossAttack,
            _ => Sound::EnemyAttack,
        }
    }

    pub fn death_sound(&self) -> Sound {
        match self {
            ArchetypeId::Boss => Sound::BossDeath,
            _ => Sound::EnemyDeath,
        }
    }

    /// Killing this archetype completes the level
    pub fn is_boss(&self) -> bool {
        matches!(self, ArchetypeId::Boss)
    }
}

impl fmt::Display for ArchetypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArchetypeId {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self> {
        ArchetypeId::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| RosterError::UnknownArchetype(s.to_string()))
    }
}

/// Immutable stats shared by every instance of an archetype
#[derive(Debug, Clone, PartialEq)]
pub struct Archetype {
    pub id: ArchetypeId,
    pub name: String,
    pub health: f32,
    /// Units per second
    pub speed: f32,
    /// Damage per primary hit
    pub damage: f32,
    /// Shots per second
    pub fire_rate: f32,
    /// Engagement range
    pub range: f32,
    pub loot: LootTable,
}

impl Archetype {
    pub fn profile(&self) -> EngagementProfile {
        EngagementProfile {
            speed: self.speed,
            range: self.range,
            fire_rate: self.fire_rate,
        }
    }

    fn shipped(id: ArchetypeId) -> Self {
        use havoc_combat::DropKind::*;

        let ammo = |t: &str| Ammo(t.to_string());
        let (name, health, speed, damage, fire_rate, range, drop_chance, drops) = match id {
            ArchetypeId::Grunt => ("Grunt", 50.0, 5.0, 10.0, 1.0, 15.0, 0.5, vec![Health, ammo("pistol"), ammo("shells")]),
            ArchetypeId::Enforcer => (
                "Enforcer",
                100.0,
                4.0,
                15.0,
                0.8,
                20.0,
                0.7,
                vec![Health, Armor, ammo("rifle"), ammo("rockets")],
            ),
            ArchetypeId::Heavy => (
                "Heavy",
                200.0,
                3.0,
                25.0,
                0.5,
                15.0,
                0.9,
                vec![Health, Armor, ammo("rockets"), ammo("cells")],
            ),
            ArchetypeId::Boss => (
                "Boss",
                1000.0,
                4.0,
                40.0,
                1.2,
                30.0,
                1.0,
                vec![Health, Armor, ammo("rockets"), ammo("cells"), Weapon("bfg".to_string())],
            ),
        };

        Self {
            id,
            name: name.to_string(),
            health,
            speed,
            damage,
            fire_rate,
            range,
            loot: LootTable::new(drop_chance, drops),
        }
    }
}

/// One archetype as written in JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArchetypeEntry {
    #[serde(default)]
    name: Option<String>,
    health: f32,
    speed: f32,
    damage: f32,
    fire_rate: f32,
    range: f32,
    drop_chance: f32,
    drops: Vec<String>,
}

impl ArchetypeEntry {
    fn into_archetype(self, id: ArchetypeId) -> Result<Archetype> {
        let invalid = |field: &'static str, value: f32| RosterError::InvalidStat {
            archetype: id.name().to_string(),
            field,
            value,
        };

        if !(self.health > 0.0) {
            return Err(invalid("health", self.health));
        }
        for (field, value) in [
            ("speed", self.speed),
            ("damage", self.damage),
            ("fire_rate", self.fire_rate),
            ("range", self.range),
        ] {
            if !(value >= 0.0) {
                return Err(invalid(field, value));
            }
        }
        if !(0.0..=1.0).contains(&self.drop_chance) {
            return Err(invalid("drop_chance", self.drop_chance));
        }

        Ok(Archetype {
            id,
            name: self.name.unwrap_or_else(|| id.name().to_string()),
            health: self.health,
            speed: self.speed,
            damage: self.damage,
            fire_rate: self.fire_rate,
            range: self.range,
            loot: LootTable::parse(self.drop_chance, &self.drops)?,
        })
    }
}

/// Stats for all four archetypes
#[derive(Debug, Clone, PartialEq)]
pub struct ArchetypeTable {
    archetypes: [Archetype; 4],
}

impl ArchetypeTable {
    /// Shipped stats
    pub fn standard() -> Self {
        Self {
            archetypes: ArchetypeId::ALL.map(Archetype::shipped),
        }
    }

    /// Stats for `id`
    pub fn get(&self, id: ArchetypeId) -> &Archetype {
        &self.archetypes[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Archetype> {
        self.archetypes.iter()
    }

    /// Shipped table with the archetypes named in `json` replaced, e.g.
    /// `{"grunt": {"health": 80, "speed": 5, ...}}`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: BTreeMap<String, ArchetypeEntry> = serde_json::from_str(json)?;
        let mut table = Self::standard();
        for (key, entry) in entries {
            let id: ArchetypeId = key.parse()?;
            table.archetypes[id.index()] = entry.into_archetype(id)?;
        }
        Ok(table)
    }

    /// Load overrides from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

impl Default for ArchetypeTable {
    fn default() -> Self {
        Self::standard()
    }
}
