//! Scripted skirmish
//!
//! A walled arena, a scripted player and two waves: a mixed squad, then the
//! boss. The player stands near the centre, turns to the nearest live enemy,
//! fires the strongest loaded weapon and walks over to nearby loot.

use crate::boot_config::{HarnessConfig, RunSettings};
use glam::Vec3;
use havoc_combat::{Arsenal, CombatHost, Effect, LootDrop, Pickup, Sound, WeaponKind, WeaponSlot};
use havoc_enemies::{ArchetypeId, Roster, RosterStats};
use havoc_world::CollisionScene;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

const ARENA_HALF_SIZE: f32 = 40.0;
const WALL_HEIGHT: f32 = 5.0;
const PLAYER_RADIUS: f32 = 0.5;
const PLAYER_CENTER_HEIGHT: f32 = 1.0;
const PLAYER_EYE_HEIGHT: f32 = 1.6;
const PLAYER_SPEED: f32 = 6.0;
const ENEMY_RADIUS: f32 = 0.6;
const PICKUP_RADIUS: f32 = 1.5;
/// Loot farther than this is left alone
const LOOT_REACH: f32 = 12.0;

/// Mixed squad first, then the boss
const WAVES: &[&[(ArchetypeId, [f32; 3])]] = &[
    &[
        (ArchetypeId::Grunt, [12.0, 0.0, 12.0]),
        (ArchetypeId::Grunt, [-12.0, 0.0, 15.0]),
        (ArchetypeId::Enforcer, [8.0, 0.0, -12.0]),
        (ArchetypeId::Enforcer, [-8.0, 0.0, -15.0]),
        (ArchetypeId::Heavy, [0.0, 0.0, -20.0]),
    ],
    &[(ArchetypeId::Boss, [0.0, 0.0, -30.0])],
];

/// Player health and armor, with armor soaking half of each hit
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub position: Vec3,
    pub health: f32,
    pub max_health: f32,
    pub armor: f32,
    pub max_armor: f32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            health: 100.0,
            max_health: 100.0,
            armor: 0.0,
            max_armor: 100.0,
        }
    }
}

impl PlayerState {
    pub fn take_damage(&mut self, amount: f32) {
        let mut remaining = amount.max(0.0);
        if self.armor > 0.0 {
            let absorbed = self.armor.min(remaining * 0.5);
            self.armor -= absorbed;
            remaining -= absorbed;
        }
        self.health = (self.health - remaining).max(0.0);
    }

    /// Returns false when already at full health
    pub fn heal(&mut self, amount: f32) -> bool {
        if self.health >= self.max_health {
            return false;
        }
        self.health = (self.health + amount).min(self.max_health);
        true
    }

    /// Returns false when armor is already full
    pub fn add_armor(&mut self, amount: f32) -> bool {
        if self.armor >= self.max_armor {
            return false;
        }
        self.armor = (self.armor + amount).min(self.max_armor);
        true
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Point enemies aim at and the body's collision centre
    pub fn center(&self) -> Vec3 {
        self.position + Vec3::Y * PLAYER_CENTER_HEIGHT
    }
}

/// Host that applies core side effects to the harness player and level
#[derive(Debug, Default)]
pub struct ArenaHost {
    pub player: PlayerState,
    /// Loot waiting to be picked up
    pub items: Vec<LootDrop>,
    pub level_complete: bool,
    pub effects: u64,
    pub sounds: BTreeMap<String, u32>,
}

impl CombatHost for ArenaHost {
    fn damage_player(&mut self, amount: f32) {
        self.player.take_damage(amount);
        log::trace!(
            "player hit for {:.1}, health {:.1} armor {:.1}",
            amount,
            self.player.health,
            self.player.armor
        );
    }

    fn trigger_effect(&mut self, effect: Effect) {
        self.effects += 1;
        log::trace!("effect {:?}", effect);
    }

    fn play_sound(&mut self, sound: Sound) {
        *self.sounds.entry(sound.to_string()).or_insert(0) += 1;
    }

    fn place_item(&mut self, drop: &LootDrop) {
        log::debug!("loot {:?} at {:?}", drop.pickup, drop.position);
        self.items.push(drop.clone());
    }

    fn level_completed(&mut self) {
        self.level_complete = true;
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    Defeat,
    TimedOut,
}

/// End-of-run numbers
#[derive(Debug, Clone)]
pub struct Summary {
    pub outcome: Outcome,
    pub frames: u32,
    pub elapsed_ms: u64,
    pub stats: RosterStats,
    pub player: PlayerState,
    pub items_left: usize,
    pub effects: u64,
    pub sounds: BTreeMap<String, u32>,
}

/// One arena run
pub struct Skirmish {
    roster: Roster,
    arsenal: Arsenal,
    scene: CollisionScene,
    host: ArenaHost,
    rng: StdRng,
    settings: RunSettings,
    next_wave: usize,
    frame: u32,
}

impl Skirmish {
    pub fn new(config: &HarnessConfig) -> Self {
        let roster = Roster::with_seed(config.run.seed)
            .with_archetypes(config.archetypes.clone())
            .with_config(config.combat.clone());

        let mut skirmish = Self {
            roster,
            arsenal: Arsenal::standard(),
            scene: build_arena(),
            host: ArenaHost::default(),
            rng: StdRng::seed_from_u64(config.run.seed.wrapping_add(1)),
            settings: config.run,
            next_wave: 0,
            frame: 0,
        };

        // Level loadout
        for weapon in [WeaponKind::Shotgun, WeaponKind::AssaultRifle] {
            let pickup = Pickup::Weapon(weapon.name().to_string());
            skirmish.arsenal.apply_pickup(&pickup, 0, &mut skirmish.host);
        }
        skirmish.spawn_next_wave();
        skirmish
    }

    /// Simulate one frame. Returns the outcome once the run is over.
    pub fn step(&mut self) -> Option<Outcome> {
        self.frame += 1;
        let dt = self.settings.frame_time;

        self.move_player(dt);
        self.collect_loot();
        self.sync_scene();
        self.fire_at_nearest();

        let report = self
            .roster
            .tick(dt, self.host.player.center(), &self.scene, &mut self.host);
        for kill in &report.kills {
            log::info!("{} down at {:?}", kill.archetype, kill.position);
        }

        if !self.host.player.is_alive() {
            return Some(Outcome::Defeat);
        }
        if self.host.level_complete {
            return Some(Outcome::Victory);
        }
        if self.roster.live_count() == 0 && !self.spawn_next_wave() && self.roster.is_empty() {
            // Nothing left to fight and no boss to signal completion
            return Some(Outcome::Victory);
        }
        if self.frame >= self.settings.max_frames {
            return Some(Outcome::TimedOut);
        }
        None
    }

    /// Run to completion
    pub fn run(mut self) -> Summary {
        let outcome = loop {
            if let Some(outcome) = self.step() {
                break outcome;
            }
        };

        Summary {
            outcome,
            frames: self.frame,
            elapsed_ms: self.roster.now_ms(),
            stats: *self.roster.stats(),
            player: self.host.player.clone(),
            items_left: self.host.items.len(),
            effects: self.host.effects,
            sounds: self.host.sounds,
        }
    }

    fn spawn_next_wave(&mut self) -> bool {
        let Some(wave) = WAVES.get(self.next_wave) else {
            return false;
        };
        self.next_wave += 1;
        log::info!("Wave {} incoming ({} enemies)", self.next_wave, wave.len());
        for &(archetype, [x, y, z]) in wave.iter() {
            self.roster.spawn_archetype(archetype, Vec3::new(x, y, z));
        }
        true
    }

    fn move_player(&mut self, dt: f32) {
        let position = self.host.player.position;
        let target = self
            .host
            .items
            .iter()
            .map(|item| Vec3::new(item.position.x, 0.0, item.position.z))
            .filter(|p| p.distance(position) <= LOOT_REACH)
            .min_by(|a, b| a.distance(position).total_cmp(&b.distance(position)))
            .unwrap_or(Vec3::ZERO);

        let to = target - position;
        let step = PLAYER_SPEED * dt;
        self.host.player.position = if to.length() <= step {
            target
        } else {
            position + to.normalize_or_zero() * step
        };
    }

    fn collect_loot(&mut self) {
        let position = self.host.player.position;
        let now = self.roster.now_ms();
        let (reached, left): (Vec<_>, Vec<_>) = std::mem::take(&mut self.host.items)
            .into_iter()
            .partition(|item| Vec3::new(item.position.x, 0.0, item.position.z).distance(position) <= PICKUP_RADIUS);
        self.host.items = left;

        for item in reached {
            let used = match &item.pickup {
                Pickup::Health(amount) => self.host.player.heal(*amount as f32),
                Pickup::Armor(amount) => self.host.player.add_armor(*amount as f32),
                pickup => self.arsenal.apply_pickup(pickup, now, &mut self.host),
            };
            if used {
                log::debug!("picked up {:?}", item.pickup);
                if matches!(item.pickup, Pickup::Health(_) | Pickup::Armor(_)) {
                    self.host.play_sound(Sound::Pickup);
                }
            } else {
                // Full up; leave it for later
                self.host.items.push(item);
            }
        }
    }

    fn sync_scene(&mut self) {
        self.scene.set_player(self.host.player.center(), PLAYER_RADIUS);
        for enemy in self.roster.iter().filter(|e| e.is_alive()) {
            self.scene
                .set_enemy(enemy.id, enemy.position() + Vec3::Y * PLAYER_CENTER_HEIGHT, ENEMY_RADIUS);
        }
        let roster = &self.roster;
        self.scene
            .retain_enemies(|id| roster.get(id).map_or(false, |e| e.is_alive()));
    }

    fn fire_at_nearest(&mut self) {
        let eye = self.host.player.position + Vec3::Y * PLAYER_EYE_HEIGHT;
        let Some(target) = self
            .roster
            .iter()
            .filter(|e| e.is_alive())
            .map(|e| e.position() + Vec3::Y * PLAYER_CENTER_HEIGHT)
            .min_by(|a, b| a.distance(eye).total_cmp(&b.distance(eye)))
        else {
            return;
        };

        let now = self.roster.now_ms();
        self.select_weapon(eye.distance(target), now);

        let look = (target - eye).normalize_or_zero();
        if let Some(volley) = self.arsenal.fire(now, eye, look, &mut self.rng, &mut self.host) {
            self.roster.resolve_player_volley(&volley, &self.scene, &mut self.host);
        }
    }

    /// Pick the hardest-hitting loaded weapon that reaches `distance`.
    /// Explosive weapons are skipped at close range.
    fn select_weapon(&mut self, distance: f32, now_ms: u64) {
        let best = self
            .arsenal
            .slots()
            .iter()
            .enumerate()
            .filter(|(_, s)| s.acquired && s.ammo > 0 && s.spec.range >= distance)
            .filter(|(_, s)| s.spec.projectile.map_or(true, |p| p.radius * 2.0 < distance))
            .max_by(|(_, a), (_, b)| {
                let dps = |s: &WeaponSlot| {
                    s.spec.damage * s.spec.pellets.max(1) as f32 * 1000.0 / s.spec.cooldown_ms.max(1) as f32
                };
                dps(a).total_cmp(&dps(b))
            })
            .map(|(index, _)| index);

        if let Some(index) = best {
            if index != self.arsenal.current_index() {
                self.arsenal.switch_to(index, now_ms, &mut self.host);
            }
        }
    }
}

fn build_arena() -> CollisionScene {
    let mut scene = CollisionScene::new();
    let h = ARENA_HALF_SIZE;

    // Outer walls
    scene.add_box(Vec3::new(-h, 0.0, h), Vec3::new(h, WALL_HEIGHT, h + 1.0));
    scene.add_box(Vec3::new(-h, 0.0, -h - 1.0), Vec3::new(h, WALL_HEIGHT, -h));
    scene.add_box(Vec3::new(h, 0.0, -h), Vec3::new(h + 1.0, WALL_HEIGHT, h));
    scene.add_box(Vec3::new(-h - 1.0, 0.0, -h), Vec3::new(-h, WALL_HEIGHT, h));

    // Cover
    for [x, z] in [[6.0, 6.0], [-6.0, 6.0], [6.0, -6.0], [-6.0, -6.0]] {
        scene.add_box(Vec3::new(x - 1.0, 0.0, z - 1.0), Vec3::new(x + 1.0, 3.0, z + 1.0));
    }

    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_armor_soaks_half() {
        let mut player = PlayerState {
            armor: 10.0,
            ..PlayerState::default()
        };
        player.take_damage(30.0);
        // 15 would be absorbed but only 10 armor remains
        assert_relative_eq!(player.armor, 0.0);
        assert_relative_eq!(player.health, 80.0);

        player.take_damage(200.0);
        assert_eq!(player.health, 0.0);
        assert!(!player.is_alive());
    }

    #[test]
    fn test_heal_and_armor_caps() {
        let mut player = PlayerState::default();
        assert!(!player.heal(20.0));
        player.take_damage(10.0);
        assert!(player.heal(20.0));
        assert_eq!(player.health, 100.0);
        assert!(player.add_armor(150.0));
        assert_eq!(player.armor, 100.0);
        assert!(!player.add_armor(1.0));
    }

    #[test]
    fn test_skirmish_is_deterministic() {
        let config = HarnessConfig {
            run: RunSettings {
                seed: 42,
                max_frames: 600,
                frame_time: 1.0 / 30.0,
            },
            ..HarnessConfig::default()
        };

        let a = Skirmish::new(&config).run();
        let b = Skirmish::new(&config).run();
        assert_eq!(a.outcome, b.outcome);
        assert_eq!(a.frames, b.frames);
        assert_eq!(a.stats, b.stats);
        assert_eq!(a.sounds, b.sounds);
        assert!(a.stats.spawned >= 5);
    }

    #[test]
    fn test_first_frame_engages() {
        let mut skirmish = Skirmish::new(&HarnessConfig::default());
        assert_eq!(skirmish.roster.live_count(), 5);
        assert!(skirmish.step().is_none());
        assert!(skirmish.host.sounds.contains_key("pistol_fire")
            || skirmish.host.sounds.contains_key("shotgun_fire")
            || skirmish.host.sounds.contains_key("assault_rifle_fire"));
    }
}
