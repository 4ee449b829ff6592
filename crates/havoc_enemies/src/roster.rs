//! Enemy roster
//!
//! The roster owns every enemy and projectile, a simulation clock and the RNG.
//! [`Roster::tick`] is the single per-frame entry point:
//!
//! 1. advance the clock
//! 2. remove enemies whose grace delay has passed
//! 3. snapshot live enemy positions
//! 4. run each live enemy's behavior and resolve its attacks
//! 5. advance projectiles and resolve their hits
//! 6. launch the projectiles fired in step 4
//!
//! Explosions target the positions captured in step 3, so no enemy sees
//! another half-way through its update.

use crate::archetype::{ArchetypeId, ArchetypeTable};
use crate::attack::{resolve_primary, resolve_special, Shooter};
use crate::config::CombatConfig;
use crate::enemy::EnemyInstance;
use crate::error::Result;
use crate::lifecycle::{self, DamageOutcome, KillReport};
use glam::Vec3;
use havoc_ai::{decide, AttackIntent, Situation};
use havoc_combat::{
    Allegiance, Blast, CombatHost, Effect, ImpactKind, LootDrop, Projectile, ProjectileSpawn, ProjectileStep, Sound,
    Volley,
};
use havoc_world::{EnemyId, EntityRef, IdGenerator, RaycastHit, RaycastOptions, SpatialQuery};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

/// Running totals since the roster was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RosterStats {
    pub spawned: u64,
    pub kills: u64,
    /// One per death, whether or not anything dropped
    pub loot_rolls: u64,
    pub drops: u64,
    pub projectiles_launched: u64,
}

/// What one tick did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Clock after the tick
    pub now_ms: u64,
    /// Enemies removed after their grace delay
    pub removed: Vec<EnemyId>,
    pub kills: Vec<KillReport>,
    /// Total damage sent to the player
    pub player_damage: f32,
    pub projectiles_launched: usize,
    pub projectiles_resolved: usize,
    pub level_completed: bool,
}

/// Forwards to the real host while keeping per-tick totals
struct Tally<'a, H: ?Sized> {
    inner: &'a mut H,
    player_damage: f32,
}

impl<H: CombatHost + ?Sized> CombatHost for Tally<'_, H> {
    fn damage_player(&mut self, amount: f32) {
        self.player_damage += amount;
        self.inner.damage_player(amount);
    }

    fn trigger_effect(&mut self, effect: Effect) {
        self.inner.trigger_effect(effect);
    }

    fn play_sound(&mut self, sound: Sound) {
        self.inner.play_sound(sound);
    }

    fn place_item(&mut self, drop: &LootDrop) {
        self.inner.place_item(drop);
    }

    fn level_completed(&mut self) {
        self.inner.level_completed();
    }
}

/// Owner of all live enemies and projectiles
#[derive(Debug)]
pub struct Roster {
    archetypes: ArchetypeTable,
    config: CombatConfig,
    enemies: BTreeMap<EnemyId, EnemyInstance>,
    projectiles: Vec<Projectile>,
    ids: IdGenerator,
    elapsed_ms: f64,
    rng: StdRng,
    stats: RosterStats,
}

impl Roster {
    /// Roster with shipped archetypes, default config and an entropy-seeded RNG
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic roster
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            archetypes: ArchetypeTable::standard(),
            config: CombatConfig::default(),
            enemies: BTreeMap::new(),
            projectiles: Vec::new(),
            ids: IdGenerator::new(),
            elapsed_ms: 0.0,
            rng,
            stats: RosterStats::default(),
        }
    }

    /// Replace the archetype table
    pub fn with_archetypes(mut self, archetypes: ArchetypeTable) -> Self {
        self.archetypes = archetypes;
        self
    }

    /// Replace the combat config
    pub fn with_config(mut self, config: CombatConfig) -> Self {
        self.config = config;
        self
    }

    pub fn archetypes(&self) -> &ArchetypeTable {
        &self.archetypes
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Simulation time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.elapsed_ms as u64
    }

    pub fn stats(&self) -> &RosterStats {
        &self.stats
    }

    /// Spawn an enemy by archetype name
    pub fn spawn(&mut self, archetype: &str, position: Vec3) -> Result<EnemyId> {
        match archetype.parse::<ArchetypeId>() {
            Ok(id) => Ok(self.spawn_archetype(id, position)),
            Err(err) => {
                log::warn!("Rejected spawn at {:?}: {}", position, err);
                Err(err)
            }
        }
    }

    /// Spawn an enemy of a known archetype
    pub fn spawn_archetype(&mut self, archetype: ArchetypeId, position: Vec3) -> EnemyId {
        let id = self.ids.next_enemy();
        let now = self.now_ms();
        let enemy = EnemyInstance::new(id, self.archetypes.get(archetype), position, now);
        self.enemies.insert(id, enemy);
        self.stats.spawned += 1;
        log::debug!("Spawned {} {} at {:?}", archetype, id, position);
        id
    }

    /// Enemy by id, including ones in their grace delay
    pub fn get(&self, id: EnemyId) -> Option<&EnemyInstance> {
        self.enemies.get(&id)
    }

    /// All enemies in id order, including ones in their grace delay
    pub fn iter(&self) -> impl Iterator<Item = &EnemyInstance> {
        self.enemies.values()
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Enemies that are still alive
    pub fn live_count(&self) -> usize {
        self.enemies.values().filter(|e| e.is_alive()).count()
    }

    /// Projectiles in flight
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Damage an enemy. Unknown and dead enemies are ignored.
    pub fn apply_damage<H: CombatHost + ?Sized>(&mut self, id: EnemyId, amount: f32, host: &mut H) -> DamageOutcome {
        let now = self.now_ms();
        let Some(enemy) = self.enemies.get_mut(&id) else {
            return DamageOutcome::Ignored;
        };
        let archetype = self.archetypes.get(enemy.archetype);

        let outcome = lifecycle::apply_damage(enemy, archetype, amount, now, &self.config, &mut self.rng, host);
        if let DamageOutcome::Killed(report) = &outcome {
            self.stats.record_kill(report);
        }
        outcome
    }

    /// Kill an enemy outright. `None` for unknown or already dead enemies.
    pub fn kill<H: CombatHost + ?Sized>(&mut self, id: EnemyId, host: &mut H) -> Option<KillReport> {
        let now = self.now_ms();
        let enemy = self.enemies.get_mut(&id)?;
        let archetype = self.archetypes.get(enemy.archetype);

        let report = lifecycle::kill(enemy, archetype, now, &self.config, &mut self.rng, host)?;
        self.stats.record_kill(&report);
        Some(report)
    }

    /// Advance the simulation by `dt` seconds
    pub fn tick<W, H>(&mut self, dt: f32, player: Vec3, world: &W, host: &mut H) -> TickReport
    where
        W: SpatialQuery + ?Sized,
        H: CombatHost + ?Sized,
    {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed_ms += f64::from(dt) * 1000.0;
        let now = self.now_ms();

        let mut host = Tally {
            inner: host,
            player_damage: 0.0,
        };
        let mut report = TickReport {
            now_ms: now,
            ..TickReport::default()
        };

        report.removed = self.prune(now);

        let snapshot: Vec<(EnemyId, Vec3)> = self
            .enemies
            .values()
            .filter(|e| e.is_alive())
            .map(|e| (e.id, e.position()))
            .collect();

        let spawns = self.run_behaviors(dt, now, player, world, &mut host);

        let mut projectiles = std::mem::take(&mut self.projectiles);
        for projectile in projectiles.iter_mut() {
            if let ProjectileStep::Hit(hit) = projectile.advance(dt, now, world) {
                report.projectiles_resolved += 1;
                let kills = self.resolve_projectile_hit(projectile, &hit, player, &snapshot, &mut host);
                report.kills.extend(kills);
            }
        }
        projectiles.retain(|p| !p.is_retired());
        self.projectiles = projectiles;

        // Shots fired this tick first move on the next one
        for (owner, spawn) in spawns {
            self.launch(Allegiance::Enemy(owner), spawn, &mut host);
            report.projectiles_launched += 1;
        }

        report.player_damage = host.player_damage;
        report.level_completed = report.kills.iter().any(|k| k.level_completed);
        report
    }

    /// Resolve a player trigger pull: trace hitscan rays and launch the
    /// projectile, if any. Returns the kills it caused.
    pub fn resolve_player_volley<W, H>(&mut self, volley: &Volley, world: &W, host: &mut H) -> Vec<KillReport>
    where
        W: SpatialQuery + ?Sized,
        H: CombatHost + ?Sized,
    {
        let mut kills = Vec::new();

        for ray in &volley.rays {
            let options = RaycastOptions::default()
                .ignoring_player()
                .with_max_distance(ray.range);
            let Some(hit) = world.raycast(ray.origin, ray.direction, &options) else {
                continue;
            };

            let kind = match hit.entity {
                Some(EntityRef::Enemy(id)) => {
                    if let DamageOutcome::Killed(report) = self.apply_damage(id, ray.damage, host) {
                        kills.push(report);
                    }
                    ImpactKind::Blood
                }
                _ => ImpactKind::Standard,
            };
            host.trigger_effect(Effect::Impact {
                position: hit.point,
                normal: hit.normal,
                kind,
            });
        }

        if let Some(spawn) = volley.projectile {
            self.launch(Allegiance::Player, spawn, host);
        }

        kills
    }

    /// Drop every enemy and projectile immediately
    pub fn clear(&mut self) {
        log::debug!(
            "Clearing roster: {} enemies, {} projectiles",
            self.enemies.len(),
            self.projectiles.len()
        );
        self.enemies.clear();
        self.projectiles.clear();
    }

    fn prune(&mut self, now: u64) -> Vec<EnemyId> {
        let expired: Vec<EnemyId> = self
            .enemies
            .values()
            .filter(|e| e.is_expired(now))
            .map(|e| e.id)
            .collect();
        for id in &expired {
            self.enemies.remove(id);
            log::debug!("Removed {}", id);
        }
        expired
    }

    fn run_behaviors<W, H>(
        &mut self,
        dt: f32,
        now: u64,
        player: Vec3,
        world: &W,
        host: &mut H,
    ) -> Vec<(EnemyId, ProjectileSpawn)>
    where
        W: SpatialQuery + ?Sized,
        H: CombatHost + ?Sized,
    {
        let Self {
            archetypes,
            config,
            enemies,
            rng,
            ..
        } = self;
        let mut spawns = Vec::new();

        for enemy in enemies.values_mut().filter(|e| e.is_alive()) {
            let archetype = archetypes.get(enemy.archetype);
            let situation = Situation {
                player,
                now_ms: now,
                dt,
                health_fraction: enemy.vitals.fraction(),
                profile: archetype.profile(),
                me: EntityRef::Enemy(enemy.id),
            };
            let intents = decide(archetype.id.behavior(), &mut enemy.agent, &situation, &config.ai, world, rng);

            let shooter = Shooter {
                id: enemy.id,
                archetype,
                position: enemy.agent.position,
                yaw: enemy.agent.yaw,
            };
            for intent in intents {
                match intent {
                    AttackIntent::Primary { target } => {
                        if let Some(spawn) = resolve_primary(&shooter, target, config, world, rng, host) {
                            spawns.push((enemy.id, spawn));
                        }
                    }
                    AttackIntent::Special(special) => {
                        let fired = resolve_special(&shooter, special, player, config, host);
                        spawns.extend(fired.into_iter().map(|spawn| (enemy.id, spawn)));
                    }
                }
            }
        }

        spawns
    }

    fn launch<H: CombatHost + ?Sized>(&mut self, owner: Allegiance, spawn: ProjectileSpawn, host: &mut H) {
        let id = self.ids.next_projectile();
        let now = self.now_ms();
        let projectile = Projectile::launch(id, owner, spawn, now);
        let projectile = match owner {
            Allegiance::Enemy(_) => projectile.with_max_travel(self.config.projectile_max_travel),
            Allegiance::Player => projectile.with_lifetime(self.config.player_projectile_lifetime_ms),
        };

        host.trigger_effect(Effect::Trail {
            projectile: id,
            tier: projectile.tier,
        });
        self.projectiles.push(projectile);
        self.stats.projectiles_launched += 1;
    }

    fn resolve_projectile_hit<H: CombatHost + ?Sized>(
        &mut self,
        projectile: &Projectile,
        hit: &RaycastHit,
        player: Vec3,
        snapshot: &[(EnemyId, Vec3)],
        host: &mut H,
    ) -> Vec<KillReport> {
        let mut kills = Vec::new();

        if projectile.radius > 0.0 {
            // Enemy shots that strike the player body land before the blast
            if matches!(projectile.owner, Allegiance::Enemy(_)) && hit.entity == Some(EntityRef::Player) {
                host.damage_player(projectile.damage);
            }
            host.trigger_effect(Effect::Explosion {
                position: hit.point,
                radius: projectile.radius,
                tier: projectile.tier,
            });
            host.play_sound(Sound::Explosion);

            let blast = Blast {
                center: hit.point,
                radius: projectile.radius,
                damage: projectile.damage,
                owner: projectile.owner,
                tier: projectile.tier,
            };
            let scaling = self.config.blast;

            let to_player = blast.player_damage(player, &scaling);
            if to_player > 0.0 {
                host.damage_player(to_player);
            }
            for &(id, position) in snapshot {
                let amount = blast.enemy_damage(id, position, &scaling);
                if amount <= 0.0 {
                    continue;
                }
                if let DamageOutcome::Killed(report) = self.apply_damage(id, amount, host) {
                    kills.push(report);
                }
            }
            return kills;
        }

        host.play_sound(Sound::Impact);
        let kind = match hit.entity {
            Some(EntityRef::Player) => {
                host.damage_player(projectile.damage);
                ImpactKind::Blood
            }
            Some(EntityRef::Enemy(id)) => {
                if let DamageOutcome::Killed(report) = self.apply_damage(id, projectile.damage, host) {
                    kills.push(report);
                }
                ImpactKind::Blood
            }
            _ => ImpactKind::Standard,
        };
        host.trigger_effect(Effect::Impact {
            position: hit.point,
            normal: hit.normal,
            kind,
        });

        kills
    }
}

impl RosterStats {
    fn record_kill(&mut self, report: &KillReport) {
        self.kills += 1;
        self.loot_rolls += 1;
        if report.drop.is_some() {
            self.drops += 1;
        }
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}
