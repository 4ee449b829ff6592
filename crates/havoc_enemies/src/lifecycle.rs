//! Damage and death
//!
//! Death runs exactly once per enemy: one loot roll, one removal schedule and,
//! for the boss, one level-completion signal. Later hits and kills are no-ops.

use crate::archetype::{Archetype, ArchetypeId};
use crate::config::CombatConfig;
use crate::enemy::EnemyInstance;
use glam::Vec3;
use havoc_combat::{CombatHost, DamageInfo, Effect, ImpactKind, LootDrop, Sound};
use havoc_world::EnemyId;
use rand::Rng;

/// What happened to an enemy after a hit
#[derive(Debug, Clone, PartialEq)]
pub enum DamageOutcome {
    /// Target was dead or unknown
    Ignored,
    /// Survived with this much health left
    Wounded { remaining: f32 },
    /// This hit was fatal
    Killed(KillReport),
}

impl DamageOutcome {
    pub fn is_kill(&self) -> bool {
        matches!(self, DamageOutcome::Killed(_))
    }
}

/// Result of the one-time death sequence
#[derive(Debug, Clone, PartialEq)]
pub struct KillReport {
    pub id: EnemyId,
    pub archetype: ArchetypeId,
    pub position: Vec3,
    /// Loot placed by the single roll, if any
    pub drop: Option<LootDrop>,
    pub remove_at_ms: u64,
    pub level_completed: bool,
}

/// Subtract `amount` from the enemy's health. A fatal hit runs the death
/// sequence; a survivable one plays `enemy_hit`.
pub fn apply_damage<R, H>(
    enemy: &mut EnemyInstance,
    archetype: &Archetype,
    amount: f32,
    now_ms: u64,
    config: &CombatConfig,
    rng: &mut R,
    host: &mut H,
) -> DamageOutcome
where
    R: Rng + ?Sized,
    H: CombatHost + ?Sized,
{
    if !enemy.is_alive() {
        return DamageOutcome::Ignored;
    }

    let result = enemy.vitals.apply_damage(&DamageInfo::direct(amount));
    if result.died {
        return DamageOutcome::Killed(on_death(enemy, archetype, now_ms, config, rng, host));
    }

    host.play_sound(Sound::EnemyHit);
    DamageOutcome::Wounded {
        remaining: enemy.vitals.current,
    }
}

/// Kill the enemy outright. `None` if it was already dead.
pub fn kill<R, H>(
    enemy: &mut EnemyInstance,
    archetype: &Archetype,
    now_ms: u64,
    config: &CombatConfig,
    rng: &mut R,
    host: &mut H,
) -> Option<KillReport>
where
    R: Rng + ?Sized,
    H: CombatHost + ?Sized,
{
    if !enemy.vitals.mark_dead() {
        return None;
    }
    Some(on_death(enemy, archetype, now_ms, config, rng, host))
}

fn on_death<R, H>(
    enemy: &mut EnemyInstance,
    archetype: &Archetype,
    now_ms: u64,
    config: &CombatConfig,
    rng: &mut R,
    host: &mut H,
) -> KillReport
where
    R: Rng + ?Sized,
    H: CombatHost + ?Sized,
{
    let position = enemy.position();
    enemy.agent.velocity = Vec3::ZERO;

    host.trigger_effect(Effect::Impact {
        position,
        normal: Vec3::Y,
        kind: ImpactKind::Blood,
    });
    host.play_sound(archetype.id.death_sound());

    let drop_at = Vec3::new(position.x, config.drop_height, position.z);
    let drop = archetype.loot.roll(drop_at, rng);
    if let Some(drop) = &drop {
        host.place_item(drop);
    }

    let remove_at_ms = now_ms + config.grace_delay_ms;
    enemy.remove_at_ms = Some(remove_at_ms);

    let level_completed = archetype.id.is_boss();
    if level_completed {
        log::info!("{} {} defeated, level complete", archetype.id, enemy.id);
        host.level_completed();
    } else {
        log::info!("{} {} killed", archetype.id, enemy.id);
    }

    KillReport {
        id: enemy.id,
        archetype: archetype.id,
        position,
        drop,
        remove_at_ms,
        level_completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::ArchetypeTable;
    use havoc_combat::{EventLog, HostEvent, LootTable};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spawn(archetype: &Archetype) -> EnemyInstance {
        EnemyInstance::new(EnemyId::from_raw(1), archetype, Vec3::new(2.0, 0.0, 3.0), 0)
    }

    #[test]
    fn test_health_is_monotonic() {
        let table = ArchetypeTable::standard();
        let grunt = table.get(ArchetypeId::Grunt);
        let mut enemy = spawn(grunt);
        let mut rng = StdRng::seed_from_u64(1);
        let mut log = EventLog::new();
        let config = CombatConfig::default();

        let mut last = enemy.vitals.current;
        for amount in [5.0, 0.0, -10.0, 12.5, f32::NAN, 40.0, 30.0] {
            apply_damage(&mut enemy, grunt, amount, 0, &config, &mut rng, &mut log);
            assert!(enemy.vitals.current <= last);
            assert!(enemy.vitals.current >= 0.0);
            last = enemy.vitals.current;
        }
        assert_eq!(enemy.vitals.current, 0.0);
        assert!(!enemy.is_alive());
    }

    #[test]
    fn test_wounded_plays_hit() {
        let table = ArchetypeTable::standard();
        let grunt = table.get(ArchetypeId::Grunt);
        let mut enemy = spawn(grunt);
        let mut log = EventLog::new();

        let outcome = apply_damage(
            &mut enemy,
            grunt,
            20.0,
            0,
            &CombatConfig::default(),
            &mut StdRng::seed_from_u64(1),
            &mut log,
        );
        assert_eq!(outcome, DamageOutcome::Wounded { remaining: 30.0 });
        assert_eq!(log.count_sound(Sound::EnemyHit), 1);
    }

    #[test]
    fn test_overkill_runs_death_once() {
        let table = ArchetypeTable::standard();
        let mut grunt = table.get(ArchetypeId::Grunt).clone();
        grunt.loot = LootTable::parse(1.0, &["ammo_shells"]).unwrap();
        let mut enemy = spawn(&grunt);
        let mut rng = StdRng::seed_from_u64(4);
        let mut log = EventLog::new();
        let config = CombatConfig::default();

        let outcome = apply_damage(&mut enemy, &grunt, 60.0, 250, &config, &mut rng, &mut log);
        let report = match outcome {
            DamageOutcome::Killed(report) => report,
            other => panic!("expected kill, got {other:?}"),
        };
        assert_eq!(enemy.vitals.current, 0.0);
        assert_eq!(report.remove_at_ms, 1250);
        assert!(!report.level_completed);
        let drop = report.drop.unwrap();
        assert_eq!(drop.position, Vec3::new(2.0, 0.5, 3.0));

        // Further hits and kills change nothing
        assert_eq!(
            apply_damage(&mut enemy, &grunt, 10.0, 300, &config, &mut rng, &mut log),
            DamageOutcome::Ignored
        );
        assert!(kill(&mut enemy, &grunt, 300, &config, &mut rng, &mut log).is_none());
        assert_eq!(log.drops().count(), 1);
        assert_eq!(log.count_sound(Sound::EnemyDeath), 1);
        assert_eq!(log.count_sound(Sound::EnemyHit), 0);
        assert_eq!(enemy.remove_at_ms, Some(1250));
    }

    #[test]
    fn test_boss_kill_completes_level() {
        let table = ArchetypeTable::standard();
        let boss = table.get(ArchetypeId::Boss);
        let mut enemy = spawn(boss);
        let mut log = EventLog::new();

        let report = kill(
            &mut enemy,
            boss,
            0,
            &CombatConfig::default(),
            &mut StdRng::seed_from_u64(2),
            &mut log,
        )
        .unwrap();

        assert!(report.level_completed);
        // Boss always drops something
        assert!(report.drop.is_some());
        assert!(log.level_was_completed());
        assert_eq!(log.count_sound(Sound::BossDeath), 1);
        assert!(log
            .events
            .iter()
            .any(|e| matches!(e, HostEvent::Effect(Effect::Impact { kind: ImpactKind::Blood, .. }))));
    }
}
