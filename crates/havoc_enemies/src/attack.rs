//! Attack resolution
//!
//! Turns [`AttackIntent`](havoc_ai::AttackIntent)s into host side effects. Hitscan shots
//! resolve immediately; projectile shots come back as [`ProjectileSpawn`]s for
//! the roster to launch.

use crate::archetype::{Archetype, AttackMode};
use crate::config::CombatConfig;
use glam::Vec3;
use havoc_ai::agent::yaw_direction;
use havoc_ai::SpecialAttack;
use havoc_combat::{falloff, scatter, CombatHost, Effect, ImpactKind, ProjectileSpawn, ProjectileTier, Sound};
use havoc_world::{EnemyId, EntityRef, RaycastHit, RaycastOptions, SpatialQuery};
use rand::Rng;
use std::f32::consts::PI;

/// Projectiles in a heavy fan
const FAN_COUNT: usize = 5;
/// Angle between neighbouring fan projectiles
const FAN_STEP: f32 = PI / 10.0;
/// Projectiles in a boss ring
const RING_COUNT: usize = 8;

/// The enemy taking a shot, as seen at the start of the tick
#[derive(Debug, Clone, Copy)]
pub struct Shooter<'a> {
    pub id: EnemyId,
    pub archetype: &'a Archetype,
    pub position: Vec3,
    pub yaw: f32,
}

impl Shooter<'_> {
    /// Where shots leave the body
    pub fn muzzle(&self, config: &CombatConfig) -> Vec3 {
        self.position + Vec3::Y * config.muzzle_height
    }
}

/// Resolve a primary attack at `target`. Returns the projectile to launch for
/// projectile archetypes.
pub fn resolve_primary<W, R, H>(
    shooter: &Shooter<'_>,
    target: Vec3,
    config: &CombatConfig,
    world: &W,
    rng: &mut R,
    host: &mut H,
) -> Option<ProjectileSpawn>
where
    W: SpatialQuery + ?Sized,
    R: Rng + ?Sized,
    H: CombatHost + ?Sized,
{
    let archetype = shooter.archetype;
    let origin = shooter.muzzle(config);
    let aim = (target - origin).normalize_or_zero();
    let direction = scatter(aim, archetype.id.inaccuracy(), rng);

    host.trigger_effect(Effect::MuzzleFlash {
        position: origin,
        weapon: archetype.id.muzzle_class(),
    });
    host.play_sound(archetype.id.attack_sound());
    log::debug!("{} {} fires at {:?}", archetype.id, shooter.id, target);

    match archetype.id.attack_mode() {
        AttackMode::Hitscan => {
            let options = RaycastOptions::default()
                .excluding(EntityRef::Enemy(shooter.id))
                .ignoring_enemies()
                .with_max_distance(config.hitscan_range);
            resolve_hitscan(origin, direction, archetype.damage, &options, world, host);
            None
        }
        AttackMode::Projectile => Some(ProjectileSpawn::enemy(
            ProjectileTier::Standard,
            origin,
            direction,
            archetype.damage,
        )),
    }
}

/// Trace one hitscan ray. A player hit deals `damage`; any hit leaves an
/// impact. Nothing happens on a miss.
pub fn resolve_hitscan<W, H>(
    origin: Vec3,
    direction: Vec3,
    damage: f32,
    options: &RaycastOptions,
    world: &W,
    host: &mut H,
) -> Option<RaycastHit>
where
    W: SpatialQuery + ?Sized,
    H: CombatHost + ?Sized,
{
    let hit = world.raycast(origin, direction, options)?;

    let kind = if hit.hit_player() {
        host.damage_player(damage);
        ImpactKind::Blood
    } else {
        ImpactKind::Standard
    };
    host.trigger_effect(Effect::Impact {
        position: hit.point,
        normal: hit.normal,
        kind,
    });

    Some(hit)
}

/// Resolve a special attack. Returns the projectiles to launch.
pub fn resolve_special<H: CombatHost + ?Sized>(
    shooter: &Shooter<'_>,
    special: SpecialAttack,
    player: Vec3,
    config: &CombatConfig,
    host: &mut H,
) -> Vec<ProjectileSpawn> {
    let origin = shooter.muzzle(config);
    let damage = shooter.archetype.damage;
    log::debug!("{} {} uses {:?}", shooter.archetype.id, shooter.id, special);

    match special {
        SpecialAttack::HeavyFan => {
            host.play_sound(Sound::HeavySpecial);
            (0..FAN_COUNT)
                .map(|i| {
                    let yaw = shooter.yaw + (i as f32 - 2.0) * FAN_STEP;
                    ProjectileSpawn::enemy(ProjectileTier::Standard, origin, yaw_direction(yaw), damage)
                })
                .collect()
        }
        SpecialAttack::BossRing => {
            host.play_sound(Sound::BossSpecial);
            (0..RING_COUNT)
                .map(|i| {
                    let angle = i as f32 * PI / 4.0;
                    ProjectileSpawn::enemy(ProjectileTier::Bfg, origin, yaw_direction(angle), damage)
                })
                .collect()
        }
        SpecialAttack::BossPlasma => {
            host.play_sound(Sound::BossSpecial);
            vec![ProjectileSpawn::enemy(
                ProjectileTier::Plasma,
                origin,
                player - origin,
                damage,
            )]
        }
        SpecialAttack::BossNova => {
            host.trigger_effect(Effect::Explosion {
                position: shooter.position,
                radius: config.nova_radius,
                tier: ProjectileTier::Bfg,
            });
            host.play_sound(Sound::BossExplosion);

            let amount = falloff(
                damage * config.nova_damage_factor,
                shooter.position.distance(player),
                config.nova_radius,
            );
            if amount > 0.0 {
                host.damage_player(amount);
            }

            host.play_sound(Sound::BossSpecial);
            Vec::new()
        }
    }
}
