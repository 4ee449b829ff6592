//! Per-kind decision functions
//!
//! [`decide`] is the single entry point. It updates the agent's state, facing,
//! velocity and timers, moves it with slide-aware collision, and returns the
//! attacks to resolve this tick. Resolving them is the caller's job.

use crate::agent::Agent;
use crate::patrol::{needs_new_target, pick_patrol_point};
use crate::state::{cadence_ms, AttackIntent, BehaviorKind, BehaviorState, BossPhase, SpecialAttack};
use crate::steering::{flee, move_with_slide, seek, strafe};
use crate::tuning::Tuning;
use glam::Vec3;
use havoc_world::{EntityRef, SpatialQuery};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Boss keeps at least this far from the player in phase 1
const BOSS_STANDOFF_MIN: f32 = 10.0;
/// Boss closes in when farther than this in phase 1
const BOSS_STANDOFF_MAX: f32 = 20.0;
/// Phase 2 engages out to this multiple of the range
const BOSS_AGGRESSIVE_REACH: f32 = 1.2;
/// Phase 2 approaches when farther than this
const BOSS_AGGRESSIVE_CLOSE: f32 = 15.0;
/// Phase 3 charges when farther than this
const BOSS_CHARGE_DISTANCE: f32 = 8.0;
/// Width of the modulo window that triggers a boss special
const BOSS_SPECIAL_WINDOW_MS: u64 = 100;

/// Movement and firing stats of an archetype
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngagementProfile {
    /// Units per second
    pub speed: f32,
    /// Engagement range
    pub range: f32,
    /// Shots per second
    pub fire_rate: f32,
}

/// Everything a decision needs besides the agent itself
#[derive(Debug, Clone, Copy)]
pub struct Situation {
    pub player: Vec3,
    pub now_ms: u64,
    /// Tick length in seconds
    pub dt: f32,
    /// Current health / max health of the agent
    pub health_fraction: f32,
    pub profile: EngagementProfile,
    /// The agent's own body, excluded from movement queries
    pub me: EntityRef,
}

/// Run one tick of the behavior for `kind`
pub fn decide<W, R>(
    kind: BehaviorKind,
    agent: &mut Agent,
    situation: &Situation,
    tuning: &Tuning,
    world: &W,
    rng: &mut R,
) -> Vec<AttackIntent>
where
    W: SpatialQuery + ?Sized,
    R: Rng + ?Sized,
{
    let intents = match kind {
        BehaviorKind::Base => decide_base(agent, situation, tuning, rng),
        BehaviorKind::Heavy => decide_heavy(agent, situation, tuning, rng),
        BehaviorKind::Boss => decide_boss(agent, situation, tuning, rng),
    };

    let displacement = agent.velocity * situation.dt.max(0.0);
    agent.position = move_with_slide(agent.position, displacement, situation.me, world);

    intents
}

fn decide_base<R: Rng + ?Sized>(
    agent: &mut Agent,
    situation: &Situation,
    tuning: &Tuning,
    rng: &mut R,
) -> Vec<AttackIntent> {
    let mut intents = Vec::new();
    let profile = &situation.profile;
    let player = situation.player;
    let distance = agent.position.distance(player);

    if distance <= profile.range {
        agent.face_towards(player, tuning.facing_epsilon);

        if distance <= profile.range * tuning.attack_band {
            agent.set_state(BehaviorState::Attacking);

            if agent.attack_ready(situation.now_ms, cadence_ms(1000.0, profile.fire_rate)) {
                intents.push(AttackIntent::Primary { target: player });
                agent.mark_attack(situation.now_ms);
            }

            agent.velocity = if distance < tuning.backup_distance {
                flee(agent.position, player, profile.speed * 0.5)
            } else {
                Vec3::ZERO
            };
        } else {
            agent.set_state(BehaviorState::Chasing);
            agent.velocity = seek(agent.position, player, profile.speed);
        }
    } else {
        agent.set_state(BehaviorState::Patrolling);

        if needs_new_target(agent.position, agent.patrol_target, tuning.arrive_threshold) {
            agent.patrol_target = Some(pick_patrol_point(agent.position, tuning.patrol_radius, rng));
        }

        let target = agent.patrol_target;
        match target {
            Some(target) if agent.face_towards(target, tuning.facing_epsilon) => {
                agent.velocity = seek(agent.position, target, profile.speed * 0.5);
            }
            _ => agent.velocity = Vec3::ZERO,
        }
    }

    intents
}

fn decide_heavy<R: Rng + ?Sized>(
    agent: &mut Agent,
    situation: &Situation,
    tuning: &Tuning,
    rng: &mut R,
) -> Vec<AttackIntent> {
    let mut intents = decide_base(agent, situation, tuning, rng);

    if agent.state == BehaviorState::Attacking
        && agent.special_ready(situation.now_ms, tuning.heavy_special_interval_ms)
    {
        intents.push(AttackIntent::Special(SpecialAttack::HeavyFan));
        agent.mark_special(situation.now_ms);
    }

    intents
}

fn decide_boss<R: Rng + ?Sized>(
    agent: &mut Agent,
    situation: &Situation,
    tuning: &Tuning,
    rng: &mut R,
) -> Vec<AttackIntent> {
    let mut intents = Vec::new();
    let profile = &situation.profile;
    let player = situation.player;
    let now = situation.now_ms;
    let distance = agent.position.distance(player);
    let phase = BossPhase::from_health_fraction(situation.health_fraction);

    agent.face_towards(player, tuning.facing_epsilon);

    let engaged = match phase {
        BossPhase::Composed => distance <= profile.range,
        BossPhase::Aggressive => distance <= profile.range * BOSS_AGGRESSIVE_REACH,
        BossPhase::Rage => true,
    };
    if !engaged {
        agent.set_state(BehaviorState::Idle);
        agent.velocity = Vec3::ZERO;
        return intents;
    }

    agent.set_state(match phase {
        BossPhase::Composed => BehaviorState::Attacking,
        BossPhase::Aggressive => BehaviorState::Aggressive,
        BossPhase::Rage => BehaviorState::Rage,
    });

    if agent.attack_ready(now, phase.attack_cadence_ms(profile.fire_rate)) {
        intents.push(AttackIntent::Primary { target: player });
        agent.mark_attack(now);
    }

    if let Some(period) = phase.special_period_ms() {
        let window = (period, now / period);
        if now % period < BOSS_SPECIAL_WINDOW_MS && agent.last_special_window != Some(window) {
            agent.last_special_window = Some(window);
            agent.mark_special(now);
            intents.push(AttackIntent::Special(SpecialAttack::for_boss_phase(phase)));
        }
    }

    let speed = profile.speed;
    agent.velocity = match phase {
        BossPhase::Composed => {
            if distance < BOSS_STANDOFF_MIN {
                flee(agent.position, player, speed * 0.7)
            } else if distance > BOSS_STANDOFF_MAX {
                seek(agent.position, player, speed * 0.7)
            } else {
                boss_strafe(agent, player, speed * 0.5, 0.01, rng)
            }
        }
        BossPhase::Aggressive => {
            if distance > BOSS_AGGRESSIVE_CLOSE {
                seek(agent.position, player, speed)
            } else {
                boss_strafe(agent, player, speed * 0.8, 0.02, rng)
            }
        }
        BossPhase::Rage => {
            if distance > BOSS_CHARGE_DISTANCE {
                seek(agent.position, player, speed * 1.5)
            } else {
                boss_strafe(agent, player, speed, 0.05, rng)
            }
        }
    };

    intents
}

fn boss_strafe<R: Rng + ?Sized>(agent: &mut Agent, player: Vec3, speed: f32, flip_chance: f64, rng: &mut R) -> Vec3 {
    if rng.gen_bool(flip_chance) {
        agent.flip_strafe();
    }
    strafe(agent.position, player, speed, agent.strafe_bias)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use havoc_world::query::EmptyWorld;
    use havoc_world::EnemyId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f32::consts::FRAC_PI_2;

    const GRUNT: EngagementProfile = EngagementProfile {
        speed: 5.0,
        range: 15.0,
        fire_rate: 1.0,
    };
    const BOSS: EngagementProfile = EngagementProfile {
        speed: 4.0,
        range: 30.0,
        fire_rate: 1.2,
    };

    fn situation(player: Vec3, now_ms: u64, profile: EngagementProfile, health_fraction: f32) -> Situation {
        Situation {
            player,
            now_ms,
            dt: 0.1,
            health_fraction,
            profile,
            me: EntityRef::Enemy(EnemyId::from_raw(1)),
        }
    }

    fn run(kind: BehaviorKind, agent: &mut Agent, s: &Situation, rng: &mut StdRng) -> Vec<AttackIntent> {
        decide(kind, agent, s, &Tuning::default(), &EmptyWorld, rng)
    }

    #[test]
    fn test_close_grunt_backs_away_and_fires() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut agent = Agent::new(Vec3::ZERO, 0);
        let player = Vec3::new(3.0, 0.0, 0.0);

        let intents = run(BehaviorKind::Base, &mut agent, &situation(player, 100, GRUNT, 1.0), &mut rng);

        assert_eq!(agent.state, BehaviorState::Attacking);
        assert_eq!(intents, vec![AttackIntent::Primary { target: player }]);
        assert_relative_eq!(agent.velocity.length(), 2.5);
        assert!(agent.velocity.dot(player) < 0.0);
        assert_relative_eq!(agent.position.x, -0.25);
    }

    #[test]
    fn test_grunt_holds_inside_band() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut agent = Agent::new(Vec3::ZERO, 0);
        let player = Vec3::new(0.0, 0.0, 8.0);

        run(BehaviorKind::Base, &mut agent, &situation(player, 0, GRUNT, 1.0), &mut rng);
        assert_eq!(agent.state, BehaviorState::Attacking);
        assert_eq!(agent.velocity, Vec3::ZERO);

        // Cooldown: no second shot 500 ms later
        let intents = run(BehaviorKind::Base, &mut agent, &situation(player, 500, GRUNT, 1.0), &mut rng);
        assert!(intents.is_empty());
        let intents = run(BehaviorKind::Base, &mut agent, &situation(player, 1000, GRUNT, 1.0), &mut rng);
        assert_eq!(intents.len(), 1);
    }

    #[test]
    fn test_grunt_chases_outside_band() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut agent = Agent::new(Vec3::ZERO, 0);
        let player = Vec3::new(0.0, 2.0, 12.0);

        let intents = run(BehaviorKind::Base, &mut agent, &situation(player, 0, GRUNT, 1.0), &mut rng);
        assert!(intents.is_empty());
        assert_eq!(agent.state, BehaviorState::Chasing);
        assert_relative_eq!(agent.velocity.z, 5.0);
        assert_eq!(agent.velocity.y, 0.0);
    }

    #[test]
    fn test_patrol_picks_target_within_radius() {
        let mut rng = StdRng::seed_from_u64(5);
        for seed_tick in 0..50 {
            let start = Vec3::new(1.0, 0.0, 1.0);
            let mut agent = Agent::new(start, 0);
            let player = Vec3::new(100.0, 0.0, 0.0);

            run(BehaviorKind::Base, &mut agent, &situation(player, seed_tick, GRUNT, 1.0), &mut rng);
            assert_eq!(agent.state, BehaviorState::Patrolling);
            let target = agent.patrol_target.unwrap();
            assert!(target.distance(start) <= 10.0 + 1e-4);
        }
    }

    #[test]
    fn test_patrol_walks_toward_target_at_half_speed() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut agent = Agent::new(Vec3::ZERO, 0);
        let target = Vec3::new(6.0, 0.0, 0.0);
        agent.patrol_target = Some(target);

        run(BehaviorKind::Base, &mut agent, &situation(Vec3::splat(500.0), 0, GRUNT, 1.0), &mut rng);

        assert_eq!(agent.state, BehaviorState::Patrolling);
        assert_eq!(agent.patrol_target, Some(target));
        assert_relative_eq!(agent.velocity.x, 2.5);
        assert_relative_eq!(agent.yaw, FRAC_PI_2);
        assert_relative_eq!(agent.position.x, 0.25);
    }

    #[test]
    fn test_patrol_retargets_when_reached() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut agent = Agent::new(Vec3::ZERO, 0);
        let stale = Vec3::new(0.5, 0.0, 0.0);
        agent.patrol_target = Some(stale);

        run(BehaviorKind::Base, &mut agent, &situation(Vec3::splat(500.0), 0, GRUNT, 1.0), &mut rng);
        assert_ne!(agent.patrol_target, Some(stale));
    }

    #[test]
    fn test_heavy_fan_every_five_seconds() {
        let mut rng = StdRng::seed_from_u64(0);
        let profile = EngagementProfile {
            speed: 3.0,
            range: 15.0,
            fire_rate: 0.5,
        };
        let mut agent = Agent::new(Vec3::ZERO, 0);
        let player = Vec3::new(8.0, 0.0, 0.0);
        let fan = AttackIntent::Special(SpecialAttack::HeavyFan);

        let early = run(BehaviorKind::Heavy, &mut agent, &situation(player, 1000, profile, 1.0), &mut rng);
        assert!(!early.contains(&fan));

        let due = run(BehaviorKind::Heavy, &mut agent, &situation(player, 5000, profile, 1.0), &mut rng);
        assert!(due.contains(&fan));

        let again = run(BehaviorKind::Heavy, &mut agent, &situation(player, 9000, profile, 1.0), &mut rng);
        assert!(!again.contains(&fan));
        let later = run(BehaviorKind::Heavy, &mut agent, &situation(player, 10000, profile, 1.0), &mut rng);
        assert!(later.contains(&fan));
    }

    #[test]
    fn test_heavy_no_fan_while_chasing() {
        let mut rng = StdRng::seed_from_u64(0);
        let profile = EngagementProfile {
            speed: 3.0,
            range: 15.0,
            fire_rate: 0.5,
        };
        let mut agent = Agent::new(Vec3::ZERO, 0);

        let intents = run(
            BehaviorKind::Heavy,
            &mut agent,
            &situation(Vec3::new(14.0, 0.0, 0.0), 60_000, profile, 1.0),
            &mut rng,
        );
        assert_eq!(agent.state, BehaviorState::Chasing);
        assert!(intents.is_empty());
    }

    #[test]
    fn test_boss_phase_one_keeps_standoff() {
        let mut rng = StdRng::seed_from_u64(0);
        let player = Vec3::new(0.0, 0.0, 5.0);
        let mut agent = Agent::new(Vec3::ZERO, 0);

        let intents = run(BehaviorKind::Boss, &mut agent, &situation(player, 0, BOSS, 0.9), &mut rng);
        assert_eq!(agent.state, BehaviorState::Attacking);
        assert_eq!(intents.len(), 1);
        assert_relative_eq!(agent.velocity.z, -2.8);

        let mut far = Agent::new(Vec3::ZERO, 0);
        run(BehaviorKind::Boss, &mut far, &situation(Vec3::new(0.0, 0.0, 25.0), 0, BOSS, 0.9), &mut rng);
        assert_relative_eq!(far.velocity.z, 2.8);
    }

    #[test]
    fn test_boss_idles_out_of_reach() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut agent = Agent::new(Vec3::ZERO, 0);
        agent.velocity = Vec3::ONE;

        let intents = run(BehaviorKind::Boss, &mut agent, &situation(Vec3::new(0.0, 0.0, 35.0), 0, BOSS, 0.5), &mut rng);
        // 35 <= 1.2 * 30: phase 2 still engages
        assert_eq!(agent.state, BehaviorState::Aggressive);
        assert!(!intents.is_empty());

        let mut idle = Agent::new(Vec3::ZERO, 0);
        idle.velocity = Vec3::ONE;
        let intents = run(BehaviorKind::Boss, &mut idle, &situation(Vec3::new(0.0, 0.0, 40.0), 0, BOSS, 0.5), &mut rng);
        assert_eq!(idle.state, BehaviorState::Idle);
        assert_eq!(idle.velocity, Vec3::ZERO);
        assert!(intents.is_empty());
    }

    #[test]
    fn test_boss_ring_once_per_window() {
        let mut rng = StdRng::seed_from_u64(0);
        let player = Vec3::new(0.0, 0.0, 12.0);
        let mut agent = Agent::new(Vec3::ZERO, 0);
        let ring = AttackIntent::Special(SpecialAttack::BossRing);

        let first = run(BehaviorKind::Boss, &mut agent, &situation(player, 8010, BOSS, 0.5), &mut rng);
        assert!(first.contains(&ring));
        let same_window = run(BehaviorKind::Boss, &mut agent, &situation(player, 8050, BOSS, 0.5), &mut rng);
        assert!(!same_window.contains(&ring));
        let outside = run(BehaviorKind::Boss, &mut agent, &situation(player, 9000, BOSS, 0.5), &mut rng);
        assert!(!outside.contains(&ring));
        let next = run(BehaviorKind::Boss, &mut agent, &situation(player, 12_000, BOSS, 0.5), &mut rng);
        assert!(next.contains(&ring));
    }

    #[test]
    fn test_boss_rage_charges_from_any_distance() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut agent = Agent::new(Vec3::ZERO, 0);

        let intents = run(
            BehaviorKind::Boss,
            &mut agent,
            &situation(Vec3::new(200.0, 0.0, 0.0), 1500, BOSS, 0.1),
            &mut rng,
        );
        assert_eq!(agent.state, BehaviorState::Rage);
        assert_relative_eq!(agent.velocity.x, 6.0);
        assert_eq!(intents, vec![AttackIntent::Primary { target: Vec3::new(200.0, 0.0, 0.0) }]);

        let nova = run(BehaviorKind::Boss, &mut agent, &situation(Vec3::new(200.0, 0.0, 0.0), 3050, BOSS, 0.1), &mut rng);
        assert!(nova.contains(&AttackIntent::Special(SpecialAttack::BossNova)));
    }

    #[test]
    fn test_boss_strafe_speed_by_phase() {
        let mut rng = StdRng::seed_from_u64(0);
        let player = Vec3::new(0.0, 0.0, 6.0);

        let mut rage = Agent::new(Vec3::ZERO, 0);
        run(BehaviorKind::Boss, &mut rage, &situation(player, 500, BOSS, 0.1), &mut rng);
        assert_relative_eq!(rage.velocity.length(), 4.0, epsilon = 1e-5);
        assert_relative_eq!(rage.velocity.z, 0.0);

        let mut mid = Agent::new(Vec3::ZERO, 0);
        run(BehaviorKind::Boss, &mut mid, &situation(Vec3::new(0.0, 0.0, 12.0), 500, BOSS, 0.5), &mut rng);
        assert_relative_eq!(mid.velocity.length(), 3.2, epsilon = 1e-5);
    }
}
