//! Behavior states, boss phases and attack intents

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// What an enemy is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorState {
    Idle,
    Patrolling,
    Chasing,
    Attacking,
    /// Boss phase 2 engagement
    Aggressive,
    /// Boss phase 3
    Rage,
}

impl Default for BehaviorState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Which decision function drives an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorKind {
    /// Patrol, chase, hold and shoot
    Base,
    /// Base plus a periodic fan special
    Heavy,
    /// Three-phase boss
    Boss,
}

/// Boss phase, selected from the health fraction every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossPhase {
    /// Above 70% health
    Composed,
    /// 30% to 70% health
    Aggressive,
    /// Below 30% health
    Rage,
}

impl BossPhase {
    /// Phase for a health fraction. There is no hysteresis: a boss hovering on a
    /// boundary may switch phase every tick.
    pub fn from_health_fraction(fraction: f32) -> Self {
        if fraction < 0.3 {
            BossPhase::Rage
        } else if fraction < 0.7 {
            BossPhase::Aggressive
        } else {
            BossPhase::Composed
        }
    }

    /// Milliseconds between primary attacks
    pub fn attack_cadence_ms(&self, fire_rate: f32) -> f32 {
        let base = match self {
            BossPhase::Composed => 1000.0,
            BossPhase::Aggressive => 800.0,
            BossPhase::Rage => 500.0,
        };
        cadence_ms(base, fire_rate)
    }

    /// Period of the modulo-triggered special, if this phase has one
    pub fn special_period_ms(&self) -> Option<u64> {
        match self {
            BossPhase::Composed => None,
            BossPhase::Aggressive => Some(4000),
            BossPhase::Rage => Some(3000),
        }
    }
}

/// `base / fire_rate`, or infinity for a weapon that never fires
pub fn cadence_ms(base: f32, fire_rate: f32) -> f32 {
    if fire_rate > 0.0 {
        base / fire_rate
    } else {
        f32::INFINITY
    }
}

/// Archetype-gated attacks that bypass the single-shot path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialAttack {
    /// Five standard projectiles fanned around the facing
    HeavyFan,
    /// One plasma bolt aimed at the player
    BossPlasma,
    /// Eight bfg projectiles in a full circle
    BossRing,
    /// Large explosion centred on the boss
    BossNova,
}

impl SpecialAttack {
    /// The boss special used in each phase
    pub fn for_boss_phase(phase: BossPhase) -> Self {
        match phase {
            BossPhase::Composed => SpecialAttack::BossPlasma,
            BossPhase::Aggressive => SpecialAttack::BossRing,
            BossPhase::Rage => SpecialAttack::BossNova,
        }
    }
}

/// An attack the AI wants resolved this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackIntent {
    /// Regular shot at a target position
    Primary { target: Vec3 },
    /// Special attack
    Special(SpecialAttack),
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_phase_selection() {
        assert_eq!(BossPhase::from_health_fraction(1.0), BossPhase::Composed);
        assert_eq!(BossPhase::from_health_fraction(0.75), BossPhase::Composed);
        assert_eq!(BossPhase::from_health_fraction(0.7), BossPhase::Composed);
        assert_eq!(BossPhase::from_health_fraction(0.5), BossPhase::Aggressive);
        assert_eq!(BossPhase::from_health_fraction(0.3), BossPhase::Aggressive);
        assert_eq!(BossPhase::from_health_fraction(0.2), BossPhase::Rage);
        assert_eq!(BossPhase::from_health_fraction(0.0), BossPhase::Rage);
    }

    #[test]
    fn test_phase_cadence() {
        let fire_rate = 1.2;
        assert_relative_eq!(BossPhase::from_health_fraction(0.75).attack_cadence_ms(fire_rate), 1000.0 / 1.2);
        assert_relative_eq!(BossPhase::from_health_fraction(0.5).attack_cadence_ms(fire_rate), 800.0 / 1.2);
        assert_relative_eq!(BossPhase::from_health_fraction(0.2).attack_cadence_ms(fire_rate), 500.0 / 1.2);
        assert!(BossPhase::Rage.attack_cadence_ms(0.0).is_infinite());
    }

    #[test]
    fn test_boss_specials_by_phase() {
        assert_eq!(SpecialAttack::for_boss_phase(BossPhase::Composed), SpecialAttack::BossPlasma);
        assert_eq!(SpecialAttack::for_boss_phase(BossPhase::Aggressive), SpecialAttack::BossRing);
        assert_eq!(SpecialAttack::for_boss_phase(BossPhase::Rage), SpecialAttack::BossNova);
        assert_eq!(BossPhase::Composed.special_period_ms(), None);
    }
}
