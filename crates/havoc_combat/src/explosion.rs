//! Explosion falloff and allegiance scaling

use crate::projectile::{Allegiance, ProjectileTier};
use glam::Vec3;
use havoc_world::EnemyId;
use serde::{Deserialize, Serialize};

/// Linear falloff: `base * (1 - distance / radius)` inside the radius, 0 outside.
pub fn falloff(base: f32, distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 || distance > radius {
        return 0.0;
    }
    base * (1.0 - distance / radius)
}

/// Damage multipliers for splash that reaches the shooter's own side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlastScaling {
    /// Enemy explosion hitting a different enemy
    pub friendly_fire: f32,
    /// Player explosion hitting the player
    pub self_damage: f32,
}

impl Default for BlastScaling {
    fn default() -> Self {
        Self {
            friendly_fire: 0.5,
            self_damage: 0.5,
        }
    }
}

/// A resolved explosion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blast {
    pub center: Vec3,
    pub radius: f32,
    /// Damage at the center
    pub damage: f32,
    pub owner: Allegiance,
    pub tier: ProjectileTier,
}

impl Blast {
    /// Damage dealt to the player standing at `position`
    pub fn player_damage(&self, position: Vec3, scaling: &BlastScaling) -> f32 {
        let raw = falloff(self.damage, self.center.distance(position), self.radius);
        match self.owner {
            Allegiance::Enemy(_) => raw,
            Allegiance::Player => raw * scaling.self_damage,
        }
    }

    /// Damage dealt to enemy `id` standing at `position`. The owning enemy is
    /// never hurt by its own blast.
    pub fn enemy_damage(&self, id: EnemyId, position: Vec3, scaling: &BlastScaling) -> f32 {
        let raw = falloff(self.damage, self.center.distance(position), self.radius);
        match self.owner {
            Allegiance::Enemy(owner) if owner == id => 0.0,
            Allegiance::Enemy(_) => raw * scaling.friendly_fire,
            Allegiance::Player => raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_falloff() {
        assert_relative_eq!(falloff(100.0, 0.0, 5.0), 100.0);
        assert_relative_eq!(falloff(100.0, 2.5, 5.0), 50.0);
        assert_relative_eq!(falloff(100.0, 5.0, 5.0), 0.0);
        assert_eq!(falloff(100.0, 5.01, 5.0), 0.0);
        assert_eq!(falloff(100.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_enemy_blast_scaling() {
        let owner = EnemyId::from_raw(1);
        let other = EnemyId::from_raw(2);
        let blast = Blast {
            center: Vec3::ZERO,
            radius: 2.0,
            damage: 40.0,
            owner: Allegiance::Enemy(owner),
            tier: ProjectileTier::Standard,
        };
        let scaling = BlastScaling::default();

        assert_relative_eq!(blast.player_damage(Vec3::new(1.0, 0.0, 0.0), &scaling), 20.0);
        assert_relative_eq!(blast.enemy_damage(other, Vec3::new(1.0, 0.0, 0.0), &scaling), 10.0);
        assert_eq!(blast.enemy_damage(owner, Vec3::ZERO, &scaling), 0.0);
        assert_eq!(blast.player_damage(Vec3::new(3.0, 0.0, 0.0), &scaling), 0.0);
    }

    #[test]
    fn test_player_blast_scaling() {
        let blast = Blast {
            center: Vec3::ZERO,
            radius: 10.0,
            damage: 200.0,
            owner: Allegiance::Player,
            tier: ProjectileTier::Bfg,
        };
        let scaling = BlastScaling::default();

        assert_relative_eq!(blast.enemy_damage(EnemyId::from_raw(3), Vec3::new(0.0, 0.0, 5.0), &scaling), 100.0);
        assert_relative_eq!(blast.player_damage(Vec3::new(0.0, 0.0, 5.0), &scaling), 50.0);
    }
}
