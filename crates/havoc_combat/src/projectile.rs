//! Straight-line projectiles
//!
//! A projectile moves `speed * dt` per tick and re-queries the world along the
//! segment it just travelled. It resolves at most once: after a hit, or after
//! exceeding its travel distance or lifetime, it is retired and never advanced
//! again.

use glam::Vec3;
use havoc_world::{EnemyId, EntityRef, ProjectileId, RaycastHit, RaycastOptions, SpatialQuery};
use serde::{Deserialize, Serialize};

/// Projectile power tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectileTier {
    /// Rockets and heavy fan shots
    Standard,
    /// Boss plasma bolt
    Plasma,
    /// Boss ring and player BFG
    Bfg,
}

impl ProjectileTier {
    /// Enemy launch speed (units/s)
    pub fn speed(&self) -> f32 {
        match self {
            ProjectileTier::Standard => 15.0,
            ProjectileTier::Plasma => 20.0,
            ProjectileTier::Bfg => 15.0,
        }
    }

    /// Multiplier applied to the shooter's base damage
    pub fn damage_factor(&self) -> f32 {
        match self {
            ProjectileTier::Standard => 1.0,
            ProjectileTier::Plasma => 1.5,
            ProjectileTier::Bfg => 3.0,
        }
    }

    /// Explosion radius on impact
    pub fn explosion_radius(&self) -> f32 {
        match self {
            ProjectileTier::Standard => 2.0,
            ProjectileTier::Plasma => 3.0,
            ProjectileTier::Bfg => 5.0,
        }
    }

    /// Trail style name
    pub fn trail(&self) -> &'static str {
        match self {
            ProjectileTier::Standard => "rocket",
            ProjectileTier::Plasma => "plasma",
            ProjectileTier::Bfg => "bfg",
        }
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Allegiance {
    Player,
    Enemy(EnemyId),
}

impl Allegiance {
    /// The entity reference a query should exclude
    pub fn entity(&self) -> EntityRef {
        match self {
            Allegiance::Player => EntityRef::Player,
            Allegiance::Enemy(id) => EntityRef::Enemy(*id),
        }
    }

    /// Filter for the projectile's flight path. Enemy shots pass through every
    /// enemy; player shots pass through the player.
    pub fn flight_filter(&self) -> RaycastOptions {
        match self {
            Allegiance::Player => RaycastOptions::default().ignoring_player(),
            Allegiance::Enemy(id) => RaycastOptions::default()
                .excluding(EntityRef::Enemy(*id))
                .ignoring_enemies(),
        }
    }
}

/// Launch parameters for a projectile, before it has an id or owner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpawn {
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
    pub speed: f32,
    pub damage: f32,
    /// Explosion radius (0 = direct hit only)
    pub radius: f32,
    pub tier: ProjectileTier,
}

impl ProjectileSpawn {
    /// Enemy shot using the tier table
    pub fn enemy(tier: ProjectileTier, origin: Vec3, direction: Vec3, base_damage: f32) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            speed: tier.speed(),
            damage: base_damage * tier.damage_factor(),
            radius: tier.explosion_radius(),
            tier,
        }
    }
}

/// Result of advancing a projectile by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileStep {
    /// Still in flight
    Flying,
    /// Struck something this tick
    Hit(RaycastHit),
    /// Exceeded travel distance or lifetime (or was already retired)
    Expired,
}

/// An in-flight projectile
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: ProjectileId,
    pub owner: Allegiance,
    pub tier: ProjectileTier,
    pub origin: Vec3,
    pub position: Vec3,
    pub direction: Vec3,
    pub speed: f32,
    pub damage: f32,
    pub radius: f32,
    pub created_at_ms: u64,
    /// Retire once this far from `origin`
    pub max_travel: f32,
    /// Retire once this old
    pub max_lifetime_ms: Option<u64>,
    retired: bool,
}

impl Projectile {
    /// Launch a projectile at `now_ms`
    pub fn launch(id: ProjectileId, owner: Allegiance, spawn: ProjectileSpawn, now_ms: u64) -> Self {
        Self {
            id,
            owner,
            tier: spawn.tier,
            origin: spawn.origin,
            position: spawn.origin,
            direction: spawn.direction.normalize_or_zero(),
            speed: spawn.speed,
            damage: spawn.damage,
            radius: spawn.radius,
            created_at_ms: now_ms,
            max_travel: f32::INFINITY,
            max_lifetime_ms: None,
            retired: false,
        }
    }

    /// Set the maximum travel distance
    pub fn with_max_travel(mut self, distance: f32) -> Self {
        self.max_travel = distance;
        self
    }

    /// Set the maximum lifetime
    pub fn with_lifetime(mut self, lifetime_ms: u64) -> Self {
        self.max_lifetime_ms = Some(lifetime_ms);
        self
    }

    /// Whether the projectile has resolved
    pub fn is_retired(&self) -> bool {
        self.retired
    }

    /// Retire without resolving (bulk teardown)
    pub fn retire(&mut self) {
        self.retired = true;
    }

    /// Distance from the launch point
    pub fn travelled(&self) -> f32 {
        self.position.distance(self.origin)
    }

    /// Move one tick and test the swept segment
    pub fn advance<W: SpatialQuery + ?Sized>(&mut self, dt: f32, now_ms: u64, world: &W) -> ProjectileStep {
        if self.retired {
            return ProjectileStep::Expired;
        }

        let step = self.speed * dt.max(0.0);
        if step > 0.0 {
            let options = self.owner.flight_filter().with_max_distance(step);
            if let Some(hit) = world.raycast(self.position, self.direction, &options) {
                self.position = hit.point;
                self.retired = true;
                return ProjectileStep::Hit(hit);
            }
            self.position += self.direction * step;
        }

        let too_far = self.travelled() > self.max_travel;
        let too_old = self
            .max_lifetime_ms
            .map_or(false, |limit| now_ms.saturating_sub(self.created_at_ms) > limit);
        if too_far || too_old {
            self.retired = true;
            log::trace!("projectile {:?} expired at {:?}", self.id, self.position);
            return ProjectileStep::Expired;
        }

        ProjectileStep::Flying
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use havoc_world::query::EmptyWorld;
    use havoc_world::CollisionScene;

    fn rocket(owner: Allegiance) -> Projectile {
        let spawn = ProjectileSpawn::enemy(ProjectileTier::Standard, Vec3::ZERO, Vec3::X, 20.0);
        Projectile::launch(ProjectileId::from_raw(1), owner, spawn, 0).with_max_travel(100.0)
    }

    #[test]
    fn test_tier_table() {
        let spawn = ProjectileSpawn::enemy(ProjectileTier::Plasma, Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0), 40.0);
        assert_relative_eq!(spawn.damage, 60.0);
        assert_relative_eq!(spawn.speed, 20.0);
        assert_relative_eq!(spawn.radius, 3.0);
        assert_relative_eq!(spawn.direction.length(), 1.0);
        assert_relative_eq!(ProjectileTier::Bfg.damage_factor(), 3.0);
    }

    #[test]
    fn test_hits_wall_once() {
        let mut scene = CollisionScene::new();
        scene.add_box(Vec3::new(2.0, -1.0, -1.0), Vec3::new(3.0, 1.0, 1.0));
        let mut p = rocket(Allegiance::Enemy(EnemyId::from_raw(5)));

        // 15 units/s for 0.1 s = 1.5 units: no contact yet
        assert_eq!(p.advance(0.1, 100, &scene), ProjectileStep::Flying);
        match p.advance(0.1, 200, &scene) {
            ProjectileStep::Hit(hit) => assert_relative_eq!(hit.point.x, 2.0),
            other => panic!("expected hit, got {other:?}"),
        }
        assert!(p.is_retired());
        assert_eq!(p.advance(0.1, 300, &scene), ProjectileStep::Expired);
    }

    #[test]
    fn test_enemy_shots_pass_through_enemies() {
        let mut scene = CollisionScene::new();
        scene.set_enemy(EnemyId::from_raw(9), Vec3::new(1.0, 0.0, 0.0), 0.5);
        scene.set_player(Vec3::new(2.5, 0.0, 0.0), 0.5);
        let mut p = rocket(Allegiance::Enemy(EnemyId::from_raw(5)));

        match p.advance(0.2, 200, &scene) {
            ProjectileStep::Hit(hit) => assert!(hit.hit_player()),
            other => panic!("expected player hit, got {other:?}"),
        }
    }

    #[test]
    fn test_player_shots_pass_through_player() {
        let mut scene = CollisionScene::new();
        scene.set_player(Vec3::new(1.0, 0.0, 0.0), 0.5);
        let id = EnemyId::from_raw(2);
        scene.set_enemy(id, Vec3::new(2.5, 0.0, 0.0), 0.5);
        let mut p = rocket(Allegiance::Player);

        match p.advance(0.2, 200, &scene) {
            ProjectileStep::Hit(hit) => assert_eq!(hit.entity, Some(EntityRef::Enemy(id))),
            other => panic!("expected enemy hit, got {other:?}"),
        }
    }

    #[test]
    fn test_expires_after_max_travel() {
        let mut p = rocket(Allegiance::Enemy(EnemyId::from_raw(1)));
        let mut now = 0;
        let mut steps = 0;
        while p.advance(1.0, now, &EmptyWorld) == ProjectileStep::Flying {
            now += 1000;
            steps += 1;
        }
        // 15 units per step, retire once past 100
        assert_eq!(steps, 6);
        assert!(p.is_retired());
    }

    #[test]
    fn test_expires_after_lifetime() {
        let mut p = rocket(Allegiance::Player).with_lifetime(5000);
        p.max_travel = f32::INFINITY;
        assert_eq!(p.advance(0.016, 4000, &EmptyWorld), ProjectileStep::Flying);
        assert_eq!(p.advance(0.016, 5001, &EmptyWorld), ProjectileStep::Expired);
    }
}
