//! Reference collision scene: axis-aligned boxes for level geometry and
//! spheres for the player and enemy bodies.
//!
//! Hosts with a real physics engine implement [`SpatialQuery`] themselves. This
//! scene exists so the combat core can run headless and be tested.

use crate::id::{EnemyId, EntityRef};
use crate::query::{RaycastHit, RaycastOptions, SpatialQuery};
use glam::Vec3;
use std::collections::BTreeMap;

const PARALLEL_EPSILON: f32 = 1e-8;

/// Axis-aligned box tagged as static geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub tag: u32,
    pub min: Vec3,
    pub max: Vec3,
}

/// Sphere body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub center: Vec3,
    pub radius: f32,
}

/// Box and sphere world implementing [`SpatialQuery`]
#[derive(Debug, Clone, Default)]
pub struct CollisionScene {
    obstacles: Vec<Obstacle>,
    player: Option<Body>,
    enemies: BTreeMap<EnemyId, Body>,
}

impl CollisionScene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a static box spanning `min..max`. Returns its entity reference.
    pub fn add_box(&mut self, min: Vec3, max: Vec3) -> EntityRef {
        let tag = self.obstacles.len() as u32;
        self.obstacles.push(Obstacle {
            tag,
            min: min.min(max),
            max: min.max(max),
        });
        EntityRef::Static(tag)
    }

    /// Place (or move) the player body
    pub fn set_player(&mut self, center: Vec3, radius: f32) {
        self.player = Some(Body { center, radius });
    }

    /// Place (or move) an enemy body
    pub fn set_enemy(&mut self, id: EnemyId, center: Vec3, radius: f32) {
        self.enemies.insert(id, Body { center, radius });
    }

    /// Remove an enemy body
    pub fn remove_enemy(&mut self, id: EnemyId) {
        self.enemies.remove(&id);
    }

    /// Keep only the enemy bodies for which `keep` returns true
    pub fn retain_enemies(&mut self, mut keep: impl FnMut(EnemyId) -> bool) {
        self.enemies.retain(|id, _| keep(*id));
    }

    /// Number of static boxes
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// Number of enemy bodies
    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    fn cast_box(origin: Vec3, dir: Vec3, obstacle: &Obstacle) -> Option<(f32, Vec3)> {
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut normal = Vec3::ZERO;

        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            let (lo, hi) = (obstacle.min[axis], obstacle.max[axis]);

            if d.abs() < PARALLEL_EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let (t0, t1) = {
                let a = (lo - o) * inv;
                let b = (hi - o) * inv;
                if a <= b { (a, b) } else { (b, a) }
            };

            if t0 > t_enter {
                t_enter = t0;
                normal = Vec3::ZERO;
                normal[axis] = -d.signum();
            }
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return None;
            }
        }

        // Origin inside the box: nothing to report.
        if t_enter < 0.0 {
            return None;
        }
        Some((t_enter, normal))
    }

    fn cast_sphere(origin: Vec3, dir: Vec3, body: &Body) -> Option<(f32, Vec3)> {
        let oc = origin - body.center;
        let b = oc.dot(dir);
        let c = oc.length_squared() - body.radius * body.radius;
        // Starting inside the sphere
        if c < 0.0 {
            return None;
        }
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let t = -b - discriminant.sqrt();
        if t < 0.0 {
            return None;
        }
        let point = origin + dir * t;
        Some((t, (point - body.center).normalize_or_zero()))
    }
}

impl SpatialQuery for CollisionScene {
    fn raycast(&self, origin: Vec3, direction: Vec3, options: &RaycastOptions) -> Option<RaycastHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }

        let mut best: Option<RaycastHit> = None;
        let mut consider = |t: f32, normal: Vec3, entity: EntityRef| {
            if t > options.max_distance || !options.accepts(Some(entity)) {
                return;
            }
            if best.map_or(true, |b| t < b.distance) {
                best = Some(RaycastHit {
                    point: origin + dir * t,
                    normal,
                    distance: t,
                    entity: Some(entity),
                });
            }
        };

        for obstacle in &self.obstacles {
            if let Some((t, n)) = Self::cast_box(origin, dir, obstacle) {
                consider(t, n, EntityRef::Static(obstacle.tag));
            }
        }
        if let Some(player) = &self.player {
            if let Some((t, n)) = Self::cast_sphere(origin, dir, player) {
                consider(t, n, EntityRef::Player);
            }
        }
        for (id, body) in &self.enemies {
            if let Some((t, n)) = Self::cast_sphere(origin, dir, body) {
                consider(t, n, EntityRef::Enemy(*id));
            }
        }

        best
    }
}
