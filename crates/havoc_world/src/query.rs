//! Spatial queries (raycasting)

use crate::id::EntityRef;
use glam::Vec3;

/// Result of a raycast query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Hit point in world space
    pub point: Vec3,
    /// Surface normal at hit point (unit length)
    pub normal: Vec3,
    /// Distance from ray origin
    pub distance: f32,
    /// The entity that was hit, if the surface belongs to one
    pub entity: Option<EntityRef>,
}

impl RaycastHit {
    /// Whether the player was hit
    pub fn hit_player(&self) -> bool {
        self.entity == Some(EntityRef::Player)
    }
}

/// Options for raycast queries
#[derive(Debug, Clone)]
pub struct RaycastOptions {
    /// Maximum distance for the ray
    pub max_distance: f32,
    /// Entity to exclude (usually the caster)
    pub exclude: Option<EntityRef>,
    /// Skip every enemy body
    pub ignore_enemies: bool,
    /// Skip the player body
    pub ignore_player: bool,
}

impl Default for RaycastOptions {
    fn default() -> Self {
        Self {
            max_distance: f32::MAX,
            exclude: None,
            ignore_enemies: false,
            ignore_player: false,
        }
    }
}

impl RaycastOptions {
    /// Set maximum distance
    pub fn with_max_distance(mut self, distance: f32) -> Self {
        self.max_distance = distance;
        self
    }

    /// Exclude an entity
    pub fn excluding(mut self, entity: EntityRef) -> Self {
        self.exclude = Some(entity);
        self
    }

    /// Skip enemy bodies
    pub fn ignoring_enemies(mut self) -> Self {
        self.ignore_enemies = true;
        self
    }

    /// Skip the player body
    pub fn ignoring_player(mut self) -> Self {
        self.ignore_player = true;
        self
    }

    /// Whether a surface owned by `entity` passes the filter
    pub fn accepts(&self, entity: Option<EntityRef>) -> bool {
        match entity {
            None => true,
            Some(e) if Some(e) == self.exclude => false,
            Some(EntityRef::Enemy(_)) => !self.ignore_enemies,
            Some(EntityRef::Player) => !self.ignore_player,
            Some(EntityRef::Static(_)) => true,
        }
    }
}

/// Nearest-hit line query provided by the host world.
///
/// `direction` need not be normalized; implementations normalize it. A `None`
/// result means "no obstruction", never an error.
pub trait SpatialQuery {
    fn raycast(&self, origin: Vec3, direction: Vec3, options: &RaycastOptions) -> Option<RaycastHit>;
}

impl<T: SpatialQuery + ?Sized> SpatialQuery for &T {
    fn raycast(&self, origin: Vec3, direction: Vec3, options: &RaycastOptions) -> Option<RaycastHit> {
        (**self).raycast(origin, direction, options)
    }
}

/// A world with nothing in it. Every query misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyWorld;

impl SpatialQuery for EmptyWorld {
    fn raycast(&self, _origin: Vec3, _direction: Vec3, _options: &RaycastOptions) -> Option<RaycastHit> {
        None
    }
}
