//! Havoc World - Spatial Queries
//!
//! The combat core never owns level geometry. Everything it needs to know about
//! the world goes through [`SpatialQuery`]: "what is the nearest blocking
//! surface along this straight line?"
//!
//! # Features
//!
//! - Entity references and ids shared by every Havoc crate
//! - Raycast options with self-exclusion and an "ignore enemies" filter
//! - Hit results carrying a surface normal (used for slide movement)
//! - [`CollisionScene`], a small box/sphere world for tests and headless hosts
//!
//! # Example
//!
//! ```ignore
//! use havoc_world::prelude::*;
//!
//! let mut scene = CollisionScene::new();
//! scene.add_box(Vec3::new(4.0, 0.0, -1.0), Vec3::new(5.0, 3.0, 1.0));
//! scene.set_player(Vec3::new(10.0, 1.0, 0.0), 0.5);
//!
//! let hit = scene.raycast(Vec3::ZERO, Vec3::X, &RaycastOptions::default());
//! ```

pub mod id;
pub mod query;
pub mod scene;

pub mod prelude {
    pub use crate::id::{EnemyId, EntityRef, IdGenerator, ProjectileId};
    pub use crate::query::{EmptyWorld, RaycastHit, RaycastOptions, SpatialQuery};
    pub use crate::scene::CollisionScene;
    pub use glam::Vec3;
}

pub use prelude::*;
