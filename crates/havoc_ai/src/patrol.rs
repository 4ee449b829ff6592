//! Random patrol points

use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

/// Random point within `radius` of `origin` on the same horizontal plane
pub fn pick_patrol_point<R: Rng + ?Sized>(origin: Vec3, radius: f32, rng: &mut R) -> Vec3 {
    let angle = rng.gen::<f32>() * TAU;
    let distance = rng.gen::<f32>() * radius.max(0.0);
    Vec3::new(
        origin.x + angle.sin() * distance,
        origin.y,
        origin.z + angle.cos() * distance,
    )
}

/// Whether a new patrol target is needed
pub fn needs_new_target(position: Vec3, target: Option<Vec3>, arrive_threshold: f32) -> bool {
    match target {
        None => true,
        Some(t) => position.distance(t) < arrive_threshold,
    }
}
