//! Desired velocities and collision-aware movement

use crate::agent::flat;
use glam::Vec3;
use havoc_world::{EntityRef, RaycastOptions, SpatialQuery};

/// Horizontal direction from `from` to `to` scaled to `speed`
pub fn seek(from: Vec3, to: Vec3, speed: f32) -> Vec3 {
    flat(to - from).normalize_or_zero() * speed
}

/// Horizontal direction away from `threat` scaled to `speed`
pub fn flee(from: Vec3, threat: Vec3, speed: f32) -> Vec3 {
    flat(from - threat).normalize_or_zero() * speed
}

/// Sideways velocity around `target`. `bias` picks the side.
pub fn strafe(from: Vec3, target: Vec3, speed: f32, bias: f32) -> Vec3 {
    let to = flat(target - from);
    Vec3::new(to.z, 0.0, -to.x).normalize_or_zero() * speed * bias
}

/// Remove the component of `displacement` along `normal`
pub fn slide(displacement: Vec3, normal: Vec3) -> Vec3 {
    displacement - normal * displacement.dot(normal)
}

/// Move from `position` by `displacement`, sliding along the first surface
/// found on the way. Returns the new position.
pub fn move_with_slide<W: SpatialQuery + ?Sized>(
    position: Vec3,
    displacement: Vec3,
    mover: EntityRef,
    world: &W,
) -> Vec3 {
    let length = displacement.length();
    if length <= f32::EPSILON {
        return position;
    }

    let options = RaycastOptions::default()
        .excluding(mover)
        .with_max_distance(length);
    match world.raycast(position, displacement, &options) {
        None => position + displacement,
        Some(hit) => position + slide(displacement, hit.normal),
    }
}
