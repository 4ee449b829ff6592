//! Per-enemy kinematics and behavior memory

use crate::state::BehaviorState;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Horizontal component of a vector
#[inline]
pub fn flat(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Unit vector for a yaw angle (0 faces +Z)
#[inline]
pub fn yaw_direction(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Kinematic and decision state the AI mutates every tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub position: Vec3,
    /// Rotation about +Y, `atan2(dx, dz)` of the facing direction
    pub yaw: f32,
    pub velocity: Vec3,
    pub state: BehaviorState,
    pub patrol_target: Option<Vec3>,
    /// +1 or -1
    pub strafe_bias: f32,
    /// `None` until the first primary attack
    pub last_attack_ms: Option<u64>,
    pub last_special_ms: u64,
    /// (period, window index) of the last modulo-triggered boss special
    pub last_special_window: Option<(u64, u64)>,
}

impl Agent {
    /// Fresh agent at `position`, spawned at `now_ms`
    pub fn new(position: Vec3, now_ms: u64) -> Self {
        Self {
            position,
            yaw: 0.0,
            velocity: Vec3::ZERO,
            state: BehaviorState::Idle,
            patrol_target: None,
            strafe_bias: 1.0,
            last_attack_ms: None,
            last_special_ms: now_ms,
            last_special_window: None,
        }
    }

    /// Change state, tracing transitions
    pub fn set_state(&mut self, state: BehaviorState) {
        if self.state != state {
            log::trace!("agent at {:?}: {:?} -> {:?}", self.position, self.state, state);
            self.state = state;
        }
    }

    /// Unit facing direction
    pub fn forward(&self) -> Vec3 {
        yaw_direction(self.yaw)
    }

    /// Turn toward `target` if it is more than `epsilon` away horizontally.
    /// Returns whether the facing changed.
    pub fn face_towards(&mut self, target: Vec3, epsilon: f32) -> bool {
        let delta = flat(target - self.position);
        if delta.length() <= epsilon {
            return false;
        }
        self.yaw = delta.x.atan2(delta.z);
        true
    }

    /// Whether `cadence_ms` has elapsed since the last primary attack
    pub fn attack_ready(&self, now_ms: u64, cadence_ms: f32) -> bool {
        if !cadence_ms.is_finite() {
            return false;
        }
        match self.last_attack_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) as f32 >= cadence_ms,
        }
    }

    /// Record a primary attack
    pub fn mark_attack(&mut self, now_ms: u64) {
        self.last_attack_ms = Some(now_ms);
    }

    /// Whether `interval_ms` has elapsed since the last special
    pub fn special_ready(&self, now_ms: u64, interval_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_special_ms) >= interval_ms
    }

    /// Record a special attack
    pub fn mark_special(&mut self, now_ms: u64) {
        self.last_special_ms = now_ms;
    }

    /// Reverse the strafe direction
    pub fn flip_strafe(&mut self) {
        self.strafe_bias = -self.strafe_bias;
    }
}
