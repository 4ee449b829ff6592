//! Enemy vitals

use crate::damage::DamageInfo;
use serde::{Deserialize, Serialize};

/// Outcome of applying damage to [`Vitals`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageResult {
    /// Health actually removed
    pub dealt: f32,
    /// Whether this hit took health to zero
    pub died: bool,
}

impl DamageResult {
    /// A hit that changed nothing
    pub const NONE: Self = Self { dealt: 0.0, died: false };
}

/// Current/max health with an irreversible alive flag.
///
/// Health stays within `0..=max`. Once `alive` is false it never becomes true
/// again; there is no respawn path for enemies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vitals {
    /// Current health
    pub current: f32,
    /// Maximum health
    pub max: f32,
    alive: bool,
}

impl Vitals {
    /// Full health
    pub fn new(max_health: f32) -> Self {
        let max = max_health.max(0.0);
        Self {
            current: max,
            max,
            alive: max > 0.0,
        }
    }

    /// Apply damage. Dead vitals ignore further hits.
    pub fn apply_damage(&mut self, damage: &DamageInfo) -> DamageResult {
        if !self.alive {
            return DamageResult::NONE;
        }

        let before = self.current;
        self.current = (self.current - damage.final_amount()).max(0.0);
        let dealt = before - self.current;

        let died = self.current <= 0.0;
        if died {
            self.alive = false;
        }

        DamageResult { dealt, died }
    }

    /// Flip the alive flag off. Returns true only on the first call.
    pub fn mark_dead(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.current = 0.0;
        true
    }

    /// Health as a fraction (0.0 - 1.0)
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        self.current / self.max
    }

    /// Check if alive
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Check if at full health
    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }
}

impl Default for Vitals {
    fn default() -> Self {
        Self::new(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vitals_damage() {
        let mut vitals = Vitals::new(100.0);
        assert!(vitals.is_full());

        let result = vitals.apply_damage(&DamageInfo::direct(30.0));
        assert_eq!(result.dealt, 30.0);
        assert!(!result.died);
        assert_eq!(vitals.current, 70.0);
        assert!((vitals.fraction() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_overkill_clamps_to_zero() {
        let mut vitals = Vitals::new(50.0);

        let result = vitals.apply_damage(&DamageInfo::direct(60.0));
        assert!(result.died);
        assert_eq!(result.dealt, 50.0);
        assert_eq!(vitals.current, 0.0);
        assert!(!vitals.is_alive());
    }

    #[test]
    fn test_dead_vitals_ignore_damage() {
        let mut vitals = Vitals::new(10.0);
        vitals.apply_damage(&DamageInfo::direct(10.0));

        let again = vitals.apply_damage(&DamageInfo::direct(5.0));
        assert_eq!(again, DamageResult::NONE);
        assert_eq!(vitals.current, 0.0);
    }

    #[test]
    fn test_health_is_monotonic() {
        let mut vitals = Vitals::new(40.0);
        let mut last = vitals.current;
        for amount in [3.0, 0.0, -5.0, 12.5, 100.0, 1.0] {
            vitals.apply_damage(&DamageInfo::direct(amount));
            assert!(vitals.current <= last);
            assert!(vitals.current >= 0.0);
            last = vitals.current;
        }
        assert!(!vitals.is_alive());
    }

    #[test]
    fn test_mark_dead_once() {
        let mut vitals = Vitals::new(25.0);
        assert!(vitals.mark_dead());
        assert!(!vitals.mark_dead());
        assert_eq!(vitals.current, 0.0);
    }
}
