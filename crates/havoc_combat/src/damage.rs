//! Damage information

use serde::{Deserialize, Serialize};

/// Information about a damage instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageInfo {
    /// Damage amount (already scaled by falloff/friendly fire)
    pub amount: f32,
}

impl DamageInfo {
    /// Plain damage of `amount`
    pub fn direct(amount: f32) -> Self {
        Self { amount }
    }

    /// Amount actually applicable (negative and NaN amounts deal nothing)
    pub fn final_amount(&self) -> f32 {
        if self.amount.is_nan() {
            0.0
        } else {
            self.amount.max(0.0)
        }
    }
}

impl Default for DamageInfo {
    fn default() -> Self {
        Self::direct(0.0)
    }
}
