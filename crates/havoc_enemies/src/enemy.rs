//! Live enemy records

use crate::archetype::{Archetype, ArchetypeId};
use glam::Vec3;
use havoc_ai::Agent;
use havoc_combat::Vitals;
use havoc_world::EnemyId;

/// One enemy in the roster
#[derive(Debug, Clone)]
pub struct EnemyInstance {
    pub id: EnemyId,
    pub archetype: ArchetypeId,
    pub vitals: Vitals,
    pub agent: Agent,
    pub spawned_at_ms: u64,
    /// Set once the enemy dies
    pub remove_at_ms: Option<u64>,
}

impl EnemyInstance {
    /// Fresh enemy at full health
    pub fn new(id: EnemyId, archetype: &Archetype, position: Vec3, now_ms: u64) -> Self {
        Self {
            id,
            archetype: archetype.id,
            vitals: Vitals::new(archetype.health),
            agent: Agent::new(position, now_ms),
            spawned_at_ms: now_ms,
            remove_at_ms: None,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.agent.position
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.vitals.is_alive()
    }

    /// Whether the grace delay after death has passed
    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.remove_at_ms.map_or(false, |at| now_ms >= at)
    }
}
