use fleetcrawl_core::{EnemyClass, EnemyId};
use fleetcrawl_system_wave_spawner::EnemyTelegraphState;
use serde::{Deserialize, Serialize};

/// Where an enemy came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyTag {
    /// Room whose wave created the enemy.
    pub room_index: i32,
    /// One-based wave number within that room.
    pub wave_index: u32,
    /// Enemy class.
    pub class: EnemyClass,
}

/// Enemy tracked by the run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyHandle {
    /// Identifier returned by the spawn service.
    pub id: EnemyId,
    /// Origin of the enemy.
    pub tag: EnemyTag,
    /// Hull fraction reported by the combat surface.
    pub hull_ratio: f32,
    /// Set once the kill has been tallied.
    pub counted: bool,
    /// Weapon wind-up timing.
    pub telegraph: EnemyTelegraphState,
}

impl EnemyHandle {
    /// Reports whether the enemy still has hull.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hull_ratio > 0.0
    }
}
