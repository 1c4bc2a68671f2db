#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave spawner that turns room definitions into spawn requests.

mod telegraph;

use std::f32::consts::TAU;

use fleetcrawl_core::{
    mix, unit_interval, ChallengeState, DifficultyStatus, EnemyClass, EnemyId, RoomDefinition,
    Side, SpawnRequest, SpawnService,
};
use glam::Vec2;
use tracing::debug;

pub use telegraph::EnemyTelegraphState;

const ANCHOR_SALT: u32 = 0x5a11_0c4e;
const DEPTH_GROWTH: f32 = 0.08;
const WAVE_RAMP: f32 = 0.06;

/// Enemy counts for a single wave after scaling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaveComposition {
    /// Normal enemies.
    pub normal: u32,
    /// Mini-bosses.
    pub mini_bosses: u32,
    /// Bosses.
    pub bosses: u32,
}

impl WaveComposition {
    /// Total enemies across classes.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.normal + self.mini_bosses + self.bosses
    }

    fn count(&self, class: EnemyClass) -> u32 {
        match class {
            EnemyClass::Normal => self.normal,
            EnemyClass::MiniBoss => self.mini_bosses,
            EnemyClass::Boss => self.bosses,
        }
    }
}

/// Scales a room's base wave by depth, wave ramp, difficulty and challenge.
///
/// `wave_index` is one-based. Normal counts never round below one while the
/// room has a non-zero base. Mini-bosses appear on cadence waves and bosses
/// only with the first wave.
#[must_use]
pub fn compose_wave(
    room: &RoomDefinition,
    room_index: i32,
    wave_index: u32,
    difficulty: DifficultyStatus,
    challenge: &ChallengeState,
) -> WaveComposition {
    let depth = 1.0 + DEPTH_GROWTH * room_index.max(0) as f32;
    let ramp = 1.0 + WAVE_RAMP * wave_index.saturating_sub(1) as f32;
    let scale = depth * ramp * difficulty.spawn_scale() * challenge.spawn_mul.max(0.0);

    let normal = if room.base_normal_per_wave == 0 {
        0
    } else {
        ((room.base_normal_per_wave as f32 * scale).round() as u32).max(1)
    };
    let mini_bosses = if room.mini_boss_every > 0 && wave_index % room.mini_boss_every == 0 {
        room.base_mini_bosses
    } else {
        0
    };
    let bosses = if wave_index == 1 { room.base_bosses } else { 0 };

    WaveComposition {
        normal,
        mini_bosses,
        bosses,
    }
}

/// Deterministic position a wave group forms around.
#[must_use]
pub fn anchor_for(seed: u32, room_index: i32, wave_index: u32, class: EnemyClass) -> Vec2 {
    let hash = mix(
        seed,
        room_index.wrapping_add(1) as u32,
        wave_index,
        class.code().wrapping_add(ANCHOR_SALT),
    );
    let radius = match class {
        EnemyClass::Normal => 420.0,
        EnemyClass::MiniBoss => 520.0,
        EnemyClass::Boss => 640.0,
    };
    Vec2::from_angle(unit_interval(hash) * TAU) * radius
}

/// Enemy created by a wave, paired with its class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnedEnemy {
    /// Identifier returned by the spawn service.
    pub id: EnemyId,
    /// Class requested for the enemy.
    pub class: EnemyClass,
}

/// Pure system that forwards scaled waves to the spawn service.
#[derive(Debug)]
pub struct WaveSpawner {
    seed: u32,
    // Reused between waves.
    requests: Vec<SpawnRequest>,
}

impl WaveSpawner {
    /// Creates a spawner for the run seed.
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            requests: Vec::new(),
        }
    }

    /// Builds the spawn requests for a wave without invoking the spawn service.
    #[must_use]
    pub fn plan(
        &self,
        room_index: i32,
        wave_index: u32,
        composition: WaveComposition,
    ) -> Vec<SpawnRequest> {
        self.requests_for(room_index, wave_index, composition)
            .collect()
    }

    fn requests_for(
        &self,
        room_index: i32,
        wave_index: u32,
        composition: WaveComposition,
    ) -> impl Iterator<Item = SpawnRequest> + '_ {
        [EnemyClass::Boss, EnemyClass::MiniBoss, EnemyClass::Normal]
            .into_iter()
            .filter_map(move |class| {
                let count = composition.count(class);
                (count > 0).then(|| SpawnRequest {
                    anchor: anchor_for(self.seed, room_index, wave_index, class),
                    side: Side::Hostile,
                    count,
                    room_index,
                    wave_index,
                    class,
                })
            })
    }

    /// Composes the wave, hands it to the spawn service and appends the created enemies.
    #[allow(clippy::too_many_arguments)]
    pub fn spawn_wave(
        &mut self,
        room: &RoomDefinition,
        room_index: i32,
        wave_index: u32,
        difficulty: DifficultyStatus,
        challenge: &ChallengeState,
        service: &mut dyn SpawnService,
        out: &mut Vec<SpawnedEnemy>,
    ) -> WaveComposition {
        let composition = compose_wave(room, room_index, wave_index, difficulty, challenge);
        let mut requests = std::mem::take(&mut self.requests);
        requests.clear();
        requests.extend(self.requests_for(room_index, wave_index, composition));

        for request in &requests {
            let created = service.spawn(request);
            out.extend(created.into_iter().map(|id| SpawnedEnemy {
                id,
                class: request.class,
            }));
        }
        self.requests = requests;

        debug!(
            room = room_index,
            wave = wave_index,
            normal = composition.normal,
            mini_bosses = composition.mini_bosses,
            bosses = composition.bosses,
            ?difficulty,
            "wave spawned"
        );
        composition
    }
}
