use fleetcrawl_core::{mix, EnemyClass, EnemyId};
use serde::{Deserialize, Serialize};

const TELEGRAPH_SALT: u32 = 0x7e1e_9a4f;
const WIND_UP_TICKS: u64 = 36;
const BURST_TICKS: u64 = 24;
const JITTER_TICKS: u32 = 60;

/// Wind-up and release cycle gating an enemy's weapons.
///
/// Enemies telegraph for a short window, fire during the burst that follows,
/// then stay quiet until the next cycle. The cycle length is jittered per enemy
/// from the run seed so replays line up exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyTelegraphState {
    next_telegraph_tick: u64,
    telegraph_end_tick: u64,
    burst_end_tick: u64,
    cycle_ticks: u64,
}

impl EnemyTelegraphState {
    /// Schedules the first telegraph half a cycle after the spawn tick.
    #[must_use]
    pub fn new(seed: u32, enemy: EnemyId, class: EnemyClass, spawn_tick: u64) -> Self {
        let base = match class {
            EnemyClass::Normal => 180,
            EnemyClass::MiniBoss => 240,
            EnemyClass::Boss => 300,
        };
        let jitter = mix(seed, enemy.get(), class.code(), TELEGRAPH_SALT) % JITTER_TICKS;
        let cycle_ticks = base + u64::from(jitter);
        Self {
            next_telegraph_tick: spawn_tick + cycle_ticks / 2,
            telegraph_end_tick: 0,
            burst_end_tick: 0,
            cycle_ticks,
        }
    }

    /// Starts a new cycle once its scheduled tick is reached.
    pub fn advance(&mut self, tick: u64) {
        if tick < self.next_telegraph_tick {
            return;
        }
        self.telegraph_end_tick = tick + WIND_UP_TICKS;
        self.burst_end_tick = self.telegraph_end_tick + BURST_TICKS;
        self.next_telegraph_tick = tick + self.cycle_ticks;
    }

    /// Reports whether the enemy is winding up at `tick`.
    #[must_use]
    pub fn is_telegraphing(&self, tick: u64) -> bool {
        self.burst_end_tick > 0
            && tick < self.telegraph_end_tick
            && tick + WIND_UP_TICKS >= self.telegraph_end_tick
    }

    /// Reports whether the enemy's weapons may fire at `tick`.
    #[must_use]
    pub fn weapons_ready(&self, tick: u64) -> bool {
        tick >= self.telegraph_end_tick && tick < self.burst_end_tick
    }

    /// Length of one wind-up/release cycle.
    #[must_use]
    pub fn cycle_ticks(&self) -> u64 {
        self.cycle_ticks
    }

    /// Tick at which the next wind-up begins.
    #[must_use]
    pub fn next_telegraph_tick(&self) -> u64 {
        self.next_telegraph_tick
    }
}
