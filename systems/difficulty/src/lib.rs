#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-tick difficulty classification feeding wave scaling.
//!
//! Classification carries no memory between ticks: the same sample always
//! yields the same status, so a replayed tick reclassifies identically.

use fleetcrawl_core::{DifficultyStatus, RoomCounters};

/// Thresholds separating the difficulty statuses.
#[derive(Clone, Debug)]
pub struct DifficultyTuning {
    /// Mean hull ratio below which the fleet is overrun.
    pub overrun_hull: f32,
    /// Pressure ratio above which the fleet is overrun.
    pub overrun_pressure: f32,
    /// Mean hull ratio below which the fleet is pressured.
    pub pressured_hull: f32,
    /// Pressure ratio above which the fleet is pressured.
    pub pressured_pressure: f32,
    /// Mean hull ratio above which the fleet may be in recovery.
    pub recovery_hull: f32,
    /// Pressure ratio below which the fleet may be in recovery.
    pub recovery_pressure: f32,
    /// Room progress after which recovery may be declared.
    pub recovery_progress: f32,
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        Self {
            overrun_hull: 0.35,
            overrun_pressure: 0.72,
            pressured_hull: 0.55,
            pressured_pressure: 0.46,
            recovery_hull: 0.82,
            recovery_pressure: 0.18,
            recovery_progress: 0.28,
        }
    }
}

/// Inputs sampled at the start of a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PressureSample {
    /// Mean hull ratio of living player units.
    pub hull_ratio: f32,
    /// Enemies spawned in the room so far.
    pub enemies_spawned: u32,
    /// Enemies destroyed in the room so far.
    pub enemies_destroyed: u32,
    /// Fraction of the room duration elapsed.
    pub progress: f32,
}

impl PressureSample {
    /// Builds a sample from room counters and timing.
    #[must_use]
    pub fn from_room(
        hull_ratio: f32,
        counters: &RoomCounters,
        tick: u64,
        room_start_tick: u64,
        duration_ticks: u64,
    ) -> Self {
        Self {
            hull_ratio,
            enemies_spawned: counters.enemies_spawned,
            enemies_destroyed: counters.enemies_destroyed,
            progress: progress_fraction(tick, room_start_tick, duration_ticks),
        }
    }

    /// Share of spawned enemies still alive, in `[0, 1]`.
    #[must_use]
    pub fn pressure(&self) -> f32 {
        let outstanding = self.enemies_spawned.saturating_sub(self.enemies_destroyed);
        outstanding as f32 / self.enemies_spawned.max(1) as f32
    }
}

/// Fraction of the room elapsed at `tick`, clamped to `[0, 1]`.
#[must_use]
pub fn progress_fraction(tick: u64, room_start_tick: u64, duration_ticks: u64) -> f32 {
    let elapsed = tick.saturating_sub(room_start_tick);
    (elapsed as f64 / duration_ticks.max(1) as f64).clamp(0.0, 1.0) as f32
}

/// Stateless classifier mapping pressure samples onto statuses.
#[derive(Debug, Default)]
pub struct DifficultyClassifier {
    tuning: DifficultyTuning,
}

impl DifficultyClassifier {
    /// Creates a classifier with the provided thresholds.
    #[must_use]
    pub fn new(tuning: DifficultyTuning) -> Self {
        Self { tuning }
    }

    /// Returns a mutable reference to the thresholds so designers can adjust pacing.
    pub fn tuning_mut(&mut self) -> &mut DifficultyTuning {
        &mut self.tuning
    }

    /// Classifies a sample.
    #[must_use]
    pub fn classify(&self, sample: &PressureSample) -> DifficultyStatus {
        let tuning = &self.tuning;
        let hull = sample.hull_ratio;
        let pressure = sample.pressure();

        if hull < tuning.overrun_hull || pressure > tuning.overrun_pressure {
            DifficultyStatus::Overrun
        } else if hull < tuning.pressured_hull || pressure > tuning.pressured_pressure {
            DifficultyStatus::Pressured
        } else if hull > tuning.recovery_hull
            && pressure < tuning.recovery_pressure
            && sample.progress > tuning.recovery_progress
        {
            DifficultyStatus::Recovery
        } else {
            DifficultyStatus::Calm
        }
    }
}
