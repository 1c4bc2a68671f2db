use fleetcrawl_core::{
    mix, DifficultyStatus, EndCondition, EndLogic, RoomCounters, RoomDefinition, NO_ROOM,
};
use fleetcrawl_system_gates::GateRequests;
use serde::{Deserialize, Serialize};

const DIGEST_SALT: u32 = 0xd16e_57a1;

/// Lifecycle phase of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunStatus {
    /// No room has started yet.
    NotStarted,
    /// A room is in progress.
    RoomActive,
    /// The final room finished.
    RunCompleted,
    /// The fleet was destroyed.
    RunFailed,
}

impl RunStatus {
    /// Terminal phases ignore further ticks.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::RunCompleted | Self::RunFailed)
    }
}

/// Room sequencing state owned by the run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectorState {
    /// Index of the active room, [`NO_ROOM`] before the first room.
    pub room_index: i32,
    /// Tick the active room started on.
    pub room_start_tick: u64,
    /// Tick at which the room timer expires.
    pub room_end_tick: u64,
    /// Tick at which the next wave is due.
    pub next_wave_tick: u64,
    /// Counters for the active room.
    pub counters: RoomCounters,
    /// Cumulative fleet damage when the room started.
    pub damage_at_room_start: f64,
    /// Rolling content digest.
    pub digest: u32,
    /// Difficulty classification of the last tick.
    pub difficulty: DifficultyStatus,
    /// Lifecycle phase.
    pub status: RunStatus,
    /// Whether ticks are skipped.
    pub paused: bool,
}

impl DirectorState {
    pub(crate) fn new(seed: u32, rooms: usize) -> Self {
        Self {
            room_index: NO_ROOM,
            room_start_tick: 0,
            room_end_tick: 0,
            next_wave_tick: 0,
            counters: RoomCounters::default(),
            damage_at_room_start: 0.0,
            digest: mix(seed, rooms as u32, 0, DIGEST_SALT),
            difficulty: DifficultyStatus::Calm,
            status: RunStatus::NotStarted,
            paused: false,
        }
    }

    /// Evaluates the room's end conditions at `tick`.
    pub(crate) fn room_complete(&self, room: &RoomDefinition, tick: u64) -> bool {
        let met = |condition: EndCondition| match condition {
            EndCondition::Timer => tick >= self.room_end_tick,
            EndCondition::KillQuota => self.counters.enemies_destroyed >= room.kill_quota.max(1),
            EndCondition::BossQuota => self.counters.bosses_destroyed >= room.boss_quota.max(1),
            EndCondition::MiniBossQuota => {
                self.counters.mini_bosses_destroyed >= room.mini_boss_quota.max(1)
            }
        };
        if room.end_conditions.is_empty() {
            return met(EndCondition::Timer);
        }
        match room.end_logic {
            EndLogic::AnyOf => room.end_conditions.iter().any(met),
            EndLogic::AllOf => room.end_conditions.iter().all(met),
        }
    }
}

/// Player requests waiting for a room's gate, keyed by room index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPicks {
    /// Requested gate ordinal.
    pub gate: Option<(i32, u32)>,
    /// Requested boon offer ordinal.
    pub boon: Option<(i32, u32)>,
    /// Room whose offers should be rerolled.
    pub reroll: Option<i32>,
}

impl PendingPicks {
    /// Requests addressed to `room_index`.
    pub(crate) fn for_room(&self, room_index: i32) -> GateRequests {
        let matching = |pick: Option<(i32, u32)>| {
            pick.and_then(|(room, ordinal)| (room == room_index).then_some(ordinal))
        };
        GateRequests {
            gate_pick: matching(self.gate),
            boon_pick: matching(self.boon),
            reroll: self.reroll == Some(room_index),
        }
    }

    /// Drops every request that is not addressed to `room_index`.
    pub(crate) fn retain_room(&mut self, room_index: i32) {
        if self.gate.is_some_and(|(room, _)| room != room_index) {
            self.gate = None;
        }
        if self.boon.is_some_and(|(room, _)| room != room_index) {
            self.boon = None;
        }
        if self.reroll.is_some_and(|room| room != room_index) {
            self.reroll = None;
        }
    }

    /// Drops every request addressed to `room_index`.
    pub(crate) fn clear_room(&mut self, room_index: i32) {
        if self.gate.is_some_and(|(room, _)| room == room_index) {
            self.gate = None;
        }
        if self.boon.is_some_and(|(room, _)| room == room_index) {
            self.boon = None;
        }
        if self.reroll == Some(room_index) {
            self.reroll = None;
        }
    }
}
