#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative run state for the Fleetcrawl run director.
//!
//! [`RunState`] owns everything a run mutates: room sequencing, the economy,
//! the perk and blueprint loadout, the reward history, tracked enemies and the
//! player fleet. Adapters drive it exclusively through [`apply`] and read it
//! through [`query`]. The combat collaborator writes hull values back between
//! ticks through [`RunState::fleet_mut`] and [`RunState::set_enemy_hull`].

mod director;
mod enemies;
mod history;

use fleetcrawl_core::{
    Command, DifficultyStatus, EconomyState, EnemyClass, EnemyId, Event, Fleet, ReliefKind,
    RoomDefinition, RoomSummary, SpawnService, WeaponScope,
};
use fleetcrawl_system_build::Loadout;
use fleetcrawl_system_catalog::RoomCatalog;
use fleetcrawl_system_challenge::roll_challenge;
use fleetcrawl_system_difficulty::{DifficultyClassifier, PressureSample};
use fleetcrawl_system_gates::resolve_gate;
use fleetcrawl_system_progression::{award_experience, consume_upgrade, fold_gate, fold_room};
use fleetcrawl_system_wave_spawner::{EnemyTelegraphState, SpawnedEnemy, WaveSpawner};
use tracing::{debug, info, warn};

pub use director::{DirectorState, PendingPicks, RunStatus};
pub use enemies::{EnemyHandle, EnemyTag};
pub use history::{RewardHistory, REWARD_HISTORY_CAPACITY};

const RECOVERY_HEAL_RATIO: f32 = 0.25;
const ARSENAL_BEAM_MUL: f32 = 1.04;
const SALVAGE_CURRENCY: u32 = 35;

/// Bootstrap configuration a run is built from and reset to.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// Seed every roll of the run derives from.
    pub seed: u32,
    /// Rooms in run order.
    pub catalog: RoomCatalog,
    /// Fleet the run starts with.
    pub fleet: Fleet,
}

impl RunConfig {
    /// Configuration with the starter fleet.
    #[must_use]
    pub fn new(seed: u32, catalog: RoomCatalog) -> Self {
        Self {
            seed,
            catalog,
            fleet: Fleet::starter(),
        }
    }

    /// Replaces the starting fleet.
    #[must_use]
    pub fn with_fleet(mut self, fleet: Fleet) -> Self {
        self.fleet = fleet;
        self
    }
}

/// Complete mutable state of one run.
#[derive(Debug)]
pub struct RunState {
    config: RunConfig,
    director: DirectorState,
    economy: EconomyState,
    loadout: Loadout,
    history: RewardHistory,
    enemies: Vec<EnemyHandle>,
    fleet: Fleet,
    pending: PendingPicks,
    spawner: WaveSpawner,
    classifier: DifficultyClassifier,
    spawned: Vec<SpawnedEnemy>,
    levels: Vec<u32>,
}

impl RunState {
    /// Builds a fresh run from its bootstrap configuration.
    #[must_use]
    pub fn new(config: RunConfig) -> Self {
        debug!(
            seed = config.seed,
            rooms = config.catalog.len(),
            "run created"
        );
        Self {
            director: DirectorState::new(config.seed, config.catalog.len()),
            economy: EconomyState::new(),
            loadout: Loadout::new(),
            history: RewardHistory::default(),
            enemies: Vec::new(),
            fleet: config.fleet.clone(),
            pending: PendingPicks::default(),
            spawner: WaveSpawner::new(config.seed),
            classifier: DifficultyClassifier::default(),
            spawned: Vec::new(),
            levels: Vec::new(),
            config,
        }
    }

    /// Mutable access to the player fleet for the combat collaborator.
    pub fn fleet_mut(&mut self) -> &mut Fleet {
        &mut self.fleet
    }

    /// Records the hull fraction of a tracked enemy. Returns `false` for unknown ids.
    ///
    /// Non-finite values are treated as destroyed.
    pub fn set_enemy_hull(&mut self, enemy: EnemyId, hull_ratio: f32) -> bool {
        let Some(handle) = self.enemies.iter_mut().find(|handle| handle.id == enemy) else {
            return false;
        };
        handle.hull_ratio = if hull_ratio.is_finite() {
            hull_ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        true
    }

    fn tick(&mut self, tick: u64, spawn: &mut dyn SpawnService, out: &mut Vec<Event>) {
        if self.director.paused
            || self.director.status.is_terminal()
            || self.config.catalog.is_empty()
        {
            return;
        }
        if !self.fleet.any_alive() {
            self.fail(spawn, out);
            return;
        }

        self.tally_kills(out);

        let opening = self.director.status == RunStatus::NotStarted;
        if opening {
            self.start_room(0, tick, spawn, out);
        }
        let Some(room) = self.config.catalog.get(self.director.room_index).cloned() else {
            return;
        };

        // A room keeps the Calm it started with until the tick after its first wave.
        if !opening {
            let sample = PressureSample::from_room(
                self.fleet.mean_hull_ratio(),
                &self.director.counters,
                tick,
                self.director.room_start_tick,
                room.duration_ticks,
            );
            let status = self.classifier.classify(&sample);
            if status != self.director.difficulty {
                self.director.difficulty = status;
                out.push(Event::DifficultyChanged { status });
            }
        }

        for enemy in self.enemies.iter_mut().filter(|enemy| enemy.is_alive()) {
            enemy.telegraph.advance(tick);
        }

        if room.kind.spawns_waves()
            && self.director.counters.waves_spawned < room.planned_waves
            && tick >= self.director.next_wave_tick
        {
            let wave_index = self.director.counters.waves_spawned + 1;
            self.spawn_wave(&room, wave_index, tick, spawn, out);
            self.director.next_wave_tick = self
                .director
                .next_wave_tick
                .saturating_add(room.wave_interval_ticks);
        }

        if !self.director.room_complete(&room, tick) {
            return;
        }
        self.finalize_room(&room, tick, out);

        let next = self.director.room_index + 1;
        if self.config.catalog.get(next).is_some() {
            self.start_room(next, tick, spawn, out);
        } else {
            self.director.status = RunStatus::RunCompleted;
            let digest = self.director.digest;
            info!("run completed at tick {tick} with digest {digest:#010x}");
            out.push(Event::RunCompleted { digest });
        }
    }

    fn fail(&mut self, spawn: &mut dyn SpawnService, out: &mut Vec<Event>) {
        self.director.status = RunStatus::RunFailed;
        for enemy in self.enemies.drain(..).filter(|enemy| enemy.is_alive()) {
            spawn.despawn(enemy.id);
        }
        let room_index = self.director.room_index;
        warn!(room = room_index, "fleet destroyed, run failed");
        out.push(Event::RunFailed { room_index });
    }

    fn tally_kills(&mut self, out: &mut Vec<Event>) {
        let room_index = self.director.room_index;
        for index in 0..self.enemies.len() {
            let enemy = &mut self.enemies[index];
            if enemy.counted || enemy.is_alive() {
                continue;
            }
            enemy.counted = true;
            let (id, tag) = (enemy.id, enemy.tag);

            if tag.room_index == room_index {
                let counters = &mut self.director.counters;
                counters.enemies_destroyed += 1;
                match tag.class {
                    EnemyClass::Normal => {}
                    EnemyClass::MiniBoss => counters.mini_bosses_destroyed += 1,
                    EnemyClass::Boss => counters.bosses_destroyed += 1,
                }
            }
            let bounty = self.economy.credit_scaled(tag.class.bounty());
            out.push(Event::EnemyDestroyed {
                enemy: id,
                class: tag.class,
                bounty,
            });
            self.award(tag.class.kill_experience(), out);
        }
    }

    fn award(&mut self, amount: u32, out: &mut Vec<Event>) {
        let _ = award_experience(
            &mut self.economy,
            &mut self.fleet,
            amount,
            &mut self.director.digest,
            &mut self.levels,
        );
        out.extend(self.levels.drain(..).map(|level| Event::LevelUp { level }));
    }

    fn start_room(
        &mut self,
        room_index: i32,
        tick: u64,
        spawn: &mut dyn SpawnService,
        out: &mut Vec<Event>,
    ) {
        let Some(room) = self.config.catalog.get(room_index).cloned() else {
            return;
        };
        let seed = self.config.seed;

        let director = &mut self.director;
        director.room_index = room_index;
        director.room_start_tick = tick;
        director.room_end_tick = tick.saturating_add(room.duration_ticks);
        director.next_wave_tick = director.room_end_tick;
        director.counters = Default::default();
        director.damage_at_room_start = self.fleet.damage_dealt();
        director.difficulty = DifficultyStatus::Calm;
        director.status = RunStatus::RoomActive;

        self.pending.retain_room(room_index);
        self.economy.challenge = roll_challenge(seed, room_index, room.kind);
        self.enemies.retain(|enemy| {
            if !enemy.is_alive() {
                spawn.despawn(enemy.id);
            }
            enemy.is_alive()
        });

        let challenge = self.economy.challenge.kind;
        info!(room = room_index, kind = ?room.kind, ?challenge, tick, "room started");
        out.push(Event::RoomStarted {
            room_index,
            kind: room.kind,
            challenge,
        });

        if let Some(upgrade) = consume_upgrade(
            seed,
            room_index,
            &mut self.economy,
            &mut self.fleet,
            &mut self.director.digest,
        ) {
            out.push(Event::UpgradeApplied { upgrade });
        }

        if room.kind.spawns_waves() && room.planned_waves > 0 {
            self.spawn_wave(&room, 1, tick, spawn, out);
            self.director.next_wave_tick = tick.saturating_add(room.wave_interval_ticks);
        }
    }

    fn spawn_wave(
        &mut self,
        room: &RoomDefinition,
        wave_index: u32,
        tick: u64,
        spawn: &mut dyn SpawnService,
        out: &mut Vec<Event>,
    ) {
        let room_index = self.director.room_index;
        let seed = self.config.seed;
        self.spawned.clear();
        let _ = self.spawner.spawn_wave(
            room,
            room_index,
            wave_index,
            self.director.difficulty,
            &self.economy.challenge,
            spawn,
            &mut self.spawned,
        );

        for spawned in &self.spawned {
            self.enemies.push(EnemyHandle {
                id: spawned.id,
                tag: EnemyTag {
                    room_index,
                    wave_index,
                    class: spawned.class,
                },
                hull_ratio: 1.0,
                counted: false,
                telegraph: EnemyTelegraphState::new(seed, spawned.id, spawned.class, tick),
            });
        }

        let count = self.spawned.len() as u32;
        let counters = &mut self.director.counters;
        counters.waves_spawned += 1;
        counters.enemies_spawned = counters.enemies_spawned.saturating_add(count);
        out.push(Event::WaveSpawned {
            room_index,
            wave_index,
            spawned: count,
        });
    }

    fn finalize_room(&mut self, room: &RoomDefinition, tick: u64, out: &mut Vec<Event>) {
        let room_index = self.director.room_index;
        let challenge = self.economy.challenge;

        let payout = self.economy.credit_scaled(room.reward_currency);
        self.fleet.add_max_hull(room.reward_hull_bonus);
        self.fleet.heal_ratio(room.reward_heal_ratio);
        if room.reward_damage_bonus > 0.0 || room.reward_cooldown_bonus > 0.0 {
            let damage_mul = 1.0 + room.reward_damage_bonus;
            let cooldown_mul = 1.0 - room.reward_cooldown_bonus;
            self.fleet
                .scale_weapons(WeaponScope::AllWeapons, damage_mul, cooldown_mul);
            self.economy.compound_modifiers(damage_mul, cooldown_mul);
        }
        self.award(room.kind.completion_experience(), out);

        self.economy.shards = self
            .economy
            .shards
            .saturating_add(room.kind.shard_base() + challenge.risk_tier);
        if challenge.active {
            self.economy.challenge_clears += 1;
        }
        self.apply_relief_bonus(room.relief);

        let requests = self.pending.for_room(room_index);
        let resolution = resolve_gate(
            self.config.seed,
            room_index,
            room,
            requests,
            &mut self.loadout,
            &mut self.fleet,
            &mut self.economy,
        );
        self.pending.clear_room(room_index);
        if let Some(resolution) = &resolution {
            self.history.push(resolution.record);
            self.director.digest = fold_gate(self.director.digest, &resolution.record);
            out.push(Event::GateResolved {
                record: resolution.record,
            });
        }

        self.director.digest = fold_room(
            self.director.digest,
            room_index,
            room.kind,
            &self.director.counters,
            &self.economy,
            self.loadout.fingerprint(),
        );

        let progression = &self.economy.progression;
        let summary = RoomSummary {
            room_index,
            kind: room.kind,
            challenge: challenge.kind,
            counters: self.director.counters,
            gate: resolution.map(|resolution| resolution.record.gate),
            reward: resolution.map(|resolution| resolution.record.reward),
            perks: self.loadout.perks().len() as u32,
            blueprints: self.loadout.blueprints().len() as u32,
            currency: self.economy.currency,
            level: progression.level,
            total_experience: progression.total_experience,
            digest: self.director.digest,
        };
        let damage = self.fleet.damage_dealt() - self.director.damage_at_room_start;
        info!(%summary, payout, damage, tick, "room completed");
        out.push(Event::RoomCompleted { summary });
    }

    fn apply_relief_bonus(&mut self, relief: ReliefKind) {
        match relief {
            ReliefKind::None => {}
            ReliefKind::Recovery => self.fleet.heal_ratio(RECOVERY_HEAL_RATIO),
            ReliefKind::Arsenal => {
                self.fleet
                    .scale_weapons(WeaponScope::BeamWeapons, ARSENAL_BEAM_MUL, 1.0);
            }
            ReliefKind::Salvage => {
                self.economy.currency = self.economy.currency.saturating_add(SALVAGE_CURRENCY);
                self.economy.reroll_tokens = self.economy.reroll_tokens.saturating_add(1);
            }
        }
    }
}

/// Applies the provided command to the run, mutating state deterministically.
///
/// Ticks may hand wave requests to `spawn` and despawn enemies the run stops
/// tracking. Everything that changed is appended to `out_events`.
pub fn apply(
    state: &mut RunState,
    command: Command,
    spawn: &mut dyn SpawnService,
    out_events: &mut Vec<Event>,
) {
    match command {
        Command::Tick { tick } => state.tick(tick, spawn, out_events),
        Command::SetPaused { paused } => state.director.paused = paused,
        Command::RequestGatePick {
            room_index,
            ordinal,
        } => state.pending.gate = Some((room_index, ordinal)),
        Command::RequestBoonPick {
            room_index,
            ordinal,
        } => state.pending.boon = Some((room_index, ordinal)),
        Command::RequestReroll { room_index } => state.pending.reroll = Some(room_index),
        Command::ResetRun => {
            for enemy in state.enemies.iter().filter(|enemy| enemy.is_alive()) {
                spawn.despawn(enemy.id);
            }
            *state = RunState::new(state.config.clone());
            info!(seed = state.config.seed, "run reset");
        }
    }
}

/// Query functions that provide read-only access to the run state.
pub mod query {
    use fleetcrawl_core::{
        DifficultyStatus, EconomyState, EnemyId, Fleet, RoomCounters, RoomDefinition,
    };
    use fleetcrawl_system_build::Loadout;

    use super::{DirectorState, EnemyHandle, PendingPicks, RewardHistory, RunState, RunStatus};

    /// Lifecycle phase of the run.
    #[must_use]
    pub fn status(state: &RunState) -> RunStatus {
        state.director.status
    }

    /// Index of the active room, `-1` before the first room.
    #[must_use]
    pub fn room_index(state: &RunState) -> i32 {
        state.director.room_index
    }

    /// Definition of the active room.
    #[must_use]
    pub fn current_room(state: &RunState) -> Option<&RoomDefinition> {
        state.config.catalog.get(state.director.room_index)
    }

    /// Number of rooms in the run.
    #[must_use]
    pub fn room_count(state: &RunState) -> usize {
        state.config.catalog.len()
    }

    /// Room sequencing state.
    #[must_use]
    pub fn director(state: &RunState) -> &DirectorState {
        &state.director
    }

    /// Counters of the active room.
    #[must_use]
    pub fn counters(state: &RunState) -> RoomCounters {
        state.director.counters
    }

    /// Rolling content digest.
    #[must_use]
    pub fn digest(state: &RunState) -> u32 {
        state.director.digest
    }

    /// Difficulty classification of the last tick.
    #[must_use]
    pub fn difficulty(state: &RunState) -> DifficultyStatus {
        state.director.difficulty
    }

    /// Reports whether ticks are being skipped.
    #[must_use]
    pub fn is_paused(state: &RunState) -> bool {
        state.director.paused
    }

    /// Fleet damage dealt since the active room started.
    #[must_use]
    pub fn room_damage(state: &RunState) -> f64 {
        state.fleet.damage_dealt() - state.director.damage_at_room_start
    }

    /// Economy, progression and challenge state.
    #[must_use]
    pub fn economy(state: &RunState) -> &EconomyState {
        &state.economy
    }

    /// Acquired perks and installed blueprints.
    #[must_use]
    pub fn loadout(state: &RunState) -> &Loadout {
        &state.loadout
    }

    /// Resolved gates, oldest first.
    #[must_use]
    pub fn history(state: &RunState) -> &RewardHistory {
        &state.history
    }

    /// Requests waiting for a gate.
    #[must_use]
    pub fn pending_picks(state: &RunState) -> PendingPicks {
        state.pending
    }

    /// Every tracked enemy in spawn order.
    #[must_use]
    pub fn enemies(state: &RunState) -> &[EnemyHandle] {
        &state.enemies
    }

    /// Tracked enemy with the provided identifier.
    #[must_use]
    pub fn enemy(state: &RunState, id: EnemyId) -> Option<&EnemyHandle> {
        state.enemies.iter().find(|enemy| enemy.id == id)
    }

    /// Player fleet.
    #[must_use]
    pub fn fleet(state: &RunState) -> &Fleet {
        &state.fleet
    }
}
