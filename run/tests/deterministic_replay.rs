use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use fleetcrawl_core::{Command, EnemyId, Event, GateKind, SpawnRequest, SpawnService};
use fleetcrawl_run::{self as run, query, RunConfig, RunState, RunStatus};
use fleetcrawl_system_catalog::RoomCatalog;

const SEED: u32 = 9017;
const TICKS: u64 = 6_000;

#[test]
fn deterministic_replay_produces_identical_outcomes() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(
        first.events.iter().any(|event| event.starts_with("RoomCompleted")),
        "script should finish at least one room"
    );
}

#[test]
fn room_picks_reach_their_gates() {
    let mut state = RunState::new(RunConfig::new(SEED, RoomCatalog::default_run()));
    let _ = drive(&mut state, &mut ScriptedSpawner::default(), scripted_commands());

    let history: Vec<_> = query::history(&state).iter().copied().collect();
    assert!(history.len() >= 2, "script should resolve two gates");
    assert_eq!(history[0].gate, GateKind::Boon);
    assert_eq!(history[1].gate, GateKind::Relief);
}

#[test]
fn reset_then_replay_reproduces_digest() {
    let mut state = RunState::new(RunConfig::new(SEED, RoomCatalog::default_run()));
    let mut spawner = ScriptedSpawner::default();

    let first = drive(&mut state, &mut spawner, scripted_commands());

    let mut events = Vec::new();
    run::apply(&mut state, Command::ResetRun, &mut spawner, &mut events);
    assert!(events.is_empty());
    assert_eq!(query::room_index(&state), fleetcrawl_core::NO_ROOM);
    assert_eq!(query::status(&state), RunStatus::NotStarted);
    assert!(query::history(&state).is_empty());
    assert!(query::enemies(&state).is_empty());
    assert_eq!(query::economy(&state).currency, 0);

    let mut spawner = ScriptedSpawner::default();
    let second = drive(&mut state, &mut spawner, scripted_commands());
    assert_eq!(first.digest, second.digest);
    assert_eq!(first.summaries(), second.summaries());
}

#[test]
fn different_seeds_diverge() {
    let mut first = RunState::new(RunConfig::new(SEED, RoomCatalog::default_run()));
    let mut second = RunState::new(RunConfig::new(SEED + 1, RoomCatalog::default_run()));
    let a = drive(&mut first, &mut ScriptedSpawner::default(), scripted_commands());
    let b = drive(&mut second, &mut ScriptedSpawner::default(), scripted_commands());
    assert_ne!(a.digest, b.digest);
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut state = RunState::new(RunConfig::new(SEED, RoomCatalog::default_run()));
    let mut spawner = ScriptedSpawner::default();
    drive(&mut state, &mut spawner, commands)
}

fn drive(
    state: &mut RunState,
    spawner: &mut ScriptedSpawner,
    commands: Vec<Command>,
) -> ReplayOutcome {
    let mut log = Vec::new();
    for command in commands {
        let mut events = Vec::new();
        run::apply(state, command, spawner, &mut events);
        let started: Vec<i32> = events
            .iter()
            .filter_map(|event| match event {
                Event::RoomStarted { room_index, .. } => Some(*room_index),
                _ => None,
            })
            .collect();
        for pick in started.into_iter().flat_map(room_picks) {
            run::apply(state, pick, spawner, &mut events);
        }
        record_events(&events, &mut log);
        if let Command::Tick { tick } = command {
            scripted_combat(state, tick);
        }
    }

    ReplayOutcome {
        events: log,
        digest: query::digest(state),
        room_index: query::room_index(state),
        status: query::status(state),
        currency: query::economy(state).currency,
        level: query::economy(state).progression.level,
    }
}

/// Picks issued as each room opens; the run keeps one pending pick per kind.
fn room_picks(room_index: i32) -> Vec<Command> {
    match room_index {
        0 => vec![
            Command::RequestGatePick {
                room_index,
                ordinal: 0,
            },
            Command::RequestBoonPick {
                room_index,
                ordinal: 1,
            },
        ],
        1 => vec![Command::RequestGatePick {
            room_index,
            ordinal: 2,
        }],
        5 => vec![
            Command::RequestReroll { room_index },
            Command::RequestGatePick {
                room_index,
                ordinal: 0,
            },
        ],
        _ => Vec::new(),
    }
}

/// Destroys the oldest living enemy every tick and lets telegraphed enemies
/// chip at the flagship.
fn scripted_combat(state: &mut RunState, tick: u64) {
    let target = query::enemies(state)
        .iter()
        .find(|enemy| enemy.is_alive())
        .map(|enemy| enemy.id);
    let firing = query::enemies(state)
        .iter()
        .filter(|enemy| enemy.is_alive() && enemy.telegraph.weapons_ready(tick))
        .count();

    if let Some(target) = target {
        let _ = state.set_enemy_hull(target, 0.0);
        state.fleet_mut().record_damage(25.0);
    }
    if let Some(flagship) = state.fleet_mut().units_mut().first_mut() {
        flagship.hull = (flagship.hull - 0.05 * firing as f32).max(1.0);
    }
}

fn record_events(events: &[Event], log: &mut Vec<String>) {
    log.extend(events.iter().map(|event| format!("{event:?}")));
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = Vec::new();
    for tick in 0..TICKS {
        if tick == 700 {
            commands.push(Command::SetPaused { paused: true });
        }
        if tick == 760 {
            commands.push(Command::SetPaused { paused: false });
        }
        commands.push(Command::Tick { tick });
    }
    commands
}

#[derive(Default)]
struct ScriptedSpawner {
    next: u32,
}

impl SpawnService for ScriptedSpawner {
    fn spawn(&mut self, request: &SpawnRequest) -> Vec<EnemyId> {
        (0..request.count)
            .map(|_| {
                self.next += 1;
                EnemyId::new(self.next)
            })
            .collect()
    }

    fn despawn(&mut self, _enemy: EnemyId) {}
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    events: Vec<String>,
    digest: u32,
    room_index: i32,
    status: RunStatus,
    currency: u32,
    level: u32,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    fn summaries(&self) -> Vec<&String> {
        self.events
            .iter()
            .filter(|event| event.starts_with("RoomCompleted"))
            .collect()
    }
}
