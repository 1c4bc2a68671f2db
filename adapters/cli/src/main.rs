#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives a headless Fleetcrawl run.

mod combat;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use fleetcrawl_core::{Command, Event};
use fleetcrawl_run::{self as run, query, RunConfig, RunState};
use fleetcrawl_system_catalog::RoomCatalog;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::combat::ScriptedCombat;

/// Command-line arguments accepted by the Fleetcrawl binary.
#[derive(Debug, Parser)]
#[command(name = "fleetcrawl", about = "Runs a seeded Fleetcrawl run without a renderer")]
struct CliArgs {
    /// Run seed feeding every deterministic roll.
    #[arg(long, default_value_t = 9017)]
    seed: u32,
    /// TOML room profile replacing the built-in nine room run.
    #[arg(long, value_name = "PATH")]
    profile: Option<PathBuf>,
    /// Tick budget after which the run is abandoned.
    #[arg(long, default_value_t = 30_000)]
    max_ticks: u64,
    /// Gate to take when a room ends, as `room:ordinal`.
    #[arg(long = "gate-pick", value_name = "ROOM:ORDINAL", value_parser = parse_room_pick)]
    gate_picks: Vec<RoomPick>,
    /// Boon offer to take when a room ends, as `room:ordinal`.
    #[arg(long = "boon-pick", value_name = "ROOM:ORDINAL", value_parser = parse_room_pick)]
    boon_picks: Vec<RoomPick>,
    /// Rooms whose gate offers should be rerolled.
    #[arg(long = "reroll", value_name = "ROOM")]
    rerolls: Vec<i32>,
}

/// Pick request addressed to a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RoomPick {
    room_index: i32,
    ordinal: u32,
}

fn parse_room_pick(value: &str) -> Result<RoomPick, String> {
    let (room, ordinal) = value
        .split_once(':')
        .ok_or_else(|| format!("expected ROOM:ORDINAL, got `{value}`"))?;
    let room_index = room
        .trim()
        .parse::<i32>()
        .map_err(|error| format!("invalid room index `{room}`: {error}"))?;
    let ordinal = ordinal
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid ordinal `{ordinal}`: {error}"))?;
    Ok(RoomPick {
        room_index,
        ordinal,
    })
}

/// Entry point for the Fleetcrawl command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let catalog = load_catalog(&args)?;
    info!(
        seed = args.seed,
        rooms = catalog.len(),
        "starting fleetcrawl run"
    );

    let mut state = RunState::new(RunConfig::new(args.seed, catalog));
    let mut combat = ScriptedCombat::new(args.seed);
    let mut events = Vec::new();
    let mut requests = Vec::new();

    for tick in 0..args.max_ticks {
        events.clear();
        run::apply(&mut state, Command::Tick { tick }, &mut combat, &mut events);
        report(&events);
        for event in &events {
            if let Event::RoomStarted { room_index, .. } = event {
                requests.extend(pick_commands(&args, *room_index));
            }
        }
        for command in requests.drain(..) {
            run::apply(&mut state, command, &mut combat, &mut events);
        }
        if query::status(&state).is_terminal() {
            break;
        }
        combat.resolve(&mut state, tick);
    }

    println!(
        "status {:?} in room {} with digest {:#010x}",
        query::status(&state),
        query::room_index(&state),
        query::digest(&state)
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn load_catalog(args: &CliArgs) -> Result<RoomCatalog> {
    let Some(path) = args.profile.as_ref() else {
        return Ok(RoomCatalog::default_run());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read room profile {}", path.display()))?;
    RoomCatalog::from_profile_str(&contents)
        .with_context(|| format!("failed to parse room profile {}", path.display()))
}

/// Requests addressed to `room_index`; the run holds one pending pick of each kind.
fn pick_commands(args: &CliArgs, room_index: i32) -> Vec<Command> {
    let gates = args
        .gate_picks
        .iter()
        .filter(|pick| pick.room_index == room_index)
        .map(|pick| Command::RequestGatePick {
            room_index,
            ordinal: pick.ordinal,
        });
    let boons = args
        .boon_picks
        .iter()
        .filter(|pick| pick.room_index == room_index)
        .map(|pick| Command::RequestBoonPick {
            room_index,
            ordinal: pick.ordinal,
        });
    let rerolls = args
        .rerolls
        .iter()
        .filter(|&&room| room == room_index)
        .map(|&room_index| Command::RequestReroll { room_index });
    gates.chain(boons).chain(rerolls).collect()
}

fn report(events: &[Event]) {
    for event in events {
        match event {
            Event::RoomCompleted { summary } => println!("{summary}"),
            Event::RunCompleted { digest } => println!("run completed ({digest:#010x})"),
            Event::RunFailed { room_index } => println!("fleet destroyed in room {room_index}"),
            other => debug!(?other, "run event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_pick_parses_room_and_ordinal() {
        assert_eq!(
            parse_room_pick("3:2"),
            Ok(RoomPick {
                room_index: 3,
                ordinal: 2
            })
        );
    }

    #[test]
    fn room_pick_rejects_malformed_values() {
        assert!(parse_room_pick("3").is_err());
        assert!(parse_room_pick("x:1").is_err());
        assert!(parse_room_pick("1:-1").is_err());
    }

    #[test]
    fn pick_commands_select_the_started_room() {
        let args = CliArgs::parse_from([
            "fleetcrawl",
            "--gate-pick",
            "0:1",
            "--boon-pick",
            "0:2",
            "--gate-pick",
            "1:0",
            "--reroll",
            "1",
        ]);
        assert_eq!(
            pick_commands(&args, 0),
            vec![
                Command::RequestGatePick {
                    room_index: 0,
                    ordinal: 1
                },
                Command::RequestBoonPick {
                    room_index: 0,
                    ordinal: 2
                },
            ]
        );
        assert_eq!(
            pick_commands(&args, 1),
            vec![
                Command::RequestGatePick {
                    room_index: 1,
                    ordinal: 0
                },
                Command::RequestReroll { room_index: 1 },
            ]
        );
        assert!(pick_commands(&args, 2).is_empty());
    }

    #[test]
    fn scripted_combat_finishes_the_default_run_deterministically() {
        let outcome = |seed: u32| {
            let mut state = RunState::new(RunConfig::new(seed, RoomCatalog::default_run()));
            let mut combat = ScriptedCombat::new(seed);
            let mut events = Vec::new();
            for tick in 0..60_000 {
                run::apply(&mut state, Command::Tick { tick }, &mut combat, &mut events);
                if query::status(&state).is_terminal() {
                    break;
                }
                combat.resolve(&mut state, tick);
            }
            (query::status(&state), query::digest(&state), events)
        };

        let first = outcome(9017);
        let second = outcome(9017);
        assert_eq!(first, second);
        assert!(first.0.is_terminal());
    }
}
