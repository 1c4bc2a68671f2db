#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-room challenge roll.

use fleetcrawl_core::{deterministic_range, ChallengeKind, ChallengeState, RoomKind};

const CHALLENGE_SALT: u32 = 0xc4a1_1e96;
const ROOM_KIND_OFFSET: u32 = 41;
const SWARM_THRESHOLD: u32 = 45;
const HAZARD_THRESHOLD: u32 = 75;
const NEMESIS_THRESHOLD: u32 = 93;

/// Percentile in `0..100` rolled for a room.
///
/// Boss rooms never roll below the swarm threshold.
#[must_use]
pub fn challenge_percentile(seed: u32, room_index: i32, kind: RoomKind) -> u32 {
    let salt = (kind.code() + ROOM_KIND_OFFSET) ^ CHALLENGE_SALT;
    let roll = deterministic_range(seed, room_index, salt, 0, 100).unsigned_abs();
    if kind == RoomKind::Boss {
        roll.max(SWARM_THRESHOLD)
    } else {
        roll
    }
}

/// Challenge state for a percentile.
#[must_use]
pub fn challenge_for_percentile(percentile: u32) -> ChallengeState {
    if percentile < SWARM_THRESHOLD {
        ChallengeState::none()
    } else if percentile < HAZARD_THRESHOLD {
        active(ChallengeKind::Swarm, 1, 1.18, 1.25, 1.20)
    } else if percentile < NEMESIS_THRESHOLD {
        active(ChallengeKind::Hazard, 2, 1.10, 1.45, 1.35)
    } else {
        active(ChallengeKind::Nemesis, 3, 1.32, 1.75, 1.6)
    }
}

/// Rolls the challenge for a room. Relief rooms never carry one.
#[must_use]
pub fn roll_challenge(seed: u32, room_index: i32, kind: RoomKind) -> ChallengeState {
    if kind == RoomKind::Relief {
        return ChallengeState::none();
    }
    challenge_for_percentile(challenge_percentile(seed, room_index, kind))
}

fn active(
    kind: ChallengeKind,
    risk_tier: u32,
    spawn_mul: f32,
    currency_mul: f32,
    xp_mul: f32,
) -> ChallengeState {
    ChallengeState {
        kind,
        active: true,
        risk_tier,
        spawn_mul,
        currency_mul,
        xp_mul,
    }
}
