#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Gate and reward resolver.
//!
//! At the end of every room the player walks through one gate. The gate
//! ordinal, the three offers behind it and the offer taken are all derived
//! from the run seed unless the player queued a pick for the room. The reward
//! is then applied to the loadout, the fleet or the economy.

use fleetcrawl_core::{
    deterministic_range, BlueprintId, EconomyState, Fleet, GateKind, GateRewardRecord, Offer,
    PerkId, ReliefReward, RoomDefinition, RoomKind,
};
use fleetcrawl_system_build::{InstallOutcome, Loadout, PerkOutcome};
use tracing::info;

/// Offers generated behind each gate.
pub const OFFERS_PER_GATE: usize = 3;
/// Flat currency granted by a relief currency offer.
pub const RELIEF_CURRENCY: u32 = 45;
/// Hull ratio restored by a relief heal offer.
pub const RELIEF_HEAL_RATIO: f32 = 0.30;

const GATE_SALT: u32 = 0x6a7e_0001;
const OFFER_SALT: u32 = 0x0ffe_4000;
const PICK_SALT: u32 = 0x91c4_0000;
const REROLL_SALT: u32 = 0x4e40_11ed;

const BOON_OFFERS: [Offer; 4] = [
    Offer::Perk(PerkId::BeamConversion),
    Offer::Perk(PerkId::DroneBeamLink),
    Offer::Perk(PerkId::FocusedLenses),
    Offer::Perk(PerkId::PiercingArrays),
];
const BLUEPRINT_OFFERS: [Offer; 4] = [
    Offer::Blueprint(BlueprintId::LanceArray),
    Offer::Blueprint(BlueprintId::RailBattery),
    Offer::Blueprint(BlueprintId::FusionCore),
    Offer::Blueprint(BlueprintId::SwarmBay),
];
const RELIEF_OFFERS: [Offer; 3] = [
    Offer::Relief(ReliefReward::Currency),
    Offer::Relief(ReliefReward::Heal),
    Offer::Relief(ReliefReward::Reroll),
];

/// Player requests queued for the room being resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GateRequests {
    /// Requested gate ordinal.
    pub gate_pick: Option<u32>,
    /// Requested offer ordinal, honoured by boon gates only.
    pub boon_pick: Option<u32>,
    /// Whether a reroll token should be spent on the offers.
    pub reroll: bool,
}

/// Outcome of resolving a room's gate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GateResolution {
    /// Audit record to append to the reward history.
    pub record: GateRewardRecord,
    /// Offers that were generated behind the gate.
    pub offers: [Offer; OFFERS_PER_GATE],
    /// Index of the taken offer within `offers`.
    pub pick: usize,
    /// Whether a reroll token was spent.
    pub rerolled: bool,
    /// Effect on the perk list, for boon rewards.
    pub perk: Option<PerkOutcome>,
    /// Effect on the blueprint slots, for blueprint rewards.
    pub install: Option<InstallOutcome>,
}

/// Gates offered by a room kind, in ordinal order.
#[must_use]
pub fn gates_for(kind: RoomKind) -> &'static [GateKind] {
    match kind {
        RoomKind::Relief => &[GateKind::Boon, GateKind::Blueprint],
        RoomKind::Combat | RoomKind::Boss => {
            &[GateKind::Boon, GateKind::Blueprint, GateKind::Relief]
        }
    }
}

/// Gates a room actually offers, honouring its boon flag.
#[must_use]
pub fn available_gates(room: &RoomDefinition) -> Vec<GateKind> {
    gates_for(room.kind)
        .iter()
        .copied()
        .filter(|gate| room.offers_boon || *gate != GateKind::Boon)
        .collect()
}

/// Catalog rotated through when generating offers for a gate.
#[must_use]
pub fn catalog(gate: GateKind) -> &'static [Offer] {
    match gate {
        GateKind::Boon => &BOON_OFFERS,
        GateKind::Blueprint => &BLUEPRINT_OFFERS,
        GateKind::Relief => &RELIEF_OFFERS,
    }
}

/// Three consecutive catalog entries starting at a seeded rotation.
///
/// Every catalog holds at least three entries, so offers never repeat.
#[must_use]
pub fn roll_offers(
    seed: u32,
    room_index: i32,
    gate: GateKind,
    rerolled: bool,
) -> [Offer; OFFERS_PER_GATE] {
    let entries = catalog(gate);
    let salt = OFFER_SALT.wrapping_add(gate.code()) ^ reroll_shift(rerolled);
    let start = deterministic_range(seed, room_index, salt, 0, entries.len() as i32) as usize;
    std::array::from_fn(|slot| entries[(start + slot) % entries.len()])
}

/// Resolves the gate of a finished room and applies its reward.
///
/// Requested ordinals are clamped into range. Gate ordinals address the gates
/// the room actually offers. A reroll is only honoured while a token remains.
/// Rooms that offer no gate at all return `None`.
pub fn resolve_gate(
    seed: u32,
    room_index: i32,
    room: &RoomDefinition,
    requests: GateRequests,
    loadout: &mut Loadout,
    fleet: &mut Fleet,
    economy: &mut EconomyState,
) -> Option<GateResolution> {
    let gates = available_gates(room);
    let last_gate = gates.len().checked_sub(1)?;
    let ordinal = match requests.gate_pick {
        Some(requested) => (requested as usize).min(last_gate),
        None => deterministic_range(seed, room_index, GATE_SALT, 0, gates.len() as i32) as usize,
    };
    let gate = gates[ordinal];

    let rerolled = requests.reroll && economy.reroll_tokens > 0;
    if rerolled {
        economy.reroll_tokens -= 1;
    }
    let offers = roll_offers(seed, room_index, gate, rerolled);
    let pick = match (gate, requests.boon_pick) {
        (GateKind::Boon, Some(requested)) => (requested as usize).min(OFFERS_PER_GATE - 1),
        _ => {
            let salt = PICK_SALT.wrapping_add(gate.code()) ^ reroll_shift(rerolled);
            deterministic_range(seed, room_index, salt, 0, OFFERS_PER_GATE as i32) as usize
        }
    };
    let reward = offers[pick];

    let mut perk = None;
    let mut install = None;
    match reward {
        Offer::Perk(id) => perk = Some(loadout.apply_perk(id, fleet)),
        Offer::Blueprint(id) => install = Some(loadout.install_blueprint(id, fleet, economy)),
        Offer::Relief(ReliefReward::Currency) => {
            economy.currency = economy.currency.saturating_add(RELIEF_CURRENCY);
        }
        Offer::Relief(ReliefReward::Heal) => fleet.heal_ratio(RELIEF_HEAL_RATIO),
        Offer::Relief(ReliefReward::Reroll) => {
            economy.reroll_tokens = economy.reroll_tokens.saturating_add(1);
        }
    }

    info!(
        room = room_index,
        ?gate,
        ordinal,
        ?offers,
        pick,
        ?reward,
        rerolled,
        "gate resolved"
    );

    Some(GateResolution {
        record: GateRewardRecord {
            room_index,
            gate,
            reward_kind: reward.reward_kind(),
            reward,
        },
        offers,
        pick,
        rerolled,
        perk,
        install,
    })
}

fn reroll_shift(rerolled: bool) -> u32 {
    if rerolled {
        REROLL_SALT
    } else {
        0
    }
}
