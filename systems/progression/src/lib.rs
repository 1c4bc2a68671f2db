#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Experience, level-up upgrades and the rolling run digest.
//!
//! The digest is a 32-bit value re-mixed whenever the run's content changes:
//! level-ups, upgrade picks, gate resolutions and room completions. Two runs
//! fed the same commands must agree on it at every step.

use fleetcrawl_core::{
    deterministic_range, fold, scale_rounded, EconomyState, Fleet, GateRewardRecord,
    RoomCounters, RoomKind, UpgradeKind, WeaponScope, INITIAL_EXPERIENCE_TO_NEXT,
};
use tracing::{debug, info};

const LEVEL_HEAL_RATIO: f32 = 0.06;
const LEVEL_DAMAGE_MUL: f32 = 1.04;
const LEVEL_COOLDOWN_MUL: f32 = 0.98;
const UPGRADE_SALT: u32 = 0x0b9a_de00;
const LEVEL_TAG: u32 = 0x1e7e_1000;
const UPGRADE_TAG: u32 = 0x0e9a_de00;

/// Experience required after reaching `level`, given the previous requirement.
#[must_use]
pub fn next_requirement(previous: u32, level: u32) -> u32 {
    let base = f64::from(previous.max(24));
    let growth = 10.0 + 2.0 * f64::from(level.saturating_sub(1));
    let next = (base * 1.24 + growth).round().min(f64::from(u32::MAX)) as u32;
    next.max(INITIAL_EXPERIENCE_TO_NEXT)
}

/// Awards experience scaled by the active challenge and resolves level-ups.
///
/// Each level reached grants a pending upgrade, a light repair and a small
/// weapon bonus, and folds into `digest`. Reached levels are appended to
/// `levels`. Returns the experience actually credited.
pub fn award_experience(
    economy: &mut EconomyState,
    fleet: &mut Fleet,
    amount: u32,
    digest: &mut u32,
    levels: &mut Vec<u32>,
) -> u32 {
    let awarded = scale_rounded(amount, economy.challenge.xp_mul);
    if awarded == 0 {
        return 0;
    }

    let progression = &mut economy.progression;
    progression.experience = progression.experience.saturating_add(awarded);
    progression.total_experience = progression.total_experience.saturating_add(u64::from(awarded));

    let mut reached = 0u32;
    while progression.experience >= progression.experience_to_next {
        progression.experience -= progression.experience_to_next;
        progression.level = progression.level.saturating_add(1);
        progression.unspent_upgrades = progression.unspent_upgrades.saturating_add(1);
        progression.experience_to_next =
            next_requirement(progression.experience_to_next, progression.level);
        *digest = fold(
            *digest,
            LEVEL_TAG,
            progression.level,
            progression.total_experience as u32,
        );
        levels.push(progression.level);
        reached += 1;
    }

    for _ in 0..reached {
        fleet.heal_ratio(LEVEL_HEAL_RATIO);
        fleet.scale_weapons(WeaponScope::AllWeapons, LEVEL_DAMAGE_MUL, LEVEL_COOLDOWN_MUL);
        economy.compound_modifiers(LEVEL_DAMAGE_MUL, LEVEL_COOLDOWN_MUL);
    }
    if reached > 0 {
        info!(
            level = economy.progression.level,
            next = economy.progression.experience_to_next,
            unspent = economy.progression.unspent_upgrades,
            "level up"
        );
    }
    awarded
}

/// Upgrade rolled for a room start at the current level.
#[must_use]
pub fn pick_upgrade(seed: u32, room_index: i32, level: u32) -> UpgradeKind {
    let salt = UPGRADE_SALT.wrapping_add(level);
    let roll = deterministic_range(seed, room_index, salt, 0, UpgradeKind::ALL.len() as i32);
    UpgradeKind::ALL[roll as usize]
}

/// Applies an upgrade to the fleet and the economy modifiers.
pub fn apply_upgrade(upgrade: UpgradeKind, fleet: &mut Fleet, economy: &mut EconomyState) {
    match upgrade {
        UpgradeKind::Firepower => {
            fleet.scale_weapons(WeaponScope::AllWeapons, 1.09, 0.95);
            economy.compound_modifiers(1.09, 0.95);
        }
        UpgradeKind::Hull => {
            fleet.add_max_hull(18.0);
            fleet.heal_ratio(0.12);
        }
        UpgradeKind::Thrusters => fleet.scale_mobility(1.06, 1.08, 1.05),
    }
}

/// Consumes one pending upgrade, if any, and folds it into `digest`.
pub fn consume_upgrade(
    seed: u32,
    room_index: i32,
    economy: &mut EconomyState,
    fleet: &mut Fleet,
    digest: &mut u32,
) -> Option<UpgradeKind> {
    if economy.progression.unspent_upgrades == 0 {
        return None;
    }
    economy.progression.unspent_upgrades -= 1;
    let level = economy.progression.level;
    let upgrade = pick_upgrade(seed, room_index, level);
    apply_upgrade(upgrade, fleet, economy);
    *digest = fold(*digest, UPGRADE_TAG, upgrade.code(), level);
    debug!(room = room_index, ?upgrade, level, "upgrade applied");
    Some(upgrade)
}

/// Folds a resolved gate into the digest.
#[must_use]
pub fn fold_gate(digest: u32, record: &GateRewardRecord) -> u32 {
    fold(
        digest,
        record.room_index as u32,
        record.gate.code(),
        record.reward.code(),
    )
}

/// Folds a finished room, the economy after payout and the loadout fingerprint.
#[must_use]
pub fn fold_room(
    digest: u32,
    room_index: i32,
    kind: RoomKind,
    counters: &RoomCounters,
    economy: &EconomyState,
    loadout_fingerprint: u32,
) -> u32 {
    let header = kind.code() | economy.challenge.kind.code() << 4;
    let digest = fold(digest, room_index as u32, header, counters.waves_spawned);
    let digest = fold(
        digest,
        counters.enemies_spawned,
        counters.enemies_destroyed,
        counters.mini_bosses_destroyed | counters.bosses_destroyed << 16,
    );
    let progression = &economy.progression;
    let digest = fold(
        digest,
        economy.currency,
        progression.level,
        progression.total_experience as u32,
    );
    let digest = fold(
        digest,
        economy.shards,
        economy.reroll_tokens,
        economy.damage_mul.to_bits() ^ economy.cooldown_mul.to_bits(),
    );
    fold(digest, economy.challenge_clears, loadout_fingerprint, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetcrawl_core::{ChallengeKind, ChallengeState, GateKind, Offer, ReliefReward, RewardKind};

    #[test]
    fn crossing_first_requirement_levels_up() {
        let mut economy = EconomyState::new();
        let mut fleet = Fleet::starter();
        let mut digest = 0;
        let mut levels = Vec::new();

        let awarded = award_experience(&mut economy, &mut fleet, 35, &mut digest, &mut levels);

        assert_eq!(awarded, 35);
        let progression = economy.progression;
        assert_eq!(progression.level, 2);
        assert_eq!(progression.experience, 5);
        assert_eq!(progression.unspent_upgrades, 1);
        assert!(progression.experience_to_next > 30);
        assert_eq!(progression.total_experience, 35);
        assert_eq!(levels, vec![2]);
        assert_ne!(digest, 0);
    }

    #[test]
    fn requirement_grows_with_level() {
        assert_eq!(next_requirement(30, 2), 49);
        assert!(next_requirement(49, 3) > 49);
        assert_eq!(next_requirement(0, 1), 40);
    }

    #[test]
    fn large_awards_cross_several_levels() {
        let mut economy = EconomyState::new();
        let mut fleet = Fleet::starter();
        let mut digest = 0;
        let mut levels = Vec::new();

        let _ = award_experience(&mut economy, &mut fleet, 200, &mut digest, &mut levels);
        assert_eq!(levels, vec![2, 3, 4]);
        assert_eq!(economy.progression.unspent_upgrades, 3);
        assert!((economy.damage_mul - LEVEL_DAMAGE_MUL.powi(3)).abs() < 1e-5);
    }

    #[test]
    fn challenge_scales_experience() {
        let mut economy = EconomyState::new();
        economy.challenge = ChallengeState {
            kind: ChallengeKind::Hazard,
            active: true,
            risk_tier: 2,
            spawn_mul: 1.10,
            currency_mul: 1.45,
            xp_mul: 1.35,
        };
        let mut fleet = Fleet::starter();
        let mut digest = 0;
        let mut levels = Vec::new();
        assert_eq!(
            award_experience(&mut economy, &mut fleet, 20, &mut digest, &mut levels),
            27
        );
        assert!(levels.is_empty());
    }

    #[test]
    fn upgrade_is_consumed_once() {
        let mut economy = EconomyState::new();
        economy.progression.unspent_upgrades = 1;
        let mut fleet = Fleet::starter();
        let mut digest = 0;

        let upgrade = consume_upgrade(9017, 1, &mut economy, &mut fleet, &mut digest);
        assert_eq!(upgrade, Some(pick_upgrade(9017, 1, 1)));
        assert_eq!(economy.progression.unspent_upgrades, 0);
        assert_eq!(
            consume_upgrade(9017, 2, &mut economy, &mut fleet, &mut digest),
            None
        );
    }

    #[test]
    fn hull_upgrade_raises_max_and_repairs() {
        let mut economy = EconomyState::new();
        let mut fleet = Fleet::starter();
        fleet.units_mut()[0].hull = 100.0;
        apply_upgrade(UpgradeKind::Hull, &mut fleet, &mut economy);
        let flagship = &fleet.units()[0];
        assert!((flagship.max_hull - 258.0).abs() < 1e-4);
        assert!((flagship.hull - (100.0 + 258.0 * 0.12)).abs() < 1e-3);
    }

    #[test]
    fn thrusters_touch_every_unit() {
        let mut economy = EconomyState::new();
        let mut fleet = Fleet::starter();
        let before: Vec<f32> = fleet.units().iter().map(|unit| unit.speed).collect();
        apply_upgrade(UpgradeKind::Thrusters, &mut fleet, &mut economy);
        for (unit, speed) in fleet.units().iter().zip(before) {
            assert!((unit.speed - speed * 1.06).abs() < 1e-4);
        }
    }

    #[test]
    fn upgrade_rolls_cover_every_kind() {
        let mut seen = Vec::new();
        for seed in 0..100 {
            let upgrade = pick_upgrade(seed, 0, 2);
            if !seen.contains(&upgrade) {
                seen.push(upgrade);
            }
        }
        assert_eq!(seen.len(), UpgradeKind::ALL.len());
    }

    #[test]
    fn digest_folds_are_order_sensitive() {
        let record = GateRewardRecord {
            room_index: 0,
            gate: GateKind::Relief,
            reward_kind: RewardKind::Currency,
            reward: Offer::Relief(ReliefReward::Currency),
        };
        let economy = EconomyState::new();
        let counters = RoomCounters::default();
        let gate_then_room = fold_room(
            fold_gate(7, &record),
            0,
            RoomKind::Combat,
            &counters,
            &economy,
            0,
        );
        let room_then_gate = fold_gate(
            fold_room(7, 0, RoomKind::Combat, &counters, &economy, 0),
            &record,
        );
        assert_ne!(gate_then_room, room_then_gate);
    }
}
