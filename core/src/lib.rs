#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Fleetcrawl run director.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative run state, and pure systems. Adapters submit [`Command`]
//! values describing ticks and player requests, the run executes those commands
//! via its `apply` entry point, and then broadcasts [`Event`] values describing
//! what changed. Systems are pure functions over the data model declared here
//! and never keep random state: every roll is derived through [`mix`] from the
//! run seed, the room index and a salt.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

mod economy;
mod fleet;
mod hash;
mod loadout;

pub use economy::{
    scale_rounded, ChallengeKind, ChallengeState, EconomyState, Progression,
    INITIAL_EXPERIENCE_TO_NEXT,
};
pub use fleet::{
    DamageType, DeliveryMode, Fleet, PlayerUnit, UnitId, UnitRole, WeaponMount, WeaponTag,
    WeaponType,
};
pub use hash::{deterministic_range, fold, mix, unit_interval};
pub use loadout::{
    BlueprintId, BlueprintKind, InstalledBlueprint, ManufacturerId, ModuleId, PartId, PerkId,
    PerkOp, PerkOpKind, WeaponScope,
};

/// Room index reported before the first room starts.
pub const NO_ROOM: i32 = -1;

/// Commands that express all permissible run mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the director to the provided simulation tick.
    Tick {
        /// Current tick reported by the time source.
        tick: u64,
    },
    /// Pauses or resumes the director.
    SetPaused {
        /// Whether ticks should be skipped.
        paused: bool,
    },
    /// Requests that a specific gate be resolved when the room ends.
    RequestGatePick {
        /// Room the request applies to.
        room_index: i32,
        /// Gate ordinal; clamped into range on use.
        ordinal: u32,
    },
    /// Requests a specific offer from a boon gate.
    RequestBoonPick {
        /// Room the request applies to.
        room_index: i32,
        /// Offer ordinal; clamped into range on use.
        ordinal: u32,
    },
    /// Requests that a reroll token be spent on the room's gate offers.
    RequestReroll {
        /// Room the request applies to.
        room_index: i32,
    },
    /// Discards all run progress and rebuilds the bootstrap state.
    ResetRun,
}

/// Events broadcast by the run after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A room became active.
    RoomStarted {
        /// Index of the room.
        room_index: i32,
        /// Kind of the room.
        kind: RoomKind,
        /// Challenge rolled for the room.
        challenge: ChallengeKind,
    },
    /// A wave was handed to the spawn service.
    WaveSpawned {
        /// Room the wave belongs to.
        room_index: i32,
        /// One-based wave number.
        wave_index: u32,
        /// Enemies created across all classes.
        spawned: u32,
    },
    /// A destroyed enemy was tallied.
    EnemyDestroyed {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Class of the enemy.
        class: EnemyClass,
        /// Currency credited.
        bounty: u32,
    },
    /// The difficulty classification changed.
    DifficultyChanged {
        /// New status.
        status: DifficultyStatus,
    },
    /// The player gained a level.
    LevelUp {
        /// Level reached.
        level: u32,
    },
    /// A pending upgrade was consumed.
    UpgradeApplied {
        /// Upgrade that was applied.
        upgrade: UpgradeKind,
    },
    /// A gate was resolved and its reward applied.
    GateResolved {
        /// Audit record of the resolution.
        record: GateRewardRecord,
    },
    /// A room finished and paid out.
    RoomCompleted {
        /// Human readable summary of the room.
        summary: RoomSummary,
    },
    /// The final room finished.
    RunCompleted {
        /// Digest at completion.
        digest: u32,
    },
    /// Every player unit was destroyed.
    RunFailed {
        /// Room in which the fleet fell.
        room_index: i32,
    },
}

/// Unique identifier assigned to an enemy by the spawn service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Kind of room in the run sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomKind {
    /// Standard wave room.
    Combat,
    /// Breather room without waves.
    Relief,
    /// Boss encounter.
    Boss,
}

impl RoomKind {
    /// Stable numeric code used by rolls and digests.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Combat => 0,
            Self::Relief => 1,
            Self::Boss => 2,
        }
    }

    /// Reports whether the room spawns waves.
    #[must_use]
    pub const fn spawns_waves(self) -> bool {
        matches!(self, Self::Combat | Self::Boss)
    }

    /// Flat experience awarded when the room completes.
    #[must_use]
    pub const fn completion_experience(self) -> u32 {
        match self {
            Self::Combat => 24,
            Self::Relief => 10,
            Self::Boss => 44,
        }
    }

    /// Base shard award before the challenge risk tier is added.
    #[must_use]
    pub const fn shard_base(self) -> u32 {
        match self {
            Self::Combat => 2,
            Self::Relief => 1,
            Self::Boss => 3,
        }
    }
}

/// Flavour of a relief room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReliefKind {
    /// No relief bonus.
    None,
    /// Repairs the fleet.
    Recovery,
    /// Tunes beam weapons.
    Arsenal,
    /// Grants currency and a reroll token.
    Salvage,
}

/// Single room end condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndCondition {
    /// Room duration elapsed.
    Timer,
    /// Enough enemies destroyed.
    KillQuota,
    /// Enough bosses destroyed.
    BossQuota,
    /// Enough mini-bosses destroyed.
    MiniBossQuota,
}

impl EndCondition {
    /// Every end condition in evaluation order.
    pub const ALL: [EndCondition; 4] = [
        EndCondition::Timer,
        EndCondition::KillQuota,
        EndCondition::BossQuota,
        EndCondition::MiniBossQuota,
    ];

    const fn bit(self) -> u8 {
        match self {
            Self::Timer => 1,
            Self::KillQuota => 1 << 1,
            Self::BossQuota => 1 << 2,
            Self::MiniBossQuota => 1 << 3,
        }
    }
}

/// Set of end conditions selected for a room.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndConditions(u8);

impl EndConditions {
    /// Empty condition set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns a copy of the set with `condition` added.
    #[must_use]
    pub const fn with(self, condition: EndCondition) -> Self {
        Self(self.0 | condition.bit())
    }

    /// Builds a set from a list of conditions.
    #[must_use]
    pub fn from_slice(conditions: &[EndCondition]) -> Self {
        conditions
            .iter()
            .fold(Self::empty(), |set, condition| set.with(*condition))
    }

    /// Reports whether `condition` is selected.
    #[must_use]
    pub const fn contains(self, condition: EndCondition) -> bool {
        self.0 & condition.bit() != 0
    }

    /// Reports whether no condition is selected.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the selected conditions in evaluation order.
    pub fn iter(self) -> impl Iterator<Item = EndCondition> {
        EndCondition::ALL
            .into_iter()
            .filter(move |condition| self.contains(*condition))
    }
}

/// How the selected end conditions combine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndLogic {
    /// Any selected condition ends the room.
    AnyOf,
    /// Every selected condition must hold.
    AllOf,
}

/// Immutable description of a room in the run sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomDefinition {
    /// Room kind.
    pub kind: RoomKind,
    /// Relief flavour, `None` for combat rooms.
    pub relief: ReliefKind,
    /// Selected end conditions.
    pub end_conditions: EndConditions,
    /// How the end conditions combine.
    pub end_logic: EndLogic,
    /// Room length in ticks.
    pub duration_ticks: u64,
    /// Ticks between waves.
    pub wave_interval_ticks: u64,
    /// Waves spawned before the room stops spawning.
    pub planned_waves: u32,
    /// Enemies required by the kill quota.
    pub kill_quota: u32,
    /// Mini-bosses required by the mini-boss quota.
    pub mini_boss_quota: u32,
    /// Bosses required by the boss quota.
    pub boss_quota: u32,
    /// Normal enemies per wave before scaling.
    pub base_normal_per_wave: u32,
    /// Mini-bosses spawned on cadence waves.
    pub base_mini_bosses: u32,
    /// Mini-bosses appear every this many waves, `0` disables them.
    pub mini_boss_every: u32,
    /// Bosses spawned with the first wave.
    pub base_bosses: u32,
    /// Currency paid when the room completes.
    pub reward_currency: u32,
    /// Hull fraction restored when the room completes.
    pub reward_heal_ratio: f32,
    /// Fractional weapon damage bonus paid when the room completes.
    pub reward_damage_bonus: f32,
    /// Fractional cooldown reduction paid when the room completes.
    pub reward_cooldown_bonus: f32,
    /// Flat maximum hull added to every unit when the room completes.
    pub reward_hull_bonus: f32,
    /// Whether the room's gates include a boon.
    pub offers_boon: bool,
}

impl RoomDefinition {
    /// Clamps degenerate values into safe ranges.
    ///
    /// Duration and wave interval are at least one tick, a selected quota is at
    /// least one, reward ratios are non-negative, and an empty condition set
    /// falls back to the timer alone.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.duration_ticks = self.duration_ticks.max(1);
        self.wave_interval_ticks = self.wave_interval_ticks.max(1);
        if self.end_conditions.is_empty() {
            self.end_conditions = EndConditions::empty().with(EndCondition::Timer);
        }
        if self.end_conditions.contains(EndCondition::KillQuota) {
            self.kill_quota = self.kill_quota.max(1);
        }
        if self.end_conditions.contains(EndCondition::BossQuota) {
            self.boss_quota = self.boss_quota.max(1);
        }
        if self.end_conditions.contains(EndCondition::MiniBossQuota) {
            self.mini_boss_quota = self.mini_boss_quota.max(1);
        }
        self.reward_heal_ratio = non_negative(self.reward_heal_ratio);
        self.reward_damage_bonus = non_negative(self.reward_damage_bonus);
        self.reward_cooldown_bonus = non_negative(self.reward_cooldown_bonus).min(0.9);
        self.reward_hull_bonus = non_negative(self.reward_hull_bonus);
        if self.kind != RoomKind::Relief {
            self.relief = ReliefKind::None;
        }
        self
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Class of a spawned enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyClass {
    /// Rank-and-file hull.
    Normal,
    /// Elite escort.
    MiniBoss,
    /// Room boss.
    Boss,
}

impl EnemyClass {
    /// Stable numeric code used by rolls.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Normal => 0,
            Self::MiniBoss => 1,
            Self::Boss => 2,
        }
    }

    /// Heavy hulls pay the heavy bounty.
    #[must_use]
    pub const fn is_heavy(self) -> bool {
        !matches!(self, Self::Normal)
    }

    /// Currency paid when an enemy of this class is destroyed.
    #[must_use]
    pub const fn bounty(self) -> u32 {
        match self {
            Self::Normal => 3,
            Self::MiniBoss => 12 + 8,
            Self::Boss => 12 + 22,
        }
    }

    /// Experience awarded when an enemy of this class is destroyed.
    #[must_use]
    pub const fn kill_experience(self) -> u32 {
        match self {
            Self::Normal => 4,
            Self::MiniBoss => 10 + 12,
            Self::Boss => 10 + 28,
        }
    }
}

/// Allegiance of spawned units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Player fleet.
    Player,
    /// Hostile forces.
    Hostile,
}

/// Request handed to the spawn service.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRequest {
    /// World position the group forms around.
    pub anchor: Vec2,
    /// Allegiance of the spawned units.
    pub side: Side,
    /// Units to create.
    pub count: u32,
    /// Room the spawn belongs to.
    pub room_index: i32,
    /// One-based wave number.
    pub wave_index: u32,
    /// Class of every unit in the request.
    pub class: EnemyClass,
}

/// External collaborator that turns spawn requests into live units.
pub trait SpawnService {
    /// Creates the requested units and returns their identifiers.
    fn spawn(&mut self, request: &SpawnRequest) -> Vec<EnemyId>;

    /// Removes a unit that the run no longer tracks.
    fn despawn(&mut self, enemy: EnemyId);
}

/// Discrete pacing status recomputed every tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifficultyStatus {
    /// Neutral pacing.
    Calm,
    /// The fleet is under strain.
    Pressured,
    /// The fleet is overwhelmed.
    Overrun,
    /// The fleet is coasting through the room.
    Recovery,
}

impl DifficultyStatus {
    /// Multiplier applied to wave sizes under this status.
    #[must_use]
    pub const fn spawn_scale(self) -> f32 {
        match self {
            Self::Overrun => 0.72,
            Self::Pressured => 0.85,
            Self::Calm => 1.0,
            Self::Recovery => 1.22,
        }
    }
}

/// Gate archetype offered at the end of a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// Perk offers.
    Boon,
    /// Equipment offers.
    Blueprint,
    /// Utility offers.
    Relief,
}

impl GateKind {
    /// Stable numeric code used by rolls and digests.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Boon => 1,
            Self::Blueprint => 2,
            Self::Relief => 3,
        }
    }
}

/// Utility reward offered by relief gates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReliefReward {
    /// Flat currency.
    Currency,
    /// Fleet repair.
    Heal,
    /// Reroll token.
    Reroll,
}

/// Category of a resolved reward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewardKind {
    /// Boon perk.
    Perk,
    /// Equipment blueprint.
    Blueprint,
    /// Currency payout.
    Currency,
    /// Fleet repair.
    Heal,
    /// Reroll token.
    Reroll,
}

/// Single candidate generated for a gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Offer {
    /// Perk candidate.
    Perk(PerkId),
    /// Blueprint candidate.
    Blueprint(BlueprintId),
    /// Utility candidate.
    Relief(ReliefReward),
}

impl Offer {
    /// Category of the reward the offer grants.
    #[must_use]
    pub const fn reward_kind(self) -> RewardKind {
        match self {
            Self::Perk(_) => RewardKind::Perk,
            Self::Blueprint(_) => RewardKind::Blueprint,
            Self::Relief(ReliefReward::Currency) => RewardKind::Currency,
            Self::Relief(ReliefReward::Heal) => RewardKind::Heal,
            Self::Relief(ReliefReward::Reroll) => RewardKind::Reroll,
        }
    }

    /// Stable numeric code used by digests and the reward log.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Perk(perk) => perk.code(),
            Self::Blueprint(blueprint) => blueprint.code(),
            Self::Relief(ReliefReward::Currency) => 501,
            Self::Relief(ReliefReward::Heal) => 502,
            Self::Relief(ReliefReward::Reroll) => 503,
        }
    }
}

/// Audit entry describing a resolved gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GateRewardRecord {
    /// Room whose gate was resolved.
    pub room_index: i32,
    /// Gate that was taken.
    pub gate: GateKind,
    /// Category of the granted reward.
    pub reward_kind: RewardKind,
    /// Reward that was granted.
    pub reward: Offer,
}

/// Level-up upgrade consumed at room start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// Damage and fire rate.
    Firepower,
    /// Maximum hull and repair.
    Hull,
    /// Mobility.
    Thrusters,
}

impl UpgradeKind {
    /// Upgrades in roll order.
    pub const ALL: [UpgradeKind; 3] = [
        UpgradeKind::Firepower,
        UpgradeKind::Hull,
        UpgradeKind::Thrusters,
    ];

    /// Stable numeric code used by digests.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Firepower => 1,
            Self::Hull => 2,
            Self::Thrusters => 3,
        }
    }
}

/// Per-room spawn and kill counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomCounters {
    /// Waves handed to the spawn service.
    pub waves_spawned: u32,
    /// Enemies created.
    pub enemies_spawned: u32,
    /// Enemies destroyed.
    pub enemies_destroyed: u32,
    /// Mini-bosses destroyed.
    pub mini_bosses_destroyed: u32,
    /// Bosses destroyed.
    pub bosses_destroyed: u32,
}

/// Human readable account of a completed room, intended for logs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    /// Index of the room.
    pub room_index: i32,
    /// Kind of the room.
    pub kind: RoomKind,
    /// Challenge in effect.
    pub challenge: ChallengeKind,
    /// Spawn and kill counters.
    pub counters: RoomCounters,
    /// Gate taken, if any resolved.
    pub gate: Option<GateKind>,
    /// Reward granted by the gate.
    pub reward: Option<Offer>,
    /// Distinct perks owned.
    pub perks: u32,
    /// Blueprint slots occupied.
    pub blueprints: u32,
    /// Currency after payout.
    pub currency: u32,
    /// Player level after payout.
    pub level: u32,
    /// Lifetime experience after payout.
    pub total_experience: u64,
    /// Rolling digest after the room.
    pub digest: u32,
}

impl fmt::Display for RoomSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "room {} {:?} challenge={:?} waves={} kills={}/{} mini={} boss={}",
            self.room_index,
            self.kind,
            self.challenge,
            self.counters.waves_spawned,
            self.counters.enemies_destroyed,
            self.counters.enemies_spawned,
            self.counters.mini_bosses_destroyed,
            self.counters.bosses_destroyed,
        )?;
        match (self.gate, self.reward) {
            (Some(gate), Some(reward)) => write!(f, " gate={gate:?} reward={reward:?}")?,
            _ => write!(f, " gate=none")?,
        }
        write!(
            f,
            " perks={} blueprints={} currency={} level={} xp={} digest={:#010x}",
            self.perks,
            self.blueprints,
            self.currency,
            self.level,
            self.total_experience,
            self.digest,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    fn sample_room() -> RoomDefinition {
        RoomDefinition {
            kind: RoomKind::Combat,
            relief: ReliefKind::Salvage,
            end_conditions: EndConditions::empty(),
            end_logic: EndLogic::AnyOf,
            duration_ticks: 0,
            wave_interval_ticks: 0,
            planned_waves: 3,
            kill_quota: 0,
            mini_boss_quota: 0,
            boss_quota: 0,
            base_normal_per_wave: 6,
            base_mini_bosses: 1,
            mini_boss_every: 2,
            base_bosses: 0,
            reward_currency: 40,
            reward_heal_ratio: -0.5,
            reward_damage_bonus: f32::NAN,
            reward_cooldown_bonus: 2.0,
            reward_hull_bonus: 0.0,
            offers_boon: true,
        }
    }

    #[test]
    fn sanitize_defaults_to_timer_and_clamps_durations() {
        let room = sample_room().sanitized();
        assert!(room.end_conditions.contains(EndCondition::Timer));
        assert_eq!(room.end_conditions.iter().count(), 1);
        assert_eq!(room.duration_ticks, 1);
        assert_eq!(room.wave_interval_ticks, 1);
        assert_eq!(room.reward_heal_ratio, 0.0);
        assert_eq!(room.reward_damage_bonus, 0.0);
        assert!(room.reward_cooldown_bonus < 1.0);
        assert_eq!(room.relief, ReliefKind::None);
    }

    #[test]
    fn sanitize_lifts_selected_quotas() {
        let mut room = sample_room();
        room.end_conditions = EndConditions::from_slice(&[
            EndCondition::KillQuota,
            EndCondition::MiniBossQuota,
        ]);
        let room = room.sanitized();
        assert_eq!(room.kill_quota, 1);
        assert_eq!(room.mini_boss_quota, 1);
        assert_eq!(room.boss_quota, 0);
    }

    #[test]
    fn condition_set_iterates_in_order() {
        let set = EndConditions::empty()
            .with(EndCondition::MiniBossQuota)
            .with(EndCondition::Timer);
        let collected: Vec<_> = set.iter().collect();
        assert_eq!(
            collected,
            vec![EndCondition::Timer, EndCondition::MiniBossQuota]
        );
    }

    #[test]
    fn bounties_follow_class_weights() {
        assert_eq!(EnemyClass::Normal.bounty(), 3);
        assert_eq!(EnemyClass::MiniBoss.bounty(), 20);
        assert_eq!(EnemyClass::Boss.bounty(), 34);
        assert_eq!(EnemyClass::Boss.kill_experience(), 38);
        assert!(EnemyClass::MiniBoss.is_heavy());
    }

    #[test]
    fn gate_record_round_trips_through_bincode() {
        assert_round_trip(&GateRewardRecord {
            room_index: 3,
            gate: GateKind::Blueprint,
            reward_kind: RewardKind::Blueprint,
            reward: Offer::Blueprint(BlueprintId::SwarmBay),
        });
    }

    #[test]
    fn perk_op_round_trips_through_bincode() {
        assert_round_trip(&PerkOp {
            perk: PerkId::FocusedLenses,
            kind: PerkOpKind::MulStat,
            source: None,
            target: None,
            tag: None,
            scope: WeaponScope::BeamWeapons,
            value: 1.1,
            stacks: 2,
        });
    }

    #[test]
    fn summary_renders_gate_and_digest() {
        let summary = RoomSummary {
            room_index: 2,
            kind: RoomKind::Boss,
            challenge: ChallengeKind::Hazard,
            counters: RoomCounters {
                waves_spawned: 4,
                enemies_spawned: 30,
                enemies_destroyed: 28,
                mini_bosses_destroyed: 1,
                bosses_destroyed: 1,
            },
            gate: Some(GateKind::Boon),
            reward: Some(Offer::Perk(PerkId::BeamConversion)),
            perks: 1,
            blueprints: 0,
            currency: 310,
            level: 3,
            total_experience: 190,
            digest: 0xdead_beef,
        };
        let line = summary.to_string();
        assert!(line.starts_with("room 2 Boss challenge=Hazard"));
        assert!(line.contains("reward=Perk(BeamConversion)"));
        assert!(line.ends_with("digest=0xdeadbeef"));
    }
}
