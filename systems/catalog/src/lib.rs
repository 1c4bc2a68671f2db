#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Room catalog fixed at run start.
//!
//! The catalog is either the built-in run layout or a declarative TOML
//! profile. Profile entries override the built-in template for their room
//! kind field by field; an entry that cannot be understood is skipped with a
//! warning and the built-in room for that slot is used instead.

use fleetcrawl_core::{
    EndCondition, EndConditions, EndLogic, ReliefKind, RoomDefinition, RoomKind,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Profile format understood by [`RoomCatalog::from_profile_str`].
pub const SUPPORTED_PROFILE_VERSION: u32 = 1;

const DEFAULT_LAYOUT: [(RoomKind, ReliefKind); 9] = [
    (RoomKind::Combat, ReliefKind::None),
    (RoomKind::Combat, ReliefKind::None),
    (RoomKind::Relief, ReliefKind::Recovery),
    (RoomKind::Combat, ReliefKind::None),
    (RoomKind::Combat, ReliefKind::None),
    (RoomKind::Relief, ReliefKind::Salvage),
    (RoomKind::Combat, ReliefKind::None),
    (RoomKind::Relief, ReliefKind::Arsenal),
    (RoomKind::Boss, ReliefKind::None),
];

/// Failures that prevent a profile document from being used at all.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The document is not valid TOML or lacks the expected top-level shape.
    #[error("failed to parse room profile: {0}")]
    Parse(#[from] toml::de::Error),
    /// The document declares a format version this build does not understand.
    #[error(
        "unsupported room profile version {found}; expected {expected}",
        expected = SUPPORTED_PROFILE_VERSION
    )]
    UnsupportedVersion {
        /// Version declared by the document.
        found: u32,
    },
    /// The document declares no rooms.
    #[error("room profile declares no rooms")]
    Empty,
}

/// Ordered list of room definitions for a run.
#[derive(Clone, Debug, PartialEq)]
pub struct RoomCatalog {
    rooms: Vec<RoomDefinition>,
}

impl Default for RoomCatalog {
    fn default() -> Self {
        Self::default_run()
    }
}

impl RoomCatalog {
    /// Creates a catalog from explicit definitions, sanitizing each of them.
    #[must_use]
    pub fn new(rooms: Vec<RoomDefinition>) -> Self {
        Self {
            rooms: rooms.into_iter().map(RoomDefinition::sanitized).collect(),
        }
    }

    /// Built-in nine room run ending in a boss.
    #[must_use]
    pub fn default_run() -> Self {
        Self::new(
            DEFAULT_LAYOUT
                .iter()
                .map(|(kind, relief)| default_room(*kind, *relief))
                .collect(),
        )
    }

    /// Parses a TOML room profile.
    ///
    /// Document level problems are returned as [`CatalogError`]. Individual
    /// malformed entries never fail the document.
    pub fn from_profile_str(contents: &str) -> Result<Self, CatalogError> {
        let document: ProfileDocument = toml::from_str(contents)?;
        if document.version != SUPPORTED_PROFILE_VERSION {
            return Err(CatalogError::UnsupportedVersion {
                found: document.version,
            });
        }
        if document.rooms.is_empty() {
            return Err(CatalogError::Empty);
        }

        let rooms = document
            .rooms
            .into_iter()
            .enumerate()
            .map(|(slot, entry)| resolve_entry(slot, entry))
            .collect();
        Ok(Self::new(rooms))
    }

    /// Definitions in run order.
    #[must_use]
    pub fn rooms(&self) -> &[RoomDefinition] {
        &self.rooms
    }

    /// Definition for the room at `index`, if any.
    #[must_use]
    pub fn get(&self, index: i32) -> Option<&RoomDefinition> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.rooms.get(index))
    }

    /// Number of rooms in the run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Reports whether the catalog has no rooms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

/// Built-in template for a room kind.
#[must_use]
pub fn default_room(kind: RoomKind, relief: ReliefKind) -> RoomDefinition {
    match kind {
        RoomKind::Combat => RoomDefinition {
            kind,
            relief: ReliefKind::None,
            end_conditions: EndConditions::from_slice(&[
                EndCondition::Timer,
                EndCondition::KillQuota,
            ]),
            end_logic: EndLogic::AnyOf,
            duration_ticks: 1_800,
            wave_interval_ticks: 300,
            planned_waves: 6,
            kill_quota: 50,
            mini_boss_quota: 1,
            boss_quota: 0,
            base_normal_per_wave: 8,
            base_mini_bosses: 1,
            mini_boss_every: 3,
            base_bosses: 0,
            reward_currency: 60,
            reward_heal_ratio: 0.08,
            reward_damage_bonus: 0.0,
            reward_cooldown_bonus: 0.0,
            reward_hull_bonus: 0.0,
            offers_boon: true,
        },
        RoomKind::Relief => RoomDefinition {
            kind,
            relief: if relief == ReliefKind::None {
                ReliefKind::Recovery
            } else {
                relief
            },
            end_conditions: EndConditions::empty().with(EndCondition::Timer),
            end_logic: EndLogic::AnyOf,
            duration_ticks: 600,
            wave_interval_ticks: 600,
            planned_waves: 0,
            kill_quota: 0,
            mini_boss_quota: 0,
            boss_quota: 0,
            base_normal_per_wave: 0,
            base_mini_bosses: 0,
            mini_boss_every: 0,
            base_bosses: 0,
            reward_currency: 20,
            reward_heal_ratio: 0.15,
            reward_damage_bonus: 0.0,
            reward_cooldown_bonus: 0.0,
            reward_hull_bonus: 10.0,
            offers_boon: true,
        },
        RoomKind::Boss => RoomDefinition {
            kind,
            relief: ReliefKind::None,
            end_conditions: EndConditions::from_slice(&[
                EndCondition::Timer,
                EndCondition::BossQuota,
            ]),
            end_logic: EndLogic::AnyOf,
            duration_ticks: 5_400,
            wave_interval_ticks: 420,
            planned_waves: 5,
            kill_quota: 0,
            mini_boss_quota: 1,
            boss_quota: 1,
            base_normal_per_wave: 6,
            base_mini_bosses: 1,
            mini_boss_every: 2,
            base_bosses: 1,
            reward_currency: 150,
            reward_heal_ratio: 0.2,
            reward_damage_bonus: 0.05,
            reward_cooldown_bonus: 0.03,
            reward_hull_bonus: 25.0,
            offers_boon: true,
        },
    }
}

#[derive(Debug, Deserialize)]
struct ProfileDocument {
    version: u32,
    #[serde(default)]
    rooms: Vec<toml::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RoomProfile {
    kind: RoomKind,
    relief: Option<ReliefKind>,
    end_conditions: Option<Vec<EndCondition>>,
    end_logic: Option<EndLogic>,
    duration_ticks: Option<u64>,
    wave_interval_ticks: Option<u64>,
    planned_waves: Option<u32>,
    kill_quota: Option<u32>,
    mini_boss_quota: Option<u32>,
    boss_quota: Option<u32>,
    base_normal_per_wave: Option<u32>,
    base_mini_bosses: Option<u32>,
    mini_boss_every: Option<u32>,
    base_bosses: Option<u32>,
    reward_currency: Option<u32>,
    reward_heal_ratio: Option<f32>,
    reward_damage_bonus: Option<f32>,
    reward_cooldown_bonus: Option<f32>,
    reward_hull_bonus: Option<f32>,
    offers_boon: Option<bool>,
}

impl RoomProfile {
    fn into_definition(self) -> RoomDefinition {
        let mut room = default_room(self.kind, self.relief.unwrap_or(ReliefKind::None));
        if let Some(conditions) = self.end_conditions {
            room.end_conditions = EndConditions::from_slice(&conditions);
        }
        override_field(&mut room.end_logic, self.end_logic);
        override_field(&mut room.duration_ticks, self.duration_ticks);
        override_field(&mut room.wave_interval_ticks, self.wave_interval_ticks);
        override_field(&mut room.planned_waves, self.planned_waves);
        override_field(&mut room.kill_quota, self.kill_quota);
        override_field(&mut room.mini_boss_quota, self.mini_boss_quota);
        override_field(&mut room.boss_quota, self.boss_quota);
        override_field(&mut room.base_normal_per_wave, self.base_normal_per_wave);
        override_field(&mut room.base_mini_bosses, self.base_mini_bosses);
        override_field(&mut room.mini_boss_every, self.mini_boss_every);
        override_field(&mut room.base_bosses, self.base_bosses);
        override_field(&mut room.reward_currency, self.reward_currency);
        override_field(&mut room.reward_heal_ratio, self.reward_heal_ratio);
        override_field(&mut room.reward_damage_bonus, self.reward_damage_bonus);
        override_field(&mut room.reward_cooldown_bonus, self.reward_cooldown_bonus);
        override_field(&mut room.reward_hull_bonus, self.reward_hull_bonus);
        override_field(&mut room.offers_boon, self.offers_boon);
        room
    }
}

fn override_field<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn resolve_entry(slot: usize, entry: toml::Value) -> RoomDefinition {
    match entry.clone().try_into::<RoomProfile>() {
        Ok(profile) => {
            debug!(slot, kind = ?profile.kind, "room profile entry accepted");
            profile.into_definition()
        }
        Err(error) => {
            let fallback = fallback_for(slot, &entry);
            warn!(
                slot,
                %error,
                fallback = ?fallback.kind,
                "malformed room profile entry; using built-in room"
            );
            fallback
        }
    }
}

fn fallback_for(slot: usize, entry: &toml::Value) -> RoomDefinition {
    let declared_kind = entry
        .get("kind")
        .cloned()
        .and_then(|kind| kind.try_into::<RoomKind>().ok());
    match declared_kind {
        Some(kind) => default_room(kind, ReliefKind::None),
        None => {
            let (kind, relief) = DEFAULT_LAYOUT
                .get(slot)
                .copied()
                .unwrap_or((RoomKind::Combat, ReliefKind::None));
            default_room(kind, relief)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_run_ends_with_boss() {
        let catalog = RoomCatalog::default_run();
        assert_eq!(catalog.len(), DEFAULT_LAYOUT.len());
        assert_eq!(catalog.rooms().last().map(|room| room.kind), Some(RoomKind::Boss));
        assert!(catalog.get(-1).is_none());
        assert!(catalog.get(99).is_none());
    }

    #[test]
    fn relief_template_never_has_empty_flavour() {
        let room = default_room(RoomKind::Relief, ReliefKind::None);
        assert_eq!(room.relief, ReliefKind::Recovery);
    }

    #[test]
    fn profile_overrides_template_fields() {
        let catalog = RoomCatalog::from_profile_str(
            r#"
            version = 1

            [[rooms]]
            kind = "Combat"
            end_conditions = ["KillQuota", "MiniBossQuota"]
            end_logic = "AllOf"
            kill_quota = 12
            reward_currency = 80
            "#,
        )
        .expect("profile parses");

        let room = &catalog.rooms()[0];
        assert_eq!(room.end_logic, EndLogic::AllOf);
        assert!(room.end_conditions.contains(EndCondition::MiniBossQuota));
        assert!(!room.end_conditions.contains(EndCondition::Timer));
        assert_eq!(room.kill_quota, 12);
        assert_eq!(room.reward_currency, 80);
        assert_eq!(room.duration_ticks, 1_800);
    }

    #[test]
    fn malformed_entry_falls_back_to_declared_kind() {
        let catalog = RoomCatalog::from_profile_str(
            r#"
            version = 1

            [[rooms]]
            kind = "Boss"
            duration_ticks = -5
            "#,
        )
        .expect("document parses");
        assert_eq!(catalog.rooms()[0], default_room(RoomKind::Boss, ReliefKind::None));
    }

    #[test]
    fn entry_without_kind_uses_layout_slot() {
        let catalog = RoomCatalog::from_profile_str(
            r#"
            version = 1

            [[rooms]]
            kind = "Combat"

            [[rooms]]
            kind = "Combat"

            [[rooms]]
            surprise = true
            "#,
        )
        .expect("document parses");
        assert_eq!(catalog.rooms()[2].kind, RoomKind::Relief);
        assert_eq!(catalog.rooms()[2].relief, ReliefKind::Recovery);
    }

    #[test]
    fn zero_quota_is_lifted_during_ingestion() {
        let catalog = RoomCatalog::from_profile_str(
            r#"
            version = 1

            [[rooms]]
            kind = "Combat"
            kill_quota = 0
            duration_ticks = 0
            "#,
        )
        .expect("document parses");
        assert_eq!(catalog.rooms()[0].kill_quota, 1);
        assert_eq!(catalog.rooms()[0].duration_ticks, 1);
    }

    #[test]
    fn rejects_unknown_version() {
        let error = RoomCatalog::from_profile_str("version = 7\n[[rooms]]\nkind = \"Combat\"\n")
            .expect_err("version 7 is unsupported");
        assert!(matches!(error, CatalogError::UnsupportedVersion { found: 7 }));
    }

    #[test]
    fn rejects_empty_profiles() {
        let error = RoomCatalog::from_profile_str("version = 1\n").expect_err("no rooms");
        assert!(matches!(error, CatalogError::Empty));
    }

    #[test]
    fn rejects_invalid_toml() {
        let error = RoomCatalog::from_profile_str("version = = 1").expect_err("invalid toml");
        assert!(matches!(error, CatalogError::Parse(_)));
    }
}
