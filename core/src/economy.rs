//! Per-run economy, progression and challenge bookkeeping.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{ManufacturerId, PartId};

/// Experience required to reach level 2.
pub const INITIAL_EXPERIENCE_TO_NEXT: u32 = 30;

/// Optional risk modifier rolled for a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChallengeKind {
    /// No modifier.
    None,
    /// Larger waves.
    Swarm,
    /// Environmental hazards.
    Hazard,
    /// A hunting elite.
    Nemesis,
}

impl ChallengeKind {
    /// Stable numeric code used by digests.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Swarm => 1,
            Self::Hazard => 2,
            Self::Nemesis => 3,
        }
    }
}

/// Challenge rolled for the active room together with its multipliers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChallengeState {
    /// Rolled challenge.
    pub kind: ChallengeKind,
    /// Whether a challenge is in effect.
    pub active: bool,
    /// Risk tier, `0` when inactive.
    pub risk_tier: u32,
    /// Multiplier applied to wave enemy counts.
    pub spawn_mul: f32,
    /// Multiplier applied to currency payouts.
    pub currency_mul: f32,
    /// Multiplier applied to experience awards.
    pub xp_mul: f32,
}

impl ChallengeState {
    /// Inactive challenge with neutral multipliers.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            kind: ChallengeKind::None,
            active: false,
            risk_tier: 0,
            spawn_mul: 1.0,
            currency_mul: 1.0,
            xp_mul: 1.0,
        }
    }
}

impl Default for ChallengeState {
    fn default() -> Self {
        Self::none()
    }
}

/// Level and experience tracking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    /// Current level, starting at 1.
    pub level: u32,
    /// Experience accumulated toward the next level.
    pub experience: u32,
    /// Experience required for the next level.
    pub experience_to_next: u32,
    /// Level-up upgrades waiting to be consumed at room start.
    pub unspent_upgrades: u32,
    /// Lifetime experience earned during the run.
    pub total_experience: u64,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
            experience_to_next: INITIAL_EXPERIENCE_TO_NEXT,
            unspent_upgrades: 0,
            total_experience: 0,
        }
    }
}

/// Mutable run economy shared by the director, gate resolver and build engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EconomyState {
    /// Spendable currency.
    pub currency: u32,
    /// Tokens that regenerate a gate's offers.
    pub reroll_tokens: u32,
    /// Accumulated damage multiplier.
    pub damage_mul: f32,
    /// Accumulated cooldown multiplier.
    pub cooldown_mul: f32,
    /// Level and experience.
    pub progression: Progression,
    /// Challenge of the active room.
    pub challenge: ChallengeState,
    /// Meta currency earned from rooms.
    pub shards: u32,
    /// Rooms cleared while a challenge was active.
    pub challenge_clears: u32,
    /// Manufacturers unlocked by installed blueprints.
    pub unlocked_manufacturers: BTreeSet<ManufacturerId>,
    /// Parts unlocked by installed blueprints.
    pub unlocked_parts: BTreeSet<PartId>,
}

impl Default for EconomyState {
    fn default() -> Self {
        Self {
            currency: 0,
            reroll_tokens: 0,
            damage_mul: 1.0,
            cooldown_mul: 1.0,
            progression: Progression::default(),
            challenge: ChallengeState::none(),
            shards: 0,
            challenge_clears: 0,
            unlocked_manufacturers: BTreeSet::new(),
            unlocked_parts: BTreeSet::new(),
        }
    }
}

impl EconomyState {
    /// Creates an economy with neutral modifiers and level 1 progression.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `amount` scaled by the active challenge, returning the credited value.
    pub fn credit_scaled(&mut self, amount: u32) -> u32 {
        let scaled = scale_rounded(amount, self.challenge.currency_mul);
        self.currency = self.currency.saturating_add(scaled);
        scaled
    }

    /// Compounds the reactive damage and cooldown modifiers.
    pub fn compound_modifiers(&mut self, damage_mul: f32, cooldown_mul: f32) {
        self.damage_mul *= damage_mul.max(0.0);
        self.cooldown_mul *= cooldown_mul.max(0.0);
    }
}

/// Multiplies an integer amount and rounds half away from zero.
#[must_use]
pub fn scale_rounded(amount: u32, multiplier: f32) -> u32 {
    let scaled = (f64::from(amount) * f64::from(multiplier.max(0.0))).round();
    scaled.min(f64::from(u32::MAX)) as u32
}
