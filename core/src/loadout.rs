//! Perk and blueprint identities that make up the persistent player build.

use serde::{Deserialize, Serialize};

use crate::{UnitRole, WeaponMount, WeaponTag, WeaponType};

/// Selects which weapons a perk or modifier touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponScope {
    /// Every mounted weapon.
    AllWeapons,
    /// Weapons of the beam family.
    BeamWeapons,
    /// Weapons mounted on drones.
    Drones,
}

impl WeaponScope {
    /// Reports whether a weapon mounted on a unit of `role` falls within the scope.
    #[must_use]
    pub fn matches(self, role: UnitRole, weapon: &WeaponMount) -> bool {
        match self {
            Self::AllWeapons => true,
            Self::BeamWeapons => weapon.weapon_type == WeaponType::Beam,
            Self::Drones => role == UnitRole::Drone,
        }
    }
}

/// Boon perks that can be offered by a gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PerkId {
    /// Converts every kinetic weapon into a beam.
    BeamConversion,
    /// Drones swap their guns for beam emitters.
    DroneBeamLink,
    /// Multiplies beam damage.
    FocusedLenses,
    /// Tags every weapon as piercing.
    PiercingArrays,
}

impl PerkId {
    /// Stable numeric code used by digests and the reward log.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::BeamConversion => 101,
            Self::DroneBeamLink => 102,
            Self::FocusedLenses => 103,
            Self::PiercingArrays => 104,
        }
    }

    /// Structural perks perform a one-time conversion pass when first acquired.
    #[must_use]
    pub const fn is_structural(self) -> bool {
        matches!(self, Self::BeamConversion | Self::DroneBeamLink)
    }
}

/// Operation a perk performs on the loadout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerkOpKind {
    /// Adds a flat amount to weapon damage.
    AddStat,
    /// Multiplies weapon damage.
    MulStat,
    /// Attaches a weapon tag.
    AddTag,
    /// Detaches a weapon tag.
    RemoveTag,
    /// Converts the damage family of matching weapons.
    ConvertDamage,
    /// Replaces the attack family of matching weapons.
    ReplaceAttackFamily,
}

/// Applied perk entry, one per distinct [`PerkId`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerkOp {
    /// Perk that produced the entry.
    pub perk: PerkId,
    /// Operation performed by the perk.
    pub kind: PerkOpKind,
    /// Weapon family converted from, when relevant.
    pub source: Option<WeaponType>,
    /// Weapon family converted to, when relevant.
    pub target: Option<WeaponType>,
    /// Tag attached or removed, when relevant.
    pub tag: Option<WeaponTag>,
    /// Weapons touched by the operation.
    pub scope: WeaponScope,
    /// Magnitude; compounds each time the perk stacks.
    pub value: f32,
    /// Number of times the perk was acquired.
    pub stacks: u32,
}

/// Equipment slot a blueprint occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlueprintKind {
    /// Flagship primary weapon.
    Weapon,
    /// Power plant modifying fire rate and output.
    Reactor,
    /// Drone bay.
    Hangar,
}

/// Equipment blueprints that can be offered by a gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlueprintId {
    /// Heavy beam lance for the flagship.
    LanceArray,
    /// Long-barrel rail battery for the flagship.
    RailBattery,
    /// Fusion reactor core.
    FusionCore,
    /// Drone hangar bay.
    SwarmBay,
}

impl BlueprintId {
    /// Stable numeric code used by digests and the reward log.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::LanceArray => 201,
            Self::RailBattery => 202,
            Self::FusionCore => 203,
            Self::SwarmBay => 204,
        }
    }

    /// Slot occupied by the blueprint.
    #[must_use]
    pub const fn kind(self) -> BlueprintKind {
        match self {
            Self::LanceArray | Self::RailBattery => BlueprintKind::Weapon,
            Self::FusionCore => BlueprintKind::Reactor,
            Self::SwarmBay => BlueprintKind::Hangar,
        }
    }

    /// Module, manufacturer and parts composing the blueprint.
    #[must_use]
    pub const fn parts(self) -> (ModuleId, ManufacturerId, [PartId; 2]) {
        match self {
            Self::LanceArray => (
                ModuleId::BeamLance,
                ManufacturerId::Helios,
                [PartId::FocusingCoil, PartId::CapacitorBank],
            ),
            Self::RailBattery => (
                ModuleId::Railgun,
                ManufacturerId::Kessler,
                [PartId::LongBarrel, PartId::CapacitorBank],
            ),
            Self::FusionCore => (
                ModuleId::FusionReactor,
                ManufacturerId::Helios,
                [PartId::MagneticBottle, PartId::HeatSink],
            ),
            Self::SwarmBay => (
                ModuleId::DroneBay,
                ManufacturerId::Vanguard,
                [PartId::LaunchRail, PartId::HeatSink],
            ),
        }
    }
}

/// Base equipment module referenced by a blueprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModuleId {
    /// Beam lance hardpoint.
    BeamLance,
    /// Railgun hardpoint.
    Railgun,
    /// Fusion reactor.
    FusionReactor,
    /// Drone bay.
    DroneBay,
}

/// Manufacturer credited for a blueprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ManufacturerId {
    /// Energy systems manufacturer.
    Helios,
    /// Mass driver manufacturer.
    Kessler,
    /// Carrier systems manufacturer.
    Vanguard,
}

impl ManufacturerId {
    /// Stable numeric code used by digests.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Helios => 301,
            Self::Kessler => 302,
            Self::Vanguard => 303,
        }
    }
}

/// Component part referenced by a blueprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PartId {
    /// Beam focusing coil.
    FocusingCoil,
    /// Capacitor bank.
    CapacitorBank,
    /// Extended barrel.
    LongBarrel,
    /// Plasma containment bottle.
    MagneticBottle,
    /// Radiator assembly.
    HeatSink,
    /// Drone launch rail.
    LaunchRail,
}

impl PartId {
    /// Stable numeric code used by digests.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::FocusingCoil => 401,
            Self::CapacitorBank => 402,
            Self::LongBarrel => 403,
            Self::MagneticBottle => 404,
            Self::HeatSink => 405,
            Self::LaunchRail => 406,
        }
    }
}

/// Blueprint occupying a slot of the loadout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledBlueprint {
    /// Installed blueprint.
    pub blueprint: BlueprintId,
    /// Base module.
    pub module: ModuleId,
    /// Manufacturer.
    pub manufacturer: ManufacturerId,
    /// Component parts.
    pub parts: [PartId; 2],
    /// Slot kind.
    pub kind: BlueprintKind,
    /// Number of installs into this slot.
    pub version: u32,
}

impl InstalledBlueprint {
    /// Creates a first-version slot entry for the blueprint.
    #[must_use]
    pub const fn first(blueprint: BlueprintId) -> Self {
        let (module, manufacturer, parts) = blueprint.parts();
        Self {
            blueprint,
            module,
            manufacturer,
            parts,
            kind: blueprint.kind(),
            version: 1,
        }
    }
}
