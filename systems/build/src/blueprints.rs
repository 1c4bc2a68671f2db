use fleetcrawl_core::{BlueprintId, EconomyState, WeaponMount, WeaponType};

/// Drones a hangar keeps in flight.
pub const HANGAR_DRONES: usize = 2;

pub(crate) const DRONE_HULL: f32 = 40.0;
pub(crate) const REACTOR_DAMAGE_MUL: f32 = 1.06;
pub(crate) const REACTOR_COOLDOWN_MUL: f32 = 0.94;

/// Result of installing a blueprint into its slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstallOutcome {
    /// Blueprint that previously occupied the slot.
    pub previous: Option<BlueprintId>,
    /// Slot version after the install.
    pub version: u32,
}

/// Weapon mounted by a weapon blueprint, carrying the run's accrued modifiers.
#[must_use]
pub fn blueprint_weapon(blueprint: BlueprintId, economy: &EconomyState) -> Option<WeaponMount> {
    let (weapon_type, damage, cooldown) = match blueprint {
        BlueprintId::LanceArray => (WeaponType::Beam, 26.0, 1.1),
        BlueprintId::RailBattery => (WeaponType::Kinetic, 34.0, 1.4),
        BlueprintId::FusionCore | BlueprintId::SwarmBay => return None,
    };
    Some(scaled(weapon_type, damage, cooldown, economy))
}

pub(crate) fn drone_weapon(economy: &EconomyState) -> WeaponMount {
    scaled(WeaponType::Kinetic, 6.0, 0.5, economy)
}

fn scaled(weapon_type: WeaponType, damage: f32, cooldown: f32, economy: &EconomyState) -> WeaponMount {
    WeaponMount::new(
        weapon_type,
        damage * economy.damage_mul,
        cooldown * economy.cooldown_mul,
    )
}
