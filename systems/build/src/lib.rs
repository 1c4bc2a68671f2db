#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Perk and blueprint application engine.
//!
//! The [`Loadout`] owns the ordered perk list and the blueprint slots of a run
//! and applies their effects to the [`Fleet`]. Perks hold at most one entry per
//! id; re-picks stack onto that entry. Blueprints hold one slot per kind.

mod blueprints;
mod perks;

use fleetcrawl_core::{
    fold, mix, BlueprintId, BlueprintKind, EconomyState, Fleet, InstalledBlueprint, PerkId,
    PerkOp, PerkOpKind, UnitRole, WeaponMount, WeaponScope,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use blueprints::{blueprint_weapon, InstallOutcome, HANGAR_DRONES};
pub use perks::{perk_definition, PerkOutcome, STACK_COMPOUND};

/// Persistent build of a run: acquired perks and installed blueprints.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    perks: Vec<PerkOp>,
    blueprints: Vec<InstalledBlueprint>,
}

impl Loadout {
    /// Creates an empty loadout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Perk entries in acquisition order.
    #[must_use]
    pub fn perks(&self) -> &[PerkOp] {
        &self.perks
    }

    /// Occupied blueprint slots in first-install order.
    #[must_use]
    pub fn blueprints(&self) -> &[InstalledBlueprint] {
        &self.blueprints
    }

    /// Looks up the entry for a perk.
    #[must_use]
    pub fn perk(&self, perk: PerkId) -> Option<&PerkOp> {
        self.perks.iter().find(|op| op.perk == perk)
    }

    /// Looks up the blueprint occupying a slot.
    #[must_use]
    pub fn blueprint(&self, kind: BlueprintKind) -> Option<&InstalledBlueprint> {
        self.blueprints.iter().find(|slot| slot.kind == kind)
    }

    /// Applies a perk pick to the fleet.
    ///
    /// A first pick appends the definition and runs its effect over every
    /// unit. A re-pick stacks the existing entry and compounds its value; only
    /// multiplicative perks touch the fleet again, so structural conversions
    /// happen once.
    pub fn apply_perk(&mut self, perk: PerkId, fleet: &mut Fleet) -> PerkOutcome {
        if let Some(op) = self.perks.iter_mut().find(|op| op.perk == perk) {
            op.stacks = op.stacks.saturating_add(1);
            op.value *= STACK_COMPOUND;
            if op.kind == PerkOpKind::MulStat {
                for unit in fleet.units_mut() {
                    perks::apply_to_unit(op, unit);
                }
            }
            debug!(perk = ?perk, stacks = op.stacks, value = op.value, "perk stacked");
            return PerkOutcome::Stacked { stacks: op.stacks };
        }

        let op = perk_definition(perk);
        for unit in fleet.units_mut() {
            perks::apply_to_unit(&op, unit);
        }
        debug!(perk = ?perk, structural = perk.is_structural(), "perk acquired");
        self.perks.push(op);
        PerkOutcome::Acquired
    }

    /// Fits a newly created mount with every owned perk, in acquisition order.
    ///
    /// Stat perks contribute their current compounded value. Weapons already in
    /// the fleet received their perks when picked and must not be fitted again.
    pub fn fit_mount(&self, role: UnitRole, weapon: &mut WeaponMount) {
        for op in &self.perks {
            perks::apply_to_weapon(op, role, weapon);
        }
    }

    /// Installs a blueprint into its slot and applies its install effect.
    ///
    /// An occupied slot is replaced and its version incremented. The
    /// blueprint's manufacturer and parts are unlocked in the economy.
    pub fn install_blueprint(
        &mut self,
        blueprint: BlueprintId,
        fleet: &mut Fleet,
        economy: &mut EconomyState,
    ) -> InstallOutcome {
        let kind = blueprint.kind();
        let outcome = match self.blueprints.iter_mut().find(|slot| slot.kind == kind) {
            Some(slot) => {
                let previous = slot.blueprint;
                let version = slot.version.saturating_add(1);
                *slot = InstalledBlueprint {
                    version,
                    ..InstalledBlueprint::first(blueprint)
                };
                InstallOutcome {
                    previous: Some(previous),
                    version,
                }
            }
            None => {
                self.blueprints.push(InstalledBlueprint::first(blueprint));
                InstallOutcome {
                    previous: None,
                    version: 1,
                }
            }
        };

        let (_, manufacturer, parts) = blueprint.parts();
        let _ = economy.unlocked_manufacturers.insert(manufacturer);
        for part in parts {
            let _ = economy.unlocked_parts.insert(part);
        }

        match kind {
            BlueprintKind::Weapon => self.mount_primary(blueprint, fleet, economy),
            BlueprintKind::Reactor => {
                fleet.scale_weapons(
                    WeaponScope::AllWeapons,
                    blueprints::REACTOR_DAMAGE_MUL,
                    blueprints::REACTOR_COOLDOWN_MUL,
                );
                economy.compound_modifiers(
                    blueprints::REACTOR_DAMAGE_MUL,
                    blueprints::REACTOR_COOLDOWN_MUL,
                );
            }
            BlueprintKind::Hangar => self.launch_drones(fleet, economy),
        }

        debug!(
            blueprint = ?blueprint,
            ?kind,
            version = outcome.version,
            replaced = ?outcome.previous,
            "blueprint installed"
        );
        outcome
    }

    /// Stable hash of the perk entries and blueprint slots.
    #[must_use]
    pub fn fingerprint(&self) -> u32 {
        let mut digest = mix(self.perks.len() as u32, self.blueprints.len() as u32, 0, 0);
        for op in &self.perks {
            digest = fold(digest, op.perk.code(), op.stacks, op.value.to_bits());
        }
        for slot in &self.blueprints {
            let parts = slot.parts[0].code() ^ slot.parts[1].code().rotate_left(16);
            digest = fold(
                digest,
                slot.blueprint.code(),
                slot.version,
                slot.manufacturer.code() ^ parts,
            );
        }
        digest
    }

    fn mount_primary(&self, blueprint: BlueprintId, fleet: &mut Fleet, economy: &EconomyState) {
        let Some(mut weapon) = blueprint_weapon(blueprint, economy) else {
            return;
        };
        self.fit_mount(UnitRole::Flagship, &mut weapon);
        let Some(flagship) = fleet
            .units_mut()
            .iter_mut()
            .find(|unit| unit.role == UnitRole::Flagship)
        else {
            return;
        };
        match flagship.weapons.first_mut() {
            Some(primary) => *primary = weapon,
            None => flagship.weapons.push(weapon),
        }
    }

    fn launch_drones(&self, fleet: &mut Fleet, economy: &EconomyState) {
        let airborne = fleet
            .units()
            .iter()
            .filter(|unit| unit.role == UnitRole::Drone && unit.is_alive())
            .count();
        for _ in airborne..HANGAR_DRONES {
            let mut weapon = blueprints::drone_weapon(economy);
            self.fit_mount(UnitRole::Drone, &mut weapon);
            let _ = fleet.add_unit(UnitRole::Drone, blueprints::DRONE_HULL, vec![weapon]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetcrawl_core::{ManufacturerId, PartId, WeaponTag, WeaponType};

    fn weapons_of(fleet: &Fleet, role: UnitRole) -> Vec<WeaponType> {
        fleet
            .units()
            .iter()
            .filter(|unit| unit.role == role)
            .flat_map(|unit| unit.weapons.iter().map(|weapon| weapon.weapon_type))
            .collect()
    }

    #[test]
    fn repeated_perk_stacks_without_duplicating() {
        let mut loadout = Loadout::new();
        let mut fleet = Fleet::starter();

        assert_eq!(
            loadout.apply_perk(PerkId::BeamConversion, &mut fleet),
            PerkOutcome::Acquired
        );
        let converted = fleet.units()[0].weapons[0].damage;
        assert_eq!(
            loadout.apply_perk(PerkId::BeamConversion, &mut fleet),
            PerkOutcome::Stacked { stacks: 2 }
        );

        assert_eq!(loadout.perks().len(), 1);
        let op = loadout.perk(PerkId::BeamConversion).expect("perk owned");
        assert_eq!(op.stacks, 2);
        assert!((op.value - 1.05 * STACK_COMPOUND).abs() < 1e-5);
        assert_eq!(fleet.units()[0].weapons[0].damage, converted);
    }

    #[test]
    fn beam_conversion_converts_kinetic_weapons_once() {
        let mut loadout = Loadout::new();
        let mut fleet = Fleet::starter();
        let _ = loadout.apply_perk(PerkId::BeamConversion, &mut fleet);

        assert_eq!(
            weapons_of(&fleet, UnitRole::Flagship),
            vec![WeaponType::Beam, WeaponType::Beam]
        );
        assert_eq!(
            weapons_of(&fleet, UnitRole::Escort),
            vec![WeaponType::Missile, WeaponType::Missile]
        );
        let primary = &fleet.units()[0].weapons[0];
        assert!((primary.damage - 14.0 * 1.05).abs() < 1e-4);
    }

    #[test]
    fn multiplicative_perk_reapplies_compounded_value() {
        let mut loadout = Loadout::new();
        let mut fleet = Fleet::new();
        let _ = fleet.add_unit(
            UnitRole::Flagship,
            100.0,
            vec![fleetcrawl_core::WeaponMount::new(WeaponType::Beam, 10.0, 1.0)],
        );

        let _ = loadout.apply_perk(PerkId::FocusedLenses, &mut fleet);
        assert!((fleet.units()[0].weapons[0].damage - 11.0).abs() < 1e-4);
        let _ = loadout.apply_perk(PerkId::FocusedLenses, &mut fleet);
        let expected = 11.0 * 1.10 * STACK_COMPOUND;
        assert!((fleet.units()[0].weapons[0].damage - expected).abs() < 1e-3);
    }

    #[test]
    fn tag_perk_is_idempotent() {
        let mut loadout = Loadout::new();
        let mut fleet = Fleet::starter();
        let _ = loadout.apply_perk(PerkId::PiercingArrays, &mut fleet);
        let _ = loadout.apply_perk(PerkId::PiercingArrays, &mut fleet);
        for unit in fleet.units() {
            for weapon in &unit.weapons {
                assert_eq!(weapon.tags, vec![WeaponTag::Piercing]);
            }
        }
    }

    #[test]
    fn weapon_slot_is_exclusive_and_versioned() {
        let mut loadout = Loadout::new();
        let mut fleet = Fleet::starter();
        let mut economy = EconomyState::new();

        let first = loadout.install_blueprint(BlueprintId::LanceArray, &mut fleet, &mut economy);
        assert_eq!(first.previous, None);
        let second = loadout.install_blueprint(BlueprintId::RailBattery, &mut fleet, &mut economy);
        assert_eq!(second.previous, Some(BlueprintId::LanceArray));

        let weapons: Vec<_> = loadout
            .blueprints()
            .iter()
            .filter(|slot| slot.kind == BlueprintKind::Weapon)
            .collect();
        assert_eq!(weapons.len(), 1);
        assert_eq!(weapons[0].blueprint, BlueprintId::RailBattery);
        assert_eq!(weapons[0].version, 2);
        assert_eq!(fleet.units()[0].weapons[0].weapon_type, WeaponType::Kinetic);
        assert!(economy.unlocked_manufacturers.contains(&ManufacturerId::Helios));
        assert!(economy.unlocked_manufacturers.contains(&ManufacturerId::Kessler));
        assert!(economy.unlocked_parts.contains(&PartId::LongBarrel));
    }

    #[test]
    fn mounted_weapon_is_retrofitted_with_conversions() {
        let mut loadout = Loadout::new();
        let mut fleet = Fleet::starter();
        let mut economy = EconomyState::new();
        let _ = loadout.apply_perk(PerkId::BeamConversion, &mut fleet);
        let _ = loadout.apply_perk(PerkId::PiercingArrays, &mut fleet);

        let _ = loadout.install_blueprint(BlueprintId::RailBattery, &mut fleet, &mut economy);
        let primary = &fleet.units()[0].weapons[0];
        assert_eq!(primary.weapon_type, WeaponType::Beam);
        assert!(primary.has_tag(WeaponTag::Piercing));
    }

    #[test]
    fn stat_perks_carry_over_to_new_mounts_only() {
        let mut loadout = Loadout::new();
        let mut fleet = Fleet::starter();
        let mut economy = EconomyState::new();
        let _ = loadout.apply_perk(PerkId::FocusedLenses, &mut fleet);
        let secondary = fleet.units()[0].weapons[1].clone();

        let _ = loadout.install_blueprint(BlueprintId::LanceArray, &mut fleet, &mut economy);
        let flagship = &fleet.units()[0];
        assert_eq!(flagship.weapons[0].weapon_type, WeaponType::Beam);
        assert!((flagship.weapons[0].damage - 26.0 * 1.10).abs() < 1e-4);
        assert_eq!(flagship.weapons[1], secondary);
    }

    #[test]
    fn launched_drones_receive_stat_perks_after_conversion() {
        let mut loadout = Loadout::new();
        let mut fleet = Fleet::starter();
        let mut economy = EconomyState::new();
        let _ = loadout.apply_perk(PerkId::DroneBeamLink, &mut fleet);
        let _ = loadout.apply_perk(PerkId::FocusedLenses, &mut fleet);

        let _ = loadout.install_blueprint(BlueprintId::SwarmBay, &mut fleet, &mut economy);
        for drone in fleet
            .units()
            .iter()
            .filter(|unit| unit.role == UnitRole::Drone)
        {
            assert!((drone.weapons[0].damage - 6.0 * 1.02 * 1.10).abs() < 1e-4);
        }
    }

    #[test]
    fn hangar_launches_retrofitted_drones() {
        let mut loadout = Loadout::new();
        let mut fleet = Fleet::starter();
        let mut economy = EconomyState::new();
        let _ = loadout.apply_perk(PerkId::DroneBeamLink, &mut fleet);

        let _ = loadout.install_blueprint(BlueprintId::SwarmBay, &mut fleet, &mut economy);
        assert_eq!(
            weapons_of(&fleet, UnitRole::Drone),
            vec![WeaponType::Beam, WeaponType::Beam]
        );

        let _ = loadout.install_blueprint(BlueprintId::SwarmBay, &mut fleet, &mut economy);
        assert_eq!(weapons_of(&fleet, UnitRole::Drone).len(), HANGAR_DRONES);
        assert_eq!(
            loadout.blueprint(BlueprintKind::Hangar).map(|slot| slot.version),
            Some(2)
        );
    }

    #[test]
    fn reactor_compounds_weapons_and_modifiers() {
        let mut loadout = Loadout::new();
        let mut fleet = Fleet::starter();
        let mut economy = EconomyState::new();
        let _ = loadout.install_blueprint(BlueprintId::FusionCore, &mut fleet, &mut economy);

        assert!((economy.damage_mul - 1.06).abs() < 1e-5);
        assert!((economy.cooldown_mul - 0.94).abs() < 1e-5);
        assert!((fleet.units()[0].weapons[0].damage - 14.0 * 1.06).abs() < 1e-4);
    }

    #[test]
    fn fingerprint_tracks_stacks_and_versions() {
        let mut loadout = Loadout::new();
        let mut fleet = Fleet::starter();
        let mut economy = EconomyState::new();
        let empty = loadout.fingerprint();

        let _ = loadout.apply_perk(PerkId::FocusedLenses, &mut fleet);
        let one_stack = loadout.fingerprint();
        let _ = loadout.apply_perk(PerkId::FocusedLenses, &mut fleet);
        let two_stacks = loadout.fingerprint();
        let _ = loadout.install_blueprint(BlueprintId::FusionCore, &mut fleet, &mut economy);

        assert_ne!(empty, one_stack);
        assert_ne!(one_stack, two_stacks);
        assert_ne!(two_stacks, loadout.fingerprint());
    }
}
