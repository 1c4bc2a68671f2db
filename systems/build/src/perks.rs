use fleetcrawl_core::{
    PerkId, PerkOp, PerkOpKind, PlayerUnit, UnitRole, WeaponMount, WeaponScope, WeaponTag,
    WeaponType,
};

/// Factor applied to a perk's value each time it stacks.
pub const STACK_COMPOUND: f32 = 1.05;

/// Result of handing a perk to the loadout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PerkOutcome {
    /// The perk was new and its entry was appended.
    Acquired,
    /// The perk was already owned and its entry stacked.
    Stacked {
        /// Stack count after the pick.
        stacks: u32,
    },
}

/// First-stack entry for a perk.
#[must_use]
pub fn perk_definition(perk: PerkId) -> PerkOp {
    let (kind, source, target, tag, scope, value) = match perk {
        PerkId::BeamConversion => (
            PerkOpKind::ConvertDamage,
            Some(WeaponType::Kinetic),
            Some(WeaponType::Beam),
            None,
            WeaponScope::AllWeapons,
            1.05,
        ),
        PerkId::DroneBeamLink => (
            PerkOpKind::ReplaceAttackFamily,
            None,
            Some(WeaponType::Beam),
            None,
            WeaponScope::Drones,
            1.02,
        ),
        PerkId::FocusedLenses => (
            PerkOpKind::MulStat,
            None,
            None,
            None,
            WeaponScope::BeamWeapons,
            1.10,
        ),
        PerkId::PiercingArrays => (
            PerkOpKind::AddTag,
            None,
            None,
            Some(WeaponTag::Piercing),
            WeaponScope::AllWeapons,
            1.0,
        ),
    };
    PerkOp {
        perk,
        kind,
        source,
        target,
        tag,
        scope,
        value,
        stacks: 1,
    }
}

/// Applies a perk operation to the weapons of one unit.
///
/// Conversions only touch weapons outside the target family, so running an
/// operation twice over the same unit leaves it unchanged.
pub(crate) fn apply_to_unit(op: &PerkOp, unit: &mut PlayerUnit) {
    let role = unit.role;
    for weapon in &mut unit.weapons {
        apply_to_weapon(op, role, weapon);
    }
}

/// Applies a perk operation to one weapon carried by a unit of `role`.
pub(crate) fn apply_to_weapon(op: &PerkOp, role: UnitRole, weapon: &mut WeaponMount) {
    if !op.scope.matches(role, weapon) {
        return;
    }
    match op.kind {
        PerkOpKind::AddStat => weapon.damage = (weapon.damage + op.value).max(0.0),
        PerkOpKind::MulStat => weapon.damage *= op.value.max(0.0),
        PerkOpKind::AddTag => {
            if let Some(tag) = op.tag {
                let _ = weapon.add_tag(tag);
            }
        }
        PerkOpKind::RemoveTag => {
            if let Some(tag) = op.tag {
                let _ = weapon.remove_tag(tag);
            }
        }
        PerkOpKind::ConvertDamage => {
            let (Some(source), Some(target)) = (op.source, op.target) else {
                return;
            };
            if weapon.weapon_type == source && source != target {
                weapon.convert_to(target);
                weapon.damage *= op.value.max(0.0);
            }
        }
        PerkOpKind::ReplaceAttackFamily => {
            let Some(target) = op.target else {
                return;
            };
            if weapon.weapon_type != target {
                weapon.convert_to(target);
                weapon.damage *= op.value.max(0.0);
            }
        }
    }
}
