//! Player fleet surface shared with the combat collaborator.

use serde::{Deserialize, Serialize};

use crate::WeaponScope;

/// Identifier assigned to a player unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
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

/// Weapon family mounted on a hardpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponType {
    /// Mass drivers and autocannons.
    Kinetic,
    /// Continuous or pulsed energy beams.
    Beam,
    /// Guided ordnance.
    Missile,
}

impl WeaponType {
    /// Stable numeric code used by digests.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Kinetic => 1,
            Self::Beam => 2,
            Self::Missile => 3,
        }
    }

    /// Damage channel and delivery mode native to the family.
    #[must_use]
    pub const fn channels(self) -> (DamageType, DeliveryMode) {
        match self {
            Self::Kinetic => (DamageType::Kinetic, DeliveryMode::Projectile),
            Self::Beam => (DamageType::Energy, DeliveryMode::Beam),
            Self::Missile => (DamageType::Explosive, DeliveryMode::Guided),
        }
    }
}

/// Damage channel a weapon applies on hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    /// Physical impact damage.
    Kinetic,
    /// Thermal or energy damage.
    Energy,
    /// Blast damage.
    Explosive,
}

/// How a weapon delivers its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryMode {
    /// Travelling projectile.
    Projectile,
    /// Instant beam.
    Beam,
    /// Homing ordnance.
    Guided,
}

/// Behavioural tag attached to a weapon by perks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponTag {
    /// Shots continue through the first target.
    Piercing,
    /// Shots ignore a portion of shielding.
    Overcharged,
}

/// Weapon installed on a player unit hardpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponMount {
    /// Weapon family.
    pub weapon_type: WeaponType,
    /// Damage channel.
    pub damage_type: DamageType,
    /// Payload delivery mode.
    pub delivery: DeliveryMode,
    /// Damage per shot.
    pub damage: f32,
    /// Seconds between shots.
    pub cooldown: f32,
    /// Behaviour tags, kept sorted and free of duplicates.
    pub tags: Vec<WeaponTag>,
}

impl WeaponMount {
    /// Creates an untagged weapon whose damage type and delivery follow its family.
    #[must_use]
    pub fn new(weapon_type: WeaponType, damage: f32, cooldown: f32) -> Self {
        let (damage_type, delivery) = weapon_type.channels();
        Self {
            weapon_type,
            damage_type,
            delivery,
            damage,
            cooldown,
            tags: Vec::new(),
        }
    }

    /// Reports whether the weapon carries the provided tag.
    #[must_use]
    pub fn has_tag(&self, tag: WeaponTag) -> bool {
        self.tags.binary_search(&tag).is_ok()
    }

    /// Adds a tag if it is not already present. Returns `true` when added.
    pub fn add_tag(&mut self, tag: WeaponTag) -> bool {
        match self.tags.binary_search(&tag) {
            Ok(_) => false,
            Err(position) => {
                self.tags.insert(position, tag);
                true
            }
        }
    }

    /// Removes a tag if present. Returns `true` when removed.
    pub fn remove_tag(&mut self, tag: WeaponTag) -> bool {
        match self.tags.binary_search(&tag) {
            Ok(position) => {
                let _ = self.tags.remove(position);
                true
            }
            Err(_) => false,
        }
    }

    /// Moves the weapon into another family, adopting that family's damage and delivery.
    pub fn convert_to(&mut self, family: WeaponType) {
        let (damage_type, delivery) = family.channels();
        self.weapon_type = family;
        self.damage_type = damage_type;
        self.delivery = delivery;
    }
}

/// Role a unit plays in the player fleet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitRole {
    /// Command ship carrying the primary weapon slot.
    Flagship,
    /// Escort hull.
    Escort,
    /// Hangar-launched drone.
    Drone,
}

/// Player unit tracked on the combat surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerUnit {
    /// Identifier of the unit.
    pub id: UnitId,
    /// Role within the fleet.
    pub role: UnitRole,
    /// Current hull points.
    pub hull: f32,
    /// Maximum hull points.
    pub max_hull: f32,
    /// Cruise speed.
    pub speed: f32,
    /// Linear acceleration.
    pub acceleration: f32,
    /// Turn rate in radians per second.
    pub turn_rate: f32,
    /// Mounted weapons in hardpoint order.
    pub weapons: Vec<WeaponMount>,
}

impl PlayerUnit {
    /// Creates a unit at full hull.
    #[must_use]
    pub fn new(id: UnitId, role: UnitRole, max_hull: f32, weapons: Vec<WeaponMount>) -> Self {
        let (speed, acceleration, turn_rate) = match role {
            UnitRole::Flagship => (9.0, 4.0, 1.2),
            UnitRole::Escort => (12.0, 6.0, 1.8),
            UnitRole::Drone => (18.0, 11.0, 3.2),
        };
        Self {
            id,
            role,
            hull: max_hull,
            max_hull,
            speed,
            acceleration,
            turn_rate,
            weapons,
        }
    }

    /// Reports whether the unit still has positive hull.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hull > 0.0
    }

    /// Fraction of maximum hull remaining, clamped to `[0, 1]`.
    #[must_use]
    pub fn hull_ratio(&self) -> f32 {
        if self.max_hull <= 0.0 {
            return 0.0;
        }
        (self.hull / self.max_hull).clamp(0.0, 1.0)
    }
}

/// Player fleet and cumulative combat output.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    units: Vec<PlayerUnit>,
    damage_dealt: f64,
    next_unit_id: u32,
}

impl Fleet {
    /// Creates an empty fleet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starter fleet: a kinetic flagship escorted by two missile frigates.
    #[must_use]
    pub fn starter() -> Self {
        let mut fleet = Self::new();
        let _ = fleet.add_unit(
            UnitRole::Flagship,
            240.0,
            vec![
                WeaponMount::new(WeaponType::Kinetic, 14.0, 0.6),
                WeaponMount::new(WeaponType::Kinetic, 10.0, 0.45),
            ],
        );
        for _ in 0..2 {
            let _ = fleet.add_unit(
                UnitRole::Escort,
                120.0,
                vec![WeaponMount::new(WeaponType::Missile, 22.0, 1.6)],
            );
        }
        fleet
    }

    /// Adds a unit at full hull and returns its identifier.
    pub fn add_unit(
        &mut self,
        role: UnitRole,
        max_hull: f32,
        weapons: Vec<WeaponMount>,
    ) -> UnitId {
        let id = UnitId::new(self.next_unit_id);
        self.next_unit_id = self.next_unit_id.saturating_add(1);
        self.units.push(PlayerUnit::new(id, role, max_hull, weapons));
        id
    }

    /// Units in creation order.
    #[must_use]
    pub fn units(&self) -> &[PlayerUnit] {
        &self.units
    }

    /// Mutable access to the units in creation order.
    pub fn units_mut(&mut self) -> &mut [PlayerUnit] {
        &mut self.units
    }

    /// Looks up a unit by identifier.
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut PlayerUnit> {
        self.units.iter_mut().find(|unit| unit.id == id)
    }

    /// Reports whether any unit still has positive hull.
    #[must_use]
    pub fn any_alive(&self) -> bool {
        self.units.iter().any(PlayerUnit::is_alive)
    }

    /// Mean hull ratio across living units, `1.0` when none are alive.
    #[must_use]
    pub fn mean_hull_ratio(&self) -> f32 {
        let mut total = 0.0;
        let mut count = 0u32;
        for unit in self.units.iter().filter(|unit| unit.is_alive()) {
            total += unit.hull_ratio();
            count += 1;
        }
        if count == 0 {
            1.0
        } else {
            total / count as f32
        }
    }

    /// Cumulative damage dealt by the fleet.
    #[must_use]
    pub fn damage_dealt(&self) -> f64 {
        self.damage_dealt
    }

    /// Records damage dealt by the fleet.
    pub fn record_damage(&mut self, amount: f64) {
        if amount > 0.0 {
            self.damage_dealt += amount;
        }
    }

    /// Restores `ratio` of maximum hull to every living unit.
    pub fn heal_ratio(&mut self, ratio: f32) {
        if ratio <= 0.0 {
            return;
        }
        for unit in self.units.iter_mut().filter(|unit| unit.is_alive()) {
            unit.hull = (unit.hull + unit.max_hull * ratio).min(unit.max_hull);
        }
    }

    /// Raises the maximum hull of every unit by a flat amount.
    pub fn add_max_hull(&mut self, amount: f32) {
        if amount <= 0.0 {
            return;
        }
        for unit in &mut self.units {
            unit.max_hull += amount;
        }
    }

    /// Multiplies damage and cooldown of every weapon within `scope`.
    pub fn scale_weapons(&mut self, scope: WeaponScope, damage_mul: f32, cooldown_mul: f32) {
        let damage_mul = damage_mul.max(0.0);
        let cooldown_mul = cooldown_mul.max(0.0);
        self.for_each_weapon(scope, |weapon| {
            weapon.damage *= damage_mul;
            weapon.cooldown *= cooldown_mul;
        });
    }

    /// Multiplies the mobility stats of every unit.
    pub fn scale_mobility(&mut self, speed_mul: f32, acceleration_mul: f32, turn_mul: f32) {
        for unit in &mut self.units {
            unit.speed *= speed_mul;
            unit.acceleration *= acceleration_mul;
            unit.turn_rate *= turn_mul;
        }
    }

    /// Visits every weapon selected by `scope`.
    pub fn for_each_weapon<F>(&mut self, scope: WeaponScope, mut visit: F)
    where
        F: FnMut(&mut WeaponMount),
    {
        for unit in &mut self.units {
            for weapon in &mut unit.weapons {
                if scope.matches(unit.role, weapon) {
                    visit(weapon);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_fleet_is_alive_at_full_hull() {
        let fleet = Fleet::starter();
        assert_eq!(fleet.units().len(), 3);
        assert!(fleet.any_alive());
        assert!((fleet.mean_hull_ratio() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn heal_never_exceeds_max_hull() {
        let mut fleet = Fleet::starter();
        fleet.units_mut()[0].hull = 200.0;
        fleet.heal_ratio(0.5);
        assert!((fleet.units()[0].hull - 240.0).abs() < f32::EPSILON);
    }

    #[test]
    fn dead_units_are_not_healed() {
        let mut fleet = Fleet::starter();
        fleet.units_mut()[1].hull = 0.0;
        fleet.heal_ratio(0.5);
        assert_eq!(fleet.units()[1].hull, 0.0);
    }

    #[test]
    fn mean_hull_ratio_ignores_dead_units() {
        let mut fleet = Fleet::starter();
        fleet.units_mut()[0].hull = 120.0;
        fleet.units_mut()[1].hull = 0.0;
        let ratio = fleet.mean_hull_ratio();
        assert!((ratio - 0.75).abs() < 1e-5, "ratio {ratio}");
    }

    #[test]
    fn tags_are_idempotent() {
        let mut weapon = WeaponMount::new(WeaponType::Beam, 10.0, 1.0);
        assert!(weapon.add_tag(WeaponTag::Piercing));
        assert!(!weapon.add_tag(WeaponTag::Piercing));
        assert!(weapon.has_tag(WeaponTag::Piercing));
        assert!(weapon.remove_tag(WeaponTag::Piercing));
        assert!(!weapon.remove_tag(WeaponTag::Piercing));
    }

    #[test]
    fn beam_scope_only_touches_beam_weapons() {
        let mut fleet = Fleet::new();
        let _ = fleet.add_unit(
            UnitRole::Flagship,
            100.0,
            vec![
                WeaponMount::new(WeaponType::Beam, 10.0, 1.0),
                WeaponMount::new(WeaponType::Kinetic, 10.0, 1.0),
            ],
        );
        fleet.scale_weapons(WeaponScope::BeamWeapons, 2.0, 1.0);
        let weapons = &fleet.units()[0].weapons;
        assert!((weapons[0].damage - 20.0).abs() < f32::EPSILON);
        assert!((weapons[1].damage - 10.0).abs() < f32::EPSILON);
    }
}
