use std::collections::BTreeMap;

use fleetcrawl_core::{EnemyClass, EnemyId, SpawnRequest, SpawnService};
use fleetcrawl_run::{query, RunState};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const TICKS_PER_SECOND: f32 = 60.0;
const MIN_COOLDOWN: f32 = 0.05;

/// Seeded stand-in for the combat simulation.
///
/// Owns enemy hull points, focuses the fleet's output on one random enemy per
/// tick and lets enemies inside their burst window hit a random player unit.
#[derive(Debug)]
pub(crate) struct ScriptedCombat {
    rng: ChaCha8Rng,
    next_enemy: u32,
    hulls: BTreeMap<EnemyId, EnemyHull>,
}

#[derive(Clone, Copy, Debug)]
struct EnemyHull {
    hull: f32,
    max_hull: f32,
}

impl ScriptedCombat {
    pub(crate) fn new(seed: u32) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(u64::from(seed)),
            next_enemy: 0,
            hulls: BTreeMap::new(),
        }
    }

    /// Resolves one tick of fighting and writes the outcome back into the run.
    pub(crate) fn resolve(&mut self, state: &mut RunState, tick: u64) {
        let volley: f32 = query::fleet(state)
            .units()
            .iter()
            .filter(|unit| unit.is_alive())
            .flat_map(|unit| unit.weapons.iter())
            .map(|weapon| weapon.damage / weapon.cooldown.max(MIN_COOLDOWN))
            .sum::<f32>()
            / TICKS_PER_SECOND;

        let living: Vec<EnemyId> = query::enemies(state)
            .iter()
            .filter(|enemy| enemy.is_alive())
            .map(|enemy| enemy.id)
            .collect();
        if !living.is_empty() && volley > 0.0 {
            let target = living[self.rng.gen_range(0..living.len())];
            if let Some(enemy) = self.hulls.get_mut(&target) {
                let dealt = volley.min(enemy.hull);
                enemy.hull -= dealt;
                let ratio = enemy.hull / enemy.max_hull;
                state.fleet_mut().record_damage(f64::from(dealt));
                let _ = state.set_enemy_hull(target, ratio);
            }
        }

        let incoming: f32 = query::enemies(state)
            .iter()
            .filter(|enemy| enemy.is_alive() && enemy.telegraph.weapons_ready(tick))
            .map(|enemy| burst_damage(enemy.tag.class))
            .sum();
        if incoming <= 0.0 {
            return;
        }
        let units = state.fleet_mut().units_mut();
        let alive: Vec<usize> = units
            .iter()
            .enumerate()
            .filter(|(_, unit)| unit.is_alive())
            .map(|(index, _)| index)
            .collect();
        if alive.is_empty() {
            return;
        }
        let victim = alive[self.rng.gen_range(0..alive.len())];
        units[victim].hull = (units[victim].hull - incoming).max(0.0);
    }
}

impl SpawnService for ScriptedCombat {
    fn spawn(&mut self, request: &SpawnRequest) -> Vec<EnemyId> {
        let max_hull = enemy_hull(request.class);
        (0..request.count)
            .map(|_| {
                self.next_enemy = self.next_enemy.wrapping_add(1);
                let id = EnemyId::new(self.next_enemy);
                let _ = self.hulls.insert(
                    id,
                    EnemyHull {
                        hull: max_hull,
                        max_hull,
                    },
                );
                id
            })
            .collect()
    }

    fn despawn(&mut self, enemy: EnemyId) {
        let _ = self.hulls.remove(&enemy);
    }
}

fn enemy_hull(class: EnemyClass) -> f32 {
    match class {
        EnemyClass::Normal => 30.0,
        EnemyClass::MiniBoss => 160.0,
        EnemyClass::Boss => 600.0,
    }
}

fn burst_damage(class: EnemyClass) -> f32 {
    match class {
        EnemyClass::Normal => 0.05,
        EnemyClass::MiniBoss => 0.2,
        EnemyClass::Boss => 0.5,
    }
}
