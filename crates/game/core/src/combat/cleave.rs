//! Cleaving swings: who else a sweep reaches, and striking them in order.
//!
//! The target list is a FIFO built fresh for every swing. Strikes can kill,
//! move or turn earlier targets, so each entry is re-validated when it is
//! popped rather than when it is queued.

use std::collections::VecDeque;

use crate::combat::{Arena, CombatEvent, RoundOptions, StrikeRequest, StrikeSource, Striker};
use crate::env::{CleaveShape, CombatEnv, CombatRng, CombatTables, MapOracle};
use crate::state::{
    Battlefield, Combatant, Conditions, EntityId, Fighter, HandSlot, Offset, Position,
};

pub type CleaveTargets = VecDeque<EntityId>;

/// Sweep radius of the wide shape, in tiles.
const WIDE_SWEEP_RADIUS: i32 = 2;

/// Shape swept by a swing from `slot`.
///
/// A `CLEAVING` condition turns any swing into an axe-style sweep.
pub fn cleave_shape(attacker: &Combatant, slot: HandSlot, tables: &CombatTables) -> CleaveShape {
    let shape = attacker
        .weapon(slot)
        .map_or(CleaveShape::None, |weapon| tables.weapon(weapon.class).cleave);
    if shape == CleaveShape::None && attacker.has(Conditions::CLEAVING) {
        CleaveShape::Adjacent
    } else {
        shape
    }
}

/// Tiles a cleaving strike with `shape` can reach.
pub fn cleave_range(shape: CleaveShape) -> u32 {
    match shape {
        CleaveShape::WideSweep => WIDE_SWEEP_RADIUS as u32,
        CleaveShape::None | CleaveShape::Adjacent => 1,
    }
}

/// Ordered list of combatants one swing at `primary` will reach.
///
/// The occupant of `primary` always comes first. Wide sweeps then add every
/// unaligned combatant in sight within two tiles; axe sweeps walk the seven
/// remaining neighbours rotationally from the primary direction, turning
/// clockwise or counterclockwise at random.
pub fn build_cleave_targets(
    field: &Battlefield,
    env: CombatEnv<'_>,
    rng: &mut dyn CombatRng,
    attacker: &Combatant,
    primary: Position,
    slot: HandSlot,
) -> CleaveTargets {
    let mut targets = CleaveTargets::new();
    if let Some(occupant) = field.occupant_at(primary) {
        targets.push_back(occupant.id);
    }

    let eligible = |combatant: &Combatant| {
        combatant.id != attacker.id
            && combatant.position != primary
            && !combatant.is_aligned_with(attacker)
    };

    match cleave_shape(attacker, slot, env.tables) {
        CleaveShape::None => {}
        CleaveShape::WideSweep => {
            for dy in -WIDE_SWEEP_RADIUS..=WIDE_SWEEP_RADIUS {
                for dx in -WIDE_SWEEP_RADIUS..=WIDE_SWEEP_RADIUS {
                    let tile = attacker.position.offset(Offset::new(dx, dy));
                    let Some(occupant) = field.occupant_at(tile) else {
                        continue;
                    };
                    if eligible(occupant)
                        && env.map.has_line_of_sight(attacker.position, occupant.position)
                    {
                        targets.push_back(occupant.id);
                    }
                }
            }
        }
        CleaveShape::Adjacent => {
            let mut direction = attacker.position.delta_to(primary).signum();
            if direction.is_zero() {
                return targets;
            }
            let step = if rng.coinflip() { 1 } else { -1 };
            for _ in 0..7 {
                direction = direction.rotate_adjacent(step);
                let tile = attacker.position.offset(direction);
                if let Some(occupant) = field.occupant_at(tile)
                    && eligible(occupant)
                {
                    targets.push_back(occupant.id);
                }
            }
        }
    }

    tracing::debug!(attacker = %attacker.id, ?targets, "cleave targets");
    targets
}

/// Whether terrain stops a cleaving swing from `from` reaching `to`.
///
/// A two-tile sweep is stopped by a wall on the tile in between; a diagonal
/// neighbour is shielded only when both orthogonal tiles are walls.
pub fn wall_blocks(map: &dyn MapOracle, from: Position, to: Position) -> bool {
    let delta = from.delta_to(to);
    if from.distance(to) >= 2 {
        return map.is_wall(from.offset(delta.signum()));
    }
    delta.is_diagonal()
        && map.is_wall(from.offset(Offset::new(delta.dx, 0)))
        && map.is_wall(from.offset(Offset::new(0, delta.dy)))
}

/// How a cleaving swing ended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CleaveOutcome {
    /// Time-accounting index after the last strike.
    pub effective_index: u8,
    /// A strike was cancelled; the rest of the queue was left untouched.
    pub cancelled: bool,
}

/// Strikes each queued target once, in order, until the queue is empty, the
/// attacker dies or a strike is cancelled.
pub fn execute_cleave<S: Striker + ?Sized>(
    arena: &mut Arena<'_>,
    striker: &mut S,
    attacker_id: EntityId,
    targets: &mut CleaveTargets,
    slot: HandSlot,
    start_index: u8,
    options: &RoundOptions,
) -> CleaveOutcome {
    let mut effective_index = start_index;

    while let Some(target_id) = targets.pop_front() {
        let Some(attacker) = arena.field.get(attacker_id) else {
            break;
        };
        if !attacker.is_alive() {
            break;
        }
        let range = cleave_range(cleave_shape(attacker, slot, arena.env.tables));
        let from = attacker.position;

        let Some(target) = arena.field.get(target_id) else {
            continue;
        };
        if target_id == attacker_id
            || !target.is_present()
            || from.distance(target.position) > range
        {
            continue;
        }
        if wall_blocks(arena.env.map, from, target.position) {
            arena.log.push(CombatEvent::ClangsAgainstWall {
                attacker: attacker_id,
                defender: target_id,
            });
            continue;
        }

        arena.log.push(CombatEvent::Cleave {
            attacker: attacker_id,
            defender: target_id,
        });
        let request = StrikeRequest {
            attacker: attacker_id,
            defender: target_id,
            source: StrikeSource::Hand(slot),
            attack_index: effective_index,
            effective_index,
            simulated: options.simulated,
            special: options.special,
            target_count: options.target_count,
            cleaving: true,
        };
        let report = striker.strike(arena, &request);
        if report.cancelled {
            tracing::debug!(attacker = %attacker_id, defender = %target_id, "cleave cancelled");
            return CleaveOutcome {
                effective_index,
                cancelled: true,
            };
        }
        tracing::debug!(
            attacker = %attacker_id,
            defender = %target_id,
            connected = report.connected,
            "cleave strike"
        );
        effective_index = report.effective_index_after;
    }
    CleaveOutcome {
        effective_index,
        cancelled: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombatConfig;
    use crate::env::{GridMap, PcgRng};
    use crate::state::{
        AttackKind, Attitude, CreatureTraits, NaturalAttack, Weapon, WeaponClass, WeaponSlots,
    };

    fn goblin(id: u32, position: Position) -> Combatant {
        Combatant::creature(
            EntityId(id),
            "goblin",
            position,
            5,
            CreatureTraits::with_attacks([NaturalAttack::new(AttackKind::Hit, 3)]),
        )
    }

    fn fighter(class: WeaponClass) -> Combatant {
        Combatant::player("you", Position::new(3, 3), 30)
            .with_weapons(WeaponSlots::wielding(Weapon::new("blade", class, 8, 12)))
    }

    fn surrounded(attacker: Combatant) -> Battlefield {
        let mut field = Battlefield::from_combatants([attacker]);
        for (i, tile) in Position::new(3, 3).neighbours().enumerate() {
            field.insert(goblin(i as u32 + 1, tile));
        }
        field
    }

    fn build(field: &Battlefield, map: &GridMap, seed: u64, primary: Position) -> CleaveTargets {
        let tables = CombatTables::standard();
        let config = CombatConfig::default();
        let env = CombatEnv::new(map, &tables, &config);
        let mut rng = PcgRng::new(seed);
        let Some(attacker) = field.player() else {
            panic!("no player");
        };
        build_cleave_targets(field, env, &mut rng, attacker, primary, HandSlot::Primary)
    }

    #[test]
    fn non_cleaving_weapon_only_hits_primary() {
        let field = surrounded(fighter(WeaponClass::LongBlade));
        let targets = build(&field, &GridMap::open(7, 7), 1, Position::new(3, 2));
        assert_eq!(targets, CleaveTargets::from([EntityId(1)]));

        let empty = build(&field, &GridMap::open(7, 7), 1, Position::new(0, 0));
        assert!(empty.is_empty());
    }

    #[test]
    fn axe_walks_all_neighbours_once() {
        let field = surrounded(fighter(WeaponClass::Axe));
        let targets = build(&field, &GridMap::open(7, 7), 3, Position::new(3, 2));
        assert_eq!(targets.len(), 8);
        assert_eq!(targets.front(), Some(&EntityId(1)));
        let mut sorted: Vec<_> = targets.iter().map(|id| id.0).collect();
        sorted.sort_unstable();
        assert_eq!(sorted, (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn axe_rotation_direction_is_random() {
        let field = surrounded(fighter(WeaponClass::Axe));
        let map = GridMap::open(7, 7);
        let seconds: std::collections::BTreeSet<_> = (0..32)
            .filter_map(|seed| build(&field, &map, seed, Position::new(3, 2)).get(1).copied())
            .collect();
        // North-east or north-west of the attacker.
        assert_eq!(seconds, [EntityId(2), EntityId(8)].into_iter().collect());
    }

    #[test]
    fn axe_skips_allies() {
        let mut field = surrounded(fighter(WeaponClass::Axe));
        for id in [3, 5, 7] {
            if let Some(goblin) = field.get_mut(EntityId(id)) {
                goblin.attitude = Attitude::Friendly;
            }
        }
        let targets = build(&field, &GridMap::open(7, 7), 9, Position::new(3, 2));
        assert_eq!(targets.len(), 5);
        assert!(!targets.contains(&EntityId(3)));
    }

    #[test]
    fn cleaving_condition_turns_any_weapon_into_an_axe() {
        let attacker = fighter(WeaponClass::MaceFlail).with_conditions(Conditions::CLEAVING);
        let field = surrounded(attacker);
        let targets = build(&field, &GridMap::open(7, 7), 4, Position::new(3, 2));
        assert_eq!(targets.len(), 8);
    }

    #[test]
    fn wide_sweep_needs_sight() {
        let mut field = Battlefield::from_combatants([fighter(WeaponClass::Scythe)]);
        field.insert(goblin(1, Position::new(3, 2)));
        field.insert(goblin(2, Position::new(5, 3)));
        field.insert(goblin(3, Position::new(1, 1)));
        field.insert(goblin(4, Position::new(3, 6)));
        let map = GridMap::open(7, 7).with_walls([Position::new(2, 2)]);
        let targets = build(&field, &map, 1, Position::new(3, 2));
        assert_eq!(targets, CleaveTargets::from([EntityId(1), EntityId(2)]));
    }

    #[test]
    fn walls_shield_targets() {
        let map = GridMap::open(5, 5).with_walls([Position::new(2, 1), Position::new(1, 2)]);
        let from = Position::new(1, 1);
        assert!(wall_blocks(&map, from, Position::new(2, 2)));
        assert!(!wall_blocks(&map, from, Position::new(0, 0)));
        assert!(wall_blocks(&map, from, Position::new(3, 1)));
        assert!(!wall_blocks(&map, from, Position::new(1, 0)));
    }
}
