//! The single-attack seam.
//!
//! The round sequencer decides *how many* strikes happen and *against whom*;
//! a [`Striker`] resolves one of them. [`StandardStriker`] is the built-in
//! resolution: hit roll, damage roll, stab bonus, armor, resistance.

use crate::combat::{
    CombatEvent, CombatLog, DamageFlavour, Prompter, ResistSource, SpecialMode, StabType, armor,
    resist, stab,
};
use crate::env::{CombatEnv, CombatRng, CombatTables};
use crate::state::{
    AttackKind, Battlefield, Combatant, Conditions, EntityId, Fighter, HandSlot, Weapon,
};

/// Everything a round mutates or consults, borrowed for its duration.
pub struct Arena<'a> {
    pub field: &'a mut Battlefield,
    pub env: CombatEnv<'a>,
    pub rng: &'a mut dyn CombatRng,
    pub prompter: &'a mut dyn Prompter,
    pub log: &'a mut CombatLog,
}

impl<'a> Arena<'a> {
    pub fn new(
        field: &'a mut Battlefield,
        env: CombatEnv<'a>,
        rng: &'a mut dyn CombatRng,
        prompter: &'a mut dyn Prompter,
        log: &'a mut CombatLog,
    ) -> Self {
        Self {
            field,
            env,
            rng,
            prompter,
            log,
        }
    }
}

/// What delivers a strike.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StrikeSource {
    /// A wielded weapon, or a bare hand when the slot is empty.
    Hand(HandSlot),
    /// A creature's natural attack slot.
    Natural(u8),
    /// A mutation-granted bonus strike (headbutt, tail slap).
    Aux,
    /// One head of the player's mount.
    MountHead,
}

impl StrikeSource {
    /// Weapon swung by this source, if any.
    ///
    /// A creature's `Hit` slot swings its primary weapon when it holds one.
    pub fn weapon(self, attacker: &Combatant) -> Option<&Weapon> {
        match self {
            Self::Hand(slot) => attacker.weapon(slot),
            Self::Natural(index) => attacker
                .creature_traits()
                .and_then(|traits| traits.attacks.get(usize::from(index)))
                .filter(|attack| attack.kind == AttackKind::Hit)
                .and_then(|_| attacker.weapon(HandSlot::Primary)),
            Self::Aux | Self::MountHead => None,
        }
    }

    /// Melee reach in tiles.
    pub fn reach(self, attacker: &Combatant, tables: &CombatTables) -> u32 {
        self.weapon(attacker)
            .map_or(1, |weapon| u32::from(tables.weapon(weapon.class).reach.max(1)))
    }
}

/// One strike to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrikeRequest {
    pub attacker: EntityId,
    pub defender: EntityId,
    pub source: StrikeSource,
    /// Position of this strike in the round, failed attempts included.
    pub attack_index: u8,
    /// Time-accounting index before this strike.
    pub effective_index: u8,
    pub simulated: bool,
    pub special: Option<SpecialMode>,
    pub target_count: u8,
    /// Secondary target of a cleaving swing.
    pub cleaving: bool,
}

/// Result of one strike.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StrikeReport {
    pub connected: bool,
    /// The strike did not happen; nothing about it should be charged.
    pub cancelled: bool,
    /// Time-accounting index after the strike.
    pub effective_index_after: u8,
    /// Damage that got through all mitigation.
    pub damage: i32,
}

impl StrikeReport {
    /// The strike could not be carried out at all.
    pub fn fizzled(request: &StrikeRequest) -> Self {
        Self {
            effective_index_after: request.effective_index,
            ..Self::default()
        }
    }

    pub fn cancelled(request: &StrikeRequest) -> Self {
        Self {
            cancelled: true,
            ..Self::fizzled(request)
        }
    }
}

/// Resolves a single strike. Free to mutate anything in the arena.
pub trait Striker {
    fn strike(&mut self, arena: &mut Arena<'_>, request: &StrikeRequest) -> StrikeReport;
}

/// Built-in strike resolution.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardStriker;

/// Numbers rolled for one strike before anything is applied.
struct Rolled {
    flavour: DamageFlavour,
    damage: i32,
    blocked: i32,
    stab: StabType,
}

impl StandardStriker {
    fn hits(arena: &mut Arena<'_>, defender: &Combatant) -> bool {
        if defender.has(Conditions::HELPLESS | Conditions::HELD) {
            return true;
        }
        let chance = (arena.env.config.base_hit_chance as i32 - defender.evasion).clamp(5, 95);
        arena.rng.x_chance_in_y(chance as u32, 100)
    }

    fn base_damage(
        arena: &Arena<'_>,
        attacker: &Combatant,
        source: StrikeSource,
    ) -> (u16, DamageFlavour) {
        if let Some(weapon) = source.weapon(attacker) {
            return (weapon.damage, weapon.flavour);
        }
        match source {
            StrikeSource::Hand(_) | StrikeSource::Aux => {
                (arena.env.config.unarmed_damage, DamageFlavour::Physical)
            }
            StrikeSource::Natural(index) => attacker
                .creature_traits()
                .and_then(|traits| traits.attacks.get(usize::from(index)))
                .map_or((arena.env.config.unarmed_damage, DamageFlavour::Physical), |attack| {
                    (attack.damage, attack.flavour)
                }),
            StrikeSource::MountHead => (
                attacker.mount().map_or(0, |mount| mount.bite_damage),
                DamageFlavour::Physical,
            ),
        }
    }

    fn roll(
        arena: &mut Arena<'_>,
        attacker: &Combatant,
        defender: &Combatant,
        source: StrikeSource,
    ) -> Rolled {
        let (max_damage, flavour) = Self::base_damage(arena, attacker, source);
        let mut damage = arena.rng.random_range(1, i32::from(max_damage.max(1)));

        let stab = if attacker.is_player() {
            stab::classify(Some(attacker), defender, arena.env.map, true)
        } else {
            StabType::NoStab
        };
        damage += stab.bonus_for(damage);

        let blocked = armor::mitigate(damage, defender.armor, &mut *arena.rng);
        damage -= blocked;

        Rolled {
            flavour,
            damage,
            blocked,
            stab,
        }
    }

    /// Applies resisted damage to the defender, or to its mount when the mount
    /// takes the blow. Returns damage dealt and whether the defender died.
    fn apply(arena: &mut Arena<'_>, defender_id: EntityId, rolled: &Rolled) -> (i32, bool) {
        let Some(defender) = arena.field.get(defender_id) else {
            return (0, false);
        };
        let tables = arena.env.tables;

        let mount_takes_it = defender.mount().is_some_and(|mount| mount.is_alive())
            && arena.rng.one_chance_in(arena.env.config.mount_absorb_chance);
        let rng = &mut *arena.rng;
        let (source, dealt) = match defender.mount_view() {
            Some(view) if mount_takes_it => (
                ResistSource::Mount,
                resist::resist_adjust_damage(&view, rolled.flavour, rolled.damage, tables, rng),
            ),
            _ => (
                ResistSource::Primary,
                resist::resist_adjust_damage(defender, rolled.flavour, rolled.damage, tables, rng),
            ),
        };

        let Some(defender) = arena.field.get_mut(defender_id) else {
            return (0, false);
        };
        let dealt = dealt.max(0);
        match source {
            ResistSource::Mount => {
                if let Some(mount) = defender.mount_mut() {
                    mount.hp.drain(dealt as u32);
                    tracing::debug!(rider = %defender_id, dealt, "mount took the blow");
                }
                (dealt, false)
            }
            ResistSource::Primary => {
                defender.hp.drain(dealt as u32);
                (dealt, !defender.is_alive())
            }
        }
    }
}

impl Striker for StandardStriker {
    fn strike(&mut self, arena: &mut Arena<'_>, request: &StrikeRequest) -> StrikeReport {
        let (Some(attacker), Some(defender)) = (
            arena.field.get(request.attacker).cloned(),
            arena.field.get(request.defender).cloned(),
        ) else {
            return StrikeReport::fizzled(request);
        };
        if !attacker.is_alive() || !defender.is_present() {
            return StrikeReport::fizzled(request);
        }

        let mut report = StrikeReport {
            effective_index_after: request.effective_index.saturating_add(1),
            ..StrikeReport::default()
        };

        if !Self::hits(arena, &defender) {
            arena.log.push(CombatEvent::Strike {
                attacker: attacker.id,
                defender: defender.id,
                hit: false,
                damage: 0,
                blocked: 0,
                stab: StabType::NoStab,
            });
            tracing::debug!(attacker = %attacker.id, defender = %defender.id, "miss");
            return report;
        }

        let rolled = Self::roll(arena, &attacker, &defender, request.source);
        let (dealt, killed) = Self::apply(arena, defender.id, &rolled);
        report.connected = true;
        report.damage = dealt;

        arena.log.push(CombatEvent::Strike {
            attacker: attacker.id,
            defender: defender.id,
            hit: true,
            damage: dealt,
            blocked: rolled.blocked,
            stab: rolled.stab,
        });
        tracing::debug!(
            attacker = %attacker.id,
            defender = %defender.id,
            source = ?request.source,
            dealt,
            blocked = rolled.blocked,
            stab = ?rolled.stab,
            "strike landed"
        );

        if dealt > 0 && !request.simulated {
            arena.field.spatter_blood(defender.position);
            arena.log.push(CombatEvent::BloodSpatter {
                position: defender.position,
            });
        }
        if killed {
            arena.log.push(CombatEvent::Died {
                id: defender.id,
                killer: attacker.id,
            });
            tracing::info!(victim = %defender.id, killer = %attacker.id, "combatant died");
        }

        report
    }
}
