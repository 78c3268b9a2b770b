//! Stab classification.
//!
//! Decides whether a defender is vulnerable to a bonus-damage "stab" and
//! which kind. The check reads state only; it never mutates the combatants.

use strum::{EnumCount, EnumIter, IntoStaticStr};

use crate::env::MapOracle;
use crate::state::{Attitude, Combatant, Conditions};

/// Why a defender is open to a stab, in precedence order.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumCount, EnumIter, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StabType {
    #[default]
    NoStab,
    Sleeping,
    Paralysed,
    Petrified,
    Petrifying,
    HeldInNet,
    Invisible,
    Fleeing,
    Ally,
    Confused,
    Distracted,
}

impl StabType {
    /// Divisor applied to base damage to get the stab bonus.
    ///
    /// `0` disables the bonus; `1` adds the full damage again.
    pub const fn bonus_denominator(self) -> u32 {
        match self {
            Self::NoStab => 0,
            Self::Sleeping | Self::Paralysed | Self::Petrified => 1,
            _ => 4,
        }
    }

    pub const fn is_stab(self) -> bool {
        !matches!(self, Self::NoStab)
    }

    /// Bonus damage on top of `damage`; zero when stabbing is disabled.
    pub fn bonus_for(self, damage: i32) -> i32 {
        match self.bonus_denominator() {
            0 => 0,
            denominator => damage.max(0) / denominator as i32,
        }
    }
}

/// Classifies `defender`'s vulnerability to `attacker`.
///
/// First match wins:
///
/// 1. committing player whose conduct forbids stabbing intelligent foes
/// 2. inanimate defender, or attacker cannot see the defender
/// 3. asleep, paralysed, petrified, petrifying, caught in a net
/// 4. defender cannot see the attacker
/// 5. fleeing, allied, confused (unless permanently)
/// 6. distracted, only against the player
///
/// With `committing == false` the conduct rule is skipped so a display query
/// always reports the raw classification. Without an attacker the checks that
/// need one are skipped.
pub fn classify(
    attacker: Option<&Combatant>,
    defender: &Combatant,
    map: &dyn MapOracle,
    committing: bool,
) -> StabType {
    let traits = defender.creature_traits();

    if let Some(attacker) = attacker
        && committing
        && attacker
            .player_traits()
            .is_some_and(|conduct| conduct.forbids_stabbing)
        && traits.is_some_and(|t| t.intelligent)
    {
        return StabType::NoStab;
    }

    if traits.is_some_and(|t| t.inanimate) {
        return StabType::NoStab;
    }
    let in_sight = |from: &Combatant, to: &Combatant| {
        from.perceives(to) && map.has_line_of_sight(from.position, to.position)
    };
    if attacker.is_some_and(|attacker| !in_sight(attacker, defender)) {
        return StabType::NoStab;
    }

    let helpless = [
        (Conditions::ASLEEP, StabType::Sleeping),
        (Conditions::PARALYSED, StabType::Paralysed),
        (Conditions::PETRIFIED, StabType::Petrified),
        (Conditions::PETRIFYING, StabType::Petrifying),
        (Conditions::HELD, StabType::HeldInNet),
    ];
    if let Some(&(_, stab)) = helpless.iter().find(|(cond, _)| defender.has(*cond)) {
        return stab;
    }

    if attacker.is_some_and(|attacker| !in_sight(defender, attacker)) {
        return StabType::Invisible;
    }

    if defender.has(Conditions::FLEEING) {
        return StabType::Fleeing;
    }

    let allied = match attacker {
        Some(attacker) => defender.is_aligned_with(attacker),
        None => defender.attitude == Attitude::Friendly,
    };
    if allied {
        return StabType::Ally;
    }

    if defender.has(Conditions::CONFUSED) && !traits.is_some_and(|t| t.perma_confused) {
        return StabType::Confused;
    }

    if let (Some(attacker), Some(traits)) = (attacker, traits)
        && attacker.is_player()
        && traits.focus != Some(attacker.id)
        && !traits.erratic
        && !traits.distraction_immune
    {
        return StabType::Distracted;
    }

    StabType::NoStab
}
