//! Elemental resistance model.
//!
//! Converts raw damage of a given flavour into mitigated damage for one
//! defender. Creatures resist more steeply than the player, some flavours are
//! only partly resistible, and a few behave as boolean resists at player level.
//!
//! # Formula
//!
//! ```text
//! resistible   = raw × resistible_percent / 100
//! irresistible = raw − resistible
//!
//! level ≥ 3 and (creature or immune-at-3 flavour), or level > 3:
//!     resistible = 0
//! creature:             resistible /= 1 + boolean + level²
//! negative energy:      resistible /= 2 × level
//! otherwise:            resistible /= (3 × level + 1) / 2 + boolean
//! level < 0:            resistible = resistible × 3 / 2
//!
//! result = max(resistible + irresistible, 0)
//! ```

use crate::combat::DamageFlavour;
use crate::env::{CombatRng, CombatTables, FlavourProfile};
use crate::state::{Fighter, ResistCharm, ResistVector};

/// Which body a resistance check is made against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResistSource {
    /// The combatant itself.
    #[default]
    Primary,
    /// The mount the combatant rides.
    Mount,
}

/// Adjusts `raw` damage of `flavour` for `defender`'s resistances.
///
/// Intangible fighters take the raw amount unchanged. A mount seen through
/// [`crate::state::MountView`] is never intangible, so checks routed to a
/// mount always run the full model.
///
/// Resist charms are rolled on every call: two identical calls may disagree.
pub fn resist_adjust_damage<F: Fighter + ?Sized>(
    defender: &F,
    flavour: DamageFlavour,
    raw: i32,
    tables: &CombatTables,
    rng: &mut dyn CombatRng,
) -> i32 {
    let raw = raw.max(0);
    if defender.is_intangible() {
        return raw;
    }

    let profile = tables.flavour(flavour);
    let Some(kind) = profile.resist else {
        return raw;
    };

    let is_creature = defender.is_creature();
    let mut level = i32::from(defender.resistance(kind));
    if is_creature {
        level = apply_charm(defender.resist_charm(), profile, level, rng);
    }
    if level == 0 {
        return raw;
    }

    let mut resistible = (i64::from(raw) * i64::from(profile.resistible_percent) / 100)
        .clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
    let irresistible = raw.saturating_sub(resistible);

    if level > 0 {
        let immune_at_three = is_creature || profile.immune_at_three;
        if (immune_at_three && level >= 3) || level > 3 {
            resistible = 0;
        } else {
            let bonus = i32::from(profile.boolean);
            let divisor = if is_creature {
                1 + bonus + level * level
            } else if profile.negative_energy {
                level * 2
            } else {
                (3 * level + 1) / 2 + bonus
            };
            resistible /= divisor;
        }
    } else {
        resistible = (i64::from(resistible) * 3 / 2).min(i64::from(i32::MAX)) as i32;
    }

    let adjusted = resistible.saturating_add(irresistible).max(0);
    tracing::trace!(
        ?flavour,
        level,
        raw,
        resistible,
        irresistible,
        adjusted,
        "resistance adjusted"
    );
    adjusted
}

/// Rolls a worn charm's effect on the effective level for this one check.
fn apply_charm(
    charm: Option<ResistCharm>,
    profile: &FlavourProfile,
    level: i32,
    rng: &mut dyn CombatRng,
) -> i32 {
    let delta = match charm {
        Some(ResistCharm::WardingCloak) if profile.elemental && rng.one_chance_in(3) => 1,
        Some(ResistCharm::ChaosAmulet) => match rng.random2(4) {
            0 => 1,
            1 => -1,
            _ => 0,
        },
        _ => 0,
    };
    (level + delta).clamp(
        i32::from(ResistVector::MIN_LEVEL),
        i32::from(ResistVector::MAX_LEVEL),
    )
}
