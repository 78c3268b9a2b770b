//! Checks made before a player round starts.

use arrayvec::ArrayVec;

use crate::combat::{AbortReason, Arena, CombatEvent};
use crate::env::CombatTables;
use crate::state::{Attitude, Combatant, Fighter, HandSlot};

/// Hand slots the player can swing this round, primary first.
///
/// An empty primary hand punches. A weapon needing more hands than the player
/// has is unusable. The offhand only swings alongside a one-handed primary
/// and only if it holds a one-handed melee weapon itself.
pub fn usable_weapon_slots(attacker: &Combatant, tables: &CombatTables) -> ArrayVec<HandSlot, 2> {
    let hands = attacker.player_traits().map_or(2, |traits| traits.hands);
    let mut slots = ArrayVec::new();
    if hands == 0 {
        return slots;
    }

    let primary = attacker.weapon(HandSlot::Primary);
    let primary_usable = primary.is_none_or(|weapon| {
        tables.weapon(weapon.class).melee && weapon.hands_required() <= hands
    });
    if primary_usable {
        slots.push(HandSlot::Primary);
    }

    let primary_two_handed = primary.is_some_and(|weapon| weapon.two_handed);
    if !primary_two_handed
        && hands >= 2
        && let Some(offhand) = attacker.weapon(HandSlot::Offhand)
        && !offhand.two_handed
        && tables.weapon(offhand.class).melee
    {
        slots.push(HandSlot::Offhand);
    }
    slots
}

/// Asks before attacking something that is not openly hostile, then before
/// swinging anything unsuited to melee. A declined prompt is logged.
pub fn confirm_attack(
    arena: &mut Arena<'_>,
    attacker: &Combatant,
    defender: &Combatant,
    slots: &[HandSlot],
) -> Result<(), AbortReason> {
    let visible = attacker.perceives(defender)
        && arena
            .env
            .map
            .has_line_of_sight(attacker.position, defender.position);
    if visible && defender.attitude != Attitude::Hostile {
        ask(arena, attacker, format!("Really attack {}?", defender.name))?;
    }

    let tables = arena.env.tables;
    let unsuitable = slots
        .iter()
        .filter_map(|&slot| attacker.weapon(slot))
        .find(|weapon| tables.weapon(weapon.class).unsuitable);
    if let Some(weapon) = unsuitable {
        ask(
            arena,
            attacker,
            format!("Really attack while wielding {}?", weapon.name),
        )?;
    }
    Ok(())
}

fn ask(arena: &mut Arena<'_>, attacker: &Combatant, question: String) -> Result<(), AbortReason> {
    if arena.prompter.confirm(&question) {
        return Ok(());
    }
    tracing::debug!(attacker = %attacker.id, %question, "prompt declined");
    arena.log.push(CombatEvent::Declined {
        attacker: attacker.id,
        question,
    });
    Err(AbortReason::Declined)
}
