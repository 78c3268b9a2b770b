//! Combat-visible state: who is fighting, where they stand and what they carry.
pub mod battlefield;
pub mod combatant;
pub mod common;
pub mod conditions;
pub mod resists;
pub mod weapon;

pub use battlefield::Battlefield;
pub use combatant::{
    AttackKind, AttackList, Attitude, Combatant, CombatantKind, CreatureTraits, Fighter,
    FighterKind, Mount, MountView, NaturalAttack, PlayerTraits, ResistCharm,
};
pub use common::{EntityId, Offset, Position, ResourceMeter};
pub use conditions::Conditions;
pub use resists::{ResistKind, ResistVector};
pub use weapon::{HandSlot, Weapon, WeaponClass, WeaponSlots};
