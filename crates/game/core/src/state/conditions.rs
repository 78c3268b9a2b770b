//! Temporary conditions carried by combatants.
//!
//! Conditions are a flat flag set rather than timed effects: the surrounding
//! simulation owns durations and expiry, this crate only reads the flags at the
//! moment a strike or classification needs them.

use bitflags::bitflags;

bitflags! {
    /// Active temporary conditions on a combatant.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct Conditions: u32 {
        /// Acting erratically; movement and aim are unreliable.
        const CONFUSED = 1 << 0;
        /// Asleep and unaware.
        const ASLEEP = 1 << 1;
        /// Cannot move or act.
        const PARALYSED = 1 << 2;
        /// Fully turned to stone.
        const PETRIFIED = 1 << 3;
        /// Slowly turning to stone.
        const PETRIFYING = 1 << 4;
        /// Caught in a net or web.
        const HELD = 1 << 5;
        /// Not visible without see-invisible.
        const INVISIBLE = 1 << 6;
        /// Running away from its foes.
        const FLEEING = 1 << 7;
        /// Intangible form that ignores elemental mitigation entirely.
        const INTANGIBLE = 1 << 8;
        /// A transformation granting an extra, free bonus attack.
        const EXTRA_ATTACK = 1 << 9;
        /// Strikes cleave like an axe regardless of the weapon held.
        const CLEAVING = 1 << 10;
    }
}

impl Conditions {
    /// Conditions that leave a combatant unable to defend itself at all.
    pub const HELPLESS: Self = Self::ASLEEP.union(Self::PARALYSED).union(Self::PETRIFIED);
}
