//! Damage flavours.

use strum::{EnumCount, EnumIter, EnumString, IntoStaticStr};

/// Elemental or physical category of a strike.
///
/// Which resistance applies, how much of the damage is resistible at all, and
/// whether the resist behaves as a boolean are looked up per flavour in
/// [`crate::env::CombatTables`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumCount,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum DamageFlavour {
    #[default]
    Physical,
    Fire,
    Cold,
    Electricity,
    Poison,
    PoisonArrow,
    Negative,
    Torment,
    Holy,
    Acid,
    AcidWave,
    Miasma,
    StickyFire,
    Water,
    Lava,
    Steam,
    Crystal,
    IceStorm,
    IcyDevastation,
}
