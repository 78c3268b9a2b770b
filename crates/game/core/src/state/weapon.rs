//! Equipped weapon references.

use strum::{EnumCount, EnumIter, EnumString, IntoStaticStr};

use crate::combat::DamageFlavour;

/// Broad weapon family. Cleave shape, reach and suitability are looked up
/// per class in [`crate::env::CombatTables`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumCount, EnumIter, EnumString, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum WeaponClass {
    ShortBlade,
    LongBlade,
    Axe,
    MaceFlail,
    Polearm,
    Staff,
    Scythe,
    /// Ranged weapon; can bash in melee but should not be used for it.
    Launcher,
    /// Held in a hand but never swung.
    Shield,
}

/// Hand slot a weapon is wielded in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum HandSlot {
    Primary,
    Offhand,
}

/// An equipped item in one hand slot. Immutable for the duration of a round.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Weapon {
    pub name: String,
    pub class: WeaponClass,
    /// Maximum base damage of one swing.
    pub damage: u16,
    /// Time for one swing in ticks (10 = one normal turn).
    pub delay: u16,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flavour: DamageFlavour,
    #[cfg_attr(feature = "serde", serde(default))]
    pub two_handed: bool,
}

impl Weapon {
    pub fn new(name: impl Into<String>, class: WeaponClass, damage: u16, delay: u16) -> Self {
        Self {
            name: name.into(),
            class,
            damage,
            delay,
            flavour: DamageFlavour::Physical,
            two_handed: false,
        }
    }

    pub fn two_handed(mut self) -> Self {
        self.two_handed = true;
        self
    }

    pub fn with_flavour(mut self, flavour: DamageFlavour) -> Self {
        self.flavour = flavour;
        self
    }

    /// Number of hands needed to swing this weapon.
    pub fn hands_required(&self) -> u8 {
        if self.two_handed { 2 } else { 1 }
    }
}

/// The two hand slots of a combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponSlots {
    #[cfg_attr(feature = "serde", serde(default))]
    pub primary: Option<Weapon>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub offhand: Option<Weapon>,
}

impl WeaponSlots {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn wielding(primary: Weapon) -> Self {
        Self {
            primary: Some(primary),
            offhand: None,
        }
    }

    pub fn dual(primary: Weapon, offhand: Weapon) -> Self {
        Self {
            primary: Some(primary),
            offhand: Some(offhand),
        }
    }

    pub fn get(&self, slot: HandSlot) -> Option<&Weapon> {
        match slot {
            HandSlot::Primary => self.primary.as_ref(),
            HandSlot::Offhand => self.offhand.as_ref(),
        }
    }
}
