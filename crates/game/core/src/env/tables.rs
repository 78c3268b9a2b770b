//! Data-driven combat tables.
//!
//! Per-content branching (which flavours are boolean resists, which weapon
//! classes cleave) lives here instead of in the algorithms. The tables are
//! built once at startup, either from [`CombatTables::standard`] or from a
//! content file applied on top of it.

use strum::EnumCount;

use crate::combat::DamageFlavour;
use crate::state::{ResistKind, WeaponClass};

/// How a damage flavour interacts with resistances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlavourProfile {
    /// Resistance consulted; `None` for flavours nothing resists.
    pub resist: Option<ResistKind>,
    /// Share of the raw damage subject to resistance, in percent.
    pub resistible_percent: u8,
    /// Behaves as all-or-nothing at player level (one extra divisor step).
    pub boolean: bool,
    /// Fully resisted at level 3.
    pub immune_at_three: bool,
    /// Negative-energy family; player resists halve per level.
    pub negative_energy: bool,
    /// Eligible for warding-cloak bonuses.
    pub elemental: bool,
}

impl FlavourProfile {
    pub const fn irresistible() -> Self {
        Self {
            resist: None,
            resistible_percent: 100,
            boolean: false,
            immune_at_three: false,
            negative_energy: false,
            elemental: false,
        }
    }

    pub const fn resisted_by(kind: ResistKind) -> Self {
        Self {
            resist: Some(kind),
            ..Self::irresistible()
        }
    }

    pub const fn partial(mut self, percent: u8) -> Self {
        self.resistible_percent = percent;
        self
    }

    pub const fn boolean(mut self) -> Self {
        self.boolean = true;
        self
    }

    pub const fn immune_at_three(mut self) -> Self {
        self.immune_at_three = true;
        self
    }

    pub const fn negative_energy(mut self) -> Self {
        self.negative_energy = true;
        self
    }

    pub const fn elemental(mut self) -> Self {
        self.elemental = true;
        self
    }
}

/// Area shape swept by one swing of a weapon class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CleaveShape {
    /// Only the primary target is struck.
    #[default]
    None,
    /// The seven other tiles around the attacker, walked rotationally.
    Adjacent,
    /// Everything hostile in sight within two tiles.
    WideSweep,
}

/// How a weapon class behaves in melee.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponProfile {
    pub cleave: CleaveShape,
    /// Melee reach in tiles.
    pub reach: u8,
    /// Can be swung at all.
    pub melee: bool,
    /// Swinging it works but deserves a confirmation.
    pub unsuitable: bool,
}

impl WeaponProfile {
    pub const fn melee(cleave: CleaveShape, reach: u8) -> Self {
        Self {
            cleave,
            reach,
            melee: true,
            unsuitable: false,
        }
    }

    pub const fn unsuitable() -> Self {
        Self {
            cleave: CleaveShape::None,
            reach: 1,
            melee: true,
            unsuitable: true,
        }
    }

    pub const fn inert() -> Self {
        Self {
            cleave: CleaveShape::None,
            reach: 1,
            melee: false,
            unsuitable: false,
        }
    }
}

/// Lookup tables keyed by flavour and weapon class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombatTables {
    flavours: [FlavourProfile; DamageFlavour::COUNT],
    weapons: [WeaponProfile; WeaponClass::COUNT],
}

impl CombatTables {
    /// The built-in tables.
    pub fn standard() -> Self {
        use DamageFlavour as F;
        use ResistKind as R;

        let mut tables = Self {
            flavours: [FlavourProfile::irresistible(); DamageFlavour::COUNT],
            weapons: [WeaponProfile::melee(CleaveShape::None, 1); WeaponClass::COUNT],
        };

        let flavours = [
            (F::Physical, FlavourProfile::irresistible()),
            (F::Fire, FlavourProfile::resisted_by(R::Fire).elemental()),
            (F::Cold, FlavourProfile::resisted_by(R::Cold).elemental()),
            (
                F::Electricity,
                FlavourProfile::resisted_by(R::Electricity).boolean().elemental(),
            ),
            (
                F::Poison,
                FlavourProfile::resisted_by(R::Poison)
                    .partial(50)
                    .boolean()
                    .immune_at_three(),
            ),
            (
                F::PoisonArrow,
                FlavourProfile::resisted_by(R::Poison)
                    .partial(30)
                    .boolean()
                    .immune_at_three(),
            ),
            (
                F::Negative,
                FlavourProfile::resisted_by(R::Negative)
                    .immune_at_three()
                    .negative_energy(),
            ),
            (
                F::Torment,
                FlavourProfile::resisted_by(R::Negative)
                    .immune_at_three()
                    .negative_energy(),
            ),
            (F::Holy, FlavourProfile::resisted_by(R::Holy).immune_at_three()),
            (F::Acid, FlavourProfile::resisted_by(R::Acid).immune_at_three()),
            (
                F::AcidWave,
                FlavourProfile::resisted_by(R::Acid).partial(40).immune_at_three(),
            ),
            (F::Miasma, FlavourProfile::resisted_by(R::Rot).boolean()),
            (
                F::StickyFire,
                FlavourProfile::resisted_by(R::Fire).boolean().elemental(),
            ),
            (F::Water, FlavourProfile::resisted_by(R::Water).partial(40).boolean()),
            (F::Lava, FlavourProfile::resisted_by(R::Fire).partial(55).elemental()),
            (F::Steam, FlavourProfile::resisted_by(R::Steam)),
            (F::Crystal, FlavourProfile::resisted_by(R::Cold).partial(20).elemental()),
            (F::IceStorm, FlavourProfile::resisted_by(R::Cold).partial(40).elemental()),
            (
                F::IcyDevastation,
                FlavourProfile::resisted_by(R::Cold).partial(30).elemental(),
            ),
        ];
        for (flavour, profile) in flavours {
            tables.set_flavour(flavour, profile);
        }

        let weapons = [
            (WeaponClass::ShortBlade, WeaponProfile::melee(CleaveShape::None, 1)),
            (WeaponClass::LongBlade, WeaponProfile::melee(CleaveShape::None, 1)),
            (WeaponClass::Axe, WeaponProfile::melee(CleaveShape::Adjacent, 1)),
            (WeaponClass::MaceFlail, WeaponProfile::melee(CleaveShape::None, 1)),
            (WeaponClass::Polearm, WeaponProfile::melee(CleaveShape::None, 2)),
            (WeaponClass::Staff, WeaponProfile::melee(CleaveShape::None, 1)),
            (WeaponClass::Scythe, WeaponProfile::melee(CleaveShape::WideSweep, 2)),
            (WeaponClass::Launcher, WeaponProfile::unsuitable()),
            (WeaponClass::Shield, WeaponProfile::inert()),
        ];
        for (class, profile) in weapons {
            tables.set_weapon(class, profile);
        }

        tables
    }

    pub fn flavour(&self, flavour: DamageFlavour) -> &FlavourProfile {
        &self.flavours[flavour as usize]
    }

    pub fn weapon(&self, class: WeaponClass) -> &WeaponProfile {
        &self.weapons[class as usize]
    }

    pub fn set_flavour(&mut self, flavour: DamageFlavour, profile: FlavourProfile) {
        self.flavours[flavour as usize] = profile;
    }

    pub fn set_weapon(&mut self, class: WeaponClass, profile: WeaponProfile) {
        self.weapons[class as usize] = profile;
    }
}

impl Default for CombatTables {
    fn default() -> Self {
        Self::standard()
    }
}
