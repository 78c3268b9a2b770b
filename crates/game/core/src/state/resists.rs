//! Per-category resistance levels.

use strum::{EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Resistance categories a combatant can hold a level in.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumCount, EnumIter, EnumString, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ResistKind {
    Fire,
    Cold,
    Electricity,
    Poison,
    Negative,
    Holy,
    Acid,
    Rot,
    Water,
    Steam,
}

impl ResistKind {
    const fn index(self) -> usize {
        self as usize
    }
}

/// Small signed resistance level per category.
///
/// Positive levels resist, negative levels are vulnerabilities. Levels are
/// clamped to `-3..=4` on write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResistVector {
    levels: [i8; ResistKind::COUNT],
}

impl ResistVector {
    pub const MIN_LEVEL: i8 = -3;
    pub const MAX_LEVEL: i8 = 4;

    pub const fn none() -> Self {
        Self {
            levels: [0; ResistKind::COUNT],
        }
    }

    /// Builds a vector from `(kind, level)` pairs; later pairs win.
    pub fn from_pairs(pairs: &[(ResistKind, i8)]) -> Self {
        let mut vector = Self::none();
        for &(kind, level) in pairs {
            vector.set(kind, level);
        }
        vector
    }

    pub fn with(mut self, kind: ResistKind, level: i8) -> Self {
        self.set(kind, level);
        self
    }

    pub fn get(&self, kind: ResistKind) -> i8 {
        self.levels[kind.index()]
    }

    pub fn set(&mut self, kind: ResistKind, level: i8) {
        self.levels[kind.index()] = level.clamp(Self::MIN_LEVEL, Self::MAX_LEVEL);
    }

    /// Non-zero entries, for display and serialization into content files.
    pub fn pairs(&self) -> impl Iterator<Item = (ResistKind, i8)> + '_ {
        ResistKind::iter()
            .map(|kind| (kind, self.get(kind)))
            .filter(|&(_, level)| level != 0)
    }
}
