//! Mutable battlefield state: combatants and their positions.

use crate::state::{Combatant, EntityId, Position};

/// Every combatant taking part in the fight, plus the marks combat leaves behind.
///
/// Lookups are linear; a melee involves a handful of combatants at most.
/// Positions are authoritative here: anything cached before a strike must be
/// re-read afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Battlefield {
    combatants: Vec<Combatant>,
    #[cfg_attr(feature = "serde", serde(default))]
    blood: Vec<Position>,
}

impl Battlefield {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_combatants(combatants: impl IntoIterator<Item = Combatant>) -> Self {
        let mut field = Self::new();
        for combatant in combatants {
            field.insert(combatant);
        }
        field
    }

    /// Adds a combatant, replacing any existing one with the same id.
    pub fn insert(&mut self, combatant: Combatant) {
        match self.combatants.iter_mut().find(|c| c.id == combatant.id) {
            Some(existing) => *existing = combatant,
            None => self.combatants.push(combatant),
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id == id)
    }

    pub fn player(&self) -> Option<&Combatant> {
        self.get(EntityId::PLAYER)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter()
    }

    /// Combatant standing at `position`, if one is alive and present there.
    pub fn occupant_at(&self, position: Position) -> Option<&Combatant> {
        self.combatants
            .iter()
            .find(|c| c.position == position && c.is_present())
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        self.occupant_at(position).is_some()
    }

    /// Present combatants on the eight tiles around `position`, in compass order.
    pub fn adjacent_to(&self, position: Position) -> Vec<EntityId> {
        position
            .neighbours()
            .filter_map(|tile| self.occupant_at(tile).map(|c| c.id))
            .collect()
    }

    /// Moves a combatant; returns false if it does not exist.
    pub fn move_to(&mut self, id: EntityId, position: Position) -> bool {
        match self.get_mut(id) {
            Some(combatant) => {
                combatant.position = position;
                true
            }
            None => false,
        }
    }

    /// Takes a combatant off the battlefield without killing it.
    pub fn remove(&mut self, id: EntityId) -> bool {
        match self.get_mut(id) {
            Some(combatant) => {
                combatant.removed = true;
                true
            }
            None => false,
        }
    }

    pub fn spatter_blood(&mut self, position: Position) {
        self.blood.push(position);
    }

    pub fn blood(&self) -> &[Position] {
        &self.blood
    }
}
