//! Creature template loader.
//!
//! RON format: a list of `(name, CreatureSpec)` pairs. Names are the keys that
//! scenarios use to place creatures.

use std::collections::BTreeMap;
use std::path::Path;

use melee_core::{
    CombatConfig, Combatant, Conditions, CreatureTraits, EntityId, NaturalAttack, Position,
    ResistCharm, ResistKind, ResistVector, Weapon, WeaponSlots,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

fn one() -> u8 {
    1
}

/// Template for one kind of creature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatureSpec {
    pub hp: u32,
    pub attacks: Vec<NaturalAttack>,
    #[serde(default)]
    pub armor: i32,
    #[serde(default)]
    pub evasion: i32,
    #[serde(default)]
    pub resists: Vec<(ResistKind, i8)>,
    #[serde(default)]
    pub weapon: Option<Weapon>,
    #[serde(default = "one")]
    pub heads: u8,
    #[serde(default)]
    pub multi_target: bool,
    #[serde(default)]
    pub intelligent: bool,
    #[serde(default)]
    pub inanimate: bool,
    #[serde(default)]
    pub erratic: bool,
    #[serde(default)]
    pub distraction_immune: bool,
    #[serde(default)]
    pub perma_confused: bool,
    #[serde(default)]
    pub sees_invisible: bool,
    #[serde(default)]
    pub charm: Option<ResistCharm>,
    #[serde(default)]
    pub conditions: Conditions,
}

impl CreatureSpec {
    fn validate(&self, name: &str) -> LoadResult<()> {
        if self.attacks.is_empty() {
            anyhow::bail!("creature '{}' has no attacks", name);
        }
        if self.attacks.len() > CombatConfig::MAX_ATTACK_SLOTS {
            anyhow::bail!(
                "creature '{}' has {} attacks, at most {} are allowed",
                name,
                self.attacks.len(),
                CombatConfig::MAX_ATTACK_SLOTS
            );
        }
        if self.heads == 0 {
            anyhow::bail!("creature '{}' needs at least one head", name);
        }
        if self.hp == 0 {
            anyhow::bail!("creature '{}' would spawn dead", name);
        }
        Ok(())
    }

    /// Builds a live combatant from this template.
    pub fn spawn(&self, id: EntityId, name: &str, position: Position) -> Combatant {
        let mut traits = CreatureTraits::with_attacks(self.attacks.iter().copied());
        traits.heads = self.heads;
        traits.multi_target = self.multi_target;
        traits.intelligent = self.intelligent;
        traits.inanimate = self.inanimate;
        traits.erratic = self.erratic;
        traits.distraction_immune = self.distraction_immune;
        traits.perma_confused = self.perma_confused;
        traits.charm = self.charm;

        let weapons = self
            .weapon
            .clone()
            .map_or_else(WeaponSlots::empty, WeaponSlots::wielding);
        let mut creature = Combatant::creature(id, name, position, self.hp, traits)
            .with_armor(self.armor)
            .with_resists(ResistVector::from_pairs(&self.resists))
            .with_weapons(weapons)
            .with_conditions(self.conditions);
        creature.evasion = self.evasion;
        creature.sees_invisible = self.sees_invisible;
        creature
    }
}

/// Creature templates by name.
#[derive(Debug, Clone, Default)]
pub struct Bestiary {
    creatures: BTreeMap<String, CreatureSpec>,
}

impl Bestiary {
    pub fn get(&self, name: &str) -> Option<&CreatureSpec> {
        self.creatures.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.creatures.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    /// Spawns the creature called `name`.
    pub fn spawn(&self, name: &str, id: EntityId, position: Position) -> LoadResult<Combatant> {
        self.get(name)
            .map(|spec| spec.spawn(id, name, position))
            .ok_or_else(|| anyhow::anyhow!("unknown creature '{}'", name))
    }
}

/// Loader for the bestiary from RON files.
pub struct BestiaryLoader;

impl BestiaryLoader {
    pub fn load(path: &Path) -> LoadResult<Bestiary> {
        let content = read_file(path)?;
        let bestiary = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), creatures = bestiary.len(), "loaded bestiary");
        Ok(bestiary)
    }

    pub fn parse(content: &str) -> LoadResult<Bestiary> {
        let raw: Vec<(String, CreatureSpec)> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse bestiary RON: {}", e))?;

        let mut creatures = BTreeMap::new();
        for (name, spec) in raw {
            spec.validate(&name)?;
            if creatures.insert(name.clone(), spec).is_some() {
                anyhow::bail!("creature '{}' is defined twice", name);
            }
        }
        Ok(Bestiary { creatures })
    }
}
