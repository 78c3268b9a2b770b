//! Arena scenario loader.
//!
//! A scenario is a small map plus the player and the creatures placed on it.
//! Creatures reference bestiary entries by name and get ids in file order,
//! starting at 1.

use std::path::Path;

use melee_core::{
    Attitude, Battlefield, Combatant, Conditions, EntityId, GridMap, Mount, Position, ResistKind,
    ResistVector, ResourceMeter, Weapon, WeaponSlots,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{Bestiary, LoadResult, read_file};

fn two() -> u8 {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MapSpec {
    dimensions: (u32, u32),
    #[serde(default)]
    walls: Vec<(i32, i32)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MountSpec {
    name: String,
    heads: u8,
    energy: u32,
    hp: u32,
    bite_damage: u16,
    #[serde(default)]
    resists: Vec<(ResistKind, i8)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PlayerSpec {
    name: String,
    position: (i32, i32),
    hp: u32,
    #[serde(default)]
    armor: i32,
    #[serde(default)]
    evasion: i32,
    #[serde(default)]
    resists: Vec<(ResistKind, i8)>,
    #[serde(default)]
    primary: Option<Weapon>,
    #[serde(default)]
    offhand: Option<Weapon>,
    #[serde(default = "two")]
    hands: u8,
    #[serde(default)]
    extra_strikes: u8,
    #[serde(default)]
    mount: Option<MountSpec>,
    #[serde(default)]
    forbids_stabbing: bool,
    #[serde(default)]
    conditions: Conditions,
    /// Index into the placements of a creature fighting alongside the player.
    #[serde(default)]
    companion: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PlacementSpec {
    creature: String,
    position: (i32, i32),
    #[serde(default)]
    attitude: Attitude,
    #[serde(default)]
    conditions: Conditions,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScenarioSpec {
    name: String,
    map: MapSpec,
    player: PlayerSpec,
    #[serde(default)]
    creatures: Vec<PlacementSpec>,
}

/// A ready-to-fight arena.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub map: GridMap,
    pub field: Battlefield,
}

impl Scenario {
    /// Looks a combatant up by its display name.
    pub fn find(&self, name: &str) -> Option<EntityId> {
        self.field.iter().find(|c| c.name == name).map(|c| c.id)
    }
}

/// Loader for scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path, bestiary: &Bestiary) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        let scenario = Self::parse(&content, bestiary)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
        tracing::debug!(
            path = %path.display(),
            scenario = %scenario.name,
            combatants = scenario.field.iter().count(),
            "loaded scenario"
        );
        Ok(scenario)
    }

    pub fn parse(content: &str, bestiary: &Bestiary) -> LoadResult<Scenario> {
        let spec: ScenarioSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;

        let (width, height) = spec.map.dimensions;
        if width == 0 || height == 0 {
            anyhow::bail!("scenario '{}' has an empty map", spec.name);
        }
        let map = GridMap::open(width, height)
            .with_walls(spec.map.walls.iter().map(|&(x, y)| Position::new(x, y)));

        let mut field = Battlefield::new();
        let mut occupied = Vec::new();
        let mut place = |position: (i32, i32), who: &str| -> LoadResult<Position> {
            let position = Position::new(position.0, position.1);
            if position.x < 0
                || position.y < 0
                || position.x >= width as i32
                || position.y >= height as i32
            {
                anyhow::bail!("{} at {} is off the map", who, position);
            }
            if spec.map.walls.contains(&(position.x, position.y)) {
                anyhow::bail!("{} at {} is inside a wall", who, position);
            }
            if occupied.contains(&position) {
                anyhow::bail!("{} at {} shares a tile", who, position);
            }
            occupied.push(position);
            Ok(position)
        };

        let player_position = place(spec.player.position, &spec.player.name)?;
        let mut player = build_player(&spec.player, player_position);

        for (index, placement) in spec.creatures.iter().enumerate() {
            let id = EntityId(index as u32 + 1);
            let name = placement.name.as_deref().unwrap_or(&placement.creature);
            let position = place(placement.position, name)?;
            let mut creature = bestiary.spawn(&placement.creature, id, position)?;
            creature.name = name.to_owned();
            creature.attitude = placement.attitude;
            creature.conditions |= placement.conditions;
            field.insert(creature);
        }

        if let Some(index) = spec.player.companion {
            if index >= spec.creatures.len() {
                anyhow::bail!("companion index {} has no matching creature", index);
            }
            player.companion = Some(EntityId(index as u32 + 1));
        }
        field.insert(player);

        Ok(Scenario {
            name: spec.name,
            map,
            field,
        })
    }
}

fn build_player(spec: &PlayerSpec, position: Position) -> Combatant {
    let weapons = WeaponSlots {
        primary: spec.primary.clone(),
        offhand: spec.offhand.clone(),
    };
    let mut player = Combatant::player(spec.name.clone(), position, spec.hp)
        .with_weapons(weapons)
        .with_armor(spec.armor)
        .with_resists(ResistVector::from_pairs(&spec.resists))
        .with_conditions(spec.conditions);
    player.evasion = spec.evasion;

    if let Some(traits) = player.player_traits_mut() {
        traits.hands = spec.hands;
        traits.extra_strikes = spec.extra_strikes;
        traits.forbids_stabbing = spec.forbids_stabbing;
        traits.mount = spec.mount.as_ref().map(|mount| Mount {
            name: mount.name.clone(),
            heads: mount.heads,
            energy: ResourceMeter::full(mount.energy),
            hp: ResourceMeter::full(mount.hp),
            resists: ResistVector::from_pairs(&mount.resists),
            bite_damage: mount.bite_damage,
        });
    }
    player
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::BestiaryLoader;

    fn bestiary() -> Bestiary {
        BestiaryLoader::parse(
            r#"[
                ("goblin", (hp: 6, attacks: [(kind: Hit, damage: 3)])),
                ("spectral weapon", (hp: 10, attacks: [(kind: Hit, damage: 6)])),
            ]"#,
        )
        .unwrap()
    }

    const DUEL: &str = r#"(
        name: "corridor",
        map: (dimensions: (5, 3), walls: [(0, 0), (4, 0)]),
        player: (
            name: "you",
            position: (1, 1),
            hp: 30,
            primary: Some((name: "long sword", class: LongBlade, damage: 10, delay: 12)),
            mount: Some((name: "hydra", heads: 2, energy: 20, hp: 15, bite_damage: 4)),
            companion: Some(1),
        ),
        creatures: [
            (creature: "goblin", position: (2, 1), conditions: "ASLEEP"),
            (creature: "spectral weapon", position: (1, 2), attitude: Friendly),
            (creature: "goblin", position: (3, 1), name: Some("goblin shaman")),
        ],
    )"#;

    #[test]
    fn builds_the_battlefield() {
        let scenario = ScenarioLoader::parse(DUEL, &bestiary()).unwrap();
        assert_eq!(scenario.name, "corridor");

        let player = scenario.field.player().unwrap();
        assert_eq!(player.position, Position::new(1, 1));
        assert_eq!(player.companion, Some(EntityId(2)));
        assert_eq!(player.mount().map(|m| m.energy.current), Some(20));

        let goblin = scenario.field.get(EntityId(1)).unwrap();
        assert!(goblin.has(Conditions::ASLEEP));
        assert_eq!(goblin.attitude, Attitude::Hostile);
        assert_eq!(scenario.find("goblin shaman"), Some(EntityId(3)));
        assert_eq!(
            scenario.field.get(EntityId(2)).map(|c| c.attitude),
            Some(Attitude::Friendly)
        );
    }

    #[test]
    fn rejects_bad_placements() {
        let in_wall = DUEL.replace("position: (2, 1)", "position: (0, 0)");
        assert!(ScenarioLoader::parse(&in_wall, &bestiary()).is_err());

        let stacked = DUEL.replace("position: (3, 1)", "position: (2, 1)");
        assert!(ScenarioLoader::parse(&stacked, &bestiary()).is_err());

        let off_map = DUEL.replace("position: (3, 1)", "position: (9, 1)");
        assert!(ScenarioLoader::parse(&off_map, &bestiary()).is_err());

        let unknown = DUEL.replace("\"spectral weapon\"", "\"lich\"");
        assert!(ScenarioLoader::parse(&unknown, &bestiary()).is_err());
    }
}
