use crate::state::Position;

/// Static map oracle exposing terrain and sight lines.
pub trait MapOracle {
    fn dimensions(&self) -> MapDimensions;
    fn terrain(&self, position: Position) -> Option<TerrainKind>;

    fn contains(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }

    /// Out-of-bounds tiles count as walls.
    fn is_wall(&self, position: Position) -> bool {
        self.terrain(position).is_none_or(TerrainKind::blocks_sight)
    }

    fn is_passable(&self, position: Position) -> bool {
        self.terrain(position).is_some_and(TerrainKind::is_passable)
    }

    /// Bresenham line of sight; endpoints never block.
    fn has_line_of_sight(&self, from: Position, to: Position) -> bool {
        line_between(from, to)
            .into_iter()
            .all(|tile| !self.is_wall(tile))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }
}

/// Canonical terrain classes for map tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    #[default]
    Floor,
    Wall,
    /// Impassable but see-through.
    DeepWater,
}

impl TerrainKind {
    pub fn is_passable(self) -> bool {
        matches!(self, TerrainKind::Floor)
    }

    pub fn blocks_sight(self) -> bool {
        matches!(self, TerrainKind::Wall)
    }
}

/// Tiles strictly between `from` and `to` along a Bresenham line.
fn line_between(from: Position, to: Position) -> Vec<Position> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (from.x, from.y);
    let mut tiles = Vec::new();

    while (x, y) != (to.x, to.y) {
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
        if (x, y) != (to.x, to.y) {
            tiles.push(Position::new(x, y));
        }
    }
    tiles
}

/// Rectangular in-memory map; everything is floor until marked otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridMap {
    dimensions: MapDimensions,
    tiles: Vec<TerrainKind>,
}

impl GridMap {
    pub fn open(width: u32, height: u32) -> Self {
        Self {
            dimensions: MapDimensions::new(width, height),
            tiles: vec![TerrainKind::Floor; (width * height) as usize],
        }
    }

    pub fn with_walls(mut self, walls: impl IntoIterator<Item = Position>) -> Self {
        for wall in walls {
            self.set(wall, TerrainKind::Wall);
        }
        self
    }

    pub fn set(&mut self, position: Position, terrain: TerrainKind) {
        if let Some(index) = self.index(position) {
            self.tiles[index] = terrain;
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.dimensions
            .contains(position)
            .then(|| (position.y as u32 * self.dimensions.width + position.x as u32) as usize)
    }
}

impl MapOracle for GridMap {
    fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    fn terrain(&self, position: Position) -> Option<TerrainKind> {
        self.index(position).map(|index| self.tiles[index])
    }
}
