use std::fmt;

/// Unique identifier for any combatant tracked on the battlefield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved identifier for the controllable player character.
    pub const PLAYER: Self = Self(0);

    /// Returns true if this entity represents the player.
    #[inline]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::PLAYER
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete grid position expressed in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this position shifted by `offset`.
    pub const fn offset(self, offset: Offset) -> Self {
        Self {
            x: self.x + offset.dx,
            y: self.y + offset.dy,
        }
    }

    /// Vector from `self` to `other`.
    pub const fn delta_to(self, other: Position) -> Offset {
        Offset::new(other.x - self.x, other.y - self.y)
    }

    /// Chebyshev (king-move) distance; the metric used for melee reach.
    pub fn distance(self, other: Position) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }

    /// True when `other` is one of the eight neighbouring tiles.
    pub fn is_adjacent(self, other: Position) -> bool {
        self.distance(other) == 1
    }

    /// The eight neighbouring tiles in clockwise order starting north.
    pub fn neighbours(self) -> impl Iterator<Item = Position> {
        Offset::COMPASS.into_iter().map(move |offset| self.offset(offset))
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Grid displacement between two positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    /// Adjacent offsets in clockwise order starting north (y grows southward).
    pub const COMPASS: [Offset; 8] = [
        Offset::new(0, -1),
        Offset::new(1, -1),
        Offset::new(1, 0),
        Offset::new(1, 1),
        Offset::new(0, 1),
        Offset::new(-1, 1),
        Offset::new(-1, 0),
        Offset::new(-1, -1),
    ];

    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Clamps each axis to `-1..=1`, turning any vector into a compass step.
    pub const fn signum(self) -> Self {
        Self::new(self.dx.signum(), self.dy.signum())
    }

    pub const fn is_zero(self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    pub const fn is_diagonal(self) -> bool {
        self.dx != 0 && self.dy != 0
    }

    /// Rotates an adjacent offset by 45 degrees.
    ///
    /// `step > 0` turns clockwise, `step < 0` counterclockwise. Non-adjacent
    /// vectors are first clamped to their compass direction; the zero vector
    /// is returned unchanged.
    pub fn rotate_adjacent(self, step: i32) -> Self {
        let unit = self.signum();
        match Self::COMPASS.iter().position(|&o| o == unit) {
            Some(index) => {
                let next = (index as i32 + step.signum()).rem_euclid(8) as usize;
                Self::COMPASS[next]
            }
            None => self,
        }
    }
}

/// Integer resource meter (hit points, mount energy) tracked per combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub const fn new(current: u32, maximum: u32) -> Self {
        Self { current, maximum }
    }

    pub const fn full(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }

    pub const fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Subtracts `amount` (saturating) and returns what was actually removed.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.current);
        self.current -= taken;
        taken
    }
}
