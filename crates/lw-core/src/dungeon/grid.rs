//! Room lattice geometry
//!
//! Rooms sit on an integer lattice whose cell size is the room footprint.
//! Positions are stored in world units, so a step East adds the footprint
//! width to x and a step North adds the footprint height to y.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Size of one room on the lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    pub width: u32,
    pub height: u32,
}

impl Footprint {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Length of the diagonal of one lattice cell
    pub fn diagonal(&self) -> f64 {
        (self.width as f64).hypot(self.height as f64)
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Self::new(11, 9)
    }
}

impl core::fmt::Display for Footprint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Room position in world units
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position of the neighbouring lattice cell in `direction`
    pub fn step(self, direction: Direction, footprint: Footprint) -> Position {
        self.step_n(direction, 1, footprint)
    }

    /// Position `count` lattice cells away in `direction`
    pub fn step_n(self, direction: Direction, count: usize, footprint: Footprint) -> Position {
        let (dx, dy) = direction.offset();
        let count = count as i32;
        Position {
            x: self.x + dx * count * footprint.width as i32,
            y: self.y + dy * count * footprint.height as i32,
        }
    }

    /// Euclidean distance in world units
    pub fn distance(self, other: Position) -> f64 {
        ((other.x - self.x) as f64).hypot((other.y - self.y) as f64)
    }

    /// Unit signs (-1, 0, 1) of the offset from `self` toward `target`
    pub fn signum_toward(self, target: Position) -> (i32, i32) {
        ((target.x - self.x).signum(), (target.y - self.y).signum())
    }

    /// Lattice coordinates of this position
    pub fn cell(self, footprint: Footprint) -> (i32, i32) {
        (
            self.x.div_euclid(footprint.width.max(1) as i32),
            self.y.div_euclid(footprint.height.max(1) as i32),
        )
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal direction of a connection
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    EnumIter,
)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    /// All directions in rotation order
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Direction for an index taken modulo 4
    pub const fn from_index(index: u32) -> Direction {
        match index % 4 {
            0 => Direction::North,
            1 => Direction::East,
            2 => Direction::South,
            _ => Direction::West,
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Next direction in rotation order (West wraps to North)
    pub const fn rotate_clockwise(self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    pub const fn rotate_counter_clockwise(self) -> Direction {
        match self {
            Direction::North => Direction::West,
            Direction::East => Direction::North,
            Direction::South => Direction::East,
            Direction::West => Direction::South,
        }
    }

    /// Unit lattice offset; North is +y
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    pub const fn is_vertical(self) -> bool {
        matches!(self, Direction::North | Direction::South)
    }

    pub const fn flag(self) -> Directions {
        match self {
            Direction::North => Directions::NORTH,
            Direction::East => Directions::EAST,
            Direction::South => Directions::SOUTH,
            Direction::West => Directions::WEST,
        }
    }
}

bitflags! {
    /// Set of directions
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Directions: u8 {
        const NORTH = 0x01;
        const EAST = 0x02;
        const SOUTH = 0x04;
        const WEST = 0x08;
    }
}

impl Directions {
    /// Directions in the set, in rotation order
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |d| self.contains(d.flag()))
    }
}
