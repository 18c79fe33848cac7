use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u8;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Simulated milliseconds.
pub type Millis = u64;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

/// Side of a cell. Water arriving "from `Top`" enters through the top side.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Top,
    Bottom,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    pub const fn opposite(self) -> Self {
        use Direction::*;
        match self {
            Top => Bottom,
            Bottom => Top,
            Left => Right,
            Right => Left,
        }
    }

    /// `(row, col)` displacement of the neighbor on this side.
    pub const fn delta(self) -> (i8, i8) {
        use Direction::*;
        match self {
            Top => (-1, 0),
            Bottom => (1, 0),
            Left => (0, -1),
            Right => (0, 1),
        }
    }

    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    pub const fn as_set(self) -> DirectionSet {
        use Direction::*;
        match self {
            Top => DirectionSet::TOP,
            Bottom => DirectionSet::BOTTOM,
            Left => DirectionSet::LEFT,
            Right => DirectionSet::RIGHT,
        }
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct DirectionSet: u8 {
        const TOP = 1 << 0;
        const BOTTOM = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

impl DirectionSet {
    pub fn has(self, direction: Direction) -> bool {
        self.contains(direction.as_set())
    }

    pub fn add(&mut self, direction: Direction) {
        self.insert(direction.as_set());
    }

    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&d| self.has(d))
    }
}

impl From<Direction> for DirectionSet {
    fn from(direction: Direction) -> Self {
        direction.as_set()
    }
}

/// Applies `direction` to `coords`, returning a value only when it remains in bounds.
pub fn step_towards(coords: Coord2, direction: Direction, bounds: Coord2) -> Option<Coord2> {
    let (row, col) = coords;
    let (d_row, d_col) = direction.delta();
    let (max_row, max_col) = bounds;

    let next_row = row.checked_add_signed(d_row)?;
    if next_row >= max_row {
        return None;
    }

    let next_col = col.checked_add_signed(d_col)?;
    if next_col >= max_col {
        return None;
    }

    Some((next_row, next_col))
}
