use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Straight,
    Corner,
    Cross,
    /// Water source, only ever found on the start cell.
    Start,
}

impl PieceKind {
    pub const fn is_start(self) -> bool {
        matches!(self, Self::Start)
    }
}

/// Clockwise rotation in quarter turns, fixed when the piece is generated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Self::R0, Self::R90, Self::R180, Self::R270];

    pub const fn degrees(self) -> u16 {
        use Rotation::*;
        match self {
            R0 => 0,
            R90 => 90,
            R180 => 180,
            R270 => 270,
        }
    }

    pub const fn from_degrees(degrees: u16) -> Option<Self> {
        use Rotation::*;
        match degrees {
            0 => Some(R0),
            90 => Some(R90),
            180 => Some(R180),
            270 => Some(R270),
            _ => None,
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = InvalidRotation;

    fn try_from(degrees: u16) -> core::result::Result<Self, Self::Error> {
        Self::from_degrees(degrees).ok_or(InvalidRotation(degrees))
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InvalidRotation(pub u16);

impl fmt::Display for InvalidRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rotation must be 0, 90, 180 or 270, got {}", self.0)
    }
}

/// A placeable connector: kind plus its fixed rotation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: Rotation,
}

impl Piece {
    pub const fn new(kind: PieceKind, rotation: Rotation) -> Self {
        Self { kind, rotation }
    }

    pub const fn start() -> Self {
        Self::new(PieceKind::Start, Rotation::R0)
    }

    /// Sides through which this piece can carry water.
    pub fn openings(self) -> DirectionSet {
        openings(self.kind, self.rotation)
    }
}
