use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipeStage {
    /// Never touched by water, can still be replaced.
    Dry,
    /// Holds some water.
    Wet,
    /// Fill level reached the configured maximum.
    Saturated,
}

impl PipeStage {
    pub const fn is_dry(self) -> bool {
        matches!(self, Self::Dry)
    }
}

/// Result of pushing one fill unit into a pipe.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fill {
    /// Already saturated, nothing changed.
    Refused,
    /// Took the unit, still room left.
    Filling,
    /// Took the last unit. `exit` is where the water wants to go next, if the
    /// piece connects the side it came in through.
    Saturated { exit: Option<Direction> },
}

/// Mutable state of a piece placed on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipeState {
    piece: Piece,
    fill_level: u8,
    wet: bool,
    used: DirectionSet,
}

impl PipeState {
    pub const fn new(piece: Piece) -> Self {
        Self {
            piece,
            fill_level: 0,
            wet: false,
            used: DirectionSet::empty(),
        }
    }

    pub const fn start() -> Self {
        Self::new(Piece::start())
    }

    pub const fn piece(&self) -> Piece {
        self.piece
    }

    pub const fn kind(&self) -> PieceKind {
        self.piece.kind
    }

    pub const fn rotation(&self) -> Rotation {
        self.piece.rotation
    }

    pub const fn fill_level(&self) -> u8 {
        self.fill_level
    }

    /// Sides a cross piece has already passed water through.
    pub const fn used_directions(&self) -> DirectionSet {
        self.used
    }

    pub const fn is_saturated(&self, max_water_level: u8) -> bool {
        self.fill_level >= max_water_level
    }

    pub const fn stage(&self, max_water_level: u8) -> PipeStage {
        if self.is_saturated(max_water_level) {
            PipeStage::Saturated
        } else if self.wet {
            PipeStage::Wet
        } else {
            PipeStage::Dry
        }
    }

    /// Whether this pipe takes water entering through `incoming` right now.
    pub fn accepts_from(&self, incoming: Direction, max_water_level: u8) -> bool {
        match self.kind() {
            PieceKind::Start => false,
            PieceKind::Cross => {
                !self.is_saturated(max_water_level) && !self.used.has(incoming)
            }
            PieceKind::Straight | PieceKind::Corner => {
                !self.wet && accepts(self.kind(), self.rotation(), incoming)
            }
        }
    }

    /// Adds one fill unit arriving through `incoming` (`None` for the source).
    pub fn take_water(&mut self, incoming: Option<Direction>, max_water_level: u8) -> Fill {
        if self.is_saturated(max_water_level) {
            return Fill::Refused;
        }

        self.fill_level += 1;
        self.wet = true;

        if let (PieceKind::Cross, Some(incoming)) = (self.kind(), incoming) {
            self.used.add(incoming);
        }

        if self.is_saturated(max_water_level) {
            Fill::Saturated {
                exit: exit_direction(self.kind(), self.rotation(), incoming),
            }
        } else {
            Fill::Filling
        }
    }

    /// Called once the neighbor on the `exit` side took over the flow.
    ///
    /// A cross closes the exit side and drains so it can carry a second
    /// stream on its other axis later. Other kinds stay saturated.
    pub fn hand_off(&mut self, exit: Direction) {
        if matches!(self.kind(), PieceKind::Cross) {
            self.used.add(exit);
            self.fill_level = 0;
        }
    }
}
