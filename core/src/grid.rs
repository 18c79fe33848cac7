use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Blocked,
    Pipe(PipeState),
}

impl Cell {
    pub const fn pipe(&self) -> Option<&PipeState> {
        match self {
            Self::Pipe(pipe) => Some(pipe),
            _ => None,
        }
    }
}

/// What happened when the flow pushed water into a pipe.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WaterReceipt {
    /// Pipe was already saturated.
    Saturated,
    /// Call could not be resolved (no pipe, or cells not adjacent).
    Invalid,
    Filling,
    /// Saturated with nowhere to go.
    DeadEnd,
    /// Saturated and the neighbor at the given position took over.
    Continue(Coord2),
}

impl WaterReceipt {
    pub const fn received(self) -> bool {
        !matches!(self, Self::Saturated | Self::Invalid)
    }

    pub const fn is_full(self) -> bool {
        matches!(self, Self::Saturated | Self::DeadEnd | Self::Continue(_))
    }

    pub const fn can_continue(self) -> bool {
        matches!(self, Self::Continue(_))
    }

    pub const fn next_position(self) -> Option<Coord2> {
        match self {
            Self::Continue(next) => Some(next),
            _ => None,
        }
    }
}

/// Every position except the start and the cell directly below it.
pub fn valid_placement_positions(size: Coord2, start: Coord2) -> Vec<Coord2> {
    let (rows, cols) = size;
    let below_start = (start.0.saturating_add(1), start.1);

    (0..rows)
        .flat_map(|row| (0..cols).map(move |col| (row, col)))
        .filter(|&coords| coords != start && coords != below_start)
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Cell>,
    start: Coord2,
    max_water_level: u8,
}

impl Grid {
    pub fn new(size: Coord2, start: Coord2, blocked: &[Coord2], max_water_level: u8) -> Result<Self> {
        let (rows, cols) = size;
        if rows < 2 || cols < 1 {
            return Err(GameError::InvalidGridSize);
        }
        if max_water_level == 0 {
            return Err(GameError::InvalidWaterLevel);
        }
        if start.0 >= rows - 1 || start.1 >= cols {
            return Err(GameError::InvalidStart);
        }

        let mut cells: Array2<Cell> = Array2::default(size.to_nd_index());
        cells[start.to_nd_index()] = Cell::Pipe(PipeState::start());

        let below_start = (start.0 + 1, start.1);
        for &coords in blocked {
            if coords.0 >= rows || coords.1 >= cols {
                return Err(GameError::InvalidCoords);
            }
            if coords == start || coords == below_start {
                return Err(GameError::BlockedReserved);
            }
            cells[coords.to_nd_index()] = Cell::Blocked;
        }

        Ok(Self {
            cells,
            start,
            max_water_level,
        })
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.cells.dim();
        (dim.0 as Coord, dim.1 as Coord)
    }

    pub fn start(&self) -> Coord2 {
        self.start
    }

    pub fn max_water_level(&self) -> u8 {
        self.max_water_level
    }

    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    pub fn is_in_bounds(&self, coords: Coord2) -> bool {
        let (rows, cols) = self.size();
        coords.0 < rows && coords.1 < cols
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    pub fn pipe_at(&self, coords: Coord2) -> Option<&PipeState> {
        self.cells.get(coords.to_nd_index()).and_then(Cell::pipe)
    }

    fn pipe_at_mut(&mut self, coords: Coord2) -> Option<&mut PipeState> {
        match self.cells.get_mut(coords.to_nd_index()) {
            Some(Cell::Pipe(pipe)) => Some(pipe),
            _ => None,
        }
    }

    pub fn set_cell(&mut self, coords: Coord2, cell: Cell) -> Result<()> {
        let slot = self
            .cells
            .get_mut(coords.to_nd_index())
            .ok_or(GameError::InvalidCoords)?;
        *slot = cell;
        Ok(())
    }

    pub fn neighbor(&self, coords: Coord2, direction: Direction) -> Option<Coord2> {
        step_towards(coords, direction, self.size())
    }

    /// True outside the board or on an obstacle.
    pub fn is_blocked_or_border(&self, coords: Coord2) -> bool {
        !matches!(self.cell_at(coords), Some(Cell::Empty | Cell::Pipe(_)))
    }

    pub fn valid_placement_positions(&self, start: Coord2) -> Vec<Coord2> {
        valid_placement_positions(self.size(), start)
    }

    /// Empty cells and dry, non-start pipes can take a new piece.
    pub fn can_place_at(&self, coords: Coord2) -> bool {
        match self.cell_at(coords) {
            Some(Cell::Empty) => true,
            Some(Cell::Pipe(pipe)) => {
                !pipe.kind().is_start() && pipe.stage(self.max_water_level).is_dry()
            }
            Some(Cell::Blocked) | None => false,
        }
    }

    /// Pushes one fill unit into the pipe at `at`, coming from `previous`.
    ///
    /// The start pipe ignores `previous`. When the pipe saturates, the cell
    /// on its exit side decides whether the flow continues.
    pub fn receive_water(&mut self, at: Coord2, previous: Coord2) -> WaterReceipt {
        let max = self.max_water_level;

        let incoming = match self.pipe_at(at).map(PipeState::kind) {
            None => {
                log::warn!("No pipe at {:?} to receive water", at);
                return WaterReceipt::Invalid;
            }
            Some(PieceKind::Start) => None,
            Some(_) => {
                if self.pipe_at(previous).is_none() {
                    log::warn!("Water at {:?} came from {:?} which holds no pipe", at, previous);
                    return WaterReceipt::Invalid;
                }
                let Some(direction) = direction_between(previous, at) else {
                    log::warn!("Cells {:?} and {:?} are not adjacent", previous, at);
                    return WaterReceipt::Invalid;
                };
                Some(direction)
            }
        };

        let Some(pipe) = self.pipe_at_mut(at) else {
            return WaterReceipt::Invalid;
        };
        let exit = match pipe.take_water(incoming, max) {
            Fill::Refused => return WaterReceipt::Saturated,
            Fill::Filling => return WaterReceipt::Filling,
            Fill::Saturated { exit: None } => return WaterReceipt::DeadEnd,
            Fill::Saturated { exit: Some(exit) } => exit,
        };

        let Some(next) = self.neighbor(at, exit) else {
            log::trace!("Water at {:?} runs into the border", at);
            return WaterReceipt::DeadEnd;
        };
        if self.is_blocked_or_border(next) {
            log::trace!("Water at {:?} runs into a block at {:?}", at, next);
            return WaterReceipt::DeadEnd;
        }

        let connects = self
            .pipe_at(next)
            .is_some_and(|pipe| pipe.accepts_from(exit.opposite(), max));
        if !connects {
            log::trace!("Pipe at {:?} has no connection towards {:?}", next, at);
            return WaterReceipt::DeadEnd;
        }

        if let Some(pipe) = self.pipe_at_mut(at) {
            pipe.hand_off(exit);
        }
        WaterReceipt::Continue(next)
    }
}
