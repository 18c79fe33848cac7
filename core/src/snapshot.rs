use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a renderer needs to draw one cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    #[default]
    Empty,
    Blocked,
    Pipe {
        kind: PieceKind,
        rotation: Rotation,
        fill_level: u8,
        stage: PipeStage,
    },
}

impl CellView {
    fn from_cell(cell: &Cell, max_water_level: u8) -> Self {
        match cell {
            Cell::Empty => Self::Empty,
            Cell::Blocked => Self::Blocked,
            Cell::Pipe(pipe) => Self::Pipe {
                kind: pipe.kind(),
                rotation: pipe.rotation(),
                fill_level: pipe.fill_level(),
                stage: pipe.stage(max_water_level),
            },
        }
    }
}

/// Read-only copy of a session, detached from its internals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub cells: Array2<CellView>,
    pub start: Coord2,
    pub cursor: Coord2,
    /// Cell the water came from, equal to `cursor` before the first hand-off.
    pub previous: Coord2,
    pub is_flowing: bool,
    pub path_length: i32,
    pub required_length: u32,
    pub max_water_level: u8,
    pub queue: Vec<Piece>,
    pub elapsed_ms: Millis,
    pub until_flow_start: Millis,
    pub state: SessionState,
    pub outcome: Option<OutcomeReport>,
}

impl SessionSnapshot {
    pub fn from_session(session: &GameSession) -> Self {
        let grid = session.grid();
        let max = grid.max_water_level();
        let cursor = session.cursor();
        let clock = session.clock();

        Self {
            cells: grid.cells().map(|cell| CellView::from_cell(cell, max)),
            start: grid.start(),
            cursor: cursor.current(),
            previous: cursor.previous(),
            is_flowing: cursor.is_flowing(),
            path_length: cursor.path_length(),
            required_length: session.required_length(),
            max_water_level: max,
            queue: session.queue().iter().collect(),
            elapsed_ms: clock.elapsed_ms(),
            until_flow_start: clock.until_flow_start(),
            state: session.state(),
            outcome: session.outcome(),
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.cells.dim();
        (dim.0 as Coord, dim.1 as Coord)
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<CellView> {
        self.cells.get(coords.to_nd_index()).copied()
    }
}
