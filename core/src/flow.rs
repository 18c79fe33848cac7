use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowStatus {
    #[default]
    Playing,
    Stopped,
}

/// Result of a single flow segment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing moved: flow not running, or the pipe refused the call.
    NoChange,
    /// The current pipe took one more unit and is not full yet.
    Filled,
    Advanced { from: Coord2, to: Coord2 },
    Halted { at: Coord2 },
}

impl StepOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Head of the water path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowCursor {
    current: Coord2,
    previous: Coord2,
    is_flowing: bool,
    path_length: i32,
    status: FlowStatus,
}

impl FlowCursor {
    pub const fn new(start: Coord2) -> Self {
        Self {
            current: start,
            previous: start,
            is_flowing: false,
            path_length: -1,
            status: FlowStatus::Playing,
        }
    }

    pub const fn current(&self) -> Coord2 {
        self.current
    }

    pub const fn previous(&self) -> Coord2 {
        self.previous
    }

    pub const fn is_flowing(&self) -> bool {
        self.is_flowing
    }

    /// Pipes the water fully went through, `-1` before the source saturates.
    pub const fn path_length(&self) -> i32 {
        self.path_length
    }

    pub const fn status(&self) -> FlowStatus {
        self.status
    }

    pub const fn is_stopped(&self) -> bool {
        matches!(self.status, FlowStatus::Stopped)
    }

    pub fn start(&mut self) {
        if self.is_stopped() {
            return;
        }
        self.is_flowing = true;
    }

    /// Pushes one fill unit into the pipe under the cursor.
    pub fn step(&mut self, grid: &mut Grid) -> StepOutcome {
        if !self.is_flowing {
            return StepOutcome::NoChange;
        }

        match grid.receive_water(self.current, self.previous) {
            WaterReceipt::Continue(next) => {
                let from = self.current;
                self.path_length += 1;
                self.previous = self.current;
                self.current = next;
                log::trace!("Water moved {:?} -> {:?}, length {}", from, next, self.path_length);
                StepOutcome::Advanced { from, to: next }
            }
            WaterReceipt::DeadEnd => {
                self.path_length += 1;
                self.is_flowing = false;
                self.status = FlowStatus::Stopped;
                log::debug!("Water stopped at {:?}, length {}", self.current, self.path_length);
                StepOutcome::Halted { at: self.current }
            }
            WaterReceipt::Filling => StepOutcome::Filled,
            WaterReceipt::Saturated | WaterReceipt::Invalid => StepOutcome::NoChange,
        }
    }
}
