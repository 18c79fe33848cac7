#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use config::*;
pub use connectivity::*;
pub use controller::*;
pub use error::*;
pub use flow::*;
pub use generator::*;
pub use grid::*;
pub use piece::*;
pub use pipe::*;
pub use queue::*;
pub use session::*;
pub use snapshot::*;
pub use timing::*;
pub use types::*;

mod config;
mod connectivity;
mod controller;
mod error;
mod flow;
mod generator;
mod grid;
mod piece;
mod pipe;
mod queue;
mod session;
mod snapshot;
mod timing;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Won,
    Lost,
}

/// Final result of a session, reported once when the water stops.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeReport {
    pub outcome: GameOutcome,
    pub path_length: i32,
    pub required_length: u32,
}

impl OutcomeReport {
    pub fn resolve(path_length: i32, required_length: u32) -> Self {
        let outcome = if i64::from(path_length) >= i64::from(required_length) {
            GameOutcome::Won
        } else {
            GameOutcome::Lost
        };
        Self {
            outcome,
            path_length,
            required_length,
        }
    }

    pub const fn is_won(&self) -> bool {
        matches!(self.outcome, GameOutcome::Won)
    }
}

/// Why a placement was ignored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceRejection {
    NoSession,
    Finished,
    OutOfBounds,
    StartCell,
    Blocked,
    /// Pipe already holds water.
    Wet,
    /// Dry pipe the water is about to enter.
    FlowHead,
    Cooldown,
    QueueEmpty,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceOutcome {
    Placed,
    /// Took the place of a dry pipe.
    Replaced,
    Rejected(PlaceRejection),
}

impl PlaceOutcome {
    pub const fn accepted(self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    FlowStarted,
    Stepped(StepOutcome),
    Finished(OutcomeReport),
}

impl TickOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::Idle => false,
            Self::FlowStarted => true,
            Self::Stepped(step) => step.has_update(),
            Self::Finished(_) => true,
        }
    }
}
