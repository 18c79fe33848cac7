use alloc::string::String;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Grid needs at least 2 rows and 1 column")]
    InvalidGridSize,
    #[error("No piece type is enabled")]
    EmptyPieceSet,
    #[error("Start piece cannot be part of the piece set")]
    StartInPieceSet,
    #[error("Maximum blocked cells is lower than the minimum")]
    InvalidBlockedRange,
    #[error("Maximum required length is lower than the minimum")]
    InvalidRequiredLengthRange,
    #[error("Max water level must be at least 1")]
    InvalidWaterLevel,
    #[error("Start position must leave room for a cell below it")]
    InvalidStart,
    #[error("Blocked cells cannot cover the start or the cell below it")]
    BlockedReserved,
    #[error("Too many pieces for the option queue")]
    QueueOverflow,
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = core::result::Result<T, GameError>;
