use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Delay before a finished game falls back to the menu.
pub const DEFAULT_RETURN_TO_MENU_DELAY: Millis = 5000;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    pub rows: Coord,
    pub cols: Coord,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowConfig {
    pub start_delay: Millis,
    pub segment_delay: Millis,
    pub pipe_placement_delay: Millis,
    pub min_required_length: u32,
    pub max_required_length: u32,
    pub max_water_level: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceSetEntry {
    #[serde(rename = "type")]
    pub kind: PieceKind,
    pub enabled: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesConfig {
    pub min_blocked_cells: u16,
    pub max_blocked_cells: u16,
    #[serde(default = "default_return_to_menu_delay")]
    pub return_to_menu_delay: Millis,
}

fn default_return_to_menu_delay() -> Millis {
    DEFAULT_RETURN_TO_MENU_DELAY
}

/// Everything a session needs at bootstrap. Values only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub grid: GridConfig,
    pub flow: FlowConfig,
    pub piece_set: Vec<PieceSetEntry>,
    pub rules: RulesConfig,
}

impl GameConfig {
    /// Parses a JSON config document and validates it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| GameError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid.rows < 2 || self.grid.cols < 1 {
            return Err(GameError::InvalidGridSize);
        }
        if self.flow.max_water_level == 0 {
            return Err(GameError::InvalidWaterLevel);
        }
        if self.flow.max_required_length < self.flow.min_required_length {
            return Err(GameError::InvalidRequiredLengthRange);
        }
        if self.rules.max_blocked_cells < self.rules.min_blocked_cells {
            return Err(GameError::InvalidBlockedRange);
        }
        if self
            .piece_set
            .iter()
            .any(|entry| entry.enabled && entry.kind.is_start())
        {
            return Err(GameError::StartInPieceSet);
        }
        if self.catalog().is_empty() {
            return Err(GameError::EmptyPieceSet);
        }
        Ok(())
    }

    pub const fn size(&self) -> Coord2 {
        (self.grid.rows, self.grid.cols)
    }

    /// Enabled piece kinds, in config order.
    pub fn catalog(&self) -> Vec<PieceKind> {
        self.piece_set
            .iter()
            .filter(|entry| entry.enabled)
            .map(|entry| entry.kind)
            .collect()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig { rows: 7, cols: 9 },
            flow: FlowConfig {
                start_delay: 15_000,
                segment_delay: 400,
                pipe_placement_delay: 250,
                min_required_length: 8,
                max_required_length: 15,
                max_water_level: 4,
            },
            piece_set: vec![
                PieceSetEntry {
                    kind: PieceKind::Straight,
                    enabled: true,
                },
                PieceSetEntry {
                    kind: PieceKind::Corner,
                    enabled: true,
                },
                PieceSetEntry {
                    kind: PieceKind::Cross,
                    enabled: true,
                },
            ],
            rules: RulesConfig {
                min_blocked_cells: 4,
                max_blocked_cells: 9,
                return_to_menu_delay: DEFAULT_RETURN_TO_MENU_DELAY,
            },
        }
    }
}
