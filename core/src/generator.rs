use alloc::vec::Vec;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Fixed part of a session: where the water comes from, where the
/// obstacles are, and how long the path has to be.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLayout {
    pub start: Coord2,
    pub blocked: Vec<Coord2>,
    pub required_length: u32,
}

pub trait LayoutGenerator {
    fn generate(self, config: &GameConfig) -> BoardLayout;
}

/// Uniformly random start, obstacles and goal.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

/// Draws from `[min, max)`, or `min` when the range is empty.
fn draw_in(rng: &mut SmallRng, min: u32, max: u32) -> u32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: &GameConfig) -> BoardLayout {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let (rows, cols) = config.size();

        // last row stays free so the source always has a cell below it
        let start = (
            rng.random_range(0..rows.saturating_sub(1).max(1)),
            rng.random_range(0..cols.max(1)),
        );

        let requested = draw_in(
            &mut rng,
            config.rules.min_blocked_cells.into(),
            config.rules.max_blocked_cells.into(),
        ) as usize;

        let mut positions = valid_placement_positions(config.size(), start);
        if requested > positions.len() {
            log::warn!(
                "Board too small for blocked cells, requested {} but only fits {}",
                requested,
                positions.len()
            );
        }
        positions.shuffle(&mut rng);
        positions.truncate(requested);

        let required_length = draw_in(
            &mut rng,
            config.flow.min_required_length,
            config.flow.max_required_length,
        );

        log::debug!(
            "Generated layout: start {:?}, {} blocked, required length {}",
            start,
            positions.len(),
            required_length
        );
        BoardLayout {
            start,
            blocked: positions,
            required_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GameConfig {
        let mut config = GameConfig::default();
        config.grid = GridConfig { rows: 5, cols: 6 };
        config.rules.min_blocked_cells = 3;
        config.rules.max_blocked_cells = 7;
        config.flow.min_required_length = 4;
        config.flow.max_required_length = 9;
        config
    }

    #[test]
    fn layouts_respect_board_invariants() {
        let config = config();

        for seed in 0..200 {
            let layout = RandomLayoutGenerator::new(seed).generate(&config);
            let (row, col) = layout.start;
            assert!(row <= config.grid.rows - 2);
            assert!(col < config.grid.cols);
            assert!((3..7).contains(&layout.blocked.len()));
            assert!((4..9).contains(&layout.required_length));
            assert!(!layout.blocked.contains(&layout.start));
            assert!(!layout.blocked.contains(&(row + 1, col)));
            assert!(Grid::new(config.size(), layout.start, &layout.blocked, 4).is_ok());
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let config = config();

        assert_eq!(
            RandomLayoutGenerator::new(9).generate(&config),
            RandomLayoutGenerator::new(9).generate(&config)
        );
    }

    #[test]
    fn equal_bounds_pick_the_minimum() {
        let mut config = config();
        config.rules.min_blocked_cells = 2;
        config.rules.max_blocked_cells = 2;
        config.flow.min_required_length = 6;
        config.flow.max_required_length = 6;

        let layout = RandomLayoutGenerator::new(1).generate(&config);

        assert_eq!(layout.blocked.len(), 2);
        assert_eq!(layout.required_length, 6);
    }

    #[test]
    fn blocked_count_is_clamped_to_the_board() {
        let mut config = config();
        config.grid = GridConfig { rows: 2, cols: 2 };
        config.rules.min_blocked_cells = 10;
        config.rules.max_blocked_cells = 20;

        let layout = RandomLayoutGenerator::new(3).generate(&config);

        assert_eq!(layout.blocked.len(), 2);
    }
}
