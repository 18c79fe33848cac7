//! Which sides of a piece carry water, per kind and rotation.
//!
//! Nothing in here looks at fill state; the per-instance rules (wet pipes are
//! dead ends, a cross side is used only once) live in [`PipeState`].

use crate::*;

/// Side of `to` that faces `from`, when the two cells are orthogonally adjacent.
pub fn direction_between(from: Coord2, to: Coord2) -> Option<Direction> {
    let (from_row, from_col) = from;
    let (to_row, to_col) = to;

    if from_col == to_col {
        match i16::from(to_row) - i16::from(from_row) {
            1 => Some(Direction::Top),
            -1 => Some(Direction::Bottom),
            _ => None,
        }
    } else if from_row == to_row {
        match i16::from(to_col) - i16::from(from_col) {
            1 => Some(Direction::Left),
            -1 => Some(Direction::Right),
            _ => None,
        }
    } else {
        None
    }
}

/// The two sides joined by a corner piece.
///
/// At 0° the curve joins bottom and right, each quarter turn moves it clockwise.
const fn corner_sides(rotation: Rotation) -> (Direction, Direction) {
    use Direction::*;
    match rotation {
        Rotation::R0 => (Bottom, Right),
        Rotation::R90 => (Left, Bottom),
        Rotation::R180 => (Top, Left),
        Rotation::R270 => (Right, Top),
    }
}

const fn straight_is_vertical(rotation: Rotation) -> bool {
    matches!(rotation, Rotation::R0 | Rotation::R180)
}

pub fn openings(kind: PieceKind, rotation: Rotation) -> DirectionSet {
    match kind {
        PieceKind::Straight if straight_is_vertical(rotation) => {
            DirectionSet::TOP | DirectionSet::BOTTOM
        }
        PieceKind::Straight => DirectionSet::LEFT | DirectionSet::RIGHT,
        PieceKind::Corner => {
            let (a, b) = corner_sides(rotation);
            a.as_set() | b.as_set()
        }
        PieceKind::Cross => DirectionSet::all(),
        PieceKind::Start => DirectionSet::BOTTOM,
    }
}

/// Whether a piece can take water entering through `incoming`.
pub fn accepts(kind: PieceKind, rotation: Rotation, incoming: Direction) -> bool {
    match kind {
        PieceKind::Start => false,
        _ => openings(kind, rotation).has(incoming),
    }
}

/// Side through which water leaves after entering through `incoming`.
///
/// The start piece has no entry and always drains to the bottom. Every other
/// kind needs an entry side it actually connects.
pub fn exit_direction(
    kind: PieceKind,
    rotation: Rotation,
    incoming: Option<Direction>,
) -> Option<Direction> {
    match (kind, incoming) {
        (PieceKind::Start, _) => Some(Direction::Bottom),
        (_, None) => None,
        (PieceKind::Straight | PieceKind::Cross, Some(incoming)) => {
            accepts(kind, rotation, incoming).then_some(incoming.opposite())
        }
        (PieceKind::Corner, Some(incoming)) => {
            let (a, b) = corner_sides(rotation);
            if incoming == a {
                Some(b)
            } else if incoming == b {
                Some(a)
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::*;

    #[test]
    fn direction_between_requires_adjacency() {
        assert_eq!(direction_between((0, 2), (1, 2)), Some(Top));
        assert_eq!(direction_between((2, 2), (1, 2)), Some(Bottom));
        assert_eq!(direction_between((2, 2), (2, 3)), Some(Left));
        assert_eq!(direction_between((2, 4), (2, 3)), Some(Right));
        assert_eq!(direction_between((0, 2), (2, 2)), None);
        assert_eq!(direction_between((1, 1), (2, 2)), None);
        assert_eq!(direction_between((1, 1), (1, 1)), None);
    }

    #[test]
    fn straight_accepts_along_its_axis_only() {
        for rotation in [Rotation::R0, Rotation::R180] {
            assert!(accepts(PieceKind::Straight, rotation, Top));
            assert!(accepts(PieceKind::Straight, rotation, Bottom));
            assert!(!accepts(PieceKind::Straight, rotation, Left));
            assert!(!accepts(PieceKind::Straight, rotation, Right));
        }
        for rotation in [Rotation::R90, Rotation::R270] {
            assert!(!accepts(PieceKind::Straight, rotation, Top));
            assert!(!accepts(PieceKind::Straight, rotation, Bottom));
            assert!(accepts(PieceKind::Straight, rotation, Left));
            assert!(accepts(PieceKind::Straight, rotation, Right));
        }
        assert_eq!(
            exit_direction(PieceKind::Straight, Rotation::R90, Some(Left)),
            Some(Right)
        );
        assert_eq!(
            exit_direction(PieceKind::Straight, Rotation::R0, Some(Left)),
            None
        );
    }

    #[test]
    fn corner_table_matches_rotations() {
        let table = [
            (Rotation::R0, Bottom, Right),
            (Rotation::R90, Left, Bottom),
            (Rotation::R180, Top, Left),
            (Rotation::R270, Right, Top),
        ];

        for (rotation, a, b) in table {
            for side in Direction::ALL {
                let connected = side == a || side == b;
                assert_eq!(accepts(PieceKind::Corner, rotation, side), connected);
            }
            assert_eq!(exit_direction(PieceKind::Corner, rotation, Some(a)), Some(b));
            assert_eq!(exit_direction(PieceKind::Corner, rotation, Some(b)), Some(a));
        }
    }

    #[test]
    fn cross_goes_straight_through_regardless_of_rotation() {
        for rotation in Rotation::ALL {
            for side in Direction::ALL {
                assert!(accepts(PieceKind::Cross, rotation, side));
                assert_eq!(
                    exit_direction(PieceKind::Cross, rotation, Some(side)),
                    Some(side.opposite())
                );
            }
        }
    }

    #[test]
    fn start_never_accepts_and_drains_down() {
        for side in Direction::ALL {
            assert!(!accepts(PieceKind::Start, Rotation::R0, side));
        }
        assert_eq!(exit_direction(PieceKind::Start, Rotation::R0, None), Some(Bottom));
        assert_eq!(
            exit_direction(PieceKind::Start, Rotation::R0, Some(Left)),
            Some(Bottom)
        );
    }
}
